mod snapshot;
mod window;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

pub use self::{snapshot::SnapshotArgs, window::WindowArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub snapshot: SnapshotArgs,

    /// Evaluate the freshness at this instant instead of the current time, in RFC 3339.
    #[clap(long, env = "NOW")]
    pub now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Find the cheapest hour within the window.
    #[clap(name = "cheapest")]
    Cheapest(WindowArgs),

    /// Check whether the snapshot can be used for the window.
    #[clap(name = "validate")]
    Validate(WindowArgs),

    /// Show the latest published hour.
    #[clap(name = "latest")]
    Latest,

    /// Show all hours in rank order, and the cheapest one within the window, if any.
    #[clap(name = "ranks")]
    Ranks(WindowArgs),
}
