use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use dayahead::{core::DecisionWindow, prelude::*};

#[derive(Parser)]
pub struct WindowArgs {
    /// Earliest allowed start, in RFC 3339. Defaults to now.
    #[clap(long = "from", env = "WINDOW_FROM")]
    pub from: Option<DateTime<Utc>>,

    /// Latest allowed start, in RFC 3339.
    #[clap(long = "to", env = "WINDOW_TO", conflicts_with = "within")]
    pub to: Option<DateTime<Utc>>,

    /// Window length, for example: `12h`.
    #[clap(long = "within", env = "WINDOW_WITHIN")]
    pub within: Option<humantime::Duration>,
}

impl WindowArgs {
    pub fn window(&self, now: DateTime<Utc>) -> Result<Option<DecisionWindow>> {
        let window = match (self.from, self.to, &self.within) {
            (Some(start), Some(end), _) => Some(DecisionWindow::between(start, end)?),
            (None, Some(end), _) => Some(DecisionWindow::before(now, end)?),
            (start, None, Some(within)) => Some(DecisionWindow::within(
                start.unwrap_or(now),
                TimeDelta::from_std(**within)?,
            )?),
            (_, None, None) => None,
        };
        Ok(window)
    }

    pub fn required_window(&self, now: DateTime<Utc>) -> Result<DecisionWindow> {
        self.window(now)?.context("either `--to` or `--within` is required")
    }
}
