#![allow(clippy::doc_markdown)]

mod cli;
mod tables;

use chrono::{DateTime, Utc};
use clap::{Parser, crate_version};
use dayahead::{
    core::{Lookup, Planner, TracingObserver},
    prelude::*,
};

use crate::{
    cli::{Args, Command, WindowArgs},
    tables::build_prices_table,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let now = args.now();
    let planner = Planner::new(args.snapshot.read()?, TracingObserver);

    match args.command {
        Command::Cheapest(window) => cheapest(&planner, &window, now)?,
        Command::Validate(window) => validate(&planner, &window, now)?,
        Command::Latest => {
            let snapshot = planner.snapshot();
            let latest = snapshot.latest_available_hour()?;
            match snapshot.timezone() {
                Some(timezone) => println!("{}", latest.with_timezone(&timezone).to_rfc3339()),
                None => println!("{}", latest.to_rfc3339()),
            }
        }
        Command::Ranks(window) => ranks(&planner, &window, now)?,
    }

    info!("done!");
    Ok(())
}

#[instrument(skip_all)]
fn cheapest(planner: &Planner, window: &WindowArgs, now: DateTime<Utc>) -> Result {
    let window = window.required_window(now)?;
    match planner.cheapest_hour_at(window, now) {
        Lookup::Found(hourly_price) => {
            let snapshot = planner.snapshot();
            let start = match snapshot.timezone() {
                Some(timezone) => hourly_price.time.with_timezone(&timezone).to_rfc3339(),
                None => hourly_price.time.to_rfc3339(),
            };
            println!(
                "{start} {} {} (#{})",
                hourly_price.price,
                snapshot.unit().unwrap_or_default(),
                hourly_price.rank,
            );
        }
        Lookup::NoEligibleHour => {
            println!("no eligible hour");
        }
        Lookup::NoData(reason) => {
            bail!("the snapshot cannot be used: {reason}");
        }
    }
    Ok(())
}

#[instrument(skip_all)]
fn validate(planner: &Planner, window: &WindowArgs, now: DateTime<Utc>) -> Result {
    let window = window.required_window(now)?;
    ensure!(planner.has_valid_data_at(window, now), "no usable prices for {window}");
    println!("valid");
    Ok(())
}

#[instrument(skip_all)]
fn ranks(planner: &Planner, window: &WindowArgs, now: DateTime<Utc>) -> Result {
    let snapshot = planner.snapshot();
    if let Some(message) = snapshot.error_message() {
        warn!(error_message = message, "the snapshot is errored");
    }
    let prices = snapshot.prices().context("the snapshot has no prices")?;
    let cheapest = match window.window(now)? {
        Some(window) => planner.cheapest_hour_at(window, now).found(),
        None => None,
    };
    println!("{}", build_prices_table(prices, prices.current_hour(now), cheapest.as_ref()));
    Ok(())
}
