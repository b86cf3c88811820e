use chrono::{DateTime, Utc};

use crate::{core::lookup::Unusable, quantity::Price};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the decision window starts after it ends: {start} > {end}")]
    InvertedWindow { start: DateTime<Utc>, end: DateTime<Utc> },

    #[error("the decision window end is out of the supported range")]
    WindowOutOfRange,

    #[error("no usable hourly prices for area `{area}`: {reason}")]
    NoUsablePrices { area: String, reason: Unusable },

    #[error("invalid hourly prices")]
    InvalidPrices(#[from] InvalidPrices),
}

/// Violations of the hourly price invariants, detected while building the prices.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidPrices {
    #[error("expected {expected} hours, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("the ranks are not a permutation of 1..={n_hours}")]
    RanksNotPermutation { n_hours: usize },

    #[error("duplicate hour: {0}")]
    DuplicateHour(DateTime<Utc>),

    #[error("not at the top of an hour: {0}")]
    NotTopOfHour(DateTime<Utc>),

    #[error("rank #{rank} is cheaper than the preceding rank: {price}")]
    RankPriceMismatch { rank: u32, price: Price },

    #[error("not a finite price: {0:?}")]
    NonFinitePrice(Price),

    #[error("hourly prices are present, but the timezone is missing")]
    MissingTimezone,
}
