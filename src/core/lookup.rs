use std::fmt::{Display, Formatter};

/// Outcome of an hour lookup in a snapshot.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup<T> {
    Found(T),

    /// The snapshot is usable, but none of its hours satisfies the window and freshness.
    NoEligibleHour,

    /// The snapshot cannot be queried at all.
    NoData(Unusable),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NoEligibleHour | Self::NoData(_) => None,
        }
    }

    pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Lookup<R> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NoEligibleHour => Lookup::NoEligibleHour,
            Self::NoData(reason) => Lookup::NoData(reason),
        }
    }
}

/// Why a snapshot is not usable for scheduling decisions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Unusable {
    /// The snapshot is in the error state, or carries an error message, or both.
    ProviderError { message: Option<String> },

    /// The snapshot has no hourly prices.
    Empty,
}

impl Display for Unusable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderError { message: Some(message) } => write!(f, "provider error: {message}"),
            Self::ProviderError { message: None } => write!(f, "provider error"),
            Self::Empty => write!(f, "no hourly prices"),
        }
    }
}
