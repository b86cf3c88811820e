use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::core::{
    DecisionWindow,
    Error,
    HourlyPrice,
    InvalidPrices,
    Lookup,
    Prices,
    Unusable,
};

/// Lifecycle state of a snapshot.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum State {
    #[default]
    #[serde(rename = "ok", alias = "OK")]
    Ok,

    #[serde(rename = "error", alias = "ERROR")]
    Error,
}

/// One batch of day-ahead prices, valid until the next fetch replaces it.
///
/// A snapshot never changes after construction: marking it as errored produces a new snapshot,
/// and the price body is shared between the copies.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SerializedSnapshot", into = "SerializedSnapshot")]
#[must_use]
pub struct Snapshot {
    area: String,
    state: State,
    error_message: Option<String>,

    /// Absent when the fetch has failed.
    prices: Option<Arc<Prices>>,
}

impl Snapshot {
    /// Snapshot of a successful fetch.
    pub fn new(area: impl Into<String>, state: State, prices: Prices) -> Self {
        Self { area: area.into(), state, error_message: None, prices: Some(Arc::new(prices)) }
    }

    /// Snapshot of a failed fetch, it only carries the area and the reason.
    pub fn error(area: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            state: State::Error,
            error_message: Some(message.into()),
            prices: None,
        }
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn prices(&self) -> Option<&Prices> {
        self.prices.as_deref()
    }

    #[must_use]
    pub fn hours_available(&self) -> Option<usize> {
        self.prices().map(Prices::hours_available)
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.prices().map(Prices::unit)
    }

    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        self.prices().map(Prices::timezone)
    }

    #[must_use]
    pub fn is_errored(&self) -> bool {
        (self.state == State::Error) || self.error_message.is_some()
    }

    /// Get the prices, if the snapshot may be used for scheduling decisions at all.
    pub fn usable_prices(&self) -> Result<&Prices, Unusable> {
        if self.is_errored() {
            return Err(Unusable::ProviderError { message: self.error_message.clone() });
        }
        match self.prices() {
            Some(prices) if !prices.is_empty() => Ok(prices),
            _ => Err(Unusable::Empty),
        }
    }

    /// Find the cheapest hour within the window that has not passed by `now`.
    pub fn cheapest_hour_at(
        &self,
        window: DecisionWindow,
        now: DateTime<Utc>,
    ) -> Lookup<&HourlyPrice> {
        match self.usable_prices() {
            Ok(prices) => {
                prices.cheapest(window, now).map_or(Lookup::NoEligibleHour, Lookup::Found)
            }
            Err(reason) => Lookup::NoData(reason),
        }
    }

    pub fn cheapest_hour(&self, window: DecisionWindow) -> Lookup<&HourlyPrice> {
        self.cheapest_hour_at(window, Utc::now())
    }

    /// Check whether the snapshot has at least one hour within the window that has not passed by
    /// `now`.
    ///
    /// This tells both whether the snapshot has gone stale and whether the window falls outside
    /// the published horizon.
    #[must_use]
    pub fn has_valid_data_at(&self, window: DecisionWindow, now: DateTime<Utc>) -> bool {
        self.usable_prices().is_ok_and(|prices| prices.eligible(window, now).next().is_some())
    }

    #[must_use]
    pub fn has_valid_data(&self, window: DecisionWindow) -> bool {
        self.has_valid_data_at(window, Utc::now())
    }

    /// Chronologically last published hour.
    ///
    /// The caller is expected to check the validity first, hence the unusable snapshot is an error
    /// rather than a lookup outcome.
    pub fn latest_available_hour(&self) -> Result<DateTime<Utc>, Error> {
        self.usable_prices()
            .and_then(|prices| prices.latest().ok_or(Unusable::Empty))
            .map(|hourly_price| hourly_price.time)
            .map_err(|reason| Error::NoUsablePrices { area: self.area.clone(), reason })
    }
}

#[serde_as]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedSnapshot {
    area: String,

    #[serde(default)]
    state: State,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    timezone: Option<Tz>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours_available: Option<usize>,

    #[serde(default)]
    hourly_energy_prices: Vec<HourlyPrice>,
}

impl TryFrom<SerializedSnapshot> for Snapshot {
    type Error = Error;

    fn try_from(serialized: SerializedSnapshot) -> Result<Self, Self::Error> {
        let prices = match serialized.timezone {
            None if serialized.hourly_energy_prices.is_empty() => None,
            None => return Err(InvalidPrices::MissingTimezone.into()),
            Some(timezone) => {
                let hours_available = serialized
                    .hours_available
                    .unwrap_or(serialized.hourly_energy_prices.len());
                let prices = Prices::builder()
                    .timezone(timezone)
                    .unit(serialized.unit.unwrap_or_default())
                    .hours_available(hours_available)
                    .hourly_prices(serialized.hourly_energy_prices)
                    .build()?;
                Some(Arc::new(prices))
            }
        };
        Ok(Self {
            area: serialized.area,
            state: serialized.state,
            error_message: serialized.error_message,
            prices,
        })
    }
}

impl From<Snapshot> for SerializedSnapshot {
    fn from(snapshot: Snapshot) -> Self {
        let prices = snapshot.prices.as_deref();
        Self {
            timezone: prices.map(Prices::timezone),
            unit: prices.map(|prices| prices.unit().to_string()),
            hours_available: prices.map(Prices::hours_available),
            hourly_energy_prices: prices
                .map(|prices| prices.iter().copied().collect())
                .unwrap_or_default(),
            area: snapshot.area,
            state: snapshot.state,
            error_message: snapshot.error_message,
        }
    }
}
