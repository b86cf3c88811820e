use bon::bon;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use itertools::Itertools;

use crate::{
    core::{
        DecisionWindow,
        HourlyPrice,
        InvalidPrices,
        hour::{is_top_of_hour, top_of_hour},
    },
    quantity::Price,
};

/// Hourly prices of a successfully fetched snapshot.
///
/// The hours are stored in rank order, the cheapest first.
/// Among equal prices, the earlier hour gets the lower rank.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Prices {
    timezone: Tz,
    unit: String,
    hourly: Vec<HourlyPrice>,
}

#[bon]
impl Prices {
    /// Build the prices from the hours ranked by the provider.
    #[builder]
    pub fn new(
        timezone: Tz,
        #[builder(into)] unit: String,
        hours_available: usize,
        hourly_prices: Vec<HourlyPrice>,
    ) -> Result<Self, InvalidPrices> {
        let mut hourly_prices = hourly_prices;

        if hourly_prices.len() != hours_available {
            return Err(InvalidPrices::CountMismatch {
                expected: hours_available,
                actual: hourly_prices.len(),
            });
        }
        if let Some(hourly_price) = hourly_prices.iter().find(|it| !it.price.is_finite()) {
            return Err(InvalidPrices::NonFinitePrice(hourly_price.price));
        }
        if let Some(hourly_price) =
            hourly_prices.iter().find(|it| !is_top_of_hour(it.time, timezone))
        {
            return Err(InvalidPrices::NotTopOfHour(hourly_price.time));
        }
        if let Some(time) = hourly_prices.iter().map(|it| it.time).duplicates().next() {
            return Err(InvalidPrices::DuplicateHour(time));
        }
        let ranks = hourly_prices.iter().map(|it| it.rank).sorted_unstable();
        if !ranks.eq((1_u32..).take(hours_available)) {
            return Err(InvalidPrices::RanksNotPermutation { n_hours: hours_available });
        }

        hourly_prices.sort_unstable_by_key(|it| it.rank);
        if let Some((_, next)) =
            hourly_prices.iter().tuple_windows().find(|(previous, next)| next.price < previous.price)
        {
            return Err(InvalidPrices::RankPriceMismatch { rank: next.rank, price: next.price });
        }

        // The provider may order equal prices arbitrarily:
        hourly_prices.sort_by_key(|it| (it.price, it.time));
        Self::assign_ranks(&mut hourly_prices);

        Ok(Self { timezone, unit, hourly: hourly_prices })
    }
}

impl Prices {
    /// Rank the unranked hourly prices.
    pub fn from_rates(
        timezone: Tz,
        unit: impl Into<String>,
        rates: impl IntoIterator<Item = (DateTime<Utc>, Price)>,
    ) -> Result<Self, InvalidPrices> {
        let mut hourly_prices =
            rates.into_iter().map(|(time, price)| HourlyPrice::new(time, price, 0)).collect_vec();
        hourly_prices.sort_by_key(|it| (it.price, it.time));
        Self::assign_ranks(&mut hourly_prices);
        Self::builder()
            .timezone(timezone)
            .unit(unit)
            .hours_available(hourly_prices.len())
            .hourly_prices(hourly_prices)
            .build()
    }

    fn assign_ranks(hourly_prices: &mut [HourlyPrice]) {
        for (rank, hourly_price) in (1_u32..).zip(hourly_prices.iter_mut()) {
            hourly_price.rank = rank;
        }
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub const fn hours_available(&self) -> usize {
        self.hourly.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }

    /// Iterate over the hours in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, HourlyPrice> {
        self.hourly.iter()
    }

    /// Current hour in the snapshot timezone: hours before it are already gone.
    #[must_use]
    pub fn current_hour(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        top_of_hour(now, self.timezone)
    }

    /// Hours within the window which have not passed yet, the cheapest first.
    pub fn eligible(
        &self,
        window: DecisionWindow,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &HourlyPrice> {
        let current_hour = self.current_hour(now);
        self.hourly.iter().filter(move |it| window.contains(it.time) && (it.time >= current_hour))
    }

    /// Cheapest hour within the window which has not passed yet.
    ///
    /// Since the hours are stored in rank order, this is the first eligible hour.
    #[must_use]
    pub fn cheapest(&self, window: DecisionWindow, now: DateTime<Utc>) -> Option<&HourlyPrice> {
        self.eligible(window, now).next()
    }

    /// Chronologically last hour, regardless of its price.
    #[must_use]
    pub fn latest(&self) -> Option<&HourlyPrice> {
        self.hourly.iter().max_by_key(|it| it.time)
    }
}

impl<'a> IntoIterator for &'a Prices {
    type Item = &'a HourlyPrice;
    type IntoIter = std::slice::Iter<'a, HourlyPrice>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
