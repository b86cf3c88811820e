use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quantity::Price;

/// Price of one hour of a snapshot.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, derive_more::Constructor,
)]
pub struct HourlyPrice {
    /// Top of the hour, the hour starts here.
    #[serde(rename = "dateTime")]
    pub time: DateTime<Utc>,

    pub price: Price,

    /// 1-based position among all hours of the snapshot sorted ascending by price.
    pub rank: u32,
}
