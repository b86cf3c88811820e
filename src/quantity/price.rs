use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Hourly energy price, in the unit of the snapshot it belongs to.
///
/// The unit is carried by the snapshot (for example, `EUR/MWh`), hence it is not rendered here.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::From,
)]
#[from(f64, OrderedFloat<f64>)]
#[serde(transparent)]
#[must_use]
pub struct Price(pub OrderedFloat<f64>);

impl Price {
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Price::from(30.0) < Price::from(50.0));
        assert_eq!(Price::from(-5.0).max(Price::from(0.0)), Price::from(0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from(12.346).to_string(), "12.35");
        assert_eq!(Price::from(-0.5).to_string(), "-0.50");
    }

    #[test]
    fn test_deserialize_transparent() -> serde_json::Result<()> {
        assert_eq!(serde_json::from_str::<Price>("81.5")?, Price::from(81.5));
        Ok(())
    }
}
