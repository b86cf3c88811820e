use crate::{
    core::{DecisionWindow, HourlyPrice, Snapshot, Unusable},
    prelude::*,
};

/// Receives the diagnostics of scheduling decisions.
pub trait Observer: Send + Sync {
    fn on_published(&self, _snapshot: &Snapshot) {}

    fn on_marked_errored(&self, _area: &str, _message: &str) {}

    fn on_unusable(&self, _area: &str, _reason: &Unusable) {}

    fn on_no_eligible_hour(&self, _area: &str, _window: DecisionWindow) {}

    fn on_cheapest_hour(&self, _area: &str, _hourly_price: &HourlyPrice) {}
}

/// Reports everything as `tracing` events.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_published(&self, snapshot: &Snapshot) {
        if let Some(message) = snapshot.error_message() {
            error!(
                area = snapshot.area(),
                error_message = message,
                "failed to fetch the day-ahead prices",
            );
        } else {
            info!(
                area = snapshot.area(),
                hours_available = snapshot.hours_available(),
                unit = snapshot.unit(),
                "published the day-ahead prices",
            );
        }
    }

    fn on_marked_errored(&self, area: &str, message: &str) {
        warn!(area, error_message = message, "marked the day-ahead prices as errored");
    }

    fn on_unusable(&self, area: &str, reason: &Unusable) {
        warn!(area, %reason, "no usable day-ahead prices");
    }

    fn on_no_eligible_hour(&self, area: &str, window: DecisionWindow) {
        warn!(area, %window, "no eligible hour");
    }

    fn on_cheapest_hour(&self, area: &str, hourly_price: &HourlyPrice) {
        debug!(
            area,
            time = %hourly_price.time,
            price = %hourly_price.price,
            rank = hourly_price.rank,
            "found the cheapest hour",
        );
    }
}
