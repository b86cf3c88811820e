use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::core::{
    DecisionWindow,
    Error,
    HourlyPrice,
    Lookup,
    Observer,
    Snapshot,
    State,
    TracingObserver,
};

/// Holds the current snapshot and answers the scheduling queries against it.
///
/// Publishing swaps the whole snapshot, and each query works on the snapshot
/// which was current when the query started.
pub struct Planner<O = TracingObserver> {
    sender: watch::Sender<Arc<Snapshot>>,
    observer: O,
}

impl<O: Observer> Planner<O> {
    pub fn new(snapshot: Snapshot, observer: O) -> Self {
        observer.on_published(&snapshot);
        let (sender, _) = watch::channel(Arc::new(snapshot));
        Self { sender, observer }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.sender.borrow())
    }

    /// Follow the published snapshots, for example from another task.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.sender.subscribe()
    }

    /// Replace the current snapshot with the freshly fetched one.
    pub fn publish(&self, snapshot: Snapshot) {
        self.observer.on_published(&snapshot);
        self.sender.send_replace(Arc::new(snapshot));
    }

    /// Mark the current snapshot as errored, for example, when it turns out to be stale.
    ///
    /// The errored copy replaces the current snapshot.
    pub fn mark_errored(&self, message: impl Into<String>) {
        let message = message.into();
        let mut area = String::new();
        self.sender.send_modify(|snapshot| {
            area = snapshot.area().to_string();
            let errored =
                (**snapshot).clone().with_state(State::Error).with_error_message(message.clone());
            *snapshot = Arc::new(errored);
        });
        // The channel is unlocked by now, so the observer may read the planner back:
        self.observer.on_marked_errored(&area, &message);
    }

    pub fn cheapest_hour_at(
        &self,
        window: DecisionWindow,
        now: DateTime<Utc>,
    ) -> Lookup<HourlyPrice> {
        let snapshot = self.snapshot();
        let lookup = snapshot.cheapest_hour_at(window, now).map(|hourly_price| *hourly_price);
        match &lookup {
            Lookup::Found(hourly_price) => {
                self.observer.on_cheapest_hour(snapshot.area(), hourly_price);
            }
            Lookup::NoEligibleHour => {
                self.observer.on_no_eligible_hour(snapshot.area(), window);
            }
            Lookup::NoData(reason) => {
                self.observer.on_unusable(snapshot.area(), reason);
            }
        }
        lookup
    }

    pub fn cheapest_hour(&self, window: DecisionWindow) -> Lookup<HourlyPrice> {
        self.cheapest_hour_at(window, Utc::now())
    }

    #[must_use]
    pub fn has_valid_data_at(&self, window: DecisionWindow, now: DateTime<Utc>) -> bool {
        let snapshot = self.snapshot();
        let is_valid = snapshot.has_valid_data_at(window, now);
        if !is_valid {
            match snapshot.usable_prices() {
                Ok(_) => self.observer.on_no_eligible_hour(snapshot.area(), window),
                Err(reason) => self.observer.on_unusable(snapshot.area(), &reason),
            }
        }
        is_valid
    }

    #[must_use]
    pub fn has_valid_data(&self, window: DecisionWindow) -> bool {
        self.has_valid_data_at(window, Utc::now())
    }

    pub fn latest_available_hour(&self) -> Result<DateTime<Utc>, Error> {
        self.snapshot().latest_available_hour()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Mutex, OnceLock, Weak, mpsc},
        thread,
        time::Duration,
    };

    use chrono_tz::Europe;
    use itertools::Itertools;

    use super::*;
    use crate::{
        core::{
            Prices,
            Unusable,
            prices::tests::{hour, three_hours},
        },
        quantity::Price,
    };

    #[derive(Default)]
    struct RecordingObserver(Mutex<Vec<String>>);

    impl RecordingObserver {
        fn record(&self, event: String) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Observer for RecordingObserver {
        fn on_published(&self, snapshot: &Snapshot) {
            self.record(format!("published {}", snapshot.area()));
        }

        fn on_marked_errored(&self, area: &str, message: &str) {
            self.record(format!("errored {area}: {message}"));
        }

        fn on_unusable(&self, area: &str, reason: &Unusable) {
            self.record(format!("unusable {area}: {reason}"));
        }

        fn on_no_eligible_hour(&self, area: &str, _window: DecisionWindow) {
            self.record(format!("no eligible hour {area}"));
        }

        fn on_cheapest_hour(&self, area: &str, hourly_price: &HourlyPrice) {
            self.record(format!("cheapest {area}: #{}", hourly_price.rank));
        }
    }

    fn planner() -> Planner<RecordingObserver> {
        Planner::new(Snapshot::new("BE", State::Ok, three_hours()), RecordingObserver::default())
    }

    #[test]
    fn test_cheapest_hour() -> Result<(), Error> {
        let planner = planner();
        let window = DecisionWindow::between(hour(0), hour(2))?;
        let lookup = planner.cheapest_hour_at(window, hour(0));
        assert_eq!(lookup.found().map(|it| it.time), Some(hour(2)));

        let window = DecisionWindow::between(hour(100), hour(101))?;
        assert_eq!(planner.cheapest_hour_at(window, hour(0)), Lookup::NoEligibleHour);
        assert!(!planner.has_valid_data_at(window, hour(0)));

        assert_eq!(
            planner.observer.events(),
            ["published BE", "cheapest BE: #1", "no eligible hour BE", "no eligible hour BE"],
        );
        Ok(())
    }

    #[test]
    fn test_publish_replaces_snapshot() -> Result<(), Error> {
        let planner = planner();
        let window = DecisionWindow::between(hour(0), hour(2))?;
        let before = planner.snapshot();

        planner.publish(Snapshot::error("BE", "upstream is down"));

        assert!(before.has_valid_data_at(window, hour(0)));
        assert!(!planner.has_valid_data_at(window, hour(0)));
        assert!(planner.latest_available_hour().is_err());
        assert_eq!(
            planner.observer.events(),
            ["published BE", "published BE", "unusable BE: provider error: upstream is down"],
        );
        Ok(())
    }

    #[test]
    fn test_mark_errored_is_copy_on_write() -> Result<(), Error> {
        let planner = planner();
        let window = DecisionWindow::between(hour(0), hour(2))?;
        let before = planner.snapshot();

        planner.mark_errored("prices are outdated");

        // The reader holding the old snapshot is unaffected:
        assert!(!before.is_errored());
        assert_eq!(before.latest_available_hour()?, hour(2));

        let after = planner.snapshot();
        assert_eq!(after.state(), State::Error);
        assert_eq!(after.error_message(), Some("prices are outdated"));
        assert_eq!(after.hours_available(), Some(3));
        assert_eq!(
            planner.cheapest_hour_at(window, hour(0)),
            Lookup::NoData(Unusable::ProviderError {
                message: Some("prices are outdated".to_string()),
            }),
        );
        assert_eq!(planner.observer.events()[1], "errored BE: prices are outdated");
        Ok(())
    }

    /// Reads the planner back while being notified.
    #[derive(Default)]
    struct ReadingObserver {
        planner: OnceLock<Weak<Planner<Self>>>,
        seen: Mutex<Option<State>>,
    }

    impl Observer for ReadingObserver {
        fn on_marked_errored(&self, _area: &str, _message: &str) {
            let planner = self.planner.get().and_then(Weak::upgrade).unwrap();
            *self.seen.lock().unwrap() = Some(planner.snapshot().state());
        }
    }

    #[test]
    fn test_observer_may_read_planner_when_marked_errored() {
        let planner = Arc::new(Planner::new(
            Snapshot::new("BE", State::Ok, three_hours()),
            ReadingObserver::default(),
        ));
        planner.observer.planner.set(Arc::downgrade(&planner)).unwrap();

        let (sender, receiver) = mpsc::channel();
        let marking = Arc::clone(&planner);
        thread::spawn(move || {
            marking.mark_errored("prices are outdated");
            sender.send(()).unwrap();
        });
        receiver.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(*planner.observer.seen.lock().unwrap(), Some(State::Error));
    }

    #[test]
    fn test_subscribe() {
        let planner = planner();
        let mut receiver = planner.subscribe();
        assert!(!receiver.has_changed().unwrap());

        planner.publish(Snapshot::error("NL", "timeout"));

        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().area(), "NL");
    }

    #[test]
    fn test_readers_see_whole_snapshots() {
        /// Each snapshot has as many hours as its area name says.
        fn snapshot(n_hours: i64) -> Snapshot {
            let prices = Prices::from_rates(
                Europe::Brussels,
                "EUR/MWh",
                (0..n_hours).map(|n| (hour(n), Price::from(100.0 - n as f64))),
            )
            .unwrap();
            Snapshot::new(n_hours.to_string(), State::Ok, prices)
        }

        let planner = Planner::new(snapshot(1), TracingObserver);
        thread::scope(|scope| {
            let readers = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        for _ in 0..1000 {
                            let snapshot = planner.snapshot();
                            let n_hours = snapshot.hours_available().unwrap_or_default();
                            if snapshot.is_errored() {
                                assert_eq!(snapshot.error_message(), Some("stale"));
                            } else {
                                assert_eq!(snapshot.area(), n_hours.to_string());
                            }
                        }
                    })
                })
                .collect_vec();
            for n_hours in 2..50 {
                planner.publish(snapshot(n_hours));
                if n_hours % 10 == 0 {
                    planner.mark_errored("stale");
                }
            }
            for reader in readers {
                reader.join().unwrap();
            }
        });
    }
}
