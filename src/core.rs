mod error;
mod hour;
mod hourly_price;
mod lookup;
mod observer;
mod planner;
mod prices;
mod snapshot;
mod window;

pub use self::{
    error::{Error, InvalidPrices},
    hour::{is_top_of_hour, top_of_hour},
    hourly_price::HourlyPrice,
    lookup::{Lookup, Unusable},
    observer::{Observer, TracingObserver},
    planner::Planner,
    prices::Prices,
    snapshot::{Snapshot, State},
    window::DecisionWindow,
};
