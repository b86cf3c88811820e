use std::fmt::{Debug, Display, Formatter};

use chrono::{DateTime, TimeDelta, Utc};

use crate::core::Error;

/// Caller-supplied range of instants, within which a job may run.
#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct DecisionWindow {
    /// Inclusive.
    start: DateTime<Utc>,

    /// Inclusive.
    end: DateTime<Utc>,
}

impl Debug for DecisionWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

impl Display for DecisionWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} – {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

impl DecisionWindow {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window that opens right now.
    pub fn before(now: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        Self::between(now, end)
    }

    /// Window of the given length that opens at `start`.
    pub fn within(start: DateTime<Utc>, duration: TimeDelta) -> Result<Self, Error> {
        let end = start.checked_add_signed(duration).ok_or(Error::WindowOutOfRange)?;
        Self::between(start, end)
    }

    #[must_use]
    pub const fn start(self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        (self.start <= instant) && (instant <= self.end)
    }
}
