//! Millisecond-precision point-in-time values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in time with millisecond precision, measured from the Unix epoch.
///
/// The core never samples the system clock; callers supply `Timestamp` values
/// explicitly, which keeps every policy decision deterministic and replayable
/// in tests.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_epoch_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the milliseconds since the Unix epoch.
    #[must_use]
    pub const fn epoch_millis(self) -> i64 {
        self.0
    }

    /// Returns the signed number of milliseconds from `self` until `later`.
    ///
    /// Negative when `later` precedes `self`.
    #[must_use]
    pub const fn millis_until(self, later: Self) -> i64 {
        later.0 - self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_distance() {
        let a = Timestamp::from_epoch_millis(100);
        let b = Timestamp::from_epoch_millis(200);
        assert!(a < b);
        assert_eq!(a.millis_until(b), 100);
        assert_eq!(b.millis_until(a), -100);
        assert_eq!(a.millis_until(a), 0);
    }
}
