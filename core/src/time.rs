//! Time related utils.

use std::fmt::Debug;

use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Build a datetime from Unix seconds, returns `None` when out of range.
pub fn from_timestamp(secs: i64) -> Option<DateTime> {
    DateTime::from_timestamp(secs, 0)
}

/// Clock is the single source of "now" used while signing requests.
///
/// Production code uses [`SystemClock`]; tests pin time with [`FixedClock`] so that
/// signatures are reproducible.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Return the current time.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the wall clock at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now()
    }
}

/// FixedClock always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime);

impl FixedClock {
    /// Create a clock pinned to the given Unix seconds.
    ///
    /// Falls back to the Unix epoch if `secs` is out of range.
    pub fn from_timestamp(secs: i64) -> Self {
        Self(from_timestamp(secs).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        self.0
    }
}
