use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Source of "now" for validation, id generation and period windows.
pub trait Clock: Send + Sync {
    /// Local wall-clock time used for calendar comparisons. The future-date
    /// check uses this local day, not the UTC day.
    fn now(&self) -> NaiveDateTime;
    /// Absolute instant used for ids and creation timestamps.
    fn utc_now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant. Local and UTC time coincide.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }
}
