use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies the current moment so date-sensitive logic stays testable.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the user's local time zone. Status and
    /// reminder comparisons work at this granularity.
    fn today(&self) -> NaiveDate;
}

/// Real-time clock backed by the system time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
