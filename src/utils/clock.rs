use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing dates across application. Task operations read
/// it exactly once, so everything derived inside one operation shares the same instant.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
