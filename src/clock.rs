use time::{Date, OffsetDateTime};

/// Source of "today" for date navigation and streaks.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Wall clock in the local offset (UTC when the offset cannot be determined).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl FixedClock {
    /// Noon UTC on `date`.
    pub fn on(date: Date) -> Self {
        Self(date.midnight().assume_utc() + time::Duration::hours(12))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn fixed_clock_reports_its_date() {
        let clock = FixedClock::on(date!(2024 - 02 - 29));
        assert_eq!(clock.today(), date!(2024 - 02 - 29));
        assert_eq!(clock.now().hour(), 12);
    }
}
