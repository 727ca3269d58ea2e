//! Store hours.
//!
//! All checks take the current instant explicitly and convert it to the
//! store's fixed UTC offset; nothing here reads the system clock.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub offset: FixedOffset,
    /// Local dates the store stays closed all day.
    pub closed_dates: Vec<NaiveDate>,
}

impl StoreHours {
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    pub fn is_closed_date(&self, now: DateTime<Utc>) -> bool {
        self.closed_dates.contains(&self.local(now).date_naive())
    }

    /// Open from `open` to `close` inclusive, outside closed dates.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if self.is_closed_date(now) {
            return false;
        }
        let time = self.local(now).time();
        self.open <= time && time <= self.close
    }

    /// Customer-facing hours line.
    pub fn message(&self, now: DateTime<Utc>) -> String {
        if self.is_closed_date(now) {
            return "We are closed today. Sorry for the inconvenience!".to_string();
        }
        if self.is_open(now) {
            return format!("We are OPEN today from {} to {}.", clock(self.open), clock(self.close));
        }
        if self.local(now).time() < self.open {
            format!("Good morning! We'll open at {}.", clock(self.open))
        } else {
            format!("We're closed now. We'll open tomorrow at {}.", clock(self.open))
        }
    }

    /// When a just-confirmed order will be prepared.
    pub fn pickup_note(&self, now: DateTime<Utc>) -> String {
        if self.is_open(now) {
            "We'll prepare your order and contact you when it's ready.".to_string()
        } else if !self.is_closed_date(now) && self.local(now).time() < self.open {
            format!("We'll prepare your order when we open at {} and contact you when it's ready.", clock(self.open))
        } else {
            format!(
                "We'll prepare your order when we open tomorrow at {} and contact you when it's ready.",
                clock(self.open)
            )
        }
    }
}

impl Default for StoreHours {
    /// 10:00 AM to 10:00 PM, UTC+8, no closures.
    fn default() -> Self {
        StoreHours {
            open: NaiveTime::from_hms_opt(10, 0, 0).expect("valid literal time"),
            close: NaiveTime::from_hms_opt(22, 0, 0).expect("valid literal time"),
            offset: FixedOffset::east_opt(8 * 3600).expect("valid literal offset"),
            closed_dates: Vec::new(),
        }
    }
}

/// `"09:00 PM"`.
fn clock(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// UTC instant for a Manila wall-clock time on 2025-03-14.
    fn manila(hour: u32, minute: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 14, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn messages_follow_the_clock() {
        let hours = StoreHours::default();
        assert_eq!(hours.message(manila(12, 0)), "We are OPEN today from 10:00 AM to 10:00 PM.");
        assert_eq!(hours.message(manila(8, 30)), "Good morning! We'll open at 10:00 AM.");
        assert_eq!(hours.message(manila(23, 15)), "We're closed now. We'll open tomorrow at 10:00 AM.");
    }

    #[test]
    fn closing_time_is_inclusive() {
        let hours = StoreHours::default();
        assert!(hours.is_open(manila(22, 0)));
        assert!(!hours.is_open(manila(22, 1)));
    }

    #[test]
    fn closed_dates_override_hours() {
        let hours = StoreHours { closed_dates: vec![NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()], ..Default::default() };
        assert!(!hours.is_open(manila(12, 0)));
        assert_eq!(hours.message(manila(12, 0)), "We are closed today. Sorry for the inconvenience!");
        assert!(hours.pickup_note(manila(8, 0)).contains("open tomorrow at 10:00 AM"));
    }

    #[test]
    fn pickup_notes() {
        let hours = StoreHours::default();
        assert_eq!(hours.pickup_note(manila(12, 0)), "We'll prepare your order and contact you when it's ready.");
        assert!(hours.pickup_note(manila(7, 0)).contains("when we open at 10:00 AM"));
        assert!(hours.pickup_note(manila(23, 0)).contains("when we open tomorrow at 10:00 AM"));
    }
}
