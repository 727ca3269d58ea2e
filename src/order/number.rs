use chrono::{DateTime, FixedOffset, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Order number generator.
///
/// Numbers look like `FB-20250314093012417-123456`: prefix, local time to the
/// millisecond, last six characters of the customer id. The millisecond clock
/// never repeats or goes backwards within one generator, so two orders placed
/// in the same instant still get distinct numbers.
#[derive(Debug)]
pub struct OrderNumbers {
    prefix: String,
    offset: FixedOffset,
    last_millis: AtomicI64,
}

impl OrderNumbers {
    pub fn new(prefix: impl Into<String>, offset: FixedOffset) -> Self {
        OrderNumbers { prefix: prefix.into(), offset, last_millis: AtomicI64::new(i64::MIN) }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Next number for `customer_id` at `now`, with the local timestamp it
    /// encodes.
    pub fn next(&self, customer_id: &str, now: DateTime<Utc>) -> (String, DateTime<FixedOffset>) {
        let wanted = now.timestamp_millis();
        let previous = self
            .last_millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(wanted.max(last.saturating_add(1))))
            .unwrap_or(wanted);
        let millis = wanted.max(previous.saturating_add(1));

        let stamp = DateTime::from_timestamp_millis(millis).unwrap_or(now).with_timezone(&self.offset);
        let number = format!("{}-{}-{}", self.prefix, stamp.format("%Y%m%d%H%M%S%3f"), suffix(customer_id, 6));
        (number, stamp)
    }
}

/// Last `n` characters of `s`.
pub(crate) fn suffix(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    match s.char_indices().nth(count.saturating_sub(n)) {
        Some((at, _)) => &s[at..],
        None => s,
    }
}
