use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Business calendar used to resolve "today" for price list validity.
///
/// Validity windows are plain dates in the company's local calendar, so the
/// current date must be taken in that offset rather than in UTC.
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    /// Create a clock for a whole-hour UTC offset (Lima is -5)
    pub fn from_utc_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Local business date for a UTC instant
    pub fn date_at(&self, utc_time: DateTime<Utc>) -> NaiveDate {
        utc_time.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::utc()
    }
}
