use thiserror::Error;
use time::{
    Duration, UtcDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

/// `March 3, 2024`
pub const POST_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub fn format_post_date(date: UtcDateTime) -> Result<String, time::error::Format> {
    date.format(POST_DATE_FORMAT)
}

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct PositiveDuration(Duration);

impl PositiveDuration {
    #[must_use]
    pub fn new(duration: Duration) -> Option<Self> {
        duration.is_positive().then_some(Self(duration))
    }

    #[must_use]
    pub fn new_unchecked(duration: Duration) -> Self {
        Self::new(duration).expect("Duration was not positive.")
    }

    #[must_use]
    pub fn get(&self) -> Duration {
        self.0
    }

    #[must_use]
    pub fn to_std(&self) -> std::time::Duration {
        self.0.unsigned_abs()
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The duration is not positive: {0}")]
pub struct NonPositiveDurationError(Duration);

impl TryFrom<Duration> for PositiveDuration {
    type Error = NonPositiveDurationError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(NonPositiveDurationError(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::utc_datetime;

    #[test]
    fn post_date_format() {
        let cases = [
            (utc_datetime!(2024-03-03 00:00), "March 3, 2024"),
            (utc_datetime!(2024-03-03 23:59:59), "March 3, 2024"),
            (utc_datetime!(1999-12-31 12:00), "December 31, 1999"),
            (utc_datetime!(2025-01-10 08:30), "January 10, 2025"),
        ];

        for (date, expected) in cases {
            assert_eq!(format_post_date(date).unwrap(), expected);
        }
    }

    #[test]
    fn positive_duration() {
        assert!(PositiveDuration::new(Duration::seconds(30)).is_some());
        assert!(PositiveDuration::new(Duration::ZERO).is_none());
        assert_eq!(
            PositiveDuration::try_from(Duration::seconds(-1)),
            Err(NonPositiveDurationError(Duration::seconds(-1)))
        );
        assert_eq!(
            PositiveDuration::new_unchecked(Duration::seconds(30)).to_std(),
            std::time::Duration::from_secs(30)
        );
    }
}
