//! ISO-8601 week helpers for the weekly sheets.

use time::macros::format_description;
use time::{Date, Duration};

/// The Monday–Sunday week containing a date, with its ISO week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSpan {
    pub number: u8,
    pub start: Date,
    pub end: Date,
}

impl WeekSpan {
    /// The week `date` falls in.
    pub fn containing(date: Date) -> Self {
        let offset = i64::from(date.weekday().number_days_from_monday());
        let start = date.saturating_sub(Duration::days(offset));
        Self {
            number: date.iso_week(),
            start,
            end: start.saturating_add(Duration::days(6)),
        }
    }
}

/// `YYYY-MM-DD`.
pub fn format_iso(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `DD/MM/YYYY`, the short form printed on sheets.
pub fn format_short(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Parse `YYYY-MM-DD`.
pub fn parse_iso(s: &str) -> Option<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_week_of_a_monday() {
        let span = WeekSpan::containing(date!(2024 - 01 - 01));
        assert_eq!(span.number, 1);
        assert_eq!(span.start, date!(2024 - 01 - 01));
        assert_eq!(span.end, date!(2024 - 01 - 07));
    }

    #[test]
    fn test_week_of_a_sunday() {
        let span = WeekSpan::containing(date!(2024 - 03 - 17));
        assert_eq!(span.number, 11);
        assert_eq!(span.start, date!(2024 - 03 - 11));
        assert_eq!(span.end, date!(2024 - 03 - 17));
    }

    #[test]
    fn test_week_across_new_year() {
        let span = WeekSpan::containing(date!(2021 - 01 - 01));
        assert_eq!(span.number, 53);
        assert_eq!(format_iso(span.start), "2020-12-28");
        assert_eq!(format_iso(span.end), "2021-01-03");
    }

    #[test]
    fn test_formats() {
        let d = parse_iso("2024-07-05").unwrap();
        assert_eq!(format_iso(d), "2024-07-05");
        assert_eq!(format_short(d), "05/07/2024");
        assert!(parse_iso("05/07/2024").is_none());
    }
}
