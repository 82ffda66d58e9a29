pub mod year_month;

pub use year_month::YearMonth;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parses a date-only value from a string that may carry a time-of-day
/// suffix (`2024-07-15`, `2024-07-15T00:00:00`, `2024-07-15 00:00:00`).
/// The time portion is discarded.
pub(crate) fn parse_date_only(text: &str) -> Option<Date> {
    let head = text.split(|c| c == 'T' || c == ' ').next().unwrap_or(text);
    Date::parse(head, DATE_FORMAT).ok()
}

/// Formats a date as `yyyy-MM-dd`, the only shape the fare API accepts.
pub(crate) fn format_date(date: Date) -> String {
    // Static format over in-range components cannot fail.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_date_only_accepts_plain_dates() {
        assert_eq!(parse_date_only("2024-07-15"), Some(date!(2024 - 07 - 15)));
    }

    #[test]
    fn parse_date_only_discards_time_suffixes() {
        assert_eq!(
            parse_date_only("2024-07-15T00:00:00"),
            Some(date!(2024 - 07 - 15))
        );
        assert_eq!(
            parse_date_only("2024-07-15 12:30:00"),
            Some(date!(2024 - 07 - 15))
        );
    }

    #[test]
    fn parse_date_only_rejects_garbage() {
        assert_eq!(parse_date_only(""), None);
        assert_eq!(parse_date_only("15/07/2024"), None);
        assert_eq!(parse_date_only("2024-13-01"), None);
    }

    #[test]
    fn format_date_is_api_shaped() {
        assert_eq!(format_date(date!(2024 - 07 - 05)), "2024-07-05");
    }
}
