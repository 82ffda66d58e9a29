use std::fmt;
use std::str::FromStr;

use time::Date;

use crate::error::{PegasusError, Result};

/// A calendar period: a year and a month, as the fare API spells them
/// (`"2024-07"`).
///
/// Construction is checked — a value outside year 0..=9999 or month 1..=12
/// cannot exist. [`YearMonth::parse`] and the [`FromStr`] impl apply the
/// exact same validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Creates a `YearMonth`, rejecting out-of-range components.
    pub fn new(year: u16, month: u8) -> Result<Self> {
        if year > 9999 {
            return Err(PegasusError::InvalidData(format!(
                "year {year} is out of range"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(PegasusError::InvalidData(format!(
                "month {month} is out of range"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parses the strict `yyyy-MM` shape: exactly seven characters, four
    /// digits, a hyphen, two digits, month between 01 and 12.
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(PegasusError::InvalidData(format!(
                "'{text}' is not in 'yyyy-MM' format"
            )));
        }

        // The digit check above guarantees both parses succeed.
        let year: u16 = text[..4].parse().unwrap_or_default();
        let month: u8 = text[5..].parse().unwrap_or_default();
        Self::new(year, month)
    }

    /// Derives the year-month pair from a date, bypassing string parsing.
    /// Any valid calendar date already has its month in range; proleptic
    /// dates before year 0 (which `time::Date` permits) clamp to year 0, so
    /// the result is always in range and this cannot fail.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: u16::try_from(date.year()).unwrap_or(0),
            month: u8::from(date.month()),
        }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl FromStr for YearMonth {
    type Err = PegasusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_valid_round_trips() {
        let ym = YearMonth::parse("2024-07").unwrap();
        assert_eq!(ym.year(), 2024);
        assert_eq!(ym.month(), 7);
        assert_eq!(ym.to_string(), "2024-07");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for text in ["", "-", "2024-13", "2024-00", "0000000", "2024-7", "24-07", "2024-07 ", "2024_07"] {
            assert!(YearMonth::parse(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn from_str_matches_parse_exactly() {
        for text in ["2024-07", "0000-01", "9999-12", "", "-", "2024-13", "0000000", "2024-07x"] {
            assert_eq!(
                text.parse::<YearMonth>().ok(),
                YearMonth::parse(text).ok(),
                "forms disagree on {text:?}"
            );
        }
    }

    #[test]
    fn new_enforces_ranges() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert!(YearMonth::new(10_000, 1).is_err());
        assert!(YearMonth::new(0, 1).is_ok());
        assert!(YearMonth::new(9999, 12).is_ok());
    }

    #[test]
    fn from_date_takes_calendar_components() {
        let ym = YearMonth::from_date(date!(2023 - 12 - 31));
        assert_eq!(ym.year(), 2023);
        assert_eq!(ym.month(), 12);
    }

    #[test]
    fn from_date_clamps_pre_year_zero_dates() {
        let ym = YearMonth::from_date(date!(-0001 - 01 - 01));
        assert_eq!(ym.year(), 0);
        assert_eq!(ym.month(), 1);
        assert!(ym.year() <= 9999);
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(YearMonth::parse("2024-07").unwrap() < YearMonth::parse("2024-08").unwrap());
        assert!(YearMonth::parse("2023-12").unwrap() < YearMonth::parse("2024-01").unwrap());
    }
}
