//! Calendar date and time-of-day parsing for the public booking API
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM` (24h).

use chrono::{NaiveDate, NaiveTime};

use super::errors::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::validation("Invalid date format. Please use YYYY-MM-DD."))
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::validation("Invalid time format. Please use HH:MM."))
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_date() {
        let d = parse_date("2024-12-25").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(matches!(
            parse_date("25/12/2024"),
            Err(DomainError::Validation(_))
        ));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn parses_and_formats_time() {
        let t = parse_time_of_day("09:30").unwrap();
        assert_eq!(format_time_of_day(t), "09:30");
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(parse_time_of_day("9.30").is_err());
        assert!(parse_time_of_day("25:00").is_err());
    }
}
