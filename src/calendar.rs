//! Calendar
//!
//! Date parsing, formatting and year arithmetic for the form's date fields.
//! Dates travel through the form as `YYYY-MM-DD` strings.

use jiff::{ToSpan, civil::Date};
use serde::{Deserialize, Serialize};

/// Format used by date inputs.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A date as delivered by the record store: either a structured date or its
/// textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// Structured calendar date
    Date(Date),

    /// Textual date, `YYYY-MM-DD` or an ISO datetime
    Text(String),
}

impl DateValue {
    /// Format this value for a date input, or `None` when the text does not
    /// hold a date.
    pub fn to_input(&self) -> Option<String> {
        match self {
            DateValue::Date(date) => Some(format_date_for_input(*date)),
            DateValue::Text(text) => parse_date(text).map(format_date_for_input),
        }
    }
}

impl From<Date> for DateValue {
    fn from(date: Date) -> Self {
        DateValue::Date(date)
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.to_string())
    }
}

/// Parse a `YYYY-MM-DD` date. ISO datetimes are accepted and their time part
/// is discarded. Empty and malformed input yields `None`.
pub fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    let date_part = match value.as_bytes().get(10) {
        Some(b'T' | b't' | b' ') => value.get(..10)?,
        _ => value,
    };

    Date::strptime(INPUT_DATE_FORMAT, date_part).ok()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date_for_input(date: Date) -> String {
    date.strftime(INPUT_DATE_FORMAT).to_string()
}

/// Add whole years to a date.
///
/// When the resulting day does not exist in the target month (29 February in
/// a non-leap year) the surplus days roll forward into the next month, so
/// `2024-02-29` plus one year is `2025-03-01`.
///
/// Returns `None` when the result falls outside the supported calendar range.
pub fn add_years(date: Date, years: i16) -> Option<Date> {
    let year = date.year().checked_add(years)?;

    if let Ok(shifted) = Date::new(year, date.month(), date.day()) {
        return Some(shifted);
    }

    let overflow = i64::from(date.day()) - 1;

    Date::new(year, date.month(), 1)
        .ok()?
        .checked_add(overflow.days())
        .ok()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn plus_one_year(input: &str) -> Option<String> {
        parse_date(input)
            .and_then(|d| add_years(d, 1))
            .map(format_date_for_input)
    }

    #[test]
    fn add_years_keeps_month_and_day() {
        assert_eq!(plus_one_year("2024-01-15").as_deref(), Some("2025-01-15"));
        assert_eq!(plus_one_year("2024-06-20").as_deref(), Some("2025-06-20"));
        assert_eq!(plus_one_year("2024-12-31").as_deref(), Some("2025-12-31"));
    }

    #[test]
    fn add_years_rolls_leap_day_forward() {
        assert_eq!(plus_one_year("2024-02-29").as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn add_years_lands_on_leap_day_when_it_exists() {
        assert_eq!(add_years(date(2023, 2, 28), 1), Some(date(2024, 2, 28)));
        assert_eq!(add_years(date(2020, 2, 29), 4), Some(date(2024, 2, 29)));
    }

    #[test]
    fn add_years_out_of_range_is_none() {
        assert_eq!(add_years(date(9999, 1, 1), 1), None);
    }

    #[test]
    fn parse_date_rejects_empty_and_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }

    #[test]
    fn parse_date_discards_time_of_day() -> TestResult {
        let parsed = parse_date("2024-01-15T00:00:00.000Z").ok_or("expected a date")?;

        assert_eq!(parsed, date(2024, 1, 15));

        Ok(())
    }

    #[test]
    fn date_value_formats_both_representations() {
        assert_eq!(
            DateValue::Date(date(2024, 3, 5)).to_input().as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(
            DateValue::from("2024-03-05T12:30:00Z").to_input().as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(DateValue::from("soon").to_input(), None);
    }

    #[test]
    fn date_value_deserializes_from_json_string() -> TestResult {
        let value: DateValue = serde_norway::from_str("\"2024-01-15\"")?;

        assert_eq!(value.to_input().as_deref(), Some("2024-01-15"));

        Ok(())
    }
}
