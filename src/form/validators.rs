//! Synchronous field validators

use jiff::civil::Date;
use regex::Regex;

use crate::{
    calendar::{add_years, parse_date},
    form::errors::ValidationError,
};

/// A synchronous check applied to a field value on every write.
///
/// Apart from [`Validator::Required`], validators accept an empty value; an
/// empty field is only reported once.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Value must not be empty.
    Required,

    /// Value must have at least this many characters.
    MinLength(usize),

    /// Value must have at most this many characters.
    MaxLength(usize),

    /// Value must match the pattern.
    Pattern(Regex),

    /// Value must be a `YYYY-MM-DD` date that still has a date one year on.
    Date,

    /// Value must be a date on or after this date.
    MinDate(Date),
}

impl Validator {
    /// Compile a pattern validator.
    ///
    /// # Errors
    ///
    /// Returns a `regex::Error` if the pattern does not compile.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Validator::Pattern)
    }

    /// Check `value`, returning the error it produces, if any.
    pub fn validate(&self, value: &str) -> Option<ValidationError> {
        if value.is_empty() {
            return match self {
                Validator::Required => Some(ValidationError::Required),
                _ => None,
            };
        }

        match self {
            Validator::Required => None,
            Validator::MinLength(min) => {
                let length = value.chars().count();

                (length < *min).then_some(ValidationError::MinLength {
                    required_length: *min,
                    actual_length: length,
                })
            }
            Validator::MaxLength(max) => {
                let length = value.chars().count();

                (length > *max).then_some(ValidationError::MaxLength {
                    required_length: *max,
                    actual_length: length,
                })
            }
            Validator::Pattern(pattern) => {
                (!pattern.is_match(value)).then(|| ValidationError::Pattern {
                    required_pattern: pattern.as_str().to_string(),
                })
            }
            Validator::Date => parse_date(value)
                .and_then(|date| add_years(date, 1))
                .is_none()
                .then_some(ValidationError::InvalidDate),
            Validator::MinDate(min) => parse_date(value)
                .filter(|date| date < min)
                .map(|_| ValidationError::MinDate { min: *min }),
        }
    }
}
