//! Validation errors

use jiff::civil::Date;
use smallvec::SmallVec;

/// Active errors of one field. Rarely more than two.
pub type FieldErrors = SmallVec<[ValidationError; 2]>;

/// A structured validation failure attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field is empty.
    Required,

    /// The value is shorter than allowed.
    MinLength {
        /// Configured minimum
        required_length: usize,
        /// Length of the current value
        actual_length: usize,
    },

    /// The value is longer than allowed.
    MaxLength {
        /// Configured maximum
        required_length: usize,
        /// Length of the current value
        actual_length: usize,
    },

    /// The value does not match the required pattern.
    Pattern {
        /// Pattern source
        required_pattern: String,
    },

    /// The value is not a usable calendar date.
    InvalidDate,

    /// The date lies before the earliest allowed date.
    MinDate {
        /// Earliest allowed date
        min: Date,
    },

    /// Another product already uses this identifier.
    IdExists,

    /// Any other failure, identified by name.
    Other(String),
}

/// Kind of a [`ValidationError`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `required`
    Required,
    /// `minlength`
    MinLength,
    /// `maxlength`
    MaxLength,
    /// `pattern`
    Pattern,
    /// Not a date
    InvalidDate,
    /// `minDate`
    MinDate,
    /// `idExists`
    IdExists,
    /// Anything else
    Other,
}

impl ValidationError {
    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::Required => ErrorKind::Required,
            ValidationError::MinLength { .. } => ErrorKind::MinLength,
            ValidationError::MaxLength { .. } => ErrorKind::MaxLength,
            ValidationError::Pattern { .. } => ErrorKind::Pattern,
            ValidationError::InvalidDate => ErrorKind::InvalidDate,
            ValidationError::MinDate { .. } => ErrorKind::MinDate,
            ValidationError::IdExists => ErrorKind::IdExists,
            ValidationError::Other(_) => ErrorKind::Other,
        }
    }
}
