//! Form fields

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

/// The six fields of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `id`
    Id,
    /// `name`
    Name,
    /// `description`
    Description,
    /// `logo`
    Logo,
    /// `date_release`
    DateRelease,
    /// `date_revision`
    DateRevision,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Name,
        Field::Description,
        Field::Logo,
        Field::DateRelease,
        Field::DateRevision,
    ];

    /// Field name as used in payloads and templates.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Description => "description",
            Field::Logo => "logo",
            Field::DateRelease => "date_release",
            Field::DateRevision => "date_revision",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// A field name that is not part of the product form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
