//! Comparison operators shared by every selector axis.
//!
//! # Invariants
//! - `Before`/`After` are date-only aliases of `Less`/`Greater`.
//! - `In` is only meaningful on the id axis.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Relation between a note field and a selector value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    /// Axis is not constrained.
    #[default]
    None,
    Before,
    After,
    Greater,
    Less,
    Equals,
    GreaterEquals,
    LessEquals,
    /// Membership in the selector id list.
    In,
}

impl Relation {
    /// Returns the SQL operator sign, or an empty string for `None`.
    pub fn sign(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Before | Self::Less => "<",
            Self::After | Self::Greater => ">",
            Self::Equals => "=",
            Self::GreaterEquals => ">=",
            Self::LessEquals => "<=",
            Self::In => "IN",
        }
    }

    /// Whether this relation leaves the axis unconstrained.
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Whether this relation may only be used on the date axis.
    pub fn is_date_only(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sign())
    }
}
