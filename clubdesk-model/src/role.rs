//! Society roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseEnumError;

/// A member's role in the society.
///
/// `EB`, `EC` and `Core` are senior roles and may manage tasks, events and
/// announcements. Everyone else can only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Executive board.
    #[serde(rename = "EB")]
    Eb,
    /// Executive committee.
    #[serde(rename = "EC")]
    Ec,
    /// Core team.
    Core,
    /// Regular (junior) member.
    #[default]
    Member,
}

impl Role {
    /// Returns `true` if the role may create and delete dashboard content.
    #[must_use]
    pub const fn is_senior(self) -> bool {
        matches!(self, Self::Eb | Self::Ec | Self::Core)
    }

    /// The label used in configuration and member records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eb => "EB",
            Self::Ec => "EC",
            Self::Core => "Core",
            Self::Member => "Member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Eb, Self::Ec, Self::Core, Self::Member]
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("role", s))
    }
}
