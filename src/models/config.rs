//! Build configuration consumed by the bracket builder.

use serde::{Deserialize, Serialize};

/// Elimination format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Single,
    Double,
}

/// How participants are ordered into round-1 slots. Only input order is supported.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOrdering {
    #[default]
    Natural,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketConfig {
    #[serde(default)]
    pub format: Format,
    /// Single elimination: adds a third-place match. Double elimination: allows a
    /// decider if the losers-bracket champion wins the grand final.
    #[serde(default)]
    pub consolation_final: bool,
    #[serde(default)]
    pub seed_ordering: SeedOrdering,
}

impl BracketConfig {
    pub fn single() -> Self {
        Self {
            format: Format::Single,
            ..Self::default()
        }
    }

    pub fn double() -> Self {
        Self {
            format: Format::Double,
            ..Self::default()
        }
    }

    pub fn with_consolation_final(mut self, consolation_final: bool) -> Self {
        self.consolation_final = consolation_final;
        self
    }
}
