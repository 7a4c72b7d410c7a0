//! Traversal policy and scoring options.
//!
//! [`DirectionPolicy`] decides which edges a walk may follow.
//! [`ScoringConfig`] bundles it with the caller-side options (selection
//! restriction, normalisation) and can be loaded from TOML:
//!
//! ```toml
//! selected_only = false
//! normalization = "by_possible"
//! per_component = true
//!
//! [direction]
//! include_incoming = false
//! include_outgoing = true
//! treat_undirected_bidirectional = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::normalize::Normalization;

/// Which edges count when stepping from one vertex to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionPolicy {
    /// Follow a directed edge backwards, from its destination to its source.
    #[serde(default = "default_true")]
    pub include_incoming: bool,
    /// Follow a directed edge forwards, from its source to its destination.
    #[serde(default = "default_true")]
    pub include_outgoing: bool,
    /// Undirected edges can be crossed either way.
    #[serde(default = "default_true")]
    pub treat_undirected_bidirectional: bool,
}

impl Default for DirectionPolicy {
    fn default() -> Self {
        Self {
            include_incoming: default_true(),
            include_outgoing: default_true(),
            treat_undirected_bidirectional: default_true(),
        }
    }
}

impl DirectionPolicy {
    /// Follow edges forwards only.
    #[must_use]
    pub const fn outgoing() -> Self {
        Self {
            include_incoming: false,
            include_outgoing: true,
            treat_undirected_bidirectional: true,
        }
    }

    /// Follow edges backwards only.
    #[must_use]
    pub const fn incoming() -> Self {
        Self {
            include_incoming: true,
            include_outgoing: false,
            treat_undirected_bidirectional: true,
        }
    }

    /// True when both directions count, so every adjacency is usable both
    /// ways and a single propagation suffices.
    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.include_incoming && self.include_outgoing
    }
}

/// Full set of options for one scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoringConfig {
    #[serde(default)]
    pub direction: DirectionPolicy,
    /// Only pairs whose endpoints are selected contribute.
    #[serde(default)]
    pub selected_only: bool,
    #[serde(default)]
    pub normalization: Normalization,
    /// Normalise each connected component on its own.
    #[serde(default)]
    pub per_component: bool,
}

impl ScoringConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Config`] if the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ScoringError> {
        Ok(toml::from_str(text)?)
    }
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = ScoringConfig::from_toml_str("").expect("parse");
        assert_eq!(config, ScoringConfig::default());
        assert!(config.direction.is_symmetric());
        assert!(config.direction.treat_undirected_bidirectional);
        assert_eq!(config.normalization, Normalization::None);
    }

    #[test]
    fn partial_direction_table_keeps_other_defaults() {
        let config = ScoringConfig::from_toml_str(
            "normalization = \"by_max\"\n[direction]\ninclude_incoming = false\n",
        )
        .expect("parse");
        assert_eq!(config.direction, DirectionPolicy::outgoing());
        assert!(!config.direction.is_symmetric());
        assert_eq!(config.normalization, Normalization::ByMax);
    }

    #[test]
    fn bad_value_is_config_error() {
        let err = ScoringConfig::from_toml_str("selected_only = \"yes\"").unwrap_err();
        assert!(matches!(err, ScoringError::Config(_)), "{err}");
    }
}
