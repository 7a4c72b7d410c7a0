use std::fmt;

use crate::paths::ScoreType;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    UnknownScoreType,
    MissingSelection,
    VertexOutOfRange,
    UnsupportedMetric,
    Cancelled,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::UnknownScoreType => "E1002",
            Self::MissingSelection => "E2001",
            Self::VertexOutOfRange => "E2002",
            Self::Cancelled => "E5001",
            Self::UnsupportedMetric => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Scoring config parse error",
            Self::UnknownScoreType => "Unknown score type",
            Self::MissingSelection => "Graph has no selection attribute",
            Self::VertexOutOfRange => "Vertex position out of range",
            Self::Cancelled => "Scoring cancelled",
            Self::UnsupportedMetric => "Metric not supported by propagation mode",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the scoring config and retry."),
            Self::UnknownScoreType => Some(
                "Use one of: average-distance, eccentricity, betweenness, closeness, farness, \
                 harmonic-closeness, harmonic-farness.",
            ),
            Self::MissingSelection => {
                Some("Mark vertices with `selected` or drop the selected-only option.")
            }
            Self::VertexOutOfRange => Some("Only name vertices that exist in the graph."),
            Self::Cancelled => None,
            Self::UnsupportedMetric => Some("This is a bug. Report it with the metric and policy."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which propagation class an accumulator was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationClass {
    AllPaths,
    ShortestPaths,
}

impl fmt::Display for PropagationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllPaths => f.write_str("all-paths"),
            Self::ShortestPaths => f.write_str("shortest-paths"),
        }
    }
}

/// Errors raised by scoring, subgraph restriction and config loading.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("the 'selected' attribute does not exist on the given graph")]
    MissingAttribute,

    #[error("the requested score type, {metric}, is not supported by {mode} propagation")]
    UnsupportedMetric {
        metric: ScoreType,
        mode: PropagationClass,
    },

    #[error("vertex position {position} is outside a graph of {vertex_count} vertices")]
    VertexOutOfRange { position: usize, vertex_count: usize },

    #[error("scoring cancelled after {rounds} rounds")]
    Cancelled { rounds: u32 },

    #[error("invalid scoring config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unknown score type: {0}")]
    UnknownScoreType(String),
}

impl ScoringError {
    /// The stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingAttribute => ErrorCode::MissingSelection,
            Self::UnsupportedMetric { .. } => ErrorCode::UnsupportedMetric,
            Self::VertexOutOfRange { .. } => ErrorCode::VertexOutOfRange,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::Config(_) => ErrorCode::ConfigParseError,
            Self::UnknownScoreType(_) => ErrorCode::UnknownScoreType,
        }
    }
}
