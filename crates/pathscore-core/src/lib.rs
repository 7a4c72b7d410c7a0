#![forbid(unsafe_code)]
//! pathscore-core library.
//!
//! Shortest-path vertex centrality (betweenness, closeness, farness,
//! harmonic closeness and farness, eccentricity, average distance) computed
//! by synchronous multi-source propagation over bit-vectors.
//!
//! ```rust
//! use pathscore_core::config::DirectionPolicy;
//! use pathscore_core::graph::{EdgeDirection, SnaGraph};
//! use pathscore_core::paths::{ScoreType, compute_scores};
//!
//! let mut g = SnaGraph::with_vertices(3);
//! g.add_edge(0, 1, EdgeDirection::Undirected);
//! g.add_edge(1, 2, EdgeDirection::Undirected);
//! let result = compute_scores(&g, ScoreType::Betweenness, &DirectionPolicy::default(), false)?;
//! assert_eq!(result.scores, vec![0.0, 1.0, 0.0]);
//! # Ok::<(), pathscore_core::error::ScoringError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Library functions return `Result<_, ScoringError>`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod paths;

pub use config::{DirectionPolicy, ScoringConfig};
pub use error::{ErrorCode, ScoringError};
pub use graph::{GraphRead, SnaGraph};
pub use normalize::Normalization;
pub use paths::{PathScores, ScoreType, compute_scores, compute_scores_cancellable};
