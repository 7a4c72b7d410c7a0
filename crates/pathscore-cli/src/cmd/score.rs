//! `pathscore score`: per-vertex centrality for one metric.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use pathscore_core::config::{DirectionPolicy, ScoringConfig};
use pathscore_core::graph::{GraphRead, SnaGraph};
use pathscore_core::normalize::{Normalization, normalize_per_component, normalize_scores};
use pathscore_core::paths::{PathScores, ScoreType, compute_scores, subgraph_size};
use serde::Serialize;
use tracing::{info, instrument};

use crate::input::{load_config, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, scoring_failure};

/// Which directed edges a walk may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Both ways along every edge.
    Both,
    /// From source to destination only.
    Outgoing,
    /// From destination to source only.
    Incoming,
    /// Directed edges are never followed.
    None,
}

impl DirectionArg {
    const fn apply(self, policy: &mut DirectionPolicy) {
        let (incoming, outgoing) = match self {
            Self::Both => (true, true),
            Self::Outgoing => (false, true),
            Self::Incoming => (true, false),
            Self::None => (false, false),
        };
        policy.include_incoming = incoming;
        policy.include_outgoing = outgoing;
    }
}

/// Score normalisation choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormalizeArg {
    None,
    ByMax,
    ByPossible,
}

impl From<NormalizeArg> for Normalization {
    fn from(arg: NormalizeArg) -> Self {
        match arg {
            NormalizeArg::None => Self::None,
            NormalizeArg::ByMax => Self::ByMax,
            NormalizeArg::ByPossible => Self::ByPossible,
        }
    }
}

/// Arguments for `pathscore score`.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScoreArgs {
    /// Graph document (JSON).
    pub graph: PathBuf,

    /// Metric to compute.
    #[arg(short, long)]
    pub metric: ScoreType,

    /// Scoring config (TOML). Flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directed edges to follow.
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Do not treat undirected edges as bidirectional.
    #[arg(long)]
    pub strict_undirected: bool,

    /// Only count pairs whose endpoints are selected.
    #[arg(long)]
    pub selected_only: bool,

    /// Normalise scores.
    #[arg(long, value_enum)]
    pub normalize: Option<NormalizeArg>,

    /// Normalise each connected component separately.
    #[arg(long)]
    pub per_component: bool,
}

impl ScoreArgs {
    /// Fold command-line overrides into a loaded config.
    fn effective(&self, mut config: ScoringConfig) -> ScoringConfig {
        if let Some(direction) = self.direction {
            direction.apply(&mut config.direction);
        }
        if self.strict_undirected {
            config.direction.treat_undirected_bidirectional = false;
        }
        if self.selected_only {
            config.selected_only = true;
        }
        if let Some(normalize) = self.normalize {
            config.normalization = normalize.into();
        }
        if self.per_component {
            config.per_component = true;
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct VertexScore {
    id: String,
    score: f64,
    reachable: usize,
}

/// Report payload for `pathscore score`.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    metric: ScoreType,
    rounds: u32,
    normalization: Normalization,
    per_component: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_distance: Option<f64>,
    vertices: Vec<VertexScore>,
}

impl ScoreReport {
    fn new(graph: &SnaGraph, result: &PathScores, config: &ScoringConfig) -> Self {
        let vertices = (0..graph.vertex_count())
            .map(|v| VertexScore {
                id: graph.label(v).unwrap_or_default().to_string(),
                score: result.scores[v],
                reachable: result.reach_count(v),
            })
            .collect();
        Self {
            metric: result.metric,
            rounds: result.rounds,
            normalization: config.normalization,
            per_component: config.per_component,
            mean_distance: result.mean_distance(),
            vertices,
        }
    }
}

fn apply_normalization(
    graph: &SnaGraph,
    result: &mut PathScores,
    config: &ScoringConfig,
) -> Result<(), pathscore_core::ScoringError> {
    let symmetric = config.direction.is_symmetric();
    if config.per_component {
        normalize_per_component(
            result,
            graph,
            config.normalization,
            config.selected_only,
            symmetric,
        )
    } else {
        let n = subgraph_size(graph, None, config.selected_only)?;
        normalize_scores(
            &mut result.scores,
            result.metric,
            config.normalization,
            n,
            symmetric,
        );
        Ok(())
    }
}

/// Execute `pathscore score`.
#[instrument(skip(args, output), fields(metric = %args.metric))]
pub fn run_score(args: &ScoreArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let config = args.effective(load_config(args.config.as_deref(), output)?);

    let mut result = compute_scores(
        &graph,
        args.metric,
        &config.direction,
        config.selected_only,
    )
    .map_err(|err| scoring_failure(output, err))?;
    apply_normalization(&graph, &mut result, &config)
        .map_err(|err| scoring_failure(output, err))?;

    info!(rounds = result.rounds, "scored");

    let report = ScoreReport::new(&graph, &result, &config);
    render_mode(
        output,
        &report,
        |r, w| {
            writeln!(w, "id  score  reachable")?;
            for v in &r.vertices {
                writeln!(w, "{}  {}  {}", v.id, v.score, v.reachable)?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, &format!("{} scores", r.metric))?;
            pretty_kv(w, "rounds", r.rounds.to_string())?;
            if let Some(mean) = r.mean_distance {
                pretty_kv(w, "mean distance", format!("{mean:.4}"))?;
            }
            writeln!(w)?;
            let width = r.vertices.iter().map(|v| v.id.len()).max().unwrap_or(2).max(2);
            writeln!(w, "{:<width$}  {:>12}  {:>9}", "id", "score", "reachable")?;
            for v in &r.vertices {
                writeln!(w, "{:<width$}  {:>12.6}  {:>9}", v.id, v.score, v.reachable)?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ScoreArgs {
        ScoreArgs {
            graph: PathBuf::from("g.json"),
            metric: ScoreType::Farness,
            config: None,
            direction: None,
            strict_undirected: false,
            selected_only: false,
            normalize: None,
            per_component: false,
        }
    }

    #[test]
    fn flags_override_config() {
        let mut a = args();
        a.direction = Some(DirectionArg::Outgoing);
        a.strict_undirected = true;
        a.normalize = Some(NormalizeArg::ByMax);
        let config = a.effective(ScoringConfig::default());
        assert!(!config.direction.include_incoming);
        assert!(config.direction.include_outgoing);
        assert!(!config.direction.treat_undirected_bidirectional);
        assert_eq!(config.normalization, Normalization::ByMax);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let loaded = ScoringConfig {
            selected_only: true,
            per_component: true,
            normalization: Normalization::ByPossible,
            direction: DirectionPolicy::incoming(),
        };
        assert_eq!(args().effective(loaded), loaded);
    }

    #[test]
    fn none_direction_disables_both() {
        let mut policy = DirectionPolicy::default();
        DirectionArg::None.apply(&mut policy);
        assert!(!policy.include_incoming && !policy.include_outgoing);
        assert!(policy.treat_undirected_bidirectional);
    }
}
