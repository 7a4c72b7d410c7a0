//! `pathscore size`: vertex count of the graph or of a member list.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use pathscore_core::paths::subgraph_size;
use serde::Serialize;

use crate::input::{load_graph, resolve_members};
use crate::output::{OutputMode, pretty_kv, render_mode, scoring_failure};

/// Arguments for `pathscore size`.
#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Graph document (JSON).
    pub graph: PathBuf,

    /// Count only selected vertices.
    #[arg(long)]
    pub selected_only: bool,

    /// Restrict to these vertex ids (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub members: Vec<String>,
}

/// Report payload for `pathscore size`.
#[derive(Debug, Serialize)]
pub struct SizeReport {
    size: usize,
    selected_only: bool,
}

/// Execute `pathscore size`.
pub fn run_size(args: &SizeArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let subset = if args.members.is_empty() {
        None
    } else {
        Some(resolve_members(&graph, &args.members, output)?)
    };
    let size = subgraph_size(&graph, subset.as_ref(), args.selected_only)
        .map_err(|err| scoring_failure(output, err))?;

    render_mode(
        output,
        &SizeReport {
            size,
            selected_only: args.selected_only,
        },
        |r, w| writeln!(w, "{}", r.size),
        |r, w| pretty_kv(w, "size", r.size.to_string()),
    )
}
