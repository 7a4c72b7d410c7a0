//! `pathscore components`: connected components, ignoring edge direction.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use pathscore_core::normalize::connected_components;
use serde::Serialize;

use crate::input::load_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, scoring_failure};

/// Arguments for `pathscore components`.
#[derive(Args, Debug)]
pub struct ComponentsArgs {
    /// Graph document (JSON).
    pub graph: PathBuf,
}

#[derive(Debug, Serialize)]
struct Component {
    size: usize,
    members: Vec<String>,
}

/// Report payload for `pathscore components`.
#[derive(Debug, Serialize)]
pub struct ComponentsReport {
    count: usize,
    components: Vec<Component>,
}

/// Execute `pathscore components`.
pub fn run_components(args: &ComponentsArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph)?;
    let components: Vec<Component> = connected_components(&graph)
        .map_err(|err| scoring_failure(output, err))?
        .into_iter()
        .map(|members| Component {
            size: members.len(),
            members: members
                .iter()
                .map(|&m| graph.label(m).unwrap_or_default().to_string())
                .collect(),
        })
        .collect();
    let report = ComponentsReport {
        count: components.len(),
        components,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for c in &r.components {
                writeln!(w, "{}  {}", c.size, c.members.join(","))?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, "Connected components")?;
            pretty_kv(w, "count", r.count.to_string())?;
            for (i, c) in r.components.iter().enumerate() {
                pretty_kv(
                    w,
                    &format!("#{}", i + 1),
                    format!("{} vertices: {}", c.size, c.members.join(", ")),
                )?;
            }
            Ok(())
        },
    )
}
