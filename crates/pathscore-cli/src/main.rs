#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pathscore: shortest-path vertex centrality",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text otherwise).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Score every vertex with one metric",
        long_about = "Compute betweenness, closeness, farness, harmonic closeness/farness, \
                      eccentricity or average distance for every vertex of a graph document.",
        after_help = "EXAMPLES:\n    # Undirected betweenness\n    pathscore score graph.json --metric betweenness\n\n    # Closeness along outgoing edges, normalised per component\n    pathscore score graph.json -m closeness --direction outgoing --normalize by-possible --per-component\n\n    # Emit machine-readable output\n    pathscore score graph.json -m farness --format json"
    )]
    Score(cmd::score::ScoreArgs),

    #[command(
        about = "List connected components",
        long_about = "Partition the graph into connected components, ignoring edge direction.",
        after_help = "EXAMPLES:\n    # List components\n    pathscore components graph.json\n\n    # Emit machine-readable output\n    pathscore components graph.json --json"
    )]
    Components(cmd::components::ComponentsArgs),

    #[command(
        about = "Count vertices",
        long_about = "Count the vertices of the graph, or of a member list, optionally only selected ones.",
        after_help = "EXAMPLES:\n    # Whole graph\n    pathscore size graph.json\n\n    # Selected vertices among a member list\n    pathscore size graph.json --members a,b,c --selected-only"
    )]
    Size(cmd::size::SizeArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PATHSCORE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "pathscore=debug,info"
        } else {
            "pathscore=info,warn"
        })
    });

    let format = env::var("PATHSCORE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    match cli.command {
        Commands::Score(ref args) => cmd::score::run_score(args, output),
        Commands::Components(ref args) => cmd::components::run_components(args, output),
        Commands::Size(ref args) => cmd::size::run_size(args, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathscore_core::paths::ScoreType;

    #[test]
    fn metric_parses_from_kebab_case() {
        let cli = Cli::parse_from(["pathscore", "score", "g.json", "--metric", "harmonic-closeness"]);
        match cli.command {
            Commands::Score(args) => assert_eq!(args.metric, ScoreType::HarmonicCloseness),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let parsed = Cli::try_parse_from(["pathscore", "score", "g.json", "--metric", "pagerank"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["pathscore", "components", "g.json", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["pathscore", "--format", "text", "size", "g.json"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn members_split_on_commas() {
        let cli = Cli::parse_from(["pathscore", "size", "g.json", "--members", "a,b,c"]);
        match cli.command {
            Commands::Size(args) => assert_eq!(args.members, vec!["a", "b", "c"]),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
