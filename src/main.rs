mod input;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use input::TimelineInput;
use std::path::PathBuf;
use timeline::{
    LanePolicy, LayoutConfig, LineType, PointRole, RangePreset, TimelineEngine, TimelineGraph,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "lanes")]
#[command(about = "Lay out repository activity as a lanes timeline", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the laid out graph as JSON
    Layout {
        #[command(flatten)]
        args: LayoutArgs,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print graph statistics and the lane table
    Summary {
        #[command(flatten)]
        args: LayoutArgs,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// JSON document with commits, pull requests and the window
    input: PathBuf,
    /// Layout config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Instant unmerged branches run until (RFC 3339, defaults to now)
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,
    /// Window ending at as-of, instead of the input's range
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,
    /// Lane policy, overriding the config
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Week,
    Month,
    Quarter,
}

impl From<PresetArg> for RangePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Week => RangePreset::Week,
            PresetArg::Month => RangePreset::Month,
            PresetArg::Quarter => RangePreset::Quarter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    RoundRobin,
    FirstFree,
}

impl From<StrategyArg> for LanePolicy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RoundRobin => LanePolicy::RoundRobin,
            StrategyArg::FirstFree => LanePolicy::FirstFree,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run_layout(args: &LayoutArgs) -> Result<TimelineGraph> {
    let mut config = match &args.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.lane_policy = strategy.into();
    }
    let engine = TimelineEngine::new(config)?;

    let input = TimelineInput::load(&args.input)?;
    let as_of = args.as_of.or(input.as_of).unwrap_or_else(Utc::now);
    let range = input.resolve_range(args.preset.map(Into::into), as_of)?;
    info!(
        commits = input.commits.len(),
        pull_requests = input.pull_requests.len(),
        start = %range.start(),
        end = %range.end(),
        %as_of,
        "laying out timeline"
    );

    Ok(engine.layout(
        &input.commits,
        &input.pull_requests,
        &input.default_branch,
        &range,
        as_of,
    ))
}

fn print_summary(graph: &TimelineGraph) {
    let stats = graph.stats();
    let first = graph.time_labels.first().map(|l| l.text.as_str()).unwrap_or("-");
    let last = graph.time_labels.last().map(|l| l.text.as_str()).unwrap_or("-");

    println!("Window: {} .. {} ({} days, {}px tall)", first, last, graph.time_labels.len(), graph.height);
    println!(
        "Points: {} ({} commits, {} PR merges, {} synthetic)",
        stats.total_points, stats.commit_points, stats.pr_merges, stats.synthetic_points
    );
    println!(
        "Lines:  {} ({} straight, {} branch, {} merge)",
        stats.total_lines, stats.straight_lines, stats.branch_lines, stats.merge_lines
    );

    println!("\nLanes ({} in use):", stats.lanes);
    for fork in graph.lines.iter().filter(|l| l.line_type == LineType::Branch) {
        let PointRole::BranchOut { branch } = &fork.from.role else {
            continue;
        };
        let (number, state) = match branch.key.pr_number() {
            Some(n) if graph.point(&format!("merge-{}", n)).is_some() => (format!("#{}", n), "merged"),
            Some(n) => (format!("#{}", n), "open"),
            None => (String::new(), "heuristic"),
        };
        println!("  x={:<6} {:<6} {:<10} {}", fork.to.x, number, state, branch.name);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Layout { args, pretty } => {
            let graph = run_layout(&args)?;
            let json = if pretty {
                serde_json::to_string_pretty(&graph)
            } else {
                serde_json::to_string(&graph)
            }
            .context("Failed to serialize timeline")?;
            println!("{}", json);
        }
        Commands::Summary { args } => {
            let graph = run_layout(&args)?;
            print_summary(&graph);
        }
    }

    Ok(())
}
