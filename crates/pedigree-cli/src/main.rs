#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use pedigree_core::config::load_user_config;
use std::env;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pedigree: relationship charts and edits for GedcomX documents",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for --format json.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Lay out a document as a chart",
        long_about = "Build the relationship graph and chart for a GedcomX JSON document and print the boxes in chart order.",
        after_help = "EXAMPLES:\n    # Chart a document\n    pedigree chart family.json\n\n    # Start from a given person and hide another\n    pedigree chart family.json --principal I6 --hide I5\n\n    # Emit machine-readable output\n    pedigree chart family.json --json"
    )]
    Chart(cmd::chart::ChartArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Merge duplicate persons",
        long_about = "Merge one or more persons into a survivor, redirecting their relationships.",
        after_help = "EXAMPLES:\n    # Merge I8 into I1\n    pedigree merge family.json I1 I8\n\n    # Merge two duplicates and write elsewhere\n    pedigree merge family.json I1 I8 I9 --output merged.json"
    )]
    Merge(cmd::merge::MergeArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Put a person in a family's father or mother slot",
        after_help = "EXAMPLES:\n    # Replace the mother of family I1&I2\n    pedigree set-parent family.json --family 'I1&I2' --role mother --person I9"
    )]
    SetParent(cmd::reparent::SetParentArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Remove a parent from a family",
        after_help = "EXAMPLES:\n    # Remove the father of family I1&I2\n    pedigree remove-parent family.json --family 'I1&I2' --role father"
    )]
    RemoveParent(cmd::reparent::RemoveParentArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Detach a child from a family",
        after_help = "EXAMPLES:\n    # Detach I4 from family I1&I2\n    pedigree remove-child family.json --family 'I1&I2' --child I4"
    )]
    RemoveChild(cmd::reparent::RemoveChildArgs),

    #[command(
        next_help_heading = "Order",
        about = "Reorder a child among its siblings",
        after_help = "EXAMPLES:\n    # Put I4 before I3\n    pedigree move-child family.json --family 'I1&I2' --child I4 --before I3"
    )]
    MoveChild(cmd::reorder::MoveChildArgs),

    #[command(
        next_help_heading = "Order",
        about = "Move a subtree above another",
        after_help = "EXAMPLES:\n    # Show subtree 1 first\n    pedigree move-subtree family.json --subtree 1 --below 0"
    )]
    MoveSubtree(cmd::reorder::MoveSubtreeArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Assign missing relationship ids and recompute names",
        after_help = "EXAMPLES:\n    # Normalize in place\n    pedigree normalize family.json"
    )]
    Normalize(cmd::normalize::NormalizeArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PEDIGREE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "pedigree=debug,pedigree_core=debug,info"
        } else {
            "pedigree=info,pedigree_core=info,warn"
        })
    });

    let format = env::var("PEDIGREE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
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

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Chart(args) => cmd::chart::run_chart(args, output),
        Commands::Merge(args) => cmd::merge::run_merge(args, output),
        Commands::SetParent(args) => cmd::reparent::run_set_parent(args, output),
        Commands::RemoveParent(args) => cmd::reparent::run_remove_parent(args, output),
        Commands::RemoveChild(args) => cmd::reparent::run_remove_child(args, output),
        Commands::MoveChild(args) => cmd::reorder::run_move_child(args, output),
        Commands::MoveSubtree(args) => cmd::reorder::run_move_subtree(args, output),
        Commands::Normalize(args) => cmd::normalize::run_normalize(args, output),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let user = load_user_config();
    let configured = user.as_ref().ok().and_then(|u| u.output.as_deref());
    let output = resolve_output_mode(cli.format, cli.json, configured);
    debug!(?output, "output mode resolved");

    let result = user.and_then(|_| run(&cli, output));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["pedigree", "chart", "tree.json", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Chart(_)));
    }

    #[test]
    fn format_flag_is_global() {
        let cli = Cli::parse_from(["pedigree", "--format", "text", "normalize", "tree.json"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["pedigree", "chart", "t.json"],
            vec!["pedigree", "merge", "t.json", "A", "B"],
            vec!["pedigree", "set-parent", "t.json", "--family", "A&B", "--role", "father", "--person", "C"],
            vec!["pedigree", "remove-parent", "t.json", "--family", "A&B", "--role", "mother"],
            vec!["pedigree", "remove-child", "t.json", "--family", "A&B", "--child", "C"],
            vec!["pedigree", "move-child", "t.json", "--family", "A&B", "--child", "C", "--before", "D"],
            vec!["pedigree", "move-subtree", "t.json", "--subtree", "1", "--below", "0"],
            vec!["pedigree", "normalize", "t.json", "--output", "out.json"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "failed to parse {args:?}: {:?}", result.err());
        }
    }
}
