//! `pedigree move-child` and `pedigree move-subtree`.

use crate::cmd::{EditOutcome, TargetArgs, Workspace};
use crate::output::{OutputMode, render};
use anyhow::Result;
use clap::Args;
use pedigree_core::edit::{EditEngine, Placement};
use pedigree_core::project;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct MoveChildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub family: String,

    /// Child to move.
    #[arg(long, value_name = "ID")]
    pub child: String,

    /// Place the child directly before this sibling.
    #[arg(long, value_name = "ID", conflicts_with = "after", required_unless_present = "after")]
    pub before: Option<String>,

    /// Place the child directly after this sibling.
    #[arg(long, value_name = "ID")]
    pub after: Option<String>,
}

impl MoveChildArgs {
    fn anchor(&self) -> Option<(&str, Placement)> {
        match (&self.before, &self.after) {
            (Some(id), _) => Some((id.as_str(), Placement::Before)),
            (None, Some(id)) => Some((id.as_str(), Placement::After)),
            (None, None) => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct MoveSubtreeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Subtree to move, as numbered by `pedigree chart`.
    #[arg(long, value_name = "N")]
    pub subtree: usize,

    /// Subtree the moved one is placed above.
    #[arg(long, value_name = "M")]
    pub below: usize,
}

#[derive(Debug, Serialize)]
struct Moved {
    moved: bool,
}

pub fn run_move_child(args: &MoveChildArgs, output: OutputMode) -> Result<()> {
    let (anchor, placement) = args
        .anchor()
        .ok_or_else(|| anyhow::anyhow!("one of --before or --after is required"))?;
    let mut ws = Workspace::load(&args.target.doc)?;
    let graph = ws.graph()?;
    let moved = EditEngine::new(&mut ws.doc).move_child(
        &graph,
        &args.family,
        &args.child,
        anchor,
        placement,
    )?;
    let written = ws.save(args.target.output.as_deref())?;

    let outcome = EditOutcome::new("move-child", &written, Moved { moved });
    render(output, &outcome, |o, w| {
        if o.result.moved {
            let side = if placement == Placement::Before { "before" } else { "after" };
            writeln!(w, "✓ moved {} {side} {anchor}", args.child)?;
        } else {
            writeln!(w, "✓ move-child: nothing to change")?;
        }
        writeln!(w, "  wrote {}", o.written)
    })
}

pub fn run_move_subtree(args: &MoveSubtreeArgs, output: OutputMode) -> Result<()> {
    let mut ws = Workspace::load(&args.target.doc)?;
    let filter = ws.config.chart.to_filter();
    let (_, chart) = project(&ws.doc, &filter)?;
    let moved = EditEngine::new(&mut ws.doc).move_subtree(&chart, args.subtree, args.below)?;
    let written = ws.save(args.target.output.as_deref())?;

    let outcome = EditOutcome::new("move-subtree", &written, Moved { moved });
    render(output, &outcome, |o, w| {
        if o.result.moved {
            writeln!(w, "✓ moved subtree {} above subtree {}", args.subtree, args.below)?;
        } else {
            writeln!(w, "✓ move-subtree: nothing to change")?;
        }
        writeln!(w, "  wrote {}", o.written)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: MoveChildArgs,
    }

    #[test]
    fn before_and_after_are_exclusive() {
        let both = Wrapper::try_parse_from([
            "test", "t.json", "--family", "F&M", "--child", "C1", "--before", "C2", "--after",
            "C3",
        ]);
        assert!(both.is_err());
        let neither =
            Wrapper::try_parse_from(["test", "t.json", "--family", "F&M", "--child", "C1"]);
        assert!(neither.is_err());
    }

    #[test]
    fn after_sets_placement() {
        let w = Wrapper::parse_from([
            "test", "t.json", "--family", "F&M", "--child", "C1", "--after", "C2",
        ]);
        assert_eq!(w.args.anchor(), Some(("C2", Placement::After)));
    }
}
