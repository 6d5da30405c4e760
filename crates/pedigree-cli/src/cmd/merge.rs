//! `pedigree merge` — fold duplicate persons into a survivor.

use crate::cmd::{EditOutcome, TargetArgs, Workspace};
use crate::output::{OutputMode, render};
use anyhow::Result;
use clap::Args;
use pedigree_core::edit::EditEngine;

#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Person that remains after the merge.
    pub survivor: String,

    /// Persons merged into the survivor, in order.
    #[arg(required = true, num_args = 1..)]
    pub others: Vec<String>,
}

pub fn run_merge(args: &MergeArgs, output: OutputMode) -> Result<()> {
    let mut ws = Workspace::load(&args.target.doc)?;
    let others: Vec<&str> = args.others.iter().map(String::as_str).collect();
    let reports = EditEngine::new(&mut ws.doc).merge_person_list(&args.survivor, &others)?;
    // The merged document must still project.
    ws.graph()?;
    let written = ws.save(args.target.output.as_deref())?;

    let outcome = EditOutcome::new("merge", &written, reports);
    render(output, &outcome, |o, w| {
        for r in &o.result {
            writeln!(
                w,
                "✓ merged {} into {} ({} relationships redirected, {} removed)",
                r.merged,
                r.survivor,
                r.rewritten,
                r.removed.len()
            )?;
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
        args: MergeArgs,
    }

    #[test]
    fn merge_args_take_several_others() {
        let w = Wrapper::parse_from(["test", "tree.json", "I1", "I8", "I9", "-o", "out.json"]);
        assert_eq!(w.args.survivor, "I1");
        assert_eq!(w.args.others, vec!["I8", "I9"]);
        assert_eq!(
            w.args.target.output.as_deref(),
            Some(std::path::Path::new("out.json"))
        );
    }

    #[test]
    fn merge_args_require_another_person() {
        assert!(Wrapper::try_parse_from(["test", "tree.json", "I1"]).is_err());
    }
}
