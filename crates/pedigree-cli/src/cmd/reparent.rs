//! `pedigree set-parent`, `remove-parent`, `remove-child`.

use crate::cmd::{EditOutcome, TargetArgs, Workspace};
use crate::output::{OutputMode, render};
use anyhow::Result;
use clap::{Args, ValueEnum};
use pedigree_core::edit::{EditEngine, EditReport};
use pedigree_core::error::EditError;
use pedigree_core::graph::ParentRole;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Father,
    Mother,
}

impl From<RoleArg> for ParentRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Father => Self::Father,
            RoleArg::Mother => Self::Mother,
        }
    }
}

#[derive(Args, Debug)]
pub struct SetParentArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Family key, e.g. "I1&I2" (father&mother; either side may be empty).
    #[arg(long)]
    pub family: String,

    #[arg(long, value_enum)]
    pub role: RoleArg,

    /// Person to put in the slot.
    #[arg(long, value_name = "ID")]
    pub person: String,
}

#[derive(Args, Debug)]
pub struct RemoveParentArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub family: String,

    #[arg(long, value_enum)]
    pub role: RoleArg,
}

#[derive(Args, Debug)]
pub struct RemoveChildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub family: String,

    /// Child to detach from the family.
    #[arg(long, value_name = "ID")]
    pub child: String,
}

pub fn run_set_parent(args: &SetParentArgs, output: OutputMode) -> Result<()> {
    let mut ws = Workspace::load(&args.target.doc)?;
    let graph = ws.graph()?;
    let report = EditEngine::new(&mut ws.doc).change_parent(
        &graph,
        &args.family,
        args.role.into(),
        &args.person,
    )?;
    finish(&ws, &args.target, "set-parent", report, output)
}

pub fn run_remove_parent(args: &RemoveParentArgs, output: OutputMode) -> Result<()> {
    let mut ws = Workspace::load(&args.target.doc)?;
    let graph = ws.graph()?;
    let report =
        EditEngine::new(&mut ws.doc).remove_parent(&graph, &args.family, args.role.into())?;
    finish(&ws, &args.target, "remove-parent", report, output)
}

pub fn run_remove_child(args: &RemoveChildArgs, output: OutputMode) -> Result<()> {
    let mut ws = Workspace::load(&args.target.doc)?;
    let graph = ws.graph()?;
    let fam = graph
        .family(&args.family)
        .ok_or_else(|| EditError::FamilyNotFound(args.family.clone()))?;
    let index = fam
        .child_index(&args.child)
        .ok_or_else(|| EditError::ChildNotInFamily {
            family: args.family.clone(),
            child: args.child.clone(),
        })?;
    let report = EditEngine::new(&mut ws.doc).remove_child(&graph, &args.family, index)?;
    finish(&ws, &args.target, "remove-child", report, output)
}

fn finish(
    ws: &Workspace,
    target: &TargetArgs,
    command: &'static str,
    report: EditReport,
    output: OutputMode,
) -> Result<()> {
    ws.graph()?;
    let written = ws.save(target.output.as_deref())?;
    let outcome = EditOutcome::new(command, &written, report);
    render(output, &outcome, |o, w| render_report(command, &o.result, &o.written, w))
}

fn render_report(
    command: &str,
    report: &EditReport,
    written: &str,
    w: &mut dyn Write,
) -> io::Result<()> {
    if report.is_noop() {
        writeln!(w, "✓ {command}: nothing to change")?;
    } else {
        writeln!(
            w,
            "✓ {command}: {} removed, {} kept, {} added",
            report.removed.len(),
            report.kept.len(),
            report.ensured.iter().filter(|e| e.is_created()).count()
        )?;
    }
    match (&report.family, report.family_removed) {
        (_, true) => writeln!(w, "  family dissolved")?,
        (Some(family), false) => writeln!(w, "  family: {family}")?,
        (None, false) => {}
    }
    writeln!(w, "  wrote {written}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct SetWrapper {
        #[command(flatten)]
        args: SetParentArgs,
    }

    #[test]
    fn set_parent_args_parse() {
        let w = SetWrapper::parse_from([
            "test", "tree.json", "--family", "I1&I2", "--role", "mother", "--person", "I9",
        ]);
        assert_eq!(w.args.family, "I1&I2");
        assert_eq!(ParentRole::from(w.args.role), ParentRole::Mother);
        assert_eq!(w.args.person, "I9");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let parsed = SetWrapper::try_parse_from([
            "test", "tree.json", "--family", "I1&I2", "--role", "aunt", "--person", "I9",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn report_text_mentions_family() {
        let report = EditReport {
            removed: vec!["r1".into()],
            family: Some("&I2".into()),
            ..EditReport::default()
        };
        let mut buf = Vec::new();
        render_report("remove-parent", &report, "tree.json", &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("1 removed, 0 kept, 0 added"));
        assert!(text.contains("family: &I2"));
    }
}
