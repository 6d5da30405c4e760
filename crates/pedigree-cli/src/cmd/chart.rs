//! `pedigree chart` — lay out a document and print the chart.

use crate::cmd::Workspace;
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use anyhow::Result;
use clap::Args;
use pedigree_core::chart::{BoxId, Chart, ChartFilter};
use pedigree_core::graph::RelationshipGraph;
use pedigree_core::project;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// GedcomX JSON document to read.
    pub doc: PathBuf,

    /// Seed the first subtree from this person (overrides pedigree.toml).
    #[arg(long, value_name = "ID")]
    pub principal: Option<String>,

    /// Leave a person out of the chart. Repeatable; adds to pedigree.toml.
    #[arg(long = "hide", value_name = "ID")]
    pub hide: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub subtrees: usize,
    pub generations: usize,
    pub boxes: Vec<BoxRow>,
    pub families: Vec<LineRow>,
}

#[derive(Debug, Serialize)]
pub struct BoxRow {
    pub position: usize,
    pub person: String,
    pub name: String,
    pub generation: i32,
    pub subtree: usize,
    pub duplicate: bool,
}

#[derive(Debug, Serialize)]
pub struct LineRow {
    pub family: String,
    pub father: Option<String>,
    pub mother: Option<String>,
    pub children: Vec<String>,
}

impl ChartView {
    pub fn new(graph: &RelationshipGraph, chart: &Chart) -> Self {
        let person_of = |id: BoxId| chart.get(id).map(|b| b.person.clone());
        let boxes = chart
            .ordered()
            .map(|b| BoxRow {
                position: b.position,
                person: b.person.clone(),
                name: graph
                    .person(&b.person)
                    .map_or_else(|| b.person.clone(), |p| p.name.clone()),
                generation: b.generation,
                subtree: b.subtree,
                duplicate: b.is_duplicate(),
            })
            .collect();
        let families = chart
            .family_lines()
            .iter()
            .map(|line| LineRow {
                family: line.family.clone(),
                father: line.father.and_then(person_of),
                mother: line.mother.and_then(person_of),
                children: line.children.iter().filter_map(|id| person_of(*id)).collect(),
            })
            .collect();
        Self {
            subtrees: chart.subtree_count(),
            generations: chart.generations().len(),
            boxes,
            families,
        }
    }
}

fn filter_for(args: &ChartArgs, ws: &Workspace) -> ChartFilter {
    let mut filter = ws.config.chart.to_filter();
    if args.principal.is_some() {
        filter.principal.clone_from(&args.principal);
    }
    filter.hidden.extend(args.hide.iter().cloned());
    filter
}

pub fn run_chart(args: &ChartArgs, output: OutputMode) -> Result<()> {
    let ws = Workspace::load(&args.doc)?;
    let filter = filter_for(args, &ws);
    let (graph, chart) = project(&ws.doc, &filter)?;
    info!(
        boxes = chart.len(),
        subtrees = chart.subtree_count(),
        families = chart.family_lines().len(),
        "chart built"
    );
    let view = ChartView::new(&graph, &chart);
    render_mode(output, &view, render_text, render_pretty)
}

fn render_text(view: &ChartView, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "position\tsubtree\tgeneration\tperson\tname\tduplicate")?;
    for b in &view.boxes {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            b.position, b.subtree, b.generation, b.person, b.name, b.duplicate
        )?;
    }
    Ok(())
}

fn render_pretty(view: &ChartView, w: &mut dyn Write) -> io::Result<()> {
    let depth = i32::try_from(view.generations).unwrap_or(i32::MAX);
    for subtree in 0..view.subtrees {
        pretty_section(w, &format!("Subtree {subtree}"))?;
        for b in view.boxes.iter().filter(|b| b.subtree == subtree) {
            // Oldest generation at the left margin.
            let indent = usize::try_from(depth - 1 - b.generation).unwrap_or(0) * 4;
            let marker = if b.duplicate { " (see above)" } else { "" };
            writeln!(w, "{:indent$}{} [{}]{marker}", "", b.name, b.person)?;
        }
        writeln!(w)?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "Persons", view.boxes.iter().filter(|b| !b.duplicate).count().to_string())?;
    pretty_kv(w, "Families", view.families.len().to_string())?;
    pretty_kv(w, "Generations", view.generations.to_string())
}
