//! pedigree-core library.
//!
//! A genealogical [`Document`](model::Document) is the single source of truth.
//! Everything else is a projection rebuilt after each edit:
//!
//! 1. [`graph::RelationshipGraph::build`] derives person and family nodes.
//! 2. [`chart::ChartBuilder::build`] lays the graph out as person boxes,
//!    generations, and family lines.
//! 3. [`edit::EditEngine`] mutates the document (merge, reparent, reorder);
//!    the caller then rebuilds steps 1 and 2.
//!
//! # Conventions
//!
//! - **Errors**: module errors are `thiserror` enums mapped to stable
//!   [`error::ErrorCode`]s; `anyhow::Result` is used at the config boundary.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod chart;
pub mod config;
pub mod edit;
pub mod error;
pub mod graph;
pub mod merge;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures;

use error::{ChartError, GraphError};

/// Build the graph and chart for `doc` in one step.
///
/// # Errors
///
/// Returns [`Projection`](ProjectionError) errors from either stage.
pub fn project(
    doc: &model::Document,
    filter: &chart::ChartFilter,
) -> Result<(graph::RelationshipGraph, chart::Chart), ProjectionError> {
    let graph = graph::RelationshipGraph::build(doc)?;
    let chart = chart::ChartBuilder::build(&graph, filter)?;
    Ok((graph, chart))
}

/// Failure of either projection stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl ProjectionError {
    #[must_use]
    pub const fn code(&self) -> error::ErrorCode {
        match self {
            Self::Graph(e) => e.code(),
            Self::Chart(e) => e.code(),
        }
    }
}
