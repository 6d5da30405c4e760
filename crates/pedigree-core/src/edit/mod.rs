//! Document edit operations.
//!
//! Every operation mutates the [`Document`] directly. The graph and chart
//! passed in must have been built from the document *before* the edit; the
//! caller rebuilds both afterwards. Operations never create a second
//! relationship with the same type and endpoints, and they keep the
//! relative order of every person and relationship they do not touch.
//!
//! ## Submodules
//!
//! - [`relationships`] — ensure/remove single relationship records.
//! - [`reparent`] — parent removal and replacement, child detachment.
//! - [`reorder`] — subtree and sibling reordering.
//!
//! # Failure model
//!
//! Unknown ids fail fast with [`EditError`]. No-op requests (the
//! relationship already exists, a child dropped onto itself) succeed
//! without touching the document. There is no rollback: an error raised
//! part-way through an operation leaves the document in an unspecified
//! state.

#![allow(clippy::module_name_repetitions)]

pub mod relationships;
pub mod reorder;
pub mod reparent;

use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use crate::error::EditError;
use crate::graph::{FamilyNode, RelationshipGraph};
use crate::merge::{self, MergeReport};
use crate::model::Document;

pub use reorder::Placement;

/// Outcome of [`EditEngine::ensure_relationship`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "id", rename_all = "lowercase")]
pub enum Ensured {
    /// A matching relationship was already present.
    Existing(String),
    /// A new relationship was appended.
    Created(String),
}

impl Ensured {
    pub fn id(&self) -> &str {
        match self {
            Self::Existing(id) | Self::Created(id) => id,
        }
    }

    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// What a reparenting operation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditReport {
    /// Relationship ids deleted from the document.
    pub removed: Vec<String>,
    /// Relationship ids left in place because another family still uses them.
    pub kept: Vec<String>,
    /// Relationships ensured after the removal step.
    pub ensured: Vec<Ensured>,
    /// Key of the family the edit produced, when there is one.
    pub family: Option<String>,
    /// The edited family has at most one member left and will not be
    /// derived again.
    pub family_removed: bool,
}

impl EditReport {
    /// `true` when the document was not modified.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && !self.ensured.iter().any(Ensured::is_created)
    }
}

/// Mutating view over a document.
#[derive(Debug)]
pub struct EditEngine<'d> {
    doc: &'d mut Document,
}

impl<'d> EditEngine<'d> {
    pub fn new(doc: &'d mut Document) -> Self {
        Self { doc }
    }

    /// Merge each of `others` into `survivor`, in order.
    ///
    /// All ids are checked before anything is merged.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidMerge`] when no other person is given or
    /// an id repeats, and [`EditError::PersonNotFound`] for unknown ids.
    pub fn merge_person_list(
        &mut self,
        survivor: &str,
        others: &[&str],
    ) -> Result<Vec<MergeReport>, EditError> {
        if others.is_empty() {
            return Err(EditError::InvalidMerge(
                "at least one person to merge is required".into(),
            ));
        }
        let mut seen = HashSet::from([survivor]);
        for id in std::iter::once(&survivor).chain(others) {
            if self.doc.person_index(id).is_none() {
                return Err(EditError::PersonNotFound((*id).to_string()));
            }
        }
        for id in others {
            if !seen.insert(*id) {
                return Err(EditError::InvalidMerge(format!("'{id}' is listed twice")));
            }
        }

        let mut reports = Vec::with_capacity(others.len());
        for id in others {
            reports.push(merge::merge_person(self.doc, survivor, id)?);
        }
        info!(survivor, merged = others.len(), "person list merged");
        Ok(reports)
    }

    /// Assign ids to relationships without one and recompute name full
    /// texts. Returns the number of ids assigned.
    pub fn normalize(&mut self) -> usize {
        let assigned = self.doc.assign_missing_ids();
        self.doc.recompute_full_texts();
        info!(assigned, "document normalized");
        assigned
    }
}

fn family<'g>(graph: &'g RelationshipGraph, key: &str) -> Result<&'g FamilyNode, EditError> {
    graph
        .family(key)
        .ok_or_else(|| EditError::FamilyNotFound(key.to_string()))
}

/// Move `v[from]` next to `v[anchor]`: before it, or after it when `after`.
fn move_item<T>(v: &mut Vec<T>, from: usize, anchor: usize, after: bool) {
    if from == anchor {
        return;
    }
    let item = v.remove(from);
    let anchor = if from < anchor { anchor - 1 } else { anchor };
    let at = if after { anchor + 1 } else { anchor };
    v.insert(at, item);
}
