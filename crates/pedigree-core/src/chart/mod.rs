//! Chart model: person boxes, generations, and family lines.
//!
//! A [`Chart`] is the layout projection of a [`RelationshipGraph`]. It does
//! not compute pixel geometry; it fixes which placements exist, how they are
//! ordered top-to-bottom, which generation column each one sits in, and
//! which boxes form each family. A presentation layer derives coordinates
//! from that structure.
//!
//! ## Submodules
//!
//! - [`builder`] — breadth-first traversal that produces the chart.
//! - [`list`] — arena-backed doubly-linked ordering of boxes.
//! - [`generation`] — per-subtree normalization and generation columns.
//!
//! [`RelationshipGraph`]: crate::graph::RelationshipGraph

#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod generation;
pub mod list;

use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub use builder::ChartBuilder;

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Index of a [`PersonBox`] in the chart arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BoxId(pub usize);

/// Index of a [`FamilyLine`] in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FamilyLineId(pub usize);

// ---------------------------------------------------------------------------
// PersonBox
// ---------------------------------------------------------------------------

/// One placement of a person in the chart.
///
/// A person related to the chart along several paths gets one primary box
/// and one duplicate box per extra path. Duplicates are leaves: their
/// relatives are only reached through the primary box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonBox {
    pub id: BoxId,
    pub person: String,
    /// Depth relative to the subtree seed during traversal; 0-based after
    /// normalization. Parents sit one above their children.
    pub generation: i32,
    /// Connected component this box was reached in.
    pub subtree: usize,
    /// First box created for the same person, if this is a duplicate.
    pub duplicate_of: Option<BoxId>,
    pub above: Option<BoxId>,
    pub below: Option<BoxId>,
    pub gen_above: Option<BoxId>,
    pub gen_below: Option<BoxId>,
    /// 0-based position within the box's generation.
    pub gen_position: usize,
    /// 0-based position within the whole chart.
    pub position: usize,
    /// Family lines in which this box is father or mother.
    pub spouse_lines: Vec<FamilyLineId>,
    /// Family lines in which this box is a child.
    pub parent_lines: Vec<FamilyLineId>,
}

impl PersonBox {
    pub fn new(
        id: BoxId,
        person: String,
        generation: i32,
        subtree: usize,
        duplicate_of: Option<BoxId>,
    ) -> Self {
        Self {
            id,
            person,
            generation,
            subtree,
            duplicate_of,
            above: None,
            below: None,
            gen_above: None,
            gen_below: None,
            gen_position: 0,
            position: 0,
            spouse_lines: Vec::new(),
            parent_lines: Vec::new(),
        }
    }

    pub const fn is_duplicate(&self) -> bool {
        self.duplicate_of.is_some()
    }
}

// ---------------------------------------------------------------------------
// Generation / FamilyLine
// ---------------------------------------------------------------------------

/// Boxes sharing a normalized generation, in chart order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub index: usize,
    pub boxes: Vec<BoxId>,
}

/// Chart-level counterpart of a family: its parent boxes and ordered child
/// boxes. Hidden members have no box and are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyLine {
    pub id: FamilyLineId,
    /// Key of the family in the relationship graph.
    pub family: String,
    pub father: Option<BoxId>,
    pub mother: Option<BoxId>,
    pub children: Vec<BoxId>,
}

// ---------------------------------------------------------------------------
// ChartFilter
// ---------------------------------------------------------------------------

/// Presentation-layer input: traversal seed and hidden persons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartFilter {
    /// Person to seed the first subtree from.
    pub principal: Option<String>,
    /// Persons left out of the chart entirely.
    pub hidden: HashSet<String>,
}

impl ChartFilter {
    pub fn with_principal(principal: impl Into<String>) -> Self {
        Self {
            principal: Some(principal.into()),
            hidden: HashSet::new(),
        }
    }

    pub fn is_visible(&self, person_id: &str) -> bool {
        !self.hidden.contains(person_id)
    }
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// Result of a chart build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chart {
    boxes: Vec<PersonBox>,
    head: Option<BoxId>,
    generations: Vec<Generation>,
    family_lines: Vec<FamilyLine>,
    subtree_count: usize,
    #[serde(skip)]
    line_index: HashMap<String, FamilyLineId>,
    #[serde(skip)]
    person_boxes: HashMap<String, Vec<BoxId>>,
}

impl Chart {
    /// All boxes in creation order.
    pub fn boxes(&self) -> &[PersonBox] {
        &self.boxes
    }

    pub fn get(&self, id: BoxId) -> Option<&PersonBox> {
        self.boxes.get(id.0)
    }

    /// Boxes in global top-to-bottom order.
    pub fn ordered(&self) -> impl Iterator<Item = &PersonBox> {
        list::iter(&self.boxes, self.head).map(|id| &self.boxes[id.0])
    }

    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    pub fn family_lines(&self) -> &[FamilyLine] {
        &self.family_lines
    }

    pub fn family_line(&self, family_key: &str) -> Option<&FamilyLine> {
        self.line_index
            .get(family_key)
            .map(|id| &self.family_lines[id.0])
    }

    pub fn line(&self, id: FamilyLineId) -> Option<&FamilyLine> {
        self.family_lines.get(id.0)
    }

    /// Every box of a person, primary first.
    pub fn boxes_for(&self, person_id: &str) -> &[BoxId] {
        self.person_boxes.get(person_id).map_or(&[], Vec::as_slice)
    }

    pub fn primary_box(&self, person_id: &str) -> Option<&PersonBox> {
        self.boxes_for(person_id).first().map(|id| &self.boxes[id.0])
    }

    /// Subtree of a person's primary box.
    pub fn subtree_of(&self, person_id: &str) -> Option<usize> {
        self.primary_box(person_id).map(|b| b.subtree)
    }

    pub const fn subtree_count(&self) -> usize {
        self.subtree_count
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
