//! Reordering persons and relationships.
//!
//! Chart order is driven by document order: subtrees are seeded in person
//! order and siblings follow the order of their parent-child relationships.
//! These operations move records so the next chart build reflects the
//! requested order.

use std::collections::HashSet;
use tracing::{debug, info};

use super::{EditEngine, family, move_item};
use crate::chart::Chart;
use crate::error::EditError;
use crate::graph::{ParentRole, RelationshipGraph};

/// Where to put a moved child relative to its anchor sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

impl EditEngine<'_> {
    /// Move every person whose primary box lies in subtree `moving` so they
    /// sit directly before the first person of subtree `below`.
    ///
    /// Both groups keep their internal order. Returns `false` when nothing
    /// moved.
    ///
    /// # Errors
    ///
    /// [`EditError::SubtreeNotFound`] if either subtree has no persons.
    pub fn move_subtree(
        &mut self,
        chart: &Chart,
        moving: usize,
        below: usize,
    ) -> Result<bool, EditError> {
        let in_subtree = |id: &str, s: usize| chart.subtree_of(id) == Some(s);
        if !self.doc.persons.iter().any(|p| in_subtree(&p.id, moving)) {
            return Err(EditError::SubtreeNotFound(moving));
        }
        if !self.doc.persons.iter().any(|p| in_subtree(&p.id, below)) {
            return Err(EditError::SubtreeNotFound(below));
        }
        if moving == below {
            debug!(subtree = moving, "subtree moved onto itself");
            return Ok(false);
        }

        let before: Vec<String> = self.doc.persons.iter().map(|p| p.id.clone()).collect();
        let (moved, mut rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.doc.persons)
            .into_iter()
            .partition(|p| in_subtree(&p.id, moving));
        let at = rest
            .iter()
            .position(|p| in_subtree(&p.id, below))
            .unwrap_or(rest.len());
        let count = moved.len();
        rest.splice(at..at, moved);
        self.doc.persons = rest;

        let changed = self
            .doc
            .persons
            .iter()
            .map(|p| p.id.as_str())
            .ne(before.iter().map(String::as_str));
        info!(moving, below, persons = count, "subtree moved");
        Ok(changed)
    }

    /// Move child `child` directly before sibling `anchor`.
    ///
    /// # Errors
    ///
    /// See [`EditEngine::move_child`].
    pub fn move_child_up(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        child: &str,
        anchor: &str,
    ) -> Result<bool, EditError> {
        self.move_child(graph, family_key, child, anchor, Placement::Before)
    }

    /// Move child `child` directly after sibling `anchor`.
    ///
    /// # Errors
    ///
    /// See [`EditEngine::move_child`].
    pub fn move_child_down(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        child: &str,
        anchor: &str,
    ) -> Result<bool, EditError> {
        self.move_child(graph, family_key, child, anchor, Placement::After)
    }

    /// Reposition `child` next to `anchor` within `family_key`.
    ///
    /// Moves the child's person record and, independently, its father and
    /// mother relationship records next to the anchor's corresponding
    /// records. Returns `false` when `child == anchor`.
    ///
    /// # Errors
    ///
    /// [`EditError::FamilyNotFound`] for an unknown key,
    /// [`EditError::ChildNotInFamily`] when either id is not a child of the
    /// family, and [`EditError::PersonNotFound`] /
    /// [`EditError::RelationshipNotFound`] when the graph is stale.
    pub fn move_child(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        child: &str,
        anchor: &str,
        placement: Placement,
    ) -> Result<bool, EditError> {
        let fam = family(graph, family_key)?;
        let not_in_family = |id: &str| EditError::ChildNotInFamily {
            family: family_key.to_string(),
            child: id.to_string(),
        };
        let from = fam.child_index(child).ok_or_else(|| not_in_family(child))?;
        let to = fam.child_index(anchor).ok_or_else(|| not_in_family(anchor))?;
        if from == to {
            return Ok(false);
        }
        let after = placement == Placement::After;

        let child_pos = self.person_position(child)?;
        let anchor_pos = self.person_position(anchor)?;
        move_item(&mut self.doc.persons, child_pos, anchor_pos, after);

        let mut moved: HashSet<&str> = HashSet::new();
        for role in [ParentRole::Father, ParentRole::Mother] {
            let rels = fam.parent_rels(role);
            let (Some(Some(rel)), Some(Some(target))) = (rels.get(from), rels.get(to)) else {
                continue;
            };
            if rel == target || !moved.insert(rel.as_str()) {
                continue;
            }
            let rel_pos = self.relationship_position(rel)?;
            let target_pos = self.relationship_position(target)?;
            move_item(&mut self.doc.relationships, rel_pos, target_pos, after);
        }

        info!(family = family_key, child, anchor, ?placement, "child moved");
        Ok(true)
    }

    fn person_position(&self, id: &str) -> Result<usize, EditError> {
        self.doc
            .person_index(id)
            .ok_or_else(|| EditError::PersonNotFound(id.to_string()))
    }

    fn relationship_position(&self, id: &str) -> Result<usize, EditError> {
        self.doc
            .relationship_index(id)
            .ok_or_else(|| EditError::RelationshipNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartFilter;
    use crate::fixtures::{doc, female, male, nuclear, parent_child, person_ids, rel_ids};
    use crate::model::Document;

    fn project(d: &Document) -> (RelationshipGraph, Chart) {
        crate::project(d, &ChartFilter::default()).expect("project")
    }

    #[test]
    fn move_child_down_swaps_person_and_relationships() {
        let mut d = nuclear();
        let (g, _) = project(&d);
        let moved = EditEngine::new(&mut d)
            .move_child_down(&g, "F&M", "C1", "C2")
            .expect("move");
        assert!(moved);
        assert_eq!(person_ids(&d), vec!["F", "M", "C2", "C1", "C3"]);
        assert_eq!(rel_ids(&d), vec!["c", "f2", "f1", "m2", "m1", "f3", "m3"]);

        let (g, _) = project(&d);
        assert_eq!(g.family("F&M").expect("F&M").children, vec!["C2", "C1", "C3"]);
    }

    #[test]
    fn move_child_up_places_before_anchor() {
        let mut d = nuclear();
        let (g, _) = project(&d);
        EditEngine::new(&mut d)
            .move_child_up(&g, "F&M", "C3", "C1")
            .expect("move");
        let (g, _) = project(&d);
        assert_eq!(g.family("F&M").expect("F&M").children, vec!["C3", "C1", "C2"]);
    }

    #[test]
    fn move_child_onto_itself_is_noop() {
        let mut d = nuclear();
        let before = d.clone();
        let (g, _) = project(&d);
        let moved = EditEngine::new(&mut d)
            .move_child_down(&g, "F&M", "C2", "C2")
            .expect("noop");
        assert!(!moved);
        assert_eq!(d, before);
    }

    #[test]
    fn move_child_rejects_stranger() {
        let mut d = nuclear();
        let (g, _) = project(&d);
        let err = EditEngine::new(&mut d)
            .move_child_down(&g, "F&M", "F", "C2")
            .expect_err("not a child");
        assert_eq!(
            err,
            EditError::ChildNotInFamily {
                family: "F&M".into(),
                child: "F".into()
            }
        );
    }

    #[test]
    fn move_subtree_reorders_seeds() {
        // Three unrelated pairs: (A,B), (C,D), (E,G).
        let mut d = doc(
            vec![male("A"), female("B"), male("C"), female("D"), male("E"), female("G")],
            vec![
                parent_child("ab", "A", "B"),
                parent_child("cd", "C", "D"),
                parent_child("eg", "E", "G"),
            ],
        );
        let (_, chart) = project(&d);
        assert_eq!(chart.subtree_count(), 3);

        let moved = EditEngine::new(&mut d)
            .move_subtree(&chart, 2, 0)
            .expect("move");
        assert!(moved);
        assert_eq!(person_ids(&d), vec!["E", "G", "A", "B", "C", "D"]);

        let (_, chart) = project(&d);
        assert_eq!(chart.ordered().next().map(|b| b.person.as_str()), Some("E"));
    }

    #[test]
    fn move_subtree_onto_itself_or_unknown() {
        let mut d = nuclear();
        let (_, chart) = project(&d);
        let mut engine = EditEngine::new(&mut d);
        assert!(!engine.move_subtree(&chart, 0, 0).expect("noop"));
        assert_eq!(
            engine.move_subtree(&chart, 0, 5).expect_err("unknown"),
            EditError::SubtreeNotFound(5)
        );
    }
}
