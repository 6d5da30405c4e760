//! Parent and child reassignment.
//!
//! Parent-child relationships are not owned by a single family. A father
//! with the same child by two spouses appears in both families through one
//! relationship record, so removal always checks
//! [`RelationshipGraph::relationship_shared_elsewhere`] before deleting.

use tracing::{debug, info};

use super::{EditEngine, EditReport, family};
use crate::error::EditError;
use crate::graph::{FamilyNode, ParentRole, RelationshipGraph};
use crate::model::RelationshipType;

impl EditEngine<'_> {
    /// Remove the parent in `role` from `family_key`.
    ///
    /// Drops the couple relationship when there is a spouse, and the
    /// parent's relationship to each child unless another family still
    /// references it.
    ///
    /// # Errors
    ///
    /// [`EditError::FamilyNotFound`] for an unknown key and
    /// [`EditError::MissingParent`] when the slot is empty.
    pub fn remove_parent(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        role: ParentRole,
    ) -> Result<EditReport, EditError> {
        let fam = family(graph, family_key)?;
        let parent = fam.parent(role).ok_or_else(|| EditError::MissingParent {
            family: family_key.to_string(),
            role,
        })?;

        let mut report = EditReport::default();
        if fam.parent(role.other()).is_some() {
            if let Some(couple) = fam.couple_rel.as_deref() {
                self.drop_relationship(couple, &mut report);
            }
        }
        for rel in fam.parent_rels(role).iter().flatten() {
            self.drop_unless_shared(graph, fam, rel, &mut report);
        }

        let torn_down = fam.member_count() - 1 <= 1;
        report.family_removed = torn_down;
        report.family = fam
            .parent(role.other())
            .filter(|_| !torn_down)
            .map(|spouse| graph.single_parent_key(spouse));
        info!(
            family = family_key,
            parent,
            %role,
            removed = report.removed.len(),
            kept = report.kept.len(),
            "parent removed"
        );
        Ok(report)
    }

    /// Put `new_parent` in the father slot of `family_key`.
    ///
    /// # Errors
    ///
    /// See [`EditEngine::change_parent`].
    pub fn change_father(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        new_parent: &str,
    ) -> Result<EditReport, EditError> {
        self.change_parent(graph, family_key, ParentRole::Father, new_parent)
    }

    /// Put `new_parent` in the mother slot of `family_key`.
    ///
    /// # Errors
    ///
    /// See [`EditEngine::change_parent`].
    pub fn change_mother(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        new_parent: &str,
    ) -> Result<EditReport, EditError> {
        self.change_parent(graph, family_key, ParentRole::Mother, new_parent)
    }

    /// Replace (or fill) the parent in `role` with `new_parent`.
    ///
    /// The current occupant is removed first, as in
    /// [`EditEngine::remove_parent`]. If the resulting `(father, mother)`
    /// pair already names a family, that family absorbs the children and no
    /// couple relationship is added; otherwise a couple relationship to the
    /// remaining spouse is ensured. Every child then gets a parent-child
    /// relationship from `new_parent`. The report carries the resulting
    /// family key.
    ///
    /// # Errors
    ///
    /// [`EditError::FamilyNotFound`] for an unknown key and
    /// [`EditError::PersonNotFound`] when `new_parent` is missing.
    pub fn change_parent(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        role: ParentRole,
        new_parent: &str,
    ) -> Result<EditReport, EditError> {
        let fam = family(graph, family_key)?;
        if self.doc.person_index(new_parent).is_none() {
            return Err(EditError::PersonNotFound(new_parent.to_string()));
        }
        if fam.parent(role) == Some(new_parent) {
            debug!(family = family_key, new_parent, "parent unchanged");
            return Ok(EditReport {
                family: Some(fam.id.clone()),
                ..EditReport::default()
            });
        }

        let mut report = if fam.parent(role).is_some() {
            self.remove_parent(graph, family_key, role)?
        } else {
            EditReport::default()
        };

        let spouse = fam.parent(role.other());
        let key = match spouse {
            Some(spouse) => {
                let (p1, p2) = match role {
                    ParentRole::Father => (new_parent, spouse),
                    ParentRole::Mother => (spouse, new_parent),
                };
                let key = graph.couple_key(p1, p2);
                if graph.couple_family(p1, p2).is_some() {
                    debug!(family = %key, "joining existing family");
                } else {
                    report
                        .ensured
                        .push(self.ensure_relationship(RelationshipType::Couple, p1, p2)?);
                }
                key
            }
            None => graph.single_parent_key(new_parent),
        };
        for child in &fam.children {
            report.ensured.push(self.ensure_relationship(
                RelationshipType::ParentChild,
                new_parent,
                child,
            )?);
        }

        report.family = Some(key);
        report.family_removed = false;
        info!(
            family = family_key,
            %role,
            new_parent,
            result = report.family.as_deref().unwrap_or_default(),
            "parent changed"
        );
        Ok(report)
    }

    /// Detach the child at `child_index` from `family_key`.
    ///
    /// The father and mother relationships in that slot are removed unless
    /// another family still references them. The report flags the family as
    /// removed when at most one member is left.
    ///
    /// # Errors
    ///
    /// [`EditError::FamilyNotFound`] for an unknown key and
    /// [`EditError::ChildSlotOutOfRange`] for a bad index.
    pub fn remove_child(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        child_index: usize,
    ) -> Result<EditReport, EditError> {
        let fam = family(graph, family_key)?;
        let child = slot(fam, child_index)?;

        let mut report = EditReport::default();
        for role in [ParentRole::Father, ParentRole::Mother] {
            if let Some(Some(rel)) = fam.parent_rels(role).get(child_index) {
                self.drop_unless_shared(graph, fam, rel, &mut report);
            }
        }
        report.family_removed = fam.member_count() - 1 <= 1;
        report.family = (!report.family_removed).then(|| fam.id.clone());
        info!(
            family = family_key,
            child,
            family_removed = report.family_removed,
            "child removed"
        );
        Ok(report)
    }

    /// Move the child at `child_index` out of `family_key` and under
    /// `new_parents` (one or two persons).
    ///
    /// With two new parents a couple relationship between them is ensured
    /// as well.
    ///
    /// # Errors
    ///
    /// [`EditError::TooManyParents`] unless one or two parents are given,
    /// [`EditError::PersonNotFound`] for an unknown parent, plus the errors
    /// of [`EditEngine::remove_child`].
    pub fn change_child_parent(
        &mut self,
        graph: &RelationshipGraph,
        family_key: &str,
        child_index: usize,
        new_parents: &[&str],
    ) -> Result<EditReport, EditError> {
        if new_parents.is_empty() || new_parents.len() > 2 {
            return Err(EditError::TooManyParents(new_parents.len()));
        }
        for parent in new_parents {
            if self.doc.person_index(parent).is_none() {
                return Err(EditError::PersonNotFound((*parent).to_string()));
            }
        }
        let fam = family(graph, family_key)?;
        let child = slot(fam, child_index)?;

        let mut report = self.remove_child(graph, family_key, child_index)?;
        for parent in new_parents {
            report.ensured.push(self.ensure_relationship(
                RelationshipType::ParentChild,
                parent,
                child,
            )?);
        }
        if let [a, b] = new_parents {
            report
                .ensured
                .push(self.ensure_relationship(RelationshipType::Couple, a, b)?);
        }
        info!(child, parents = ?new_parents, "child reparented");
        Ok(report)
    }

    fn drop_unless_shared(
        &mut self,
        graph: &RelationshipGraph,
        fam: &FamilyNode,
        rel: &str,
        report: &mut EditReport,
    ) {
        if graph.relationship_shared_elsewhere(rel, &fam.id) {
            debug!(rel, family = %fam.id, "relationship kept, shared with another family");
            report.kept.push(rel.to_string());
        } else {
            self.drop_relationship(rel, report);
        }
    }

    fn drop_relationship(&mut self, rel: &str, report: &mut EditReport) {
        if self.remove_relationship(rel) {
            report.removed.push(rel.to_string());
        }
    }
}

fn slot(fam: &FamilyNode, child_index: usize) -> Result<&str, EditError> {
    fam.children
        .get(child_index)
        .map(String::as_str)
        .ok_or_else(|| EditError::ChildSlotOutOfRange {
            family: fam.id.clone(),
            index: child_index,
            len: fam.children.len(),
        })
}
