//! Single-relationship edits.

use tracing::debug;

use super::{EditEngine, Ensured};
use crate::error::EditError;
use crate::model::{Relationship, RelationshipType};

impl EditEngine<'_> {
    /// Make sure a relationship of `kind` links `id1` and `id2`.
    ///
    /// Endpoints are compared after resolving `#id` references; couple
    /// endpoints match in either order. A new relationship is appended with
    /// a fresh id only when no match exists.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::PersonNotFound`] if either person is missing.
    pub fn ensure_relationship(
        &mut self,
        kind: RelationshipType,
        id1: &str,
        id2: &str,
    ) -> Result<Ensured, EditError> {
        for id in [id1, id2] {
            if self.doc.person_index(id).is_none() {
                return Err(EditError::PersonNotFound(id.to_string()));
            }
        }
        if let Some(existing) = self.doc.find_relationship(&kind, id1, id2) {
            return Ok(Ensured::Existing(existing.id.clone()));
        }
        let id = self.doc.next_relationship_id();
        debug!(rel = %id, %kind, id1, id2, "relationship created");
        self.doc
            .relationships
            .push(Relationship::new(id.clone(), kind, id1, id2));
        Ok(Ensured::Created(id))
    }

    /// Remove the relationship with `id`. Returns `false` if there was none.
    pub fn remove_relationship(&mut self, id: &str) -> bool {
        let Some(idx) = self.doc.relationship_index(id) else {
            return false;
        };
        self.doc.relationships.remove(idx);
        debug!(rel = id, "relationship removed");
        true
    }
}
