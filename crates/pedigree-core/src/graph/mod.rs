//! Relationship graph derived from a [`Document`].
//!
//! The graph is a disposable read model: it is rebuilt from the document
//! after every edit and never persisted. It resolves the flat relationship
//! list into navigable person and family nodes.
//!
//! ## Submodules
//!
//! - [`family`] — family keys, [`FamilyNode`], and parent pairing.
//!
//! # Ordering
//!
//! Families are created, and children appended, in the document order of
//! the first relationship that references them. Moving relationship records
//! in the document therefore reorders children in the chart.

#![allow(clippy::module_name_repetitions)]

pub mod family;

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::GraphError;
use crate::model::{Document, GenderType, RelationshipType};

pub use family::{FamilyNode, ParentRole, family_id, order_couple};
use family::{CoupleOrder, Membership, ParentLink, pair_parents};

// ---------------------------------------------------------------------------
// PersonNode
// ---------------------------------------------------------------------------

/// One person of the document with links to its families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonNode {
    pub id: String,
    pub gender: GenderType,
    /// Best display name, falling back to the id.
    pub name: String,
    /// Position of the person record in `Document::persons`.
    pub doc_index: usize,
    /// Families in which this person is father or mother.
    pub spouse_families: Vec<String>,
    /// Families in which this person is a child.
    pub parent_families: Vec<String>,
}

// ---------------------------------------------------------------------------
// RelationshipGraph
// ---------------------------------------------------------------------------

/// Person and family nodes derived from one document revision.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    persons: Vec<PersonNode>,
    person_index: HashMap<String, usize>,
    families: Vec<FamilyNode>,
    family_index: HashMap<String, usize>,
}

enum GraphEvent {
    Couple {
        father: String,
        mother: String,
        rel_id: String,
    },
    Child {
        child: String,
        membership: Membership,
    },
}

impl RelationshipGraph {
    /// Derive the graph from `doc`.
    ///
    /// Couple relationships attach to their family's `couple_rel`;
    /// parent-child relationships place the child into the family formed by
    /// its parents. Relationships of other types are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when a relationship has no id, shares an id,
    /// misses a person reference, or references an unknown person, and when
    /// two persons share an id.
    pub fn build(doc: &Document) -> Result<Self, GraphError> {
        let mut graph = Self::default();
        let mut genders: HashMap<String, GenderType> = HashMap::new();

        for (doc_index, person) in doc.persons.iter().enumerate() {
            if graph.person_index.contains_key(&person.id) {
                return Err(GraphError::DuplicatePerson(person.id.clone()));
            }
            let gender = person.gender_type();
            genders.insert(person.id.clone(), gender);
            graph.person_index.insert(person.id.clone(), graph.persons.len());
            graph.persons.push(PersonNode {
                id: person.id.clone(),
                gender,
                name: person.display_name().unwrap_or_else(|| person.id.clone()),
                doc_index,
                spouse_families: Vec::new(),
                parent_families: Vec::new(),
            });
        }

        let mut seen_rel_ids: HashSet<&str> = HashSet::new();
        let mut spouses = CoupleOrder::default();
        let gender_of = |id: &str| genders.get(id).copied().unwrap_or_default();
        let mut events: Vec<(usize, GraphEvent)> = Vec::new();
        let mut child_links: HashMap<String, Vec<ParentLink>> = HashMap::new();
        let mut child_order: Vec<String> = Vec::new();

        for (index, rel) in doc.relationships.iter().enumerate() {
            if rel.id.is_empty() {
                return Err(GraphError::MissingRelationshipId { index });
            }
            if !seen_rel_ids.insert(rel.id.as_str()) {
                return Err(GraphError::DuplicateRelationshipId(rel.id.clone()));
            }
            let shapes_chart = matches!(
                rel.kind,
                RelationshipType::Couple | RelationshipType::ParentChild
            );
            let (p1, p2) = match rel.endpoints() {
                Some(ends) => ends,
                None if shapes_chart => return Err(GraphError::MissingEndpoint(rel.id.clone())),
                None => continue,
            };
            for person in [p1, p2] {
                if !graph.person_index.contains_key(person) {
                    return Err(GraphError::UnknownPerson {
                        relationship: rel.id.clone(),
                        person: person.to_string(),
                    });
                }
            }

            match rel.kind {
                RelationshipType::Couple => {
                    let (father, mother) = spouses.record_couple(p1, p2, gender_of);
                    events.push((
                        index,
                        GraphEvent::Couple {
                            father,
                            mother,
                            rel_id: rel.id.clone(),
                        },
                    ));
                }
                RelationshipType::ParentChild => {
                    let links = child_links.entry(p2.to_string()).or_insert_with(|| {
                        child_order.push(p2.to_string());
                        Vec::new()
                    });
                    if links.iter().any(|l| l.parent == p1) {
                        debug!(rel = %rel.id, parent = p1, child = p2, "repeated parent-child link ignored");
                        continue;
                    }
                    links.push(ParentLink {
                        parent: p1.to_string(),
                        rel_id: rel.id.clone(),
                        doc_index: index,
                    });
                }
                RelationshipType::Other(_) => {}
            }
        }

        for child in child_order {
            let links = child_links.remove(&child).unwrap_or_default();
            let memberships = pair_parents(&links, &genders, &mut spouses);
            for membership in memberships {
                events.push((
                    membership.doc_index,
                    GraphEvent::Child {
                        child: child.clone(),
                        membership,
                    },
                ));
            }
        }

        // Stable: memberships of one child computed together keep their order.
        events.sort_by_key(|(index, _)| *index);

        for (_, event) in events {
            match event {
                GraphEvent::Couple {
                    father,
                    mother,
                    rel_id,
                } => {
                    let fam = graph.ensure_family(Some(father), Some(mother));
                    let family = &mut graph.families[fam];
                    if family.couple_rel.is_none() {
                        family.couple_rel = Some(rel_id);
                    } else {
                        debug!(family = %family.id, rel = %rel_id, "second couple relationship for family");
                    }
                }
                GraphEvent::Child { child, membership } => {
                    let fam = graph.ensure_family(membership.father, membership.mother);
                    if graph.families[fam].child_index(&child).is_some() {
                        continue;
                    }
                    let family_key = graph.families[fam].id.clone();
                    graph.families[fam].push_child(
                        child.clone(),
                        membership.father_rel,
                        membership.mother_rel,
                    );
                    if let Some(&idx) = graph.person_index.get(&child) {
                        graph.persons[idx].parent_families.push(family_key);
                    }
                }
            }
        }

        debug!(
            persons = graph.persons.len(),
            families = graph.families.len(),
            "relationship graph built"
        );
        Ok(graph)
    }

    fn ensure_family(&mut self, father: Option<String>, mother: Option<String>) -> usize {
        let key = family_id(father.as_deref(), mother.as_deref());
        if let Some(&idx) = self.family_index.get(&key) {
            return idx;
        }
        let idx = self.families.len();
        for parent in [&father, &mother].into_iter().flatten() {
            if let Some(&p) = self.person_index.get(parent) {
                self.persons[p].spouse_families.push(key.clone());
            }
        }
        self.families.push(FamilyNode::new(father, mother));
        self.family_index.insert(key, idx);
        idx
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn person(&self, id: &str) -> Option<&PersonNode> {
        self.person_index.get(id).map(|&idx| &self.persons[idx])
    }

    pub fn family(&self, id: &str) -> Option<&FamilyNode> {
        self.family_index.get(id).map(|&idx| &self.families[idx])
    }

    /// Persons in document order.
    pub fn persons(&self) -> &[PersonNode] {
        &self.persons
    }

    /// Families in creation order.
    pub fn families(&self) -> &[FamilyNode] {
        &self.families
    }

    pub fn contains_person(&self, id: &str) -> bool {
        self.person_index.contains_key(id)
    }

    /// `true` if a family other than `except` references `rel_id`.
    ///
    /// Parent-child relationships are shared between the families of a
    /// parent who has the same child with several spouses; such a
    /// relationship must survive the removal of any single family.
    pub fn relationship_shared_elsewhere(&self, rel_id: &str, except: &str) -> bool {
        self.families
            .iter()
            .any(|f| f.id != except && f.references_relationship(rel_id))
    }

    /// The family whose parents are `a` and `b`, in either slot.
    pub fn couple_family(&self, a: &str, b: &str) -> Option<&FamilyNode> {
        self.family(&family_id(Some(a), Some(b)))
            .or_else(|| self.family(&family_id(Some(b), Some(a))))
    }

    /// Key of the family `a` and `b` form once a couple relationship from
    /// `a` to `b` exists: the existing family for the pair, otherwise the
    /// gender order of a new record.
    pub fn couple_key(&self, a: &str, b: &str) -> String {
        if let Some(fam) = self.couple_family(a, b) {
            return fam.id.clone();
        }
        let (father, mother) = order_couple(a, b, |id| self.gender_of(id));
        family_id(Some(father), Some(mother))
    }

    /// Key of the single-parent family `parent` heads alone.
    pub fn single_parent_key(&self, parent: &str) -> String {
        if self.gender_of(parent) == GenderType::Female {
            family_id(None, Some(parent))
        } else {
            family_id(Some(parent), None)
        }
    }

    fn gender_of(&self, id: &str) -> GenderType {
        self.person(id).map(|p| p.gender).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
