//! Family units and parent pairing.
//!
//! GedcomX has no family record: families are derived from couple and
//! parent-child relationships. A family is identified by its ordered
//! `(father, mother)` pair, so two derivations that arrive at the same pair
//! land in the same [`FamilyNode`].

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::GenderType;

/// Which parent slot of a family a person occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Father => Self::Mother,
            Self::Mother => Self::Father,
        }
    }
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Father => f.write_str("father"),
            Self::Mother => f.write_str("mother"),
        }
    }
}

/// Deterministic family key for an ordered `(father, mother)` pair.
pub fn family_id(father: Option<&str>, mother: Option<&str>) -> String {
    format!("{}&{}", father.unwrap_or(""), mother.unwrap_or(""))
}

/// One family: up to two parents and their ordered children.
///
/// `father_rels` and `mother_rels` are index-aligned with `children`: slot
/// `i` holds the id of the parent-child relationship linking that parent to
/// `children[i]`, if there is one. A relationship id may appear in several
/// families when a parent has children with more than one spouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyNode {
    pub id: String,
    pub father: Option<String>,
    pub mother: Option<String>,
    pub children: Vec<String>,
    pub couple_rel: Option<String>,
    pub father_rels: Vec<Option<String>>,
    pub mother_rels: Vec<Option<String>>,
}

impl FamilyNode {
    pub fn new(father: Option<String>, mother: Option<String>) -> Self {
        Self {
            id: family_id(father.as_deref(), mother.as_deref()),
            father,
            mother,
            children: Vec::new(),
            couple_rel: None,
            father_rels: Vec::new(),
            mother_rels: Vec::new(),
        }
    }

    pub fn parent(&self, role: ParentRole) -> Option<&str> {
        match role {
            ParentRole::Father => self.father.as_deref(),
            ParentRole::Mother => self.mother.as_deref(),
        }
    }

    pub fn parent_rels(&self, role: ParentRole) -> &[Option<String>] {
        match role {
            ParentRole::Father => &self.father_rels,
            ParentRole::Mother => &self.mother_rels,
        }
    }

    /// Role held by `person_id`, father first.
    pub fn role_of(&self, person_id: &str) -> Option<ParentRole> {
        if self.father.as_deref() == Some(person_id) {
            Some(ParentRole::Father)
        } else if self.mother.as_deref() == Some(person_id) {
            Some(ParentRole::Mother)
        } else {
            None
        }
    }

    pub fn child_index(&self, child_id: &str) -> Option<usize> {
        self.children.iter().position(|c| c == child_id)
    }

    /// Every person in the family: father, mother, then children.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.father
            .iter()
            .chain(self.mother.iter())
            .chain(self.children.iter())
            .map(String::as_str)
    }

    pub fn member_count(&self) -> usize {
        usize::from(self.father.is_some()) + usize::from(self.mother.is_some()) + self.children.len()
    }

    /// A family with one member or fewer connects nobody.
    pub fn is_suppressed(&self) -> bool {
        self.member_count() <= 1
    }

    /// `true` if `rel_id` is the couple relationship or any parent-child slot.
    pub fn references_relationship(&self, rel_id: &str) -> bool {
        self.couple_rel.as_deref() == Some(rel_id)
            || self
                .father_rels
                .iter()
                .chain(self.mother_rels.iter())
                .any(|r| r.as_deref() == Some(rel_id))
    }

    pub(crate) fn push_child(
        &mut self,
        child: String,
        father_rel: Option<String>,
        mother_rel: Option<String>,
    ) {
        self.children.push(child);
        self.father_rels.push(father_rel);
        self.mother_rels.push(mother_rel);
    }
}

/// Order two spouses as `(father, mother)` by gender.
///
/// The second person goes first when the first is female or the second is
/// male; otherwise the given order is kept. The result depends on argument
/// order whenever gender does not decide, so keys for an existing pair go
/// through [`CoupleOrder`].
pub fn order_couple<'a>(
    first: &'a str,
    second: &'a str,
    gender: impl Fn(&str) -> GenderType,
) -> (&'a str, &'a str) {
    if gender(first) == GenderType::Female || gender(second) == GenderType::Male {
        (second, first)
    } else {
        (first, second)
    }
}

/// Key for an unordered pair of persons.
pub(crate) fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Spouse order per unordered pair, fixed by the first record that orders
/// it. Couple records are registered before any child is paired, so a
/// couple keeps the orientation of its couple relationship.
#[derive(Debug, Default)]
pub(crate) struct CoupleOrder {
    couples: HashSet<(String, String)>,
    order: HashMap<(String, String), (String, String)>,
}

impl CoupleOrder {
    /// Register a couple relationship and return its `(father, mother)`.
    pub fn record_couple(
        &mut self,
        a: &str,
        b: &str,
        gender: impl Fn(&str) -> GenderType,
    ) -> (String, String) {
        self.couples.insert(unordered(a, b));
        self.orient(a, b, gender)
    }

    pub fn is_couple(&self, a: &str, b: &str) -> bool {
        self.couples.contains(&unordered(a, b))
    }

    /// `(father, mother)` for the pair, ordering it now if unseen.
    pub fn orient(
        &mut self,
        a: &str,
        b: &str,
        gender: impl Fn(&str) -> GenderType,
    ) -> (String, String) {
        self.order
            .entry(unordered(a, b))
            .or_insert_with(|| {
                let (father, mother) = order_couple(a, b, gender);
                (father.to_string(), mother.to_string())
            })
            .clone()
    }
}

/// One parent-child link of a child, in document order.
#[derive(Debug, Clone)]
pub(crate) struct ParentLink {
    pub parent: String,
    pub rel_id: String,
    pub doc_index: usize,
}

/// A child's membership in one derived family.
#[derive(Debug, Clone)]
pub(crate) struct Membership {
    pub father: Option<String>,
    pub mother: Option<String>,
    pub father_rel: Option<String>,
    pub mother_rel: Option<String>,
    /// Smallest document index among the relationships that put the child
    /// in this family; orders family creation and children.
    pub doc_index: usize,
}

/// Pair a child's parents into families.
///
/// Every pair joined by a couple relationship forms a family, so one parent
/// may land in several families of the same child. Parents left over pair
/// up only when there are exactly two and they are not the same gender;
/// otherwise each becomes a single-parent family.
pub(crate) fn pair_parents(
    links: &[ParentLink],
    genders: &HashMap<String, GenderType>,
    spouses: &mut CoupleOrder,
) -> Vec<Membership> {
    let mut out = Vec::new();
    let mut paired = vec![false; links.len()];

    for i in 0..links.len() {
        for j in (i + 1)..links.len() {
            if spouses.is_couple(&links[i].parent, &links[j].parent) {
                out.push(couple_membership(&links[i], &links[j], genders, spouses));
                paired[i] = true;
                paired[j] = true;
            }
        }
    }

    let unpaired: Vec<&ParentLink> = links
        .iter()
        .zip(&paired)
        .filter(|(_, p)| !**p)
        .map(|(l, _)| l)
        .collect();

    let gender = |id: &str| genders.get(id).copied().unwrap_or_default();
    let compatible = |a: &str, b: &str| {
        let (ga, gb) = (gender(a), gender(b));
        !(ga.is_known() && ga == gb)
    };

    match unpaired.as_slice() {
        [a, b] if compatible(&a.parent, &b.parent) => {
            out.push(couple_membership(a, b, genders, spouses));
            return out;
        }
        _ => {}
    }

    for link in unpaired {
        let is_mother = gender(&link.parent) == GenderType::Female;
        out.push(Membership {
            father: (!is_mother).then(|| link.parent.clone()),
            mother: is_mother.then(|| link.parent.clone()),
            father_rel: (!is_mother).then(|| link.rel_id.clone()),
            mother_rel: is_mother.then(|| link.rel_id.clone()),
            doc_index: link.doc_index,
        });
    }
    out
}

fn couple_membership(
    a: &ParentLink,
    b: &ParentLink,
    genders: &HashMap<String, GenderType>,
    spouses: &mut CoupleOrder,
) -> Membership {
    let (father, _) = spouses.orient(&a.parent, &b.parent, |id| {
        genders.get(id).copied().unwrap_or_default()
    });
    let (f, m) = if father == a.parent { (a, b) } else { (b, a) };
    Membership {
        father: Some(f.parent.clone()),
        mother: Some(m.parent.clone()),
        father_rel: Some(f.rel_id.clone()),
        mother_rel: Some(m.rel_id.clone()),
        doc_index: a.doc_index.min(b.doc_index),
    }
}
