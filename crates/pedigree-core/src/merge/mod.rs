//! Merging one person record into another.
//!
//! # Overview
//!
//! Merging person B into survivor A folds everything B carries into A and
//! then redirects the rest of the document from B to A:
//!
//! 1. Evidence fields are unioned, skipping exact duplicates ([`fields`]).
//! 2. A known gender on B replaces an unknown one on A.
//! 3. Names, forms and parts are paired and combined by token containment
//!    ([`names`], [`tokens`]).
//! 4. Facts that do not disagree are folded together ([`facts`]).
//! 5. Relationships pointing at B are rewritten to A. A rewrite that
//!    duplicates an existing relationship is folded into it and deleted; a
//!    rewrite that now links A to itself is deleted.
//! 6. B is removed from the person list.
//!
//! The relative order of untouched persons and relationships is preserved.

pub mod facts;
pub mod fields;
pub mod names;
pub mod tokens;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::EditError;
use crate::model::{Document, GenderType, Person, ResourceReference};

/// What a single merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub survivor: String,
    pub merged: String,
    /// Relationships redirected from the merged person to the survivor.
    pub rewritten: usize,
    /// Relationship ids deleted as duplicates or self-links.
    pub removed: Vec<String>,
}

/// Merge person `merged` into `survivor` within `doc`.
///
/// # Errors
///
/// Returns [`EditError::InvalidMerge`] when both ids are equal and
/// [`EditError::PersonNotFound`] when either person is missing.
pub fn merge_person(
    doc: &mut Document,
    survivor: &str,
    merged: &str,
) -> Result<MergeReport, EditError> {
    if survivor == merged {
        return Err(EditError::InvalidMerge(format!(
            "cannot merge '{survivor}' into itself"
        )));
    }
    if doc.person_index(survivor).is_none() {
        return Err(EditError::PersonNotFound(survivor.to_string()));
    }
    let merged_idx = doc
        .person_index(merged)
        .ok_or_else(|| EditError::PersonNotFound(merged.to_string()))?;

    let other = doc.persons.remove(merged_idx);
    let target = doc
        .person_mut(survivor)
        .ok_or_else(|| EditError::PersonNotFound(survivor.to_string()))?;
    merge_into(target, other);

    let (rewritten, removed) = redirect_relationships(doc, survivor, merged);
    info!(
        survivor,
        merged,
        rewritten,
        removed = removed.len(),
        "person merged"
    );
    Ok(MergeReport {
        survivor: survivor.to_string(),
        merged: merged.to_string(),
        rewritten,
        removed,
    })
}

/// Fold `other`'s data into `target`. Does not touch relationships.
pub fn merge_into(target: &mut Person, other: Person) {
    fields::union_fields(&mut target.fields, other.fields);

    match (target.gender.as_mut(), other.gender) {
        (Some(mine), Some(theirs)) => {
            if !is_known(mine.kind.as_deref()) && is_known(theirs.kind.as_deref()) {
                mine.kind = theirs.kind;
            }
            fields::union_fields(&mut mine.fields, theirs.fields);
        }
        (None, Some(theirs)) => target.gender = Some(theirs),
        _ => {}
    }

    names::merge_names(&mut target.names, other.names);
    facts::merge_facts(&mut target.facts, other.facts);

    for (key, value) in other.extra {
        target.extra.entry(key).or_insert(value);
    }
}

fn is_known(kind: Option<&str>) -> bool {
    kind.map(GenderType::from_uri).is_some_and(GenderType::is_known)
}

/// Point every reference to `merged` at `survivor`, then drop self-links and
/// fold duplicates into the relationship they duplicate.
fn redirect_relationships(
    doc: &mut Document,
    survivor: &str,
    merged: &str,
) -> (usize, Vec<String>) {
    let mut rewritten = Vec::new();
    for (idx, rel) in doc.relationships.iter_mut().enumerate() {
        let mut touched = false;
        for end in [&mut rel.person1, &mut rel.person2] {
            if end.resolve() == Some(merged) {
                *end = ResourceReference::to_person(survivor);
                touched = true;
            }
        }
        if touched {
            rewritten.push(idx);
        }
    }

    let mut dead = vec![false; doc.relationships.len()];
    for &idx in &rewritten {
        let rel = &doc.relationships[idx];
        let Some((p1, p2)) = rel.endpoints() else {
            continue;
        };
        if p1 == p2 {
            debug!(relationship = %rel.id, "dropping self-referential relationship");
            dead[idx] = true;
            continue;
        }
        let keep = doc.relationships.iter().enumerate().position(|(j, other)| {
            j != idx
                && !dead[j]
                && (j < idx || !rewritten.contains(&j))
                && other.connects(&rel.kind, p1, p2)
        });
        if let Some(keep) = keep {
            debug!(
                duplicate = %rel.id,
                kept = %doc.relationships[keep].id,
                "folding duplicate relationship"
            );
            let dup_facts = rel.facts.clone();
            let dup_fields = rel.fields.clone();
            let kept = &mut doc.relationships[keep];
            facts::merge_facts(&mut kept.facts, dup_facts);
            fields::union_fields(&mut kept.fields, dup_fields);
            dead[idx] = true;
        }
    }

    let mut removed = Vec::new();
    let mut idx = 0;
    doc.relationships.retain(|rel| {
        let keep = !dead[idx];
        if !keep {
            removed.push(rel.id.clone());
        }
        idx += 1;
        keep
    });
    (rewritten.len(), removed)
}
