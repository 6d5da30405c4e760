//! Evidence field de-duplication.

use crate::model::{Field, SourceReference};

/// Append each incoming field unless an equal one is already present.
pub fn union_fields(into: &mut Vec<Field>, incoming: Vec<Field>) {
    for field in incoming {
        if into.iter().any(|existing| same_field(existing, &field)) {
            continue;
        }
        into.push(field);
    }
}

/// Same type, same sources, and the same values in the same order.
pub fn same_field(a: &Field, b: &Field) -> bool {
    a.kind == b.kind && a.values == b.values && same_sources(&a.sources, &b.sources)
}

fn same_sources(a: &[SourceReference], b: &[SourceReference]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| b.iter().any(|y| same_source(x, y)))
        && b.iter().all(|y| a.iter().any(|x| same_source(x, y)))
}

/// Qualifiers compare as a set of name/value pairs.
fn same_source(a: &SourceReference, b: &SourceReference) -> bool {
    a.description == b.description
        && a.qualifiers.len() == b.qualifiers.len()
        && a.qualifiers.iter().all(|q| b.qualifiers.contains(q))
        && b.qualifiers.iter().all(|q| a.qualifiers.contains(q))
}
