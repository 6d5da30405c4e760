//! Fact matching and merging.

use super::fields::union_fields;
use crate::model::{Date, Fact, Place};

/// Merge `incoming` facts into `into`.
///
/// An incoming fact that matches an existing one is folded into it; the
/// rest are appended in order.
pub fn merge_facts(into: &mut Vec<Fact>, incoming: Vec<Fact>) {
    for fact in incoming {
        match into.iter_mut().find(|f| facts_match(f, &fact)) {
            Some(existing) => merge_fact(existing, fact),
            None => into.push(fact),
        }
    }
}

/// Same type, and date, place and value do not disagree.
///
/// A missing or empty value is compatible with anything, so a bare
/// `Birth 1900` matches `Birth 1900, Ohio`.
pub fn facts_match(a: &Fact, b: &Fact) -> bool {
    a.kind == b.kind
        && compatible(date_text(a), date_text(b))
        && compatible(place_text(a), place_text(b))
        && compatible(a.value.as_deref(), b.value.as_deref())
}

fn compatible(a: Option<&str>, b: Option<&str>) -> bool {
    match (nonempty(a), nonempty(b)) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

fn nonempty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn date_text(f: &Fact) -> Option<&str> {
    f.date.as_ref().and_then(|d| d.original.as_deref())
}

fn place_text(f: &Fact) -> Option<&str> {
    f.place.as_ref().and_then(|p| p.original.as_deref())
}

fn merge_fact(into: &mut Fact, incoming: Fact) {
    union_fields(&mut into.fields, incoming.fields);

    into.date = match (into.date.take(), incoming.date) {
        (Some(mut a), Some(b)) => {
            merge_date(&mut a, b);
            Some(a)
        }
        (a, b) => a.or(b),
    };
    into.place = match (into.place.take(), incoming.place) {
        (Some(mut a), Some(b)) => {
            merge_place(&mut a, b);
            Some(a)
        }
        (a, b) => a.or(b),
    };
    if nonempty(into.value.as_deref()).is_none() && incoming.value.is_some() {
        into.value = incoming.value;
    }
}

fn merge_date(into: &mut Date, incoming: Date) {
    union_fields(&mut into.fields, incoming.fields);
    if nonempty(into.original.as_deref()).is_none() {
        into.original = incoming.original;
    }
}

fn merge_place(into: &mut Place, incoming: Place) {
    union_fields(&mut into.fields, incoming.fields);
    if nonempty(into.original.as_deref()).is_none() {
        into.original = incoming.original;
    }
}
