//! Name merging: names, then forms, then parts.
//!
//! Names pair up by type and forms by language, each in two passes: exact
//! equality first, then a relaxed pass where an unset value on either side
//! matches anything. Names and forms pair one-to-one. An incoming part is
//! absorbed by an existing part of its type whose value already contains
//! it; otherwise it pairs one-to-one with an unused part of that type.
//! Whatever is left over on the incoming side is appended.

use super::fields::union_fields;
use super::tokens;
use crate::model::{Name, NameForm, NamePart};

/// Merge `incoming` names into `into` and recompute every form's full text.
pub fn merge_names(into: &mut Vec<Name>, incoming: Vec<Name>) {
    let (pairs, leftover) = pair_up(
        into.as_slice(),
        incoming.as_slice(),
        |a, b| a.kind == b.kind,
        |a, b| a.kind.is_none() || b.kind.is_none(),
    );
    let mut incoming: Vec<Option<Name>> = incoming.into_iter().map(Some).collect();

    for (a, b) in pairs {
        if let Some(name) = incoming[b].take() {
            merge_name(&mut into[a], name);
        }
    }
    into.extend(leftover.into_iter().filter_map(|b| incoming[b].take()));

    for name in into.iter_mut() {
        for form in &mut name.name_forms {
            form.recompute_full_text();
        }
    }
}

fn merge_name(into: &mut Name, incoming: Name) {
    union_fields(&mut into.fields, incoming.fields);

    let (pairs, leftover) = pair_up(
        into.name_forms.as_slice(),
        incoming.name_forms.as_slice(),
        |a, b| a.lang == b.lang,
        |a, b| a.lang.is_none() || b.lang.is_none(),
    );
    let mut forms: Vec<Option<NameForm>> = incoming.name_forms.into_iter().map(Some).collect();

    for (a, b) in pairs {
        if let Some(form) = forms[b].take() {
            merge_form(&mut into.name_forms[a], form);
        }
    }
    into.name_forms.extend(leftover.into_iter().filter_map(|b| forms[b].take()));
}

fn merge_form(into: &mut NameForm, incoming: NameForm) {
    union_fields(&mut into.fields, incoming.fields);
    if into.lang.is_none() {
        into.lang = incoming.lang;
    }

    if into.parts.is_empty() && incoming.parts.is_empty() {
        into.full_text = match (into.full_text.take(), incoming.full_text) {
            (Some(a), Some(b)) => Some(tokens::combine(&a, &b)),
            (a, b) => a.or(b),
        };
        return;
    }

    let mut used = vec![false; into.parts.len()];
    let mut leftover = Vec::new();
    for part in incoming.parts {
        let words = part.value.as_deref().map(tokens::tokenize).unwrap_or_default();
        let covering = into.parts.iter().position(|p| {
            p.kind == part.kind
                && p.value
                    .as_deref()
                    .is_some_and(|v| tokens::prefix_contains(&tokens::tokenize(v), &words))
        });
        let target = covering.or_else(|| {
            (0..into.parts.len()).find(|&i| !used[i] && into.parts[i].kind == part.kind)
        });
        match target {
            Some(i) => {
                used[i] = true;
                merge_part(&mut into.parts[i], part);
            }
            None => leftover.push(part),
        }
    }
    into.parts.extend(leftover);
}

fn merge_part(into: &mut NamePart, incoming: NamePart) {
    into.fields.extend(incoming.fields);
    into.value = match (into.value.take(), incoming.value) {
        (Some(a), Some(b)) => Some(tokens::combine(&a, &b)),
        (a, b) => a.or(b),
    };
}

/// One-to-one pairing of `b` items onto `a` items.
///
/// Returns `(a_index, b_index)` pairs and the unpaired `b` indices, both in
/// `b` order.
fn pair_up<A, B>(
    a: &[A],
    b: &[B],
    exact: impl Fn(&A, &B) -> bool,
    relaxed: impl Fn(&A, &B) -> bool,
) -> (Vec<(usize, usize)>, Vec<usize>) {
    let mut used = vec![false; a.len()];
    let mut matched: Vec<Option<usize>> = vec![None; b.len()];

    let passes: [&dyn Fn(&A, &B) -> bool; 2] = [&exact, &relaxed];
    for pass in passes {
        for (bi, item) in b.iter().enumerate() {
            if matched[bi].is_some() {
                continue;
            }
            if let Some(ai) = (0..a.len()).find(|&ai| !used[ai] && pass(&a[ai], item)) {
                used[ai] = true;
                matched[bi] = Some(ai);
            }
        }
    }

    let mut pairs = Vec::new();
    let mut leftover = Vec::new();
    for (bi, m) in matched.into_iter().enumerate() {
        match m {
            Some(ai) => pairs.push((ai, bi)),
            None => leftover.push(bi),
        }
    }
    (pairs, leftover)
}
