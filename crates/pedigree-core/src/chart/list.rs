//! Doubly-linked ordering of person boxes over an arena.
//!
//! Boxes live in a `Vec` and link to their neighbours through `above`/`below`
//! indices, so insertion next to any box is O(1) and the final order is
//! explicit. Each subtree is built as its own [`Chain`] and spliced onto the
//! end of the global order when its expansion finishes.

use super::{BoxId, PersonBox};

/// First and last box of a linked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub head: BoxId,
    pub tail: BoxId,
}

impl Chain {
    pub const fn single(id: BoxId) -> Self {
        Self { head: id, tail: id }
    }
}

/// Link `new` directly below `anchor`.
pub fn insert_below(boxes: &mut [PersonBox], chain: &mut Chain, anchor: BoxId, new: BoxId) {
    let next = boxes[anchor.0].below;
    boxes[new.0].above = Some(anchor);
    boxes[new.0].below = next;
    boxes[anchor.0].below = Some(new);
    match next {
        Some(n) => boxes[n.0].above = Some(new),
        None => chain.tail = new,
    }
}

/// Link `new` directly above `anchor`.
pub fn insert_above(boxes: &mut [PersonBox], chain: &mut Chain, anchor: BoxId, new: BoxId) {
    let prev = boxes[anchor.0].above;
    boxes[new.0].below = Some(anchor);
    boxes[new.0].above = prev;
    boxes[anchor.0].above = Some(new);
    match prev {
        Some(p) => boxes[p.0].below = Some(new),
        None => chain.head = new,
    }
}

/// Append `chain` after `global`, returning the combined run.
pub fn splice(boxes: &mut [PersonBox], global: Option<Chain>, chain: Chain) -> Chain {
    match global {
        None => chain,
        Some(g) => {
            boxes[g.tail.0].below = Some(chain.head);
            boxes[chain.head.0].above = Some(g.tail);
            Chain {
                head: g.head,
                tail: chain.tail,
            }
        }
    }
}

/// Walk `below` links starting at `head`.
pub fn iter(boxes: &[PersonBox], head: Option<BoxId>) -> impl Iterator<Item = BoxId> + '_ {
    std::iter::successors(head, move |id| boxes[id.0].below)
}
