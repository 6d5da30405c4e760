//! Generation normalization and column materialization.
//!
//! Traversal assigns generations relative to each subtree's seed, so a
//! subtree may span `-3..=2`. Shifting every subtree so its shallowest
//! generation is 0 keeps the chart from allocating empty columns.

use std::collections::HashMap;

use super::{BoxId, Generation, PersonBox, list};

/// Shift each subtree so its minimum generation is 0.
pub fn normalize(boxes: &mut [PersonBox]) {
    let mut min_by_subtree: HashMap<usize, i32> = HashMap::new();
    for b in boxes.iter() {
        min_by_subtree
            .entry(b.subtree)
            .and_modify(|m| *m = (*m).min(b.generation))
            .or_insert(b.generation);
    }
    for b in boxes.iter_mut() {
        if let Some(min) = min_by_subtree.get(&b.subtree) {
            b.generation -= min;
        }
    }
}

/// Build generations `0..=max` and wire per-generation positions and
/// neighbour links, following the global order from `head`.
///
/// Expects normalized (non-negative) generations.
pub fn materialize(boxes: &mut [PersonBox], head: Option<BoxId>) -> Vec<Generation> {
    let max = boxes.iter().map(|b| b.generation).max().unwrap_or(-1);
    let mut generations: Vec<Generation> = (0..=max)
        .map(|index| Generation {
            index: usize::try_from(index).unwrap_or_default(),
            boxes: Vec::new(),
        })
        .collect();

    let order: Vec<BoxId> = list::iter(boxes, head).collect();
    for (position, id) in order.into_iter().enumerate() {
        let gen_idx = usize::try_from(boxes[id.0].generation).unwrap_or_default();
        let generation = &mut generations[gen_idx];
        let prev = generation.boxes.last().copied();

        let b = &mut boxes[id.0];
        b.position = position;
        b.gen_position = generation.boxes.len();
        b.gen_above = prev;
        b.gen_below = None;
        generation.boxes.push(id);

        if let Some(p) = prev {
            boxes[p.0].gen_below = Some(id);
        }
    }
    generations
}
