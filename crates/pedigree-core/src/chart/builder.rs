//! Breadth-first chart construction.
//!
//! # Traversal
//!
//! Every visible person starts in `remaining`. Until it is empty, a seed is
//! taken (the principal first, then document order), given a new subtree
//! index, and expanded breadth-first. A relative still in `remaining` gets a
//! primary box and is queued; a relative already placed gets a duplicate box
//! that is never queued. FIFO order gives the primary placement to the
//! appearance closest to the seed.
//!
//! # Placement
//!
//! - Spouse families: the spouse sits at the same generation, below a male
//!   person and above a female one (unknown gender follows the family role).
//!   Children go one generation down, between the person and the spouse, in
//!   family order. Further spouse families stack outward on the same side.
//! - Parent families: father above, mother below, one generation up. Older
//!   siblings above the person, younger below. Further parent families stack
//!   outward around what is already placed.
//!
//! Families with fewer than two visible members are suppressed, and a family
//! already turned into a [`FamilyLine`] is never expanded again.

use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

use super::list::{self, Chain};
use super::{BoxId, Chart, ChartFilter, FamilyLine, FamilyLineId, PersonBox, generation};
use crate::error::ChartError;
use crate::graph::{FamilyNode, ParentRole, PersonNode, RelationshipGraph};
use crate::model::GenderType;

/// Builds a [`Chart`] from a [`RelationshipGraph`].
#[derive(Debug)]
pub struct ChartBuilder<'g> {
    graph: &'g RelationshipGraph,
    filter: &'g ChartFilter,
    boxes: Vec<PersonBox>,
    remaining: HashSet<&'g str>,
    person_boxes: HashMap<String, Vec<BoxId>>,
    family_lines: Vec<FamilyLine>,
    line_index: HashMap<String, FamilyLineId>,
}

/// Current top and bottom of the block placed around one expanded box.
#[derive(Debug, Clone, Copy)]
struct Extent {
    top: BoxId,
    bottom: BoxId,
}

impl<'g> ChartBuilder<'g> {
    pub fn new(graph: &'g RelationshipGraph, filter: &'g ChartFilter) -> Self {
        let remaining = graph
            .persons()
            .iter()
            .map(|p| p.id.as_str())
            .filter(|id| filter.is_visible(id))
            .collect();
        Self {
            graph,
            filter,
            boxes: Vec::new(),
            remaining,
            person_boxes: HashMap::new(),
            family_lines: Vec::new(),
            line_index: HashMap::new(),
        }
    }

    /// Build the chart for `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`] when the graph references a person or family
    /// it does not contain.
    pub fn build(graph: &'g RelationshipGraph, filter: &'g ChartFilter) -> Result<Chart, ChartError> {
        Self::new(graph, filter).run()
    }

    fn run(mut self) -> Result<Chart, ChartError> {
        let mut global: Option<Chain> = None;
        let mut subtree = 0;
        let mut cursor = 0;
        let filter = self.filter;
        let mut principal = filter.principal.as_deref();

        if let Some(p) = principal.filter(|p| !self.remaining.contains(p)) {
            warn!(principal = p, "principal is unknown or hidden, seeding in document order");
            principal = None;
        }

        loop {
            let seed = match principal.take() {
                Some(p) => p,
                None => match self.next_in_document_order(&mut cursor) {
                    Some(p) => p,
                    None => break,
                },
            };
            self.remaining.remove(seed);
            let root = self.new_box(seed, 0, subtree, None);
            let mut chain = Chain::single(root);
            self.expand(root, &mut chain)?;
            debug!(seed, subtree, "subtree expanded");
            global = Some(list::splice(&mut self.boxes, global, chain));
            subtree += 1;
        }

        let head = global.map(|g| g.head);
        generation::normalize(&mut self.boxes);
        let generations = generation::materialize(&mut self.boxes, head);

        info!(
            boxes = self.boxes.len(),
            subtrees = subtree,
            generations = generations.len(),
            family_lines = self.family_lines.len(),
            "chart built"
        );

        Ok(Chart {
            boxes: self.boxes,
            head,
            generations,
            family_lines: self.family_lines,
            subtree_count: subtree,
            line_index: self.line_index,
            person_boxes: self.person_boxes,
        })
    }

    fn next_in_document_order(&self, cursor: &mut usize) -> Option<&'g str> {
        let graph = self.graph;
        let persons = graph.persons();
        while *cursor < persons.len() {
            let id = persons[*cursor].id.as_str();
            if self.remaining.contains(id) {
                return Some(id);
            }
            *cursor += 1;
        }
        None
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    fn expand(&mut self, root: BoxId, chain: &mut Chain) -> Result<(), ChartError> {
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            let node = self.person_node(&self.boxes[current.0].person)?;
            let mut extent = Extent {
                top: current,
                bottom: current,
            };

            for family_key in &node.spouse_families {
                let family = self.family_node(family_key)?;
                if !self.should_expand(family) {
                    continue;
                }
                self.place_spouse_family(node, family, current, &mut extent, chain, &mut queue)?;
            }

            for family_key in &node.parent_families {
                let family = self.family_node(family_key)?;
                if !self.should_expand(family) {
                    continue;
                }
                self.place_parent_family(node, family, current, &mut extent, chain, &mut queue)?;
            }
        }
        Ok(())
    }

    fn should_expand(&self, family: &FamilyNode) -> bool {
        if self.line_index.contains_key(&family.id) {
            return false;
        }
        let visible = family
            .members()
            .filter(|id| self.filter.is_visible(id))
            .count();
        if visible <= 1 {
            debug!(family = %family.id, "suppressed single-member family");
            return false;
        }
        true
    }

    fn place_spouse_family(
        &mut self,
        node: &PersonNode,
        family: &FamilyNode,
        current: BoxId,
        extent: &mut Extent,
        chain: &mut Chain,
        queue: &mut VecDeque<BoxId>,
    ) -> Result<(), ChartError> {
        let filter = self.filter;
        let role = family.role_of(&node.id).unwrap_or(ParentRole::Father);
        let line = self.new_line(family);
        self.set_line_parent(line, role, current);

        let downward = match node.gender {
            GenderType::Male => true,
            GenderType::Female => false,
            GenderType::Unknown => role == ParentRole::Father,
        };
        let generation = self.boxes[current.0].generation;
        let subtree = self.boxes[current.0].subtree;
        let anchor = if downward { extent.bottom } else { extent.top };

        let mut spouse_box = None;
        if let Some(spouse) = family.parent(role.other()).filter(|s| filter.is_visible(s)) {
            let b = self.place(spouse, generation, subtree, queue)?;
            if downward {
                list::insert_below(&mut self.boxes, chain, anchor, b);
            } else {
                list::insert_above(&mut self.boxes, chain, anchor, b);
            }
            self.set_line_parent(line, role.other(), b);
            spouse_box = Some(b);
        }

        let mut cursor = anchor;
        let mut first_child = None;
        for child in family.children.iter().filter(|c| filter.is_visible(c)) {
            let b = self.place(child, generation - 1, subtree, queue)?;
            if downward {
                list::insert_below(&mut self.boxes, chain, cursor, b);
                cursor = b;
            } else {
                list::insert_above(&mut self.boxes, chain, anchor, b);
            }
            first_child.get_or_insert(b);
            self.add_line_child(line, b);
        }

        if downward {
            extent.bottom = spouse_box.unwrap_or(cursor);
        } else {
            extent.top = spouse_box.or(first_child).unwrap_or(extent.top);
        }
        Ok(())
    }

    fn place_parent_family(
        &mut self,
        node: &PersonNode,
        family: &FamilyNode,
        current: BoxId,
        extent: &mut Extent,
        chain: &mut Chain,
        queue: &mut VecDeque<BoxId>,
    ) -> Result<(), ChartError> {
        let filter = self.filter;
        let line = self.new_line(family);
        let generation = self.boxes[current.0].generation;
        let subtree = self.boxes[current.0].subtree;
        let own_index = family.child_index(&node.id);
        let Extent { top, bottom } = *extent;

        let mut father_box = None;
        if let Some(father) = family.father.as_deref().filter(|f| filter.is_visible(f)) {
            let b = self.place(father, generation + 1, subtree, queue)?;
            list::insert_above(&mut self.boxes, chain, top, b);
            self.set_line_parent(line, ParentRole::Father, b);
            father_box = Some(b);
        }
        let mut mother_box = None;
        if let Some(mother) = family.mother.as_deref().filter(|m| filter.is_visible(m)) {
            let b = self.place(mother, generation + 1, subtree, queue)?;
            list::insert_below(&mut self.boxes, chain, bottom, b);
            self.set_line_parent(line, ParentRole::Mother, b);
            mother_box = Some(b);
        }

        let mut first_older = None;
        let mut below_cursor = bottom;
        for (idx, child) in family.children.iter().enumerate() {
            if !filter.is_visible(child) {
                continue;
            }
            if Some(idx) == own_index {
                self.add_line_child(line, current);
                continue;
            }
            let b = self.place(child, generation, subtree, queue)?;
            if own_index.is_some_and(|own| idx < own) {
                list::insert_above(&mut self.boxes, chain, top, b);
                first_older.get_or_insert(b);
            } else {
                list::insert_below(&mut self.boxes, chain, below_cursor, b);
                below_cursor = b;
            }
            self.add_line_child(line, b);
        }

        extent.top = father_box.or(first_older).unwrap_or(top);
        extent.bottom = mother_box.unwrap_or(below_cursor);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Boxes and lines
    // -----------------------------------------------------------------------

    /// Create a box for `person`: primary if unplaced, otherwise a
    /// duplicate of its first box. Only primary boxes are queued.
    fn place(
        &mut self,
        person: &str,
        generation: i32,
        subtree: usize,
        queue: &mut VecDeque<BoxId>,
    ) -> Result<BoxId, ChartError> {
        if !self.graph.contains_person(person) {
            return Err(ChartError::UnknownPerson(person.to_string()));
        }
        if self.remaining.remove(person) {
            let b = self.new_box(person, generation, subtree, None);
            queue.push_back(b);
            return Ok(b);
        }
        let original = self
            .person_boxes
            .get(person)
            .and_then(|boxes| boxes.first().copied())
            .ok_or_else(|| ChartError::UnknownPerson(person.to_string()))?;
        debug!(person, ?original, "duplicate placement");
        Ok(self.new_box(person, generation, subtree, Some(original)))
    }

    fn new_box(
        &mut self,
        person: &str,
        generation: i32,
        subtree: usize,
        duplicate_of: Option<BoxId>,
    ) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(PersonBox::new(
            id,
            person.to_string(),
            generation,
            subtree,
            duplicate_of,
        ));
        self.person_boxes
            .entry(person.to_string())
            .or_default()
            .push(id);
        id
    }

    fn new_line(&mut self, family: &FamilyNode) -> FamilyLineId {
        let id = FamilyLineId(self.family_lines.len());
        self.family_lines.push(FamilyLine {
            id,
            family: family.id.clone(),
            father: None,
            mother: None,
            children: Vec::new(),
        });
        self.line_index.insert(family.id.clone(), id);
        id
    }

    fn set_line_parent(&mut self, line: FamilyLineId, role: ParentRole, b: BoxId) {
        let fl = &mut self.family_lines[line.0];
        match role {
            ParentRole::Father => fl.father = Some(b),
            ParentRole::Mother => fl.mother = Some(b),
        }
        self.boxes[b.0].spouse_lines.push(line);
    }

    fn add_line_child(&mut self, line: FamilyLineId, b: BoxId) {
        self.family_lines[line.0].children.push(b);
        self.boxes[b.0].parent_lines.push(line);
    }

    fn person_node(&self, id: &str) -> Result<&'g PersonNode, ChartError> {
        self.graph
            .person(id)
            .ok_or_else(|| ChartError::UnknownPerson(id.to_string()))
    }

    fn family_node(&self, key: &str) -> Result<&'g FamilyNode, ChartError> {
        self.graph
            .family(key)
            .ok_or_else(|| ChartError::UnknownFamily(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
