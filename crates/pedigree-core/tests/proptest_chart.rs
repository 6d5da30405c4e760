use pedigree_core::chart::{Chart, ChartBuilder, ChartFilter};
use pedigree_core::edit::EditEngine;
use pedigree_core::graph::RelationshipGraph;
use pedigree_core::model::{Document, RelationshipType};
use petgraph::unionfind::UnionFind;
use proptest::prelude::*;
use std::collections::HashSet;

use generators::*;

fn build(doc: &Document) -> (RelationshipGraph, Chart) {
    let graph = RelationshipGraph::build(doc).expect("generated documents are valid");
    let chart = ChartBuilder::build(&graph, &ChartFilter::default()).expect("chart");
    (graph, chart)
}

fn layout_signature(chart: &Chart) -> Vec<(String, i32, usize, usize, bool)> {
    chart
        .ordered()
        .map(|b| (b.person.clone(), b.generation, b.subtree, b.gen_position, b.is_duplicate()))
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn chart_build_is_deterministic(doc in arb_document()) {
        let (_, first) = build(&doc);
        let (_, second) = build(&doc);
        prop_assert_eq!(layout_signature(&first), layout_signature(&second));
        prop_assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[test]
    fn every_person_has_exactly_one_primary_box(doc in arb_document()) {
        let (_, chart) = build(&doc);
        for person in &doc.persons {
            let boxes = chart.boxes_for(&person.id);
            prop_assert!(!boxes.is_empty(), "{} has no box", person.id);
            let primaries = boxes
                .iter()
                .filter(|id| !chart.get(**id).expect("box").is_duplicate())
                .count();
            prop_assert_eq!(primaries, 1);
        }
        prop_assert_eq!(chart.ordered().count(), chart.len());
    }

    #[test]
    fn every_connected_family_has_one_line(doc in arb_document()) {
        let (graph, chart) = build(&doc);
        let expected: HashSet<&str> = graph
            .families()
            .iter()
            .filter(|f| !f.is_suppressed())
            .map(|f| f.id.as_str())
            .collect();
        let lines: Vec<&str> = chart.family_lines().iter().map(|l| l.family.as_str()).collect();
        let unique: HashSet<&str> = lines.iter().copied().collect();
        prop_assert_eq!(lines.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn each_couple_maps_to_one_family(doc in arb_document()) {
        let (graph, _) = build(&doc);
        let mut pairs = HashSet::new();
        for fam in graph.families() {
            if let (Some(f), Some(m)) = (fam.father.as_deref(), fam.mother.as_deref()) {
                let pair = if f <= m { (f, m) } else { (m, f) };
                prop_assert!(pairs.insert(pair), "{} and {} head two families", f, m);
            }
        }
        for rel in doc.relationships.iter().filter(|r| r.kind == RelationshipType::Couple) {
            let (a, b) = rel.endpoints().expect("endpoints");
            let fam = graph.couple_family(a, b).expect("couple has a family");
            prop_assert_eq!(fam.couple_rel.as_deref(), Some(rel.id.as_str()));
        }
    }

    #[test]
    fn duplicates_are_leaves(doc in arb_document()) {
        let (_, chart) = build(&doc);
        for b in chart.boxes().iter().filter(|b| b.is_duplicate()) {
            prop_assert_eq!(b.spouse_lines.len() + b.parent_lines.len(), 1);
            let original = b.duplicate_of.and_then(|id| chart.get(id)).expect("original");
            prop_assert_eq!(&original.person, &b.person);
            prop_assert!(!original.is_duplicate());
        }
    }

    #[test]
    fn parents_sit_one_generation_above_children(doc in arb_document()) {
        let (_, chart) = build(&doc);
        for rel in doc.relationships.iter().filter(|r| r.kind == RelationshipType::ParentChild) {
            let (parent, child) = rel.endpoints().expect("endpoints");
            let p = chart.primary_box(parent).expect("parent box");
            let c = chart.primary_box(child).expect("child box");
            prop_assert_eq!(p.subtree, c.subtree);
            prop_assert_eq!(p.generation, c.generation + 1);
        }
        for subtree in 0..chart.subtree_count() {
            let min = chart
                .boxes()
                .iter()
                .filter(|b| b.subtree == subtree)
                .map(|b| b.generation)
                .min();
            prop_assert_eq!(min, Some(0));
        }
    }

    #[test]
    fn subtrees_are_connected_components(doc in arb_document()) {
        let (_, chart) = build(&doc);
        let index = |id: &str| doc.person_index(id).expect("person");
        let mut components = UnionFind::<usize>::new(doc.persons.len());
        for rel in &doc.relationships {
            let (a, b) = rel.endpoints().expect("endpoints");
            components.union(index(a), index(b));
        }
        for a in &doc.persons {
            for b in &doc.persons {
                let same_component = components.equiv(index(&a.id), index(&b.id));
                let same_subtree = chart.subtree_of(&a.id) == chart.subtree_of(&b.id);
                prop_assert_eq!(same_component, same_subtree, "{} / {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn generations_follow_global_order(doc in arb_document()) {
        let (_, chart) = build(&doc);
        for generation in chart.generations() {
            let positions: Vec<usize> = generation
                .boxes
                .iter()
                .map(|id| chart.get(*id).expect("box").position)
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            for (idx, id) in generation.boxes.iter().enumerate() {
                prop_assert_eq!(chart.get(*id).expect("box").gen_position, idx);
            }
        }
    }

    #[test]
    fn ensure_relationship_twice_creates_one(doc in arb_document(), a in 0usize..14, b in 0usize..14) {
        let mut doc = doc;
        let n = doc.persons.len();
        let (a, b) = (person_id(a % n), person_id(b % n));
        let mut engine = EditEngine::new(&mut doc);
        let first = engine.ensure_relationship(RelationshipType::Couple, &a, &b).expect("first");
        let second = engine.ensure_relationship(RelationshipType::Couple, &b, &a).expect("second");
        prop_assert!(!second.is_created());
        prop_assert_eq!(first.id(), second.id());
        let count = doc
            .relationships
            .iter()
            .filter(|r| r.connects(&RelationshipType::Couple, &a, &b))
            .count();
        prop_assert_eq!(count, 1);
    }

    #[test]
    fn merging_keeps_document_consistent(doc in arb_document(), a in 0usize..14, b in 0usize..14) {
        let mut doc = doc;
        let n = doc.persons.len();
        prop_assume!(a % n != b % n);
        let (a, b) = (person_id(a % n), person_id(b % n));
        EditEngine::new(&mut doc)
            .merge_person_list(&a, &[b.as_str()])
            .expect("merge");
        prop_assert!(doc.person(&b).is_none());
        for rel in &doc.relationships {
            let (p1, p2) = rel.endpoints().expect("endpoints");
            prop_assert_ne!(p1, p2);
            prop_assert_ne!(p1, b.as_str());
            prop_assert_ne!(p2, b.as_str());
        }
        prop_assert!(RelationshipGraph::build(&doc).is_ok());
    }
}
