use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pedigree_core::chart::ChartFilter;
use pedigree_core::edit::EditEngine;
use pedigree_core::model::{Document, Gender, GenderType, Person, Relationship, RelationshipType};
use pedigree_core::project;

/// `(name, families per lineage, lineages)`
const TIERS: [(&str, usize, usize); 3] = [("small", 8, 2), ("medium", 64, 4), ("large", 256, 8)];

fn person(id: String, gender: GenderType) -> Person {
    let mut p = Person::new(id);
    p.gender = Some(Gender {
        kind: Some(gender.uri().to_string()),
        fields: vec![],
    });
    p
}

/// Independent lineages of couples, each couple having three children, the
/// first son marrying into the next generation.
fn generate(families: usize, lineages: usize) -> Document {
    let mut doc = Document::default();
    let mut next_rel = 0usize;
    let mut push = |doc: &mut Document, kind: RelationshipType, a: &str, b: &str| {
        doc.relationships
            .push(Relationship::new(format!("r{next_rel}"), kind, a, b));
        next_rel += 1;
    };

    for lineage in 0..lineages {
        let mut father = format!("L{lineage}H0");
        doc.persons.push(person(father.clone(), GenderType::Male));
        for generation in 0..families {
            let mother = format!("L{lineage}W{generation}");
            doc.persons.push(person(mother.clone(), GenderType::Female));
            push(&mut doc, RelationshipType::Couple, &father, &mother);

            let mut heir = None;
            for child in 0..3 {
                let gender = if child == 1 {
                    GenderType::Female
                } else {
                    GenderType::Male
                };
                let id = format!("L{lineage}G{generation}C{child}");
                doc.persons.push(person(id.clone(), gender));
                push(&mut doc, RelationshipType::ParentChild, &father, &id);
                push(&mut doc, RelationshipType::ParentChild, &mother, &id);
                if child == 0 {
                    heir = Some(id);
                }
            }
            if let Some(heir) = heir {
                father = heir;
            }
        }
    }
    doc
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart.project");
    let filter = ChartFilter::default();

    for (name, families, lineages) in TIERS {
        let doc = generate(families, lineages);
        group.throughput(Throughput::Elements(doc.persons.len() as u64));
        group.bench_with_input(BenchmarkId::new("project", name), &doc, |b, doc| {
            b.iter(|| black_box(project(doc, &filter).map(|(_, chart)| chart.len())));
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit.merge");

    for (name, families, lineages) in TIERS {
        let doc = generate(families, lineages);
        group.bench_with_input(BenchmarkId::new("merge_wife", name), &doc, |b, doc| {
            b.iter_batched(
                || doc.clone(),
                |mut doc| {
                    let reports = EditEngine::new(&mut doc).merge_person_list("L0W0", &["L0W1"]);
                    black_box(reports.map(|r| r.len()))
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_project, bench_merge);
criterion_main!(benches);
