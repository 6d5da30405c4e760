//! Document builders shared by unit tests.

use crate::model::{
    Document, Gender, GenderType, Name, NameForm, NamePart, NamePartType, Person, Relationship,
    RelationshipType,
};

pub fn person(id: &str, gender: GenderType) -> Person {
    let mut p = Person::new(id);
    p.gender = Some(Gender {
        kind: Some(gender.uri().to_string()),
        fields: vec![],
    });
    p
}

pub fn male(id: &str) -> Person {
    person(id, GenderType::Male)
}

pub fn female(id: &str) -> Person {
    person(id, GenderType::Female)
}

pub fn couple(id: &str, a: &str, b: &str) -> Relationship {
    Relationship::new(id, RelationshipType::Couple, a, b)
}

pub fn parent_child(id: &str, parent: &str, child: &str) -> Relationship {
    Relationship::new(id, RelationshipType::ParentChild, parent, child)
}

pub fn doc(persons: Vec<Person>, relationships: Vec<Relationship>) -> Document {
    Document {
        persons,
        relationships,
        ..Document::default()
    }
}

/// F + M with children C1, C2, C3.
pub fn nuclear() -> Document {
    doc(
        vec![male("F"), female("M"), female("C1"), male("C2"), female("C3")],
        vec![
            couple("c", "F", "M"),
            parent_child("f1", "F", "C1"),
            parent_child("m1", "M", "C1"),
            parent_child("f2", "F", "C2"),
            parent_child("m2", "M", "C2"),
            parent_child("f3", "F", "C3"),
            parent_child("m3", "M", "C3"),
        ],
    )
}

/// A person with one name form holding a single given-name part.
pub fn named(id: &str, given: &str, surname: &str) -> Person {
    let mut p = Person::new(id);
    p.names.push(Name {
        kind: None,
        name_forms: vec![NameForm {
            parts: vec![
                NamePart {
                    kind: Some(NamePartType::Given),
                    value: Some(given.to_string()),
                    fields: vec![],
                },
                NamePart {
                    kind: Some(NamePartType::Surname),
                    value: Some(surname.to_string()),
                    fields: vec![],
                },
            ],
            ..NameForm::default()
        }],
        fields: vec![],
    });
    p
}

pub fn rel_ids(doc: &Document) -> Vec<&str> {
    doc.relationships.iter().map(|r| r.id.as_str()).collect()
}

pub fn person_ids(doc: &Document) -> Vec<&str> {
    doc.persons.iter().map(|p| p.id.as_str()).collect()
}
