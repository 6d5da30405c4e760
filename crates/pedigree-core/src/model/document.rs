//! The canonical genealogical document.
//!
//! The document is the single source of truth: the relationship graph and the
//! chart are projections rebuilt from it after every edit. Array order of
//! `persons` and `relationships` is meaningful (it drives default chart
//! ordering) and every mutation preserves the relative order of the elements
//! it does not touch.
//!
//! Only the GedcomX fields the algorithms inspect are modelled. Everything
//! else is carried through `extra` so a load/save cycle is lossless.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use super::types::{GenderType, NamePartType, RelationshipType};

pub type Extra = BTreeMap<String, Value>;

/// A genealogical document: persons and the relationships between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persons: Vec<Person>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<Name>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gender {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_forms: Vec<NameForm>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<NamePart>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePart {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NamePartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

/// Evidence field: typed values extracted from a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A typed link between two persons.
///
/// For `ParentChild`, `person1` is the parent and `person2` the child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(default)]
    pub person1: ResourceReference,
    #[serde(default)]
    pub person2: ResourceReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Reference to a person, either as a `#id` fragment or an explicit id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ResourceReference {
    /// Reference to a local person by id.
    pub fn to_person(id: &str) -> Self {
        Self {
            resource: Some(format!("#{id}")),
            resource_id: Some(id.to_string()),
        }
    }

    /// Resolve the referenced person id.
    ///
    /// `resourceId` wins over `resource`; a leading `#` is stripped from the
    /// latter. Empty references resolve to `None`.
    pub fn resolve(&self) -> Option<&str> {
        let id = match (&self.resource_id, &self.resource) {
            (Some(id), _) => id.as_str(),
            (None, Some(uri)) => uri.strip_prefix('#').unwrap_or(uri),
            (None, None) => return None,
        };
        (!id.is_empty()).then_some(id)
    }
}

impl Relationship {
    pub fn new(id: impl Into<String>, kind: RelationshipType, person1: &str, person2: &str) -> Self {
        Self {
            id: id.into(),
            kind,
            person1: ResourceReference::to_person(person1),
            person2: ResourceReference::to_person(person2),
            facts: Vec::new(),
            fields: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Both resolved endpoints, if present.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        Some((self.person1.resolve()?, self.person2.resolve()?))
    }

    /// `true` when this relationship has the given type and endpoints.
    ///
    /// Couple endpoints are unordered; every other type is directional.
    pub fn connects(&self, kind: &RelationshipType, id1: &str, id2: &str) -> bool {
        if &self.kind != kind {
            return false;
        }
        match self.endpoints() {
            Some((a, b)) if a == id1 && b == id2 => true,
            Some((a, b)) => *kind == RelationshipType::Couple && a == id2 && b == id1,
            None => false,
        }
    }
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn gender_type(&self) -> GenderType {
        self.gender
            .as_ref()
            .and_then(|g| g.kind.as_deref())
            .map_or(GenderType::Unknown, GenderType::from_uri)
    }

    /// Best display name: full text of the first name form, or its parts
    /// joined with spaces.
    pub fn display_name(&self) -> Option<String> {
        let form = self.names.first()?.name_forms.first()?;
        if let Some(text) = form.full_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return Some(text.trim().to_string());
        }
        let joined = form.joined_parts();
        (!joined.is_empty()).then_some(joined)
    }
}

impl NameForm {
    /// Part values joined with single spaces, skipping empty parts.
    pub fn joined_parts(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Recompute `full_text` from the parts. Forms without parts keep their
    /// existing text.
    pub fn recompute_full_text(&mut self) {
        if self.parts.is_empty() {
            return;
        }
        let joined = self.joined_parts();
        self.full_text = (!joined.is_empty()).then_some(joined);
    }
}

impl Document {
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    pub fn person_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.persons.iter_mut().find(|p| p.id == id)
    }

    pub fn person_index(&self, id: &str) -> Option<usize> {
        self.persons.iter().position(|p| p.id == id)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn relationship_index(&self, id: &str) -> Option<usize> {
        self.relationships.iter().position(|r| r.id == id)
    }

    /// First relationship with the given type and endpoints.
    pub fn find_relationship(
        &self,
        kind: &RelationshipType,
        id1: &str,
        id2: &str,
    ) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(kind, id1, id2))
    }

    /// An unused relationship id of the form `r-N`.
    pub fn next_relationship_id(&self) -> String {
        let taken: HashSet<&str> = self.relationships.iter().map(|r| r.id.as_str()).collect();
        let mut n = self.relationships.len() + 1;
        loop {
            let candidate = format!("r-{n}");
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Give every relationship without an id a fresh one. Returns how many
    /// were assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for idx in 0..self.relationships.len() {
            if self.relationships[idx].id.is_empty() {
                let id = self.next_relationship_id();
                self.relationships[idx].id = id;
                assigned += 1;
            }
        }
        assigned
    }

    /// Recompute `fullText` for every name form that has parts.
    pub fn recompute_full_texts(&mut self) {
        for person in &mut self.persons {
            for name in &mut person.names {
                for form in &mut name.name_forms {
                    form.recompute_full_text();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_prefers_resource_id() {
        let r = ResourceReference {
            resource: Some("#A".into()),
            resource_id: Some("B".into()),
        };
        assert_eq!(r.resolve(), Some("B"));
    }

    #[test]
    fn reference_strips_fragment() {
        let r = ResourceReference {
            resource: Some("#P1".into()),
            resource_id: None,
        };
        assert_eq!(r.resolve(), Some("P1"));
        assert_eq!(ResourceReference::default().resolve(), None);
    }

    #[test]
    fn couple_connects_in_either_order() {
        let rel = Relationship::new("r1", RelationshipType::Couple, "H", "W");
        assert!(rel.connects(&RelationshipType::Couple, "W", "H"));
        let pc = Relationship::new("r2", RelationshipType::ParentChild, "H", "C");
        assert!(!pc.connects(&RelationshipType::ParentChild, "C", "H"));
        assert!(pc.connects(&RelationshipType::ParentChild, "H", "C"));
    }

    #[test]
    fn assign_missing_ids_skips_taken() {
        let mut doc = Document::default();
        doc.relationships.push(Relationship::new("r-2", RelationshipType::Couple, "A", "B"));
        doc.relationships.push(Relationship::new("", RelationshipType::Couple, "C", "D"));
        assert_eq!(doc.assign_missing_ids(), 1);
        assert_eq!(doc.relationships[1].id, "r-3");
    }

    #[test]
    fn display_name_falls_back_to_parts() {
        let mut person = Person::new("P1");
        person.names.push(Name {
            name_forms: vec![NameForm {
                parts: vec![
                    NamePart {
                        kind: Some(NamePartType::Given),
                        value: Some("Ada".into()),
                        fields: vec![],
                    },
                    NamePart {
                        kind: Some(NamePartType::Surname),
                        value: Some(" Lovelace ".into()),
                        fields: vec![],
                    },
                ],
                ..NameForm::default()
            }],
            ..Name::default()
        });
        assert_eq!(person.display_name().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn unknown_members_survive_round_trip() {
        let json = r#"{"persons":[{"id":"P1","living":true}],"sourceDescriptions":[{"id":"S1"}]}"#;
        let doc: Document = serde_json::from_str(json).expect("parse");
        assert!(doc.extra.contains_key("sourceDescriptions"));
        assert_eq!(doc.persons[0].extra.get("living"), Some(&Value::Bool(true)));
        let back = serde_json::to_string(&doc).expect("serialize");
        assert!(back.contains("sourceDescriptions"));
    }
}
