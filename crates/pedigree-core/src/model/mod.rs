//! Document model: GedcomX-shaped persons and relationships.
//!
//! - [`document`] — the canonical document and its records.
//! - [`types`] — typed views over type URIs.

pub mod document;
pub mod types;

pub use document::{
    Date, Document, Fact, Field, FieldValue, Gender, Name, NameForm, NamePart, Person, Place,
    Qualifier, Relationship, ResourceReference, SourceReference,
};
pub use types::{GenderType, NamePartType, RelationshipType};
