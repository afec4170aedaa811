use crate::model::attribute::OwnedAttribute;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

///
/// EntityModel
///
/// Ordered, immutable attribute registry for one entity type.
///
/// Inheritance is flattened exactly once at construction via `extending`;
/// lookups never walk a parent chain. Declaration order is preserved and is
/// part of compiled-query determinism (pagination anchors, fetch order).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityModel {
    name: String,
    attributes: Vec<OwnedAttribute>,
}

impl EntityModel {
    /// Construct from a Rust-style identifier; the emitted type name is the
    /// snake-cased form.
    #[must_use]
    pub fn new(ident: &str) -> Self {
        Self {
            name: ident.to_case(Case::Snake),
            attributes: Vec::new(),
        }
    }

    /// Construct with an explicit emitted type name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Construct a subtype registry pre-seeded with the parent's flattened
    /// attributes. Parent entries come first, preserving the parent's order.
    #[must_use]
    pub fn extending(ident: &str, parent: &Self) -> Self {
        Self {
            name: ident.to_case(Case::Snake),
            attributes: parent.attributes.clone(),
        }
    }

    /// Append one ownership entry.
    #[must_use]
    pub fn own(mut self, owned: OwnedAttribute) -> Self {
        self.attributes.push(owned);
        self
    }

    /// The emitted type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.name
    }

    /// All ownership entries in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[OwnedAttribute] {
        &self.attributes
    }

    /// Resolve one field name against the registry.
    #[must_use]
    pub fn owned(&self, field: &str) -> Option<&OwnedAttribute> {
        self.attributes.iter().find(|owned| owned.field() == field)
    }

    /// Field names in declaration order, for error listings.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.attributes.iter().map(OwnedAttribute::field).collect()
    }

    /// Deterministic sort anchor for pagination: the first key attribute,
    /// else the first mandatory attribute, else none.
    #[must_use]
    pub fn pagination_anchor(&self) -> Option<&OwnedAttribute> {
        self.attributes
            .iter()
            .find(|owned| owned.is_key())
            .or_else(|| self.attributes.iter().find(|owned| owned.is_mandatory()))
    }
}
