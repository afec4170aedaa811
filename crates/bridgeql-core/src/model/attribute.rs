use crate::value::ValueKind;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

///
/// AttributeModel
///
/// Attribute descriptor: the emitted attribute name plus its value kind.
/// Immutable once constructed; compilers clone descriptors freely.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AttributeModel {
    name: String,
    kind: ValueKind,
}

impl AttributeModel {
    /// Construct from a Rust-style identifier; the emitted name is the
    /// snake-cased form.
    #[must_use]
    pub fn new(ident: &str, kind: ValueKind) -> Self {
        Self {
            name: ident.to_case(Case::Snake),
            kind,
        }
    }

    /// Construct with an explicit emitted name, bypassing case derivation.
    #[must_use]
    pub fn named(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The emitted attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }
}

///
/// OwnedAttribute
///
/// One ownership entry in a type's attribute registry: the field name the
/// caller filters by, the attribute descriptor, and ownership annotations.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OwnedAttribute {
    field: String,
    attribute: AttributeModel,
    is_key: bool,
    is_unique: bool,
    card_min: Option<u32>,
    card_max: Option<u32>,
}

impl OwnedAttribute {
    #[must_use]
    pub fn new(field: impl Into<String>, attribute: AttributeModel) -> Self {
        Self {
            field: field.into(),
            attribute,
            is_key: false,
            is_unique: false,
            card_min: None,
            card_max: None,
        }
    }

    /// Flag as a key attribute. Keys imply cardinality 1..1 when no
    /// explicit cardinality was given.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.is_key = true;
        if self.card_min.is_none() && self.card_max.is_none() {
            self.card_min = Some(1);
            self.card_max = Some(1);
        }
        self
    }

    /// Flag as unique (non-key).
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Set explicit cardinality bounds; `None` max means unbounded.
    #[must_use]
    pub const fn card(mut self, min: u32, max: Option<u32>) -> Self {
        self.card_min = Some(min);
        self.card_max = max;
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn attribute(&self) -> &AttributeModel {
        &self.attribute
    }

    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.is_key
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.is_unique
    }

    #[must_use]
    pub const fn card_min(&self) -> Option<u32> {
        self.card_min
    }

    #[must_use]
    pub const fn card_max(&self) -> Option<u32> {
        self.card_max
    }

    /// True when at least one value is required.
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.card_min.is_some_and(|min| min >= 1)
    }
}
