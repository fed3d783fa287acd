//! Typed pointers between resources.
//!
//! A reference is a structural value: a literal reference string, an
//! optional explicit type, an optional business identifier and a display.
//! The allowed-target-type set is declared at the schema level by the field
//! holding the reference, not stored per instance; `build()` of the holding
//! type runs the target check (`validation::support::check_reference_type`).

use serde::{Deserialize, Serialize};

use crate::element::{CachedHash, Element, ElementData, HashMemo};
use crate::error::Result;
use crate::types::{Extension, FhirString, Identifier, Uri};
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

/// A reference from one resource to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reference: Option<FhirString>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) type_: Option<Uri>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) identifier: Option<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) display: Option<FhirString>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Reference {
    pub fn builder() -> ReferenceBuilder {
        ReferenceBuilder::default()
    }

    /// Shorthand for a plain literal reference such as `"Patient/123"` or
    /// `"#contained-id"`.
    pub fn to(reference: impl Into<FhirString>) -> Self {
        Self {
            data: ElementData::default(),
            reference: Some(reference.into()),
            type_: None,
            identifier: None,
            display: None,
            memo: HashMemo::default(),
        }
    }

    pub fn to_builder(&self) -> ReferenceBuilder {
        ReferenceBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            reference: self.reference.clone(),
            type_: self.type_.clone(),
            identifier: self.identifier.clone(),
            display: self.display.clone(),
        }
    }

    /// The literal reference value, if any.
    pub fn reference(&self) -> Option<&FhirString> {
        self.reference.as_ref()
    }

    /// The explicit target type, if any.
    pub fn reference_type(&self) -> Option<&Uri> {
        self.type_.as_ref()
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    /// The literal value as a str, when present.
    pub(crate) fn literal(&self) -> Option<&str> {
        self.reference.as_ref().and_then(FhirString::value)
    }

    /// The explicit type value as a str, when present.
    pub(crate) fn explicit_type(&self) -> Option<&str> {
        self.type_.as_ref().and_then(Uri::value)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for Reference {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty()
            || self.reference.is_some()
            || self.type_.is_some()
            || self.identifier.is_some()
            || self.display.is_some()
    }
}

impl CachedHash for Reference {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Reference {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.reference, "reference", v);
            visitor::visit(&node.type_, "type", v);
            visitor::visit(&node.identifier, "identifier", v);
            visitor::visit(&node.display, "display", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Reference"
    }
}

/// Mutable staging builder; short-lived and single-use.
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    reference: Option<FhirString>,
    type_: Option<Uri>,
    identifier: Option<Identifier>,
    display: Option<FhirString>,
}

impl ReferenceBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    pub fn set_extension(mut self, extension: Vec<Extension>) -> Self {
        self.extension = extension;
        self
    }

    pub fn reference(mut self, reference: impl Into<FhirString>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn reference_type(mut self, type_: impl Into<Uri>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn build(self) -> Result<Reference> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Reference {
        Reference {
            data: ElementData::new(self.id, self.extension),
            reference: self.reference,
            type_: self.type_,
            identifier: self.identifier,
            display: self.display,
            memo: HashMemo::default(),
        }
    }
}
