//! Open-world extension slots.

use serde::{Deserialize, Serialize};

use crate::element::{CachedHash, Element, ElementData, HashMemo};
use crate::error::Result;
use crate::types::{DataValue, ValueType};
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

/// Every concrete type a top-level extension value may hold — the full
/// [`ValueType`] vocabulary, since extensions are the open-world escape
/// hatch.
pub const EXTENSION_VALUE_TYPES: &[ValueType] = &[
    ValueType::Boolean,
    ValueType::Integer,
    ValueType::Decimal,
    ValueType::String,
    ValueType::Uri,
    ValueType::Code,
    ValueType::Date,
    ValueType::DateTime,
    ValueType::Instant,
    ValueType::Coding,
    ValueType::CodeableConcept,
    ValueType::Quantity,
    ValueType::Period,
    ValueType::Identifier,
    ValueType::Reference,
];

/// A (url, value) pair carrying data the core schema does not define.
/// Owned by its containing element; nested extensions live in the common
/// element data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extension {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    pub(crate) url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<DataValue>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Extension {
    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::default()
    }

    pub fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            url: Some(self.url.clone()),
            value: self.value.clone(),
        }
    }

    /// The uri identifying the meaning of this extension.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn value(&self) -> Option<&DataValue> {
        self.value.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::check_uri(Some(self.url.as_str()))?;
        support::choice_element(self.value.as_ref(), "value", EXTENSION_VALUE_TYPES)?;
        support::require_value_or_children(self)
    }
}

impl Element for Extension {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl CachedHash for Extension {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Extension {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.value, "value", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Extension"
    }
}

/// Mutable staging builder; short-lived and single-use.
#[derive(Debug, Clone, Default)]
pub struct ExtensionBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    url: Option<String>,
    value: Option<DataValue>,
}

impl ExtensionBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append one nested extension, preserving prior content.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    /// Replace the nested extension list wholesale.
    pub fn set_extension(mut self, extension: Vec<Extension>) -> Self {
        self.extension = extension;
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Generic choice setter; the value's type is checked against the full
    /// vocabulary at build time.
    pub fn value(mut self, value: impl Into<DataValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Freeze and validate.
    pub fn build(self) -> Result<Extension> {
        let built = self.build_unchecked()?;
        built.validate()?;
        Ok(built)
    }

    /// Freeze without running validation. Only the structurally required
    /// url is still demanded by the representation itself.
    pub fn build_unchecked(self) -> Result<Extension> {
        let url = support::require_non_null(self.url, "url")?;
        Ok(Extension {
            data: ElementData::new(self.id, self.extension),
            url,
            value: self.value,
            memo: HashMemo::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirModelError;

    #[test]
    fn test_extension_requires_url() {
        let err = Extension::builder().value(DataValue::from(true)).build().unwrap_err();
        assert!(matches!(
            err,
            FhirModelError::MissingRequiredField { element } if element == "url"
        ));
    }

    #[test]
    fn test_extension_with_value_round_trips() {
        let extension = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/flag")
            .value(DataValue::from(true))
            .build()
            .unwrap();
        let copy = extension.to_builder().build().unwrap();
        assert_eq!(copy, extension);
    }

    #[test]
    fn test_url_only_extension_is_vacuous() {
        let err = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/flag")
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::VacuousElement));
    }

    #[test]
    fn test_nested_extensions_count_as_children() {
        let nested = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/inner")
            .value(DataValue::from(1))
            .build()
            .unwrap();
        let outer = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/outer")
            .extension(nested)
            .build()
            .unwrap();
        assert!(outer.value().is_none());
        assert!(outer.has_children());
    }
}
