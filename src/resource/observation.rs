//! Measurements and simple assertions about a subject.

use serde::{Deserialize, Serialize};

use crate::element::{Backbone, BackboneData, CachedHash, Element, ElementData, HashMemo};
use crate::error::Result;
use crate::resource::{
    AnyResource, DomainResource, DomainResourceData, Resource, ResourceData, ResourceType,
    visit_domain_children,
};
use crate::types::{
    Boolean, Code, CodeableConcept, DataValue, DateTime, Extension, FhirString, Identifier,
    Instant, Integer, Meta, Narrative, Period, Quantity, Reference, Uri, ValueType,
};
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

/// Value set for [`Observation::status`]; bound at required strength.
pub const OBSERVATION_STATUS_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/observation-status";
const OBSERVATION_STATUS_CODES: &[&str] = &[
    "registered",
    "preliminary",
    "final",
    "amended",
    "corrected",
    "cancelled",
    "entered-in-error",
    "unknown",
];

const SUBJECT_TARGETS: &[ResourceType] = &[ResourceType::Patient, ResourceType::Group];
const EFFECTIVE_TYPES: &[ValueType] =
    &[ValueType::DateTime, ValueType::Period, ValueType::Instant];
const VALUE_TYPES: &[ValueType] = &[
    ValueType::Quantity,
    ValueType::CodeableConcept,
    ValueType::String,
    ValueType::Boolean,
    ValueType::Integer,
    ValueType::Period,
];

/// A point-in-time measurement or assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(flatten)]
    pub(crate) domain: DomainResourceData,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) identifier: Vec<Identifier>,

    pub(crate) status: Code,

    pub(crate) code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) effective: Option<DataValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<DataValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) component: Vec<ObservationComponent>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Observation {
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }

    /// A builder seeded from this instance. Substructures are shared (they
    /// are immutable); list containers are fresh.
    pub fn to_builder(&self) -> ObservationBuilder {
        ObservationBuilder {
            id: self.domain.resource.id.clone(),
            meta: self.domain.resource.meta.clone(),
            implicit_rules: self.domain.resource.implicit_rules.clone(),
            language: self.domain.resource.language.clone(),
            text: self.domain.text.clone(),
            contained: self.domain.contained.clone(),
            extension: self.domain.extension.clone(),
            modifier_extension: self.domain.modifier_extension.clone(),
            identifier: self.identifier.clone(),
            status: Some(self.status.clone()),
            code: Some(self.code.clone()),
            subject: self.subject.clone(),
            effective: self.effective.clone(),
            value: self.value.clone(),
            component: self.component.clone(),
        }
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn subject(&self) -> Option<&Reference> {
        self.subject.as_ref()
    }

    /// The `effective[x]` choice: DateTime, Period or Instant.
    pub fn effective(&self) -> Option<&DataValue> {
        self.effective.as_ref()
    }

    /// The `value[x]` choice.
    pub fn value(&self) -> Option<&DataValue> {
        self.value.as_ref()
    }

    pub fn component(&self) -> &[ObservationComponent] {
        &self.component
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        support::check_value_set_binding(
            Some(&self.status),
            "status",
            OBSERVATION_STATUS_VALUE_SET,
            OBSERVATION_STATUS_CODES,
        )?;
        support::check_reference_type(
            self.subject.as_ref(),
            "subject",
            SUBJECT_TARGETS,
            &self.domain.contained,
        )?;
        support::choice_element(self.effective.as_ref(), "effective", EFFECTIVE_TYPES)?;
        support::choice_element(self.value.as_ref(), "value", VALUE_TYPES)?;
        Ok(())
    }
}

impl Resource for Observation {
    fn resource(&self) -> &ResourceData {
        &self.domain.resource
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Observation
    }
}

impl DomainResource for Observation {
    fn domain(&self) -> &DomainResourceData {
        &self.domain
    }
}

impl CachedHash for Observation {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Observation {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visit_domain_children(&node.domain, v);
            visitor::visit_all(&node.identifier, "identifier", v);
            node.status.accept("status", None, v);
            node.code.accept("code", None, v);
            visitor::visit(&node.subject, "subject", v);
            visitor::visit(&node.effective, "effective", v);
            visitor::visit(&node.value, "value", v);
            visitor::visit_all(&node.component, "component", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Observation"
    }
}

/// Mutable staging builder; short-lived, single-use, not thread-safe.
#[derive(Debug, Clone, Default)]
pub struct ObservationBuilder {
    id: Option<String>,
    meta: Option<Meta>,
    implicit_rules: Option<Uri>,
    language: Option<Code>,
    text: Option<Narrative>,
    contained: Vec<AnyResource>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    identifier: Vec<Identifier>,
    status: Option<Code>,
    code: Option<CodeableConcept>,
    subject: Option<Reference>,
    effective: Option<DataValue>,
    value: Option<DataValue>,
    component: Vec<ObservationComponent>,
}

impl ObservationBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn implicit_rules(mut self, implicit_rules: impl Into<Uri>) -> Self {
        self.implicit_rules = Some(implicit_rules.into());
        self
    }

    pub fn language(mut self, language: impl Into<Code>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn text(mut self, text: Narrative) -> Self {
        self.text = Some(text);
        self
    }

    /// Append one contained resource, preserving prior content.
    pub fn contained(mut self, contained: impl Into<AnyResource>) -> Self {
        self.contained.push(contained.into());
        self
    }

    /// Replace the contained list wholesale.
    pub fn set_contained(mut self, contained: Vec<AnyResource>) -> Self {
        self.contained = contained;
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

    pub fn modifier_extension(mut self, modifier_extension: Extension) -> Self {
        self.modifier_extension.push(modifier_extension);
        self
    }

    pub fn set_modifier_extension(mut self, modifier_extension: Vec<Extension>) -> Self {
        self.modifier_extension = modifier_extension;
        self
    }

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    pub fn set_identifier(mut self, identifier: Vec<Identifier>) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn status(mut self, status: impl Into<Code>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn code(mut self, code: CodeableConcept) -> Self {
        self.code = Some(code);
        self
    }

    pub fn subject(mut self, subject: Reference) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Generic choice setter; membership in {dateTime, Period, instant} is
    /// checked at build time.
    pub fn effective(mut self, effective: DataValue) -> Self {
        self.effective = Some(effective);
        self
    }

    pub fn effective_date_time(mut self, effective: DateTime) -> Self {
        self.effective = Some(DataValue::DateTime(effective));
        self
    }

    pub fn effective_period(mut self, effective: Period) -> Self {
        self.effective = Some(DataValue::Period(effective));
        self
    }

    pub fn effective_instant(mut self, effective: Instant) -> Self {
        self.effective = Some(DataValue::Instant(effective));
        self
    }

    /// Generic choice setter; membership in the declared value set is
    /// checked at build time.
    pub fn value(mut self, value: DataValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn value_quantity(mut self, value: Quantity) -> Self {
        self.value = Some(DataValue::Quantity(value));
        self
    }

    pub fn value_codeable_concept(mut self, value: CodeableConcept) -> Self {
        self.value = Some(DataValue::CodeableConcept(value));
        self
    }

    pub fn value_string(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(DataValue::String(value.into()));
        self
    }

    pub fn value_boolean(mut self, value: impl Into<Boolean>) -> Self {
        self.value = Some(DataValue::Boolean(value.into()));
        self
    }

    pub fn value_integer(mut self, value: impl Into<Integer>) -> Self {
        self.value = Some(DataValue::Integer(value.into()));
        self
    }

    pub fn component(mut self, component: ObservationComponent) -> Self {
        self.component.push(component);
        self
    }

    pub fn set_component(mut self, component: Vec<ObservationComponent>) -> Self {
        self.component = component;
        self
    }

    /// Freeze and validate.
    pub fn build(self) -> Result<Observation> {
        let built = self.build_unchecked()?;
        built.validate()?;
        Ok(built)
    }

    /// Freeze without running validation. Only the structurally required
    /// fields are still demanded by the representation itself.
    pub fn build_unchecked(self) -> Result<Observation> {
        let status = support::require_non_null(self.status, "status")?;
        let code = support::require_non_null(self.code, "code")?;
        Ok(Observation {
            domain: DomainResourceData {
                resource: ResourceData {
                    id: self.id,
                    meta: self.meta,
                    implicit_rules: self.implicit_rules,
                    language: self.language,
                },
                text: self.text,
                contained: self.contained,
                extension: self.extension,
                modifier_extension: self.modifier_extension,
            },
            identifier: self.identifier,
            status,
            code,
            subject: self.subject,
            effective: self.effective,
            value: self.value,
            component: self.component,
            memo: HashMemo::default(),
        })
    }
}

/// One component measurement inside an observation.
///
/// A component carries nothing without its value, so `value[x]` is a
/// required choice here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservationComponent {
    #[serde(flatten)]
    pub(crate) backbone: BackboneData,

    pub(crate) code: CodeableConcept,

    pub(crate) value: DataValue,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl ObservationComponent {
    pub fn builder() -> ObservationComponentBuilder {
        ObservationComponentBuilder::default()
    }

    pub fn to_builder(&self) -> ObservationComponentBuilder {
        ObservationComponentBuilder {
            id: self.backbone.element.id.clone(),
            extension: self.backbone.element.extension.clone(),
            modifier_extension: self.backbone.modifier_extension.clone(),
            code: Some(self.code.clone()),
            value: Some(self.value.clone()),
        }
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::choice_element(Some(&self.value), "value", VALUE_TYPES)?;
        support::require_value_or_children(self)
    }
}

impl Element for ObservationComponent {
    fn element(&self) -> &ElementData {
        &self.backbone.element
    }

    fn has_children(&self) -> bool {
        // code and value are required, so a built component always has children
        true
    }
}

impl Backbone for ObservationComponent {
    fn backbone(&self) -> &BackboneData {
        &self.backbone
    }
}

impl CachedHash for ObservationComponent {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for ObservationComponent {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.backbone.element.extension, "extension", v);
            visitor::visit_all(&node.backbone.modifier_extension, "modifierExtension", v);
            node.code.accept("code", None, v);
            node.value.accept("value", None, v);
        });
    }

    fn type_name(&self) -> &'static str {
        "ObservationComponent"
    }
}

/// Mutable staging builder; short-lived and single-use.
#[derive(Debug, Clone, Default)]
pub struct ObservationComponentBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    code: Option<CodeableConcept>,
    value: Option<DataValue>,
}

impl ObservationComponentBuilder {
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

    pub fn modifier_extension(mut self, modifier_extension: Extension) -> Self {
        self.modifier_extension.push(modifier_extension);
        self
    }

    pub fn set_modifier_extension(mut self, modifier_extension: Vec<Extension>) -> Self {
        self.modifier_extension = modifier_extension;
        self
    }

    pub fn code(mut self, code: CodeableConcept) -> Self {
        self.code = Some(code);
        self
    }

    /// Generic choice setter; the required value is checked for membership
    /// at build time.
    pub fn value(mut self, value: DataValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn value_quantity(mut self, value: Quantity) -> Self {
        self.value = Some(DataValue::Quantity(value));
        self
    }

    pub fn value_string(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(DataValue::String(value.into()));
        self
    }

    /// Freeze and validate.
    pub fn build(self) -> Result<ObservationComponent> {
        let built = self.build_unchecked()?;
        built.validate()?;
        Ok(built)
    }

    /// Freeze without running validation. Only the structurally required
    /// fields are still demanded by the representation itself.
    pub fn build_unchecked(self) -> Result<ObservationComponent> {
        let code = support::require_non_null(self.code, "code")?;
        let value = support::require_choice_element(self.value, "value", VALUE_TYPES)?;
        Ok(ObservationComponent {
            backbone: BackboneData::new(self.id, self.extension, self.modifier_extension),
            code,
            value,
            memo: HashMemo::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirModelError;

    fn heart_rate_code() -> CodeableConcept {
        CodeableConcept::builder()
            .coding(
                crate::types::Coding::builder()
                    .system("http://loinc.org")
                    .code("8867-4")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_observation_requires_status_and_code() {
        let err = Observation::builder().code(heart_rate_code()).build().unwrap_err();
        assert!(matches!(
            err,
            FhirModelError::MissingRequiredField { element } if element == "status"
        ));
    }

    #[test]
    fn test_status_binding() {
        let err = Observation::builder()
            .status("draft")
            .code(heart_rate_code())
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::UnboundedCodedValue { .. }));
    }

    #[test]
    fn test_value_choice_rejects_undeclared_type() {
        let err = Observation::builder()
            .status("final")
            .code(heart_rate_code())
            .value(DataValue::Uri(Uri::of("urn:oid:1.2.3")))
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidChoiceType { .. }));
    }

    #[test]
    fn test_component_requires_value() {
        let err = ObservationComponent::builder()
            .code(heart_rate_code())
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::MissingRequiredChoice { .. }));
    }

    #[test]
    fn test_full_observation_round_trip() {
        let observation = Observation::builder()
            .id("obs-1")
            .status("final")
            .code(heart_rate_code())
            .subject(Reference::to("Patient/example"))
            .value_quantity(
                Quantity::builder()
                    .value(rust_decimal::Decimal::new(72, 0))
                    .unit("beats/minute")
                    .system("http://unitsofmeasure.org")
                    .code("/min")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let copy = observation.to_builder().build().unwrap();
        assert_eq!(copy, observation);
        assert_eq!(copy.cached_hash(), observation.cached_hash());
    }
}
