//! Demographics and administrative information about a person receiving
//! care.
//!
//! The field set is the slice of Patient the core mechanisms need: two
//! choice fields, a required-strength gender binding, typed references and
//! a link backbone.

use serde::{Deserialize, Serialize};

use crate::element::{Backbone, BackboneData, CachedHash, Element, ElementData, HashMemo};
use crate::error::Result;
use crate::resource::{
    AnyResource, DomainResource, DomainResourceData, Resource, ResourceData, ResourceType,
    visit_domain_children,
};
use crate::types::{
    Boolean, Code, DataValue, Date, DateTime, Extension, Identifier, Integer, Meta, Narrative,
    Reference, Uri, ValueType,
};
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

/// Value set for [`Patient::gender`]; bound at required strength.
pub const ADMINISTRATIVE_GENDER_VALUE_SET: &str =
    "http://hl7.org/fhir/ValueSet/administrative-gender";
const ADMINISTRATIVE_GENDER_CODES: &[&str] = &["male", "female", "other", "unknown"];

/// Value set for [`PatientLink::link_type`]; bound at required strength.
pub const LINK_TYPE_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/link-type";
const LINK_TYPE_CODES: &[&str] = &["replaced-by", "replaces", "refer", "seealso"];

const DECEASED_TYPES: &[ValueType] = &[ValueType::Boolean, ValueType::DateTime];
const MULTIPLE_BIRTH_TYPES: &[ValueType] = &[ValueType::Boolean, ValueType::Integer];
const GENERAL_PRACTITIONER_TARGETS: &[ResourceType] = &[
    ResourceType::Organization,
    ResourceType::Practitioner,
    ResourceType::PractitionerRole,
];
const MANAGING_ORGANIZATION_TARGETS: &[ResourceType] = &[ResourceType::Organization];
const LINK_OTHER_TARGETS: &[ResourceType] =
    &[ResourceType::Patient, ResourceType::RelatedPerson];

/// A person receiving care.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(flatten)]
    pub(crate) domain: DomainResourceData,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) identifier: Vec<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) active: Option<Boolean>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) gender: Option<Code>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) birth_date: Option<Date>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deceased: Option<DataValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) multiple_birth: Option<DataValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) general_practitioner: Vec<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) managing_organization: Option<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) link: Vec<PatientLink>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Patient {
    pub fn builder() -> PatientBuilder {
        PatientBuilder::default()
    }

    /// A builder seeded from this instance. Substructures are shared (they
    /// are immutable); list containers are fresh.
    pub fn to_builder(&self) -> PatientBuilder {
        PatientBuilder {
            id: self.domain.resource.id.clone(),
            meta: self.domain.resource.meta.clone(),
            implicit_rules: self.domain.resource.implicit_rules.clone(),
            language: self.domain.resource.language.clone(),
            text: self.domain.text.clone(),
            contained: self.domain.contained.clone(),
            extension: self.domain.extension.clone(),
            modifier_extension: self.domain.modifier_extension.clone(),
            identifier: self.identifier.clone(),
            active: self.active.clone(),
            gender: self.gender.clone(),
            birth_date: self.birth_date.clone(),
            deceased: self.deceased.clone(),
            multiple_birth: self.multiple_birth.clone(),
            general_practitioner: self.general_practitioner.clone(),
            managing_organization: self.managing_organization.clone(),
            link: self.link.clone(),
        }
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn active(&self) -> Option<&Boolean> {
        self.active.as_ref()
    }

    pub fn gender(&self) -> Option<&Code> {
        self.gender.as_ref()
    }

    pub fn birth_date(&self) -> Option<&Date> {
        self.birth_date.as_ref()
    }

    /// The `deceased[x]` choice: Boolean or DateTime.
    pub fn deceased(&self) -> Option<&DataValue> {
        self.deceased.as_ref()
    }

    /// The `multipleBirth[x]` choice: Boolean or Integer.
    pub fn multiple_birth(&self) -> Option<&DataValue> {
        self.multiple_birth.as_ref()
    }

    pub fn general_practitioner(&self) -> &[Reference] {
        &self.general_practitioner
    }

    pub fn managing_organization(&self) -> Option<&Reference> {
        self.managing_organization.as_ref()
    }

    pub fn link(&self) -> &[PatientLink] {
        &self.link
    }

    /// Whether any declared field beyond the bare resource data is
    /// populated; narrative generation short-circuits empty structures on
    /// this.
    pub fn has_children(&self) -> bool {
        self.domain.text.is_some()
            || !self.domain.contained.is_empty()
            || !self.domain.extension.is_empty()
            || !self.domain.modifier_extension.is_empty()
            || !self.identifier.is_empty()
            || self.active.is_some()
            || self.gender.is_some()
            || self.birth_date.is_some()
            || self.deceased.is_some()
            || self.multiple_birth.is_some()
            || !self.general_practitioner.is_empty()
            || self.managing_organization.is_some()
            || !self.link.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        support::choice_element(self.deceased.as_ref(), "deceased", DECEASED_TYPES)?;
        support::choice_element(
            self.multiple_birth.as_ref(),
            "multipleBirth",
            MULTIPLE_BIRTH_TYPES,
        )?;
        support::check_value_set_binding(
            self.gender.as_ref(),
            "gender",
            ADMINISTRATIVE_GENDER_VALUE_SET,
            ADMINISTRATIVE_GENDER_CODES,
        )?;
        support::check_reference_type_list(
            &self.general_practitioner,
            "generalPractitioner",
            GENERAL_PRACTITIONER_TARGETS,
            &self.domain.contained,
        )?;
        support::check_reference_type(
            self.managing_organization.as_ref(),
            "managingOrganization",
            MANAGING_ORGANIZATION_TARGETS,
            &self.domain.contained,
        )?;
        Ok(())
    }
}

impl Resource for Patient {
    fn resource(&self) -> &ResourceData {
        &self.domain.resource
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Patient
    }
}

impl DomainResource for Patient {
    fn domain(&self) -> &DomainResourceData {
        &self.domain
    }
}

impl CachedHash for Patient {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Patient {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visit_domain_children(&node.domain, v);
            visitor::visit_all(&node.identifier, "identifier", v);
            visitor::visit(&node.active, "active", v);
            visitor::visit(&node.gender, "gender", v);
            visitor::visit(&node.birth_date, "birthDate", v);
            visitor::visit(&node.deceased, "deceased", v);
            visitor::visit(&node.multiple_birth, "multipleBirth", v);
            visitor::visit_all(&node.general_practitioner, "generalPractitioner", v);
            visitor::visit(&node.managing_organization, "managingOrganization", v);
            visitor::visit_all(&node.link, "link", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Patient"
    }
}

/// Mutable staging builder; short-lived, single-use, not thread-safe.
#[derive(Debug, Clone, Default)]
pub struct PatientBuilder {
    id: Option<String>,
    meta: Option<Meta>,
    implicit_rules: Option<Uri>,
    language: Option<Code>,
    text: Option<Narrative>,
    contained: Vec<AnyResource>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    identifier: Vec<Identifier>,
    active: Option<Boolean>,
    gender: Option<Code>,
    birth_date: Option<Date>,
    deceased: Option<DataValue>,
    multiple_birth: Option<DataValue>,
    general_practitioner: Vec<Reference>,
    managing_organization: Option<Reference>,
    link: Vec<PatientLink>,
}

impl PatientBuilder {
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

    pub fn active(mut self, active: impl Into<Boolean>) -> Self {
        self.active = Some(active.into());
        self
    }

    pub fn gender(mut self, gender: impl Into<Code>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn birth_date(mut self, birth_date: impl Into<Date>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    /// Generic choice setter; membership in {boolean, dateTime} is checked
    /// at build time.
    pub fn deceased(mut self, deceased: DataValue) -> Self {
        self.deceased = Some(deceased);
        self
    }

    /// Typed convenience setter for the boolean arm of `deceased[x]`.
    pub fn deceased_boolean(mut self, deceased: impl Into<Boolean>) -> Self {
        self.deceased = Some(DataValue::Boolean(deceased.into()));
        self
    }

    /// Typed convenience setter for the dateTime arm of `deceased[x]`.
    pub fn deceased_date_time(mut self, deceased: DateTime) -> Self {
        self.deceased = Some(DataValue::DateTime(deceased));
        self
    }

    /// Generic choice setter; membership in {boolean, integer} is checked
    /// at build time.
    pub fn multiple_birth(mut self, multiple_birth: DataValue) -> Self {
        self.multiple_birth = Some(multiple_birth);
        self
    }

    pub fn multiple_birth_boolean(mut self, multiple_birth: impl Into<Boolean>) -> Self {
        self.multiple_birth = Some(DataValue::Boolean(multiple_birth.into()));
        self
    }

    pub fn multiple_birth_integer(mut self, multiple_birth: impl Into<Integer>) -> Self {
        self.multiple_birth = Some(DataValue::Integer(multiple_birth.into()));
        self
    }

    pub fn general_practitioner(mut self, general_practitioner: Reference) -> Self {
        self.general_practitioner.push(general_practitioner);
        self
    }

    pub fn set_general_practitioner(mut self, general_practitioner: Vec<Reference>) -> Self {
        self.general_practitioner = general_practitioner;
        self
    }

    pub fn managing_organization(mut self, managing_organization: Reference) -> Self {
        self.managing_organization = Some(managing_organization);
        self
    }

    pub fn link(mut self, link: PatientLink) -> Self {
        self.link.push(link);
        self
    }

    pub fn set_link(mut self, link: Vec<PatientLink>) -> Self {
        self.link = link;
        self
    }

    /// Freeze and validate.
    pub fn build(self) -> Result<Patient> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    /// Freeze without running validation.
    pub fn build_unchecked(self) -> Patient {
        Patient {
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
            active: self.active,
            gender: self.gender,
            birth_date: self.birth_date,
            deceased: self.deceased,
            multiple_birth: self.multiple_birth,
            general_practitioner: self.general_practitioner,
            managing_organization: self.managing_organization,
            link: self.link,
            memo: HashMemo::default(),
        }
    }
}

/// A link to another patient or related-person record that concerns the
/// same actual person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientLink {
    #[serde(flatten)]
    pub(crate) backbone: BackboneData,

    pub(crate) other: Reference,

    #[serde(rename = "type")]
    pub(crate) link_type: Code,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl PatientLink {
    pub fn builder() -> PatientLinkBuilder {
        PatientLinkBuilder::default()
    }

    pub fn to_builder(&self) -> PatientLinkBuilder {
        PatientLinkBuilder {
            id: self.backbone.element.id.clone(),
            extension: self.backbone.element.extension.clone(),
            modifier_extension: self.backbone.modifier_extension.clone(),
            other: Some(self.other.clone()),
            link_type: Some(self.link_type.clone()),
        }
    }

    pub fn other(&self) -> &Reference {
        &self.other
    }

    pub fn link_type(&self) -> &Code {
        &self.link_type
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::check_reference_type(Some(&self.other), "other", LINK_OTHER_TARGETS, &[])?;
        support::check_value_set_binding(
            Some(&self.link_type),
            "type",
            LINK_TYPE_VALUE_SET,
            LINK_TYPE_CODES,
        )?;
        support::require_value_or_children(self)
    }
}

impl Element for PatientLink {
    fn element(&self) -> &ElementData {
        &self.backbone.element
    }

    fn has_children(&self) -> bool {
        // other and type are required, so a built link always has children
        true
    }
}

impl Backbone for PatientLink {
    fn backbone(&self) -> &BackboneData {
        &self.backbone
    }
}

impl CachedHash for PatientLink {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for PatientLink {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.backbone.element.extension, "extension", v);
            visitor::visit_all(&node.backbone.modifier_extension, "modifierExtension", v);
            node.other.accept("other", None, v);
            node.link_type.accept("type", None, v);
        });
    }

    fn type_name(&self) -> &'static str {
        "PatientLink"
    }
}

/// Mutable staging builder; short-lived and single-use.
#[derive(Debug, Clone, Default)]
pub struct PatientLinkBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
    other: Option<Reference>,
    link_type: Option<Code>,
}

impl PatientLinkBuilder {
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

    pub fn other(mut self, other: Reference) -> Self {
        self.other = Some(other);
        self
    }

    pub fn link_type(mut self, link_type: impl Into<Code>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    /// Freeze and validate.
    pub fn build(self) -> Result<PatientLink> {
        let built = self.build_unchecked()?;
        built.validate()?;
        Ok(built)
    }

    /// Freeze without running validation. Only the structurally required
    /// fields are still demanded by the representation itself.
    pub fn build_unchecked(self) -> Result<PatientLink> {
        let other = support::require_non_null(self.other, "other")?;
        let link_type = support::require_non_null(self.link_type, "type")?;
        Ok(PatientLink {
            backbone: BackboneData::new(self.id, self.extension, self.modifier_extension),
            other,
            link_type,
            memo: HashMemo::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirModelError;

    #[test]
    fn test_minimal_patient() {
        let patient = Patient::builder().id("example").build().unwrap();
        assert_eq!(patient.id(), Some("example"));
        assert!(!patient.has_children());
    }

    #[test]
    fn test_deceased_choice_accepts_declared_types() {
        let patient = Patient::builder().deceased_boolean(false).build().unwrap();
        assert_eq!(
            patient.deceased().map(DataValue::value_type),
            Some(ValueType::Boolean)
        );
    }

    #[test]
    fn test_deceased_choice_rejects_undeclared_type() {
        let err = Patient::builder()
            .deceased(DataValue::from(3))
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidChoiceType { .. }));
    }

    #[test]
    fn test_gender_binding() {
        assert!(Patient::builder().gender("female").build().is_ok());
        let err = Patient::builder().gender("f").build().unwrap_err();
        assert!(matches!(err, FhirModelError::UnboundedCodedValue { .. }));
    }

    #[test]
    fn test_link_requires_other_and_type() {
        let err = PatientLink::builder().link_type("refer").build().unwrap_err();
        assert!(matches!(
            err,
            FhirModelError::MissingRequiredField { element } if element == "other"
        ));
    }

    #[test]
    fn test_link_round_trip() {
        let link = PatientLink::builder()
            .other(Reference::to("Patient/other"))
            .link_type("seealso")
            .build()
            .unwrap();
        let patient = Patient::builder().link(link).build().unwrap();
        assert_eq!(patient.link().len(), 1);
        assert_eq!(patient.to_builder().build().unwrap(), patient);
    }

    #[test]
    fn test_invalid_resource_id_rejected() {
        let err = Patient::builder().id("white space").build().unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidPrimitiveValue { .. }));
    }
}
