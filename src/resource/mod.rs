//! Resources: top-level, independently identifiable records.

mod observation;
mod patient;

pub use observation::{
    OBSERVATION_STATUS_VALUE_SET, Observation, ObservationBuilder, ObservationComponent,
    ObservationComponentBuilder,
};
pub use patient::{
    ADMINISTRATIVE_GENDER_VALUE_SET, LINK_TYPE_VALUE_SET, Patient, PatientBuilder, PatientLink,
    PatientLinkBuilder,
};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Code, Extension, Meta, Narrative, Uri};
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

/// Common data carried by every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<Meta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) implicit_rules: Option<Uri>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) language: Option<Code>,
}

impl ResourceData {
    pub(crate) fn validate(&self) -> Result<()> {
        support::check_id(self.id.as_deref())
    }
}

/// [`ResourceData`] plus narrative, contained resources and extensions.
///
/// A contained resource exists only inside its parent: it has no
/// independent identity and no meaning if extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResourceData {
    #[serde(flatten)]
    pub(crate) resource: ResourceData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) contained: Vec<AnyResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) modifier_extension: Vec<Extension>,
}

impl DomainResourceData {
    pub(crate) fn validate(&self) -> Result<()> {
        self.resource.validate()
    }
}

/// Capability trait for top-level records.
pub trait Resource: Visitable {
    fn resource(&self) -> &ResourceData;

    fn resource_type(&self) -> ResourceType;

    fn id(&self) -> Option<&str> {
        self.resource().id.as_deref()
    }

    fn meta(&self) -> Option<&Meta> {
        self.resource().meta.as_ref()
    }

    fn implicit_rules(&self) -> Option<&Uri> {
        self.resource().implicit_rules.as_ref()
    }

    fn language(&self) -> Option<&Code> {
        self.resource().language.as_ref()
    }
}

/// Capability trait for resources that carry narrative, contained
/// resources and extensions.
pub trait DomainResource: Resource {
    fn domain(&self) -> &DomainResourceData;

    fn text(&self) -> Option<&Narrative> {
        self.domain().text.as_ref()
    }

    fn contained(&self) -> &[AnyResource] {
        &self.domain().contained
    }

    fn extension(&self) -> &[Extension] {
        &self.domain().extension
    }

    fn modifier_extension(&self) -> &[Extension] {
        &self.domain().modifier_extension
    }
}

/// Visit the shared domain-resource children in declaration order; called
/// by each resource's `accept` before its own fields.
pub(crate) fn visit_domain_children<'m>(domain: &'m DomainResourceData, v: &mut dyn Visitor<'m>) {
    visitor::visit(&domain.resource.meta, "meta", v);
    visitor::visit(&domain.resource.implicit_rules, "implicitRules", v);
    visitor::visit(&domain.resource.language, "language", v);
    visitor::visit(&domain.text, "text", v);
    visitor::visit_all(&domain.contained, "contained", v);
    visitor::visit_all(&domain.extension, "extension", v);
    visitor::visit_all(&domain.modifier_extension, "modifierExtension", v);
}

/// The closed vocabulary of known resource type names.
///
/// Wider than the concrete types this crate ships: it is the vocabulary
/// reference target sets are declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    AllergyIntolerance,
    Basic,
    Bundle,
    CarePlan,
    CareTeam,
    Condition,
    Device,
    DiagnosticReport,
    Encounter,
    Group,
    Immunization,
    Location,
    Medication,
    MedicationRequest,
    Observation,
    Organization,
    Patient,
    Practitioner,
    PractitionerRole,
    Procedure,
    RelatedPerson,
    ServiceRequest,
    Specimen,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::AllergyIntolerance => "AllergyIntolerance",
            ResourceType::Basic => "Basic",
            ResourceType::Bundle => "Bundle",
            ResourceType::CarePlan => "CarePlan",
            ResourceType::CareTeam => "CareTeam",
            ResourceType::Condition => "Condition",
            ResourceType::Device => "Device",
            ResourceType::DiagnosticReport => "DiagnosticReport",
            ResourceType::Encounter => "Encounter",
            ResourceType::Group => "Group",
            ResourceType::Immunization => "Immunization",
            ResourceType::Location => "Location",
            ResourceType::Medication => "Medication",
            ResourceType::MedicationRequest => "MedicationRequest",
            ResourceType::Observation => "Observation",
            ResourceType::Organization => "Organization",
            ResourceType::Patient => "Patient",
            ResourceType::Practitioner => "Practitioner",
            ResourceType::PractitionerRole => "PractitionerRole",
            ResourceType::Procedure => "Procedure",
            ResourceType::RelatedPerson => "RelatedPerson",
            ResourceType::ServiceRequest => "ServiceRequest",
            ResourceType::Specimen => "Specimen",
        }
    }

    /// Look up a type by its schema name; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "AllergyIntolerance" => ResourceType::AllergyIntolerance,
            "Basic" => ResourceType::Basic,
            "Bundle" => ResourceType::Bundle,
            "CarePlan" => ResourceType::CarePlan,
            "CareTeam" => ResourceType::CareTeam,
            "Condition" => ResourceType::Condition,
            "Device" => ResourceType::Device,
            "DiagnosticReport" => ResourceType::DiagnosticReport,
            "Encounter" => ResourceType::Encounter,
            "Group" => ResourceType::Group,
            "Immunization" => ResourceType::Immunization,
            "Location" => ResourceType::Location,
            "Medication" => ResourceType::Medication,
            "MedicationRequest" => ResourceType::MedicationRequest,
            "Observation" => ResourceType::Observation,
            "Organization" => ResourceType::Organization,
            "Patient" => ResourceType::Patient,
            "Practitioner" => ResourceType::Practitioner,
            "PractitionerRole" => ResourceType::PractitionerRole,
            "Procedure" => ResourceType::Procedure,
            "RelatedPerson" => ResourceType::RelatedPerson,
            "ServiceRequest" => ResourceType::ServiceRequest,
            "Specimen" => ResourceType::Specimen,
            _ => return None,
        })
    }

    /// Whether a name belongs to the known vocabulary.
    pub fn is_resource_type(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = crate::error::FhirModelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            crate::error::FhirModelError::invalid_primitive_value(
                "ResourceType",
                format!("'{s}' is not a known resource type name"),
            )
        })
    }
}

/// Closed union over the concrete resources this crate ships; backs
/// contained lists and reference resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum AnyResource {
    Patient(Patient),
    Observation(Observation),
}

impl AnyResource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            AnyResource::Patient(_) => ResourceType::Patient,
            AnyResource::Observation(_) => ResourceType::Observation,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            AnyResource::Patient(patient) => patient.id(),
            AnyResource::Observation(observation) => observation.id(),
        }
    }

    pub fn as_patient(&self) -> Option<&Patient> {
        match self {
            AnyResource::Patient(patient) => Some(patient),
            _ => None,
        }
    }

    pub fn as_observation(&self) -> Option<&Observation> {
        match self {
            AnyResource::Observation(observation) => Some(observation),
            _ => None,
        }
    }
}

impl Visitable for AnyResource {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        match self {
            AnyResource::Patient(patient) => patient.accept(element_name, element_index, visitor),
            AnyResource::Observation(observation) => {
                observation.accept(element_name, element_index, visitor)
            }
        }
    }

    fn type_name(&self) -> &'static str {
        self.resource_type().as_str()
    }
}

impl From<Patient> for AnyResource {
    fn from(patient: Patient) -> Self {
        AnyResource::Patient(patient)
    }
}

impl From<Observation> for AnyResource {
    fn from(observation: Observation) -> Self {
        AnyResource::Observation(observation)
    }
}
