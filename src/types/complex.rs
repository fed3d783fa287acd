//! General-purpose complex datatypes.
//!
//! Complex types never carry a primitive value of their own; `ele-1`
//! (value-or-children) is satisfied by any populated field or extension.

use serde::{Deserialize, Serialize};

use crate::element::{CachedHash, Element, ElementData, HashMemo};
use crate::error::Result;
use crate::types::{Boolean, Code, DateTime, Decimal, Extension, FhirString, Instant, Uri};
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

/// Value set for [`Narrative::status`]; bound at required strength.
pub const NARRATIVE_STATUS_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/narrative-status";
pub(crate) const NARRATIVE_STATUS_CODES: &[&str] = &["generated", "extensions", "additional", "empty"];

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system: Option<Uri>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<FhirString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<Code>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) display: Option<FhirString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user_selected: Option<Boolean>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Coding {
    pub fn builder() -> CodingBuilder {
        CodingBuilder::default()
    }

    pub fn to_builder(&self) -> CodingBuilder {
        CodingBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            system: self.system.clone(),
            version: self.version.clone(),
            code: self.code.clone(),
            display: self.display.clone(),
            user_selected: self.user_selected.clone(),
        }
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    pub fn user_selected(&self) -> Option<&Boolean> {
        self.user_selected.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for Coding {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty()
            || self.system.is_some()
            || self.version.is_some()
            || self.code.is_some()
            || self.display.is_some()
            || self.user_selected.is_some()
    }
}

impl CachedHash for Coding {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Coding {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.system, "system", v);
            visitor::visit(&node.version, "version", v);
            visitor::visit(&node.code, "code", v);
            visitor::visit(&node.display, "display", v);
            visitor::visit(&node.user_selected, "userSelected", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Coding"
    }
}

/// Mutable staging builder; short-lived and single-use.
#[derive(Debug, Clone, Default)]
pub struct CodingBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<Boolean>,
}

impl CodingBuilder {
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

    pub fn system(mut self, system: impl Into<Uri>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn version(mut self, version: impl Into<FhirString>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn user_selected(mut self, user_selected: impl Into<Boolean>) -> Self {
        self.user_selected = Some(user_selected.into());
        self
    }

    pub fn build(self) -> Result<Coding> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Coding {
        Coding {
            data: ElementData::new(self.id, self.extension),
            system: self.system,
            version: self.version,
            code: self.code,
            display: self.display,
            user_selected: self.user_selected,
            memo: HashMemo::default(),
        }
    }
}

/// A concept, expressed as one or more codings and/or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) coding: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<FhirString>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl CodeableConcept {
    pub fn builder() -> CodeableConceptBuilder {
        CodeableConceptBuilder::default()
    }

    pub fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConceptBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            coding: self.coding.clone(),
            text: self.text.clone(),
        }
    }

    pub fn coding(&self) -> &[Coding] {
        &self.coding
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for CodeableConcept {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty() || !self.coding.is_empty() || self.text.is_some()
    }
}

impl CachedHash for CodeableConcept {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for CodeableConcept {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit_all(&node.coding, "coding", v);
            visitor::visit(&node.text, "text", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "CodeableConcept"
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeableConceptBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    coding: Vec<Coding>,
    text: Option<FhirString>,
}

impl CodeableConceptBuilder {
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

    /// Append one coding, preserving prior content.
    pub fn coding(mut self, coding: Coding) -> Self {
        self.coding.push(coding);
        self
    }

    /// Replace the coding list wholesale.
    pub fn set_coding(mut self, coding: Vec<Coding>) -> Self {
        self.coding = coding;
        self
    }

    pub fn text(mut self, text: impl Into<FhirString>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn build(self) -> Result<CodeableConcept> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> CodeableConcept {
        CodeableConcept {
            data: ElementData::new(self.id, self.extension),
            coding: self.coding,
            text: self.text,
            memo: HashMemo::default(),
        }
    }
}

/// A measured amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) unit: Option<FhirString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system: Option<Uri>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<Code>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Quantity {
    pub fn builder() -> QuantityBuilder {
        QuantityBuilder::default()
    }

    pub fn to_builder(&self) -> QuantityBuilder {
        QuantityBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            value: self.value.clone(),
            unit: self.unit.clone(),
            system: self.system.clone(),
            code: self.code.clone(),
        }
    }

    pub fn value(&self) -> Option<&Decimal> {
        self.value.as_ref()
    }

    pub fn unit(&self) -> Option<&FhirString> {
        self.unit.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for Quantity {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty()
            || self.value.is_some()
            || self.unit.is_some()
            || self.system.is_some()
            || self.code.is_some()
    }
}

impl CachedHash for Quantity {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Quantity {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.value, "value", v);
            visitor::visit(&node.unit, "unit", v);
            visitor::visit(&node.system, "system", v);
            visitor::visit(&node.code, "code", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Quantity"
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuantityBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    value: Option<Decimal>,
    unit: Option<FhirString>,
    system: Option<Uri>,
    code: Option<Code>,
}

impl QuantityBuilder {
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

    pub fn value(mut self, value: impl Into<Decimal>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<FhirString>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn system(mut self, system: impl Into<Uri>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn build(self) -> Result<Quantity> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Quantity {
        Quantity {
            data: ElementData::new(self.id, self.extension),
            value: self.value,
            unit: self.unit,
            system: self.system,
            code: self.code,
            memo: HashMemo::default(),
        }
    }
}

/// A time range bounded by two date-times; either bound may be open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) start: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end: Option<DateTime>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Period {
    pub fn builder() -> PeriodBuilder {
        PeriodBuilder::default()
    }

    pub fn to_builder(&self) -> PeriodBuilder {
        PeriodBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }

    pub fn start(&self) -> Option<&DateTime> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateTime> {
        self.end.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for Period {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty() || self.start.is_some() || self.end.is_some()
    }
}

impl CachedHash for Period {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Period {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.start, "start", v);
            visitor::visit(&node.end, "end", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Period"
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    start: Option<DateTime>,
    end: Option<DateTime>,
}

impl PeriodBuilder {
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

    pub fn start(mut self, start: DateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> Result<Period> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Period {
        Period {
            data: ElementData::new(self.id, self.extension),
            start: self.start,
            end: self.end,
            memo: HashMemo::default(),
        }
    }
}

/// A business identifier: a (system, value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system: Option<Uri>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<FhirString>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Identifier {
    pub fn builder() -> IdentifierBuilder {
        IdentifierBuilder::default()
    }

    pub fn to_builder(&self) -> IdentifierBuilder {
        IdentifierBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            system: self.system.clone(),
            value: self.value.clone(),
        }
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for Identifier {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty() || self.system.is_some() || self.value.is_some()
    }
}

impl CachedHash for Identifier {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Identifier {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.system, "system", v);
            visitor::visit(&node.value, "value", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Identifier"
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    system: Option<Uri>,
    value: Option<FhirString>,
}

impl IdentifierBuilder {
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

    pub fn system(mut self, system: impl Into<Uri>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn value(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn build(self) -> Result<Identifier> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Identifier {
        Identifier {
            data: ElementData::new(self.id, self.extension),
            system: self.system,
            value: self.value,
            memo: HashMemo::default(),
        }
    }
}

/// Human-readable narrative for a domain resource.
///
/// The div is a minimal `<div>…</div>` fragment; full XHTML schema
/// validation belongs to an encoding layer, not the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    pub(crate) status: Code,

    pub(crate) div: String,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Narrative {
    pub fn builder() -> NarrativeBuilder {
        NarrativeBuilder::default()
    }

    pub fn to_builder(&self) -> NarrativeBuilder {
        NarrativeBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            status: Some(self.status.clone()),
            div: Some(self.div.clone()),
        }
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn div(&self) -> &str {
        &self.div
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::check_value_set_binding(
            Some(&self.status),
            "status",
            NARRATIVE_STATUS_VALUE_SET,
            NARRATIVE_STATUS_CODES,
        )?;
        support::check_xhtml(&self.div)?;
        support::require_value_or_children(self)
    }
}

impl Element for Narrative {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        // status and div are required, so a built narrative always has them
        true
    }
}

impl CachedHash for Narrative {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Narrative {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            node.status.accept("status", None, v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Narrative"
    }
}

#[derive(Debug, Clone, Default)]
pub struct NarrativeBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    status: Option<Code>,
    div: Option<String>,
}

impl NarrativeBuilder {
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

    pub fn status(mut self, status: impl Into<Code>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn div(mut self, div: impl Into<String>) -> Self {
        self.div = Some(div.into());
        self
    }

    pub fn build(self) -> Result<Narrative> {
        let built = self.build_unchecked()?;
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Result<Narrative> {
        let status = support::require_non_null(self.status, "status")?;
        let div = support::require_non_null(self.div, "div")?;
        Ok(Narrative {
            data: ElementData::new(self.id, self.extension),
            status,
            div,
            memo: HashMemo::default(),
        })
    }
}

/// Metadata about a resource: version, last change, profiles, tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(flatten)]
    pub(crate) data: ElementData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version_id: Option<FhirString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_updated: Option<Instant>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) profile: Vec<Uri>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) tag: Vec<Coding>,

    #[serde(skip)]
    pub(crate) memo: HashMemo,
}

impl Meta {
    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn to_builder(&self) -> MetaBuilder {
        MetaBuilder {
            id: self.data.id.clone(),
            extension: self.data.extension.clone(),
            version_id: self.version_id.clone(),
            last_updated: self.last_updated.clone(),
            profile: self.profile.clone(),
            tag: self.tag.clone(),
        }
    }

    pub fn version_id(&self) -> Option<&FhirString> {
        self.version_id.as_ref()
    }

    pub fn last_updated(&self) -> Option<&Instant> {
        self.last_updated.as_ref()
    }

    pub fn profile(&self) -> &[Uri] {
        &self.profile
    }

    pub fn tag(&self) -> &[Coding] {
        &self.tag
    }

    pub(crate) fn validate(&self) -> Result<()> {
        support::require_value_or_children(self)
    }
}

impl Element for Meta {
    fn element(&self) -> &ElementData {
        &self.data
    }

    fn has_children(&self) -> bool {
        !self.data.extension.is_empty()
            || self.version_id.is_some()
            || self.last_updated.is_some()
            || !self.profile.is_empty()
            || !self.tag.is_empty()
    }
}

impl CachedHash for Meta {
    fn hash_cache(&self) -> &HashMemo {
        &self.memo
    }
}

impl Visitable for Meta {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
            visitor::visit_all(&node.data.extension, "extension", v);
            visitor::visit(&node.version_id, "versionId", v);
            visitor::visit(&node.last_updated, "lastUpdated", v);
            visitor::visit_all(&node.profile, "profile", v);
            visitor::visit_all(&node.tag, "tag", v);
        });
    }

    fn type_name(&self) -> &'static str {
        "Meta"
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    id: Option<String>,
    extension: Vec<Extension>,
    version_id: Option<FhirString>,
    last_updated: Option<Instant>,
    profile: Vec<Uri>,
    tag: Vec<Coding>,
}

impl MetaBuilder {
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

    pub fn version_id(mut self, version_id: impl Into<FhirString>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    pub fn last_updated(mut self, last_updated: Instant) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    pub fn profile(mut self, profile: impl Into<Uri>) -> Self {
        self.profile.push(profile.into());
        self
    }

    pub fn set_profile(mut self, profile: Vec<Uri>) -> Self {
        self.profile = profile;
        self
    }

    pub fn tag(mut self, tag: Coding) -> Self {
        self.tag.push(tag);
        self
    }

    pub fn set_tag(mut self, tag: Vec<Coding>) -> Self {
        self.tag = tag;
        self
    }

    pub fn build(self) -> Result<Meta> {
        let built = self.build_unchecked();
        built.validate()?;
        Ok(built)
    }

    pub fn build_unchecked(self) -> Meta {
        Meta {
            data: ElementData::new(self.id, self.extension),
            version_id: self.version_id,
            last_updated: self.last_updated,
            profile: self.profile,
            tag: self.tag,
            memo: HashMemo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirModelError;

    #[test]
    fn test_empty_coding_is_vacuous() {
        let err = Coding::builder().build().unwrap_err();
        assert!(matches!(err, FhirModelError::VacuousElement));
    }

    #[test]
    fn test_coding_round_trip() {
        let coding = Coding::builder()
            .system("http://loinc.org")
            .code("8867-4")
            .display("Heart rate")
            .build()
            .unwrap();
        assert_eq!(coding.to_builder().build().unwrap(), coding);
    }

    #[test]
    fn test_narrative_requires_bound_status() {
        let err = Narrative::builder()
            .status("freestyle")
            .div("<div>ok</div>")
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::UnboundedCodedValue { .. }));
    }

    #[test]
    fn test_narrative_div_must_be_div_fragment() {
        let err = Narrative::builder()
            .status("generated")
            .div("<p>not wrapped</p>")
            .build()
            .unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidPrimitiveValue { .. }));
    }

    #[test]
    fn test_codeable_concept_accumulates_codings() {
        let concept = CodeableConcept::builder()
            .coding(Coding::builder().system("http://loinc.org").code("8867-4").build().unwrap())
            .coding(Coding::builder().system("http://snomed.info/sct").code("364075005").build().unwrap())
            .text("Heart rate")
            .build()
            .unwrap();
        assert_eq!(concept.coding().len(), 2);
    }
}
