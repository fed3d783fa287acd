//! Error types and result handling for model construction.
//!
//! Every error here is a construction-time failure raised from a builder's
//! `build()`. The model performs no I/O, so there is no transient-failure
//! concept: the first violated invariant aborts construction and no instance
//! exists afterwards.

use thiserror::Error;

/// Result type for model construction and validation.
pub type Result<T> = std::result::Result<T, FhirModelError>;

/// Construction-time failures raised while freezing a model instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FhirModelError {
    /// A required singular element is absent
    #[error("Missing required element: '{element}'")]
    MissingRequiredField { element: String },

    /// A required choice element is absent
    #[error("Missing required choice element: '{element}'")]
    MissingRequiredChoice { element: String },

    /// A choice element holds a type outside its declared closed set
    #[error("Invalid type: {actual} for choice element: '{element}' must be one of: [{allowed}]")]
    InvalidChoiceType {
        element: String,
        actual: String,
        allowed: String,
    },

    /// A required repeating element has no entries
    #[error("Missing required element: '{element}'")]
    EmptyRequiredList { element: String },

    /// A reference resolved to a resource type outside its declared target set
    #[error("Resource type: '{actual}' for reference element: '{element}' must be one of: [{allowed}]")]
    InvalidReferenceTarget {
        element: String,
        actual: String,
        allowed: String,
    },

    /// A relative reference value that names no known resource type
    #[error("Invalid reference value: '{value}' for element: '{element}': resource type not found or not a known resource type name")]
    MalformedReference { element: String, value: String },

    /// A coded value is not a member of its required-strength value set
    #[error("Code value: '{code}' for element: '{element}' is not a member of value set: {value_set}")]
    UnboundedCodedValue {
        element: String,
        code: String,
        value_set: String,
    },

    /// An element with no value, no children and no extensions carries nothing
    #[error("ele-1: All FHIR elements must have a @value or children")]
    VacuousElement,

    /// A populated element that the type prohibits
    #[error("Element: '{element}' is prohibited")]
    ProhibitedElement { element: String },

    /// A primitive value that violates its lexical rules
    #[error("Invalid {type_name} value: {message}")]
    InvalidPrimitiveValue { type_name: String, message: String },
}

impl FhirModelError {
    /// Create a missing required field error
    pub fn missing_required_field(element: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            element: element.into(),
        }
    }

    /// Create a missing required choice error
    pub fn missing_required_choice(element: impl Into<String>) -> Self {
        Self::MissingRequiredChoice {
            element: element.into(),
        }
    }

    /// Create an invalid choice type error
    pub fn invalid_choice_type(
        element: impl Into<String>,
        actual: impl Into<String>,
        allowed: impl Into<String>,
    ) -> Self {
        Self::InvalidChoiceType {
            element: element.into(),
            actual: actual.into(),
            allowed: allowed.into(),
        }
    }

    /// Create an empty required list error
    pub fn empty_required_list(element: impl Into<String>) -> Self {
        Self::EmptyRequiredList {
            element: element.into(),
        }
    }

    /// Create an invalid reference target error
    pub fn invalid_reference_target(
        element: impl Into<String>,
        actual: impl Into<String>,
        allowed: impl Into<String>,
    ) -> Self {
        Self::InvalidReferenceTarget {
            element: element.into(),
            actual: actual.into(),
            allowed: allowed.into(),
        }
    }

    /// Create a malformed reference error
    pub fn malformed_reference(element: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedReference {
            element: element.into(),
            value: value.into(),
        }
    }

    /// Create an unbounded coded value error
    pub fn unbounded_coded_value(
        element: impl Into<String>,
        code: impl Into<String>,
        value_set: impl Into<String>,
    ) -> Self {
        Self::UnboundedCodedValue {
            element: element.into(),
            code: code.into(),
            value_set: value_set.into(),
        }
    }

    /// Create a prohibited element error
    pub fn prohibited_element(element: impl Into<String>) -> Self {
        Self::ProhibitedElement {
            element: element.into(),
        }
    }

    /// Create an invalid primitive value error
    pub fn invalid_primitive_value(
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidPrimitiveValue {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}
