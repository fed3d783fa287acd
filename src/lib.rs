//! # OctoFHIR FHIR Model
//!
//! An immutable object model core for FHIR-style resources: every instance
//! is constructed through a validating builder, frozen on `build()`, and
//! traversed by generic consumers through a double-dispatch visitor.
//!
//! ## Features
//!
//! - **Validating builders**: incremental field assignment, list
//!   accumulation vs. replacement, seeded copies via `to_builder()`, and a
//!   fail-fast `build()` that freezes the instance
//! - **Choice types**: closed sum-type fields with typed convenience
//!   setters and a construction-time membership check
//! - **Typed references**: declared target-type sets validated against
//!   literal values, explicit types and contained resources
//! - **Visitor protocol**: five traversal hooks with subtree and child
//!   vetoes, in fixed schema declaration order
//!
//! ## Quick Start
//!
//! ```rust
//! use octofhir_fhirmodel::*;
//!
//! # fn example() -> Result<()> {
//! let patient = Patient::builder()
//!     .id("example")
//!     .active(true)
//!     .gender("female")
//!     .deceased_boolean(false)
//!     .build()?;
//!
//! // Modify a copy without touching the original.
//! let inactive = patient.to_builder().active(false).build()?;
//! assert_ne!(inactive, patient);
//! assert_eq!(patient.to_builder().build()?, patient);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Completed instances are deeply immutable and safe to share across
//! threads; builders are short-lived, stack-local staging objects and are
//! not thread-safe.

pub mod element;
pub mod error;
pub mod resource;
pub mod types;
pub mod validation;
pub mod visitor;

pub use element::{Backbone, BackboneData, CachedHash, Element, ElementData, HashMemo};
pub use error::{FhirModelError, Result};
pub use resource::{
    ADMINISTRATIVE_GENDER_VALUE_SET, AnyResource, DomainResource, DomainResourceData,
    LINK_TYPE_VALUE_SET, OBSERVATION_STATUS_VALUE_SET, Observation, ObservationBuilder,
    ObservationComponent, ObservationComponentBuilder, Patient, PatientBuilder, PatientLink,
    PatientLinkBuilder, Resource, ResourceData, ResourceType,
};
pub use types::*;
pub use validation::{BindingStrength, TerminologyProvider, check_coding_binding};
pub use visitor::{CollectingVisitor, Visitable, Visitor};
