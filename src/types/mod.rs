//! Datatypes: primitives, general-purpose complex types, extensions,
//! references and the choice-type carrier.

mod complex;
mod date_time;
mod extension;
mod primitive;
mod reference;
mod value;

pub use complex::{
    CodeableConcept, CodeableConceptBuilder, Coding, CodingBuilder, Identifier,
    IdentifierBuilder, Meta, MetaBuilder, NARRATIVE_STATUS_VALUE_SET, Narrative, NarrativeBuilder,
    Period, PeriodBuilder, Quantity, QuantityBuilder,
};
pub use date_time::{
    Date, DateBuilder, DateTime, DateTimeBuilder, Instant, InstantBuilder,
};
pub use extension::{EXTENSION_VALUE_TYPES, Extension, ExtensionBuilder};
pub use primitive::{
    Boolean, BooleanBuilder, Code, CodeBuilder, Decimal, DecimalBuilder, FhirString,
    FhirStringBuilder, Integer, IntegerBuilder, Uri, UriBuilder,
};
pub use reference::{Reference, ReferenceBuilder};
pub use value::{DataValue, ValueType};
