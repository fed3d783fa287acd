//! The closed sum type behind every choice field.
//!
//! A choice field stores at most one [`DataValue`] and declares the subset
//! of [`ValueType`] members it accepts; construction rejects anything
//! outside that subset. The enum being closed means a generic consumer can
//! match exhaustively and the compiler keeps it honest when the set grows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    Boolean, Code, CodeableConcept, Coding, Date, DateTime, Decimal, FhirString, Identifier,
    Instant, Integer, Period, Quantity, Reference, Uri,
};
use crate::visitor::{Visitable, Visitor};

/// One concrete value inside a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataValue {
    Boolean(Boolean),
    Integer(Integer),
    Decimal(Decimal),
    String(FhirString),
    Uri(Uri),
    Code(Code),
    Date(Date),
    DateTime(DateTime),
    Instant(Instant),
    Coding(Coding),
    CodeableConcept(CodeableConcept),
    Quantity(Quantity),
    Period(Period),
    Identifier(Identifier),
    Reference(Reference),
}

/// Type tag for [`DataValue`]; the vocabulary choice fields declare their
/// allowed sets in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Integer,
    Decimal,
    String,
    Uri,
    Code,
    Date,
    DateTime,
    Instant,
    Coding,
    CodeableConcept,
    Quantity,
    Period,
    Identifier,
    Reference,
}

impl ValueType {
    /// Schema type name; primitives use their lower-case form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::String => "string",
            ValueType::Uri => "uri",
            ValueType::Code => "code",
            ValueType::Date => "date",
            ValueType::DateTime => "dateTime",
            ValueType::Instant => "instant",
            ValueType::Coding => "Coding",
            ValueType::CodeableConcept => "CodeableConcept",
            ValueType::Quantity => "Quantity",
            ValueType::Period => "Period",
            ValueType::Identifier => "Identifier",
            ValueType::Reference => "Reference",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DataValue {
    /// The tag of the concrete type held.
    pub fn value_type(&self) -> ValueType {
        match self {
            DataValue::Boolean(_) => ValueType::Boolean,
            DataValue::Integer(_) => ValueType::Integer,
            DataValue::Decimal(_) => ValueType::Decimal,
            DataValue::String(_) => ValueType::String,
            DataValue::Uri(_) => ValueType::Uri,
            DataValue::Code(_) => ValueType::Code,
            DataValue::Date(_) => ValueType::Date,
            DataValue::DateTime(_) => ValueType::DateTime,
            DataValue::Instant(_) => ValueType::Instant,
            DataValue::Coding(_) => ValueType::Coding,
            DataValue::CodeableConcept(_) => ValueType::CodeableConcept,
            DataValue::Quantity(_) => ValueType::Quantity,
            DataValue::Period(_) => ValueType::Period,
            DataValue::Identifier(_) => ValueType::Identifier,
            DataValue::Reference(_) => ValueType::Reference,
        }
    }

    pub fn as_boolean(&self) -> Option<&Boolean> {
        match self {
            DataValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            DataValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            DataValue::Decimal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&FhirString> {
        match self {
            DataValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&Date> {
        match self {
            DataValue::Date(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime> {
        match self {
            DataValue::DateTime(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            DataValue::Quantity(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_codeable_concept(&self) -> Option<&CodeableConcept> {
        match self {
            DataValue::CodeableConcept(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            DataValue::Reference(value) => Some(value),
            _ => None,
        }
    }

    fn as_visitable(&self) -> &dyn Visitable {
        match self {
            DataValue::Boolean(value) => value,
            DataValue::Integer(value) => value,
            DataValue::Decimal(value) => value,
            DataValue::String(value) => value,
            DataValue::Uri(value) => value,
            DataValue::Code(value) => value,
            DataValue::Date(value) => value,
            DataValue::DateTime(value) => value,
            DataValue::Instant(value) => value,
            DataValue::Coding(value) => value,
            DataValue::CodeableConcept(value) => value,
            DataValue::Quantity(value) => value,
            DataValue::Period(value) => value,
            DataValue::Identifier(value) => value,
            DataValue::Reference(value) => value,
        }
    }
}

impl Visitable for DataValue {
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    ) {
        self.as_visitable().accept(element_name, element_index, visitor);
    }

    fn type_name(&self) -> &'static str {
        self.value_type().as_str()
    }
}

macro_rules! data_value_from {
    ($($variant:ident <- $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DataValue {
                fn from(value: $ty) -> Self {
                    DataValue::$variant(value)
                }
            }
        )*
    };
}

data_value_from!(
    Boolean <- Boolean,
    Integer <- Integer,
    Decimal <- Decimal,
    String <- FhirString,
    Uri <- Uri,
    Code <- Code,
    Date <- Date,
    DateTime <- DateTime,
    Instant <- Instant,
    Coding <- Coding,
    CodeableConcept <- CodeableConcept,
    Quantity <- Quantity,
    Period <- Period,
    Identifier <- Identifier,
    Reference <- Reference,
);

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(Boolean::of(value))
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Integer(Integer::of(value))
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(FhirString::of(value))
    }
}

impl From<rust_decimal::Decimal> for DataValue {
    fn from(value: rust_decimal::Decimal) -> Self {
        DataValue::Decimal(Decimal::of(value))
    }
}

impl From<NaiveDate> for DataValue {
    fn from(value: NaiveDate) -> Self {
        DataValue::Date(Date::of(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_conversions_pick_the_matching_variant() {
        assert_eq!(DataValue::from(true).value_type(), ValueType::Boolean);
        assert_eq!(DataValue::from(7).value_type(), ValueType::Integer);
        assert_eq!(DataValue::from("text").value_type(), ValueType::String);
    }

    #[test]
    fn test_typed_accessors() {
        let value = DataValue::from(true);
        assert_eq!(value.as_boolean().and_then(Boolean::value), Some(true));
        assert!(value.as_integer().is_none());
    }

    #[test]
    fn test_type_names_match_schema_casing() {
        assert_eq!(ValueType::DateTime.as_str(), "dateTime");
        assert_eq!(ValueType::CodeableConcept.as_str(), "CodeableConcept");
    }
}
