//! Primitive datatypes: a single value plus the common element data.
//!
//! Every primitive keeps its value optional — an element may carry only an
//! id or extensions (for instance when the value is absent for a recorded
//! reason). Lexical rules for string-shaped values run inside `build()`.

use rust_decimal::Decimal as DecimalValue;
use serde::{Deserialize, Serialize};

use crate::element::{CachedHash, Element, ElementData, HashMemo};
use crate::error::Result;
use crate::types::Extension;
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

macro_rules! primitive_element {
    (
        $(#[$doc:meta])*
        $name:ident, $builder:ident, $value_ty:ty, $type_name:literal,
        validate: $validate:expr
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            pub(crate) data: ElementData,

            #[serde(skip_serializing_if = "Option::is_none")]
            pub(crate) value: Option<$value_ty>,

            #[serde(skip)]
            pub(crate) memo: HashMemo,
        }

        impl $name {
            /// Wrap a bare value with no id and no extensions. Lexical rules
            /// run when an instance is built through the builder.
            pub fn of(value: impl Into<$value_ty>) -> Self {
                Self {
                    data: ElementData::default(),
                    value: Some(value.into()),
                    memo: HashMemo::default(),
                }
            }

            pub fn builder() -> $builder {
                $builder::default()
            }

            /// A builder seeded from this instance. Substructures are shared
            /// (they are immutable); list containers are fresh.
            pub fn to_builder(&self) -> $builder {
                $builder {
                    id: self.data.id.clone(),
                    extension: self.data.extension.clone(),
                    value: self.value.clone(),
                }
            }

            pub(crate) fn validate(&self) -> Result<()> {
                let validate: fn(&$name) -> Result<()> = $validate;
                validate(self)?;
                support::require_value_or_children(self)
            }
        }

        impl Element for $name {
            fn element(&self) -> &ElementData {
                &self.data
            }

            fn has_value(&self) -> bool {
                self.value.is_some()
            }
        }

        impl CachedHash for $name {
            fn hash_cache(&self) -> &HashMemo {
                &self.memo
            }
        }

        impl Visitable for $name {
            fn accept<'m>(
                &'m self,
                element_name: &str,
                element_index: Option<usize>,
                visitor: &mut dyn Visitor<'m>,
            ) {
                visitor::accept_node(self, element_name, element_index, visitor, |node, v| {
                    visitor::visit_all(&node.data.extension, "extension", v);
                });
            }

            fn type_name(&self) -> &'static str {
                $type_name
            }
        }

        /// Mutable staging builder; short-lived and single-use.
        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            id: Option<String>,
            extension: Vec<Extension>,
            value: Option<$value_ty>,
        }

        impl $builder {
            pub fn id(mut self, id: impl Into<String>) -> Self {
                self.id = Some(id.into());
                self
            }

            /// Append one extension, preserving prior content.
            pub fn extension(mut self, extension: Extension) -> Self {
                self.extension.push(extension);
                self
            }

            /// Replace the extension list wholesale.
            pub fn set_extension(mut self, extension: Vec<Extension>) -> Self {
                self.extension = extension;
                self
            }

            pub fn value(mut self, value: impl Into<$value_ty>) -> Self {
                self.value = Some(value.into());
                self
            }

            /// Freeze and validate.
            pub fn build(self) -> Result<$name> {
                let built = self.build_unchecked();
                built.validate()?;
                Ok(built)
            }

            /// Freeze without running validation.
            pub fn build_unchecked(self) -> $name {
                $name {
                    data: ElementData::new(self.id, self.extension),
                    value: self.value,
                    memo: HashMemo::default(),
                }
            }
        }
    };
}

primitive_element!(
    /// A true/false value.
    Boolean, BooleanBuilder, bool, "boolean",
    validate: |_| Ok(())
);

primitive_element!(
    /// A signed 32-bit integer.
    Integer, IntegerBuilder, i32, "integer",
    validate: |_| Ok(())
);

primitive_element!(
    /// An arbitrary-precision decimal value.
    Decimal, DecimalBuilder, DecimalValue, "decimal",
    validate: |_| Ok(())
);

primitive_element!(
    /// A sequence of Unicode characters.
    ///
    /// Must contain at least one non-whitespace character, stay under the
    /// maximum length and avoid control characters below U+0020 other than
    /// tab, CR and LF.
    FhirString, FhirStringBuilder, String, "string",
    validate: |s: &FhirString| support::check_string(s.value.as_deref())
);

primitive_element!(
    /// A uniform resource identifier: no whitespace anywhere.
    Uri, UriBuilder, String, "uri",
    validate: |u: &Uri| support::check_uri(u.value.as_deref())
);

primitive_element!(
    /// A token from a defined set of codes: no leading/trailing whitespace,
    /// no internal whitespace other than single spaces.
    Code, CodeBuilder, String, "code",
    validate: |c: &Code| support::check_code(c.value.as_deref())
);

impl Boolean {
    pub fn value(&self) -> Option<bool> {
        self.value
    }
}

impl Integer {
    pub fn value(&self) -> Option<i32> {
        self.value
    }
}

impl Decimal {
    pub fn value(&self) -> Option<DecimalValue> {
        self.value
    }
}

impl FhirString {
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Uri {
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Code {
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        Self::of(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::of(value)
    }
}

impl From<DecimalValue> for Decimal {
    fn from(value: DecimalValue) -> Self {
        Self::of(value)
    }
}

impl From<&str> for FhirString {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for FhirString {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

impl From<&str> for Uri {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for Uri {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FhirModelError;
    use crate::types::DataValue;

    #[test]
    fn test_boolean_builder_round_trip() {
        let boolean = Boolean::builder().id("b1").value(true).build().unwrap();
        assert_eq!(boolean.value(), Some(true));
        assert_eq!(boolean.id(), Some("b1"));

        let copy = boolean.to_builder().build().unwrap();
        assert_eq!(copy, boolean);
    }

    #[test]
    fn test_empty_primitive_is_vacuous() {
        let err = Boolean::builder().build().unwrap_err();
        assert!(matches!(err, FhirModelError::VacuousElement));
    }

    #[test]
    fn test_extension_only_primitive_is_accepted() {
        let extension = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/note")
            .value(DataValue::from("annotated"))
            .build()
            .unwrap();
        let boolean = Boolean::builder().extension(extension).build().unwrap();
        assert!(boolean.value().is_none());
        assert!(boolean.has_children());
    }

    #[test]
    fn test_code_rejects_interior_whitespace() {
        let err = Code::builder().value("two  spaces").build().unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidPrimitiveValue { .. }));
    }

    #[test]
    fn test_uri_rejects_whitespace() {
        assert!(Uri::builder().value("http://example.org/ok").build().is_ok());
        assert!(Uri::builder().value("not a uri").build().is_err());
    }

    #[test]
    fn test_cached_hash_consistency() {
        let a = FhirString::of("same");
        let b = FhirString::of("same");
        assert_eq!(a, b);
        assert_eq!(a.cached_hash(), b.cached_hash());
    }
}
