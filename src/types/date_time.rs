//! Temporal primitives backed by chrono.
//!
//! `Date` holds a calendar date, `DateTime` a zoned timestamp, `Instant` a
//! system timestamp (same representation as `DateTime`, distinct schema
//! type). Values parse from their lexical forms via `parse`; a failed parse
//! is a construction-time error, never a silently absent value.

use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::element::{CachedHash, Element, ElementData, HashMemo};
use crate::error::{FhirModelError, Result};
use crate::types::Extension;
use crate::validation::support;
use crate::visitor::{self, Visitable, Visitor};

macro_rules! temporal_element {
    (
        $(#[$doc:meta])*
        $name:ident, $builder:ident, $value_ty:ty, $type_name:literal
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
            pub fn of(value: $value_ty) -> Self {
                Self {
                    data: ElementData::default(),
                    value: Some(value),
                    memo: HashMemo::default(),
                }
            }

            pub fn builder() -> $builder {
                $builder::default()
            }

            pub fn to_builder(&self) -> $builder {
                $builder {
                    id: self.data.id.clone(),
                    extension: self.data.extension.clone(),
                    value: self.value,
                }
            }

            pub fn value(&self) -> Option<$value_ty> {
                self.value
            }

            pub(crate) fn validate(&self) -> Result<()> {
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

        impl From<$value_ty> for $name {
            fn from(value: $value_ty) -> Self {
                Self::of(value)
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

            pub fn value(mut self, value: $value_ty) -> Self {
                self.value = Some(value);
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

temporal_element!(
    /// A calendar date (`YYYY-MM-DD`).
    Date, DateBuilder, NaiveDate, "date"
);

temporal_element!(
    /// A date-time with timezone offset (RFC 3339).
    DateTime, DateTimeBuilder, ChronoDateTime<FixedOffset>, "dateTime"
);

temporal_element!(
    /// A system timestamp, always fully specified with timezone offset.
    Instant, InstantBuilder, ChronoDateTime<FixedOffset>, "instant"
);

impl Date {
    /// Parse a `YYYY-MM-DD` lexical form.
    pub fn parse(value: &str) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| FhirModelError::invalid_primitive_value("date", format!("'{value}': {e}")))?;
        Ok(Self::of(parsed))
    }
}

impl DateTime {
    /// Parse an RFC 3339 lexical form.
    pub fn parse(value: &str) -> Result<Self> {
        let parsed = ChronoDateTime::parse_from_rfc3339(value).map_err(|e| {
            FhirModelError::invalid_primitive_value("dateTime", format!("'{value}': {e}"))
        })?;
        Ok(Self::of(parsed))
    }
}

impl Instant {
    /// Parse an RFC 3339 lexical form.
    pub fn parse(value: &str) -> Result<Self> {
        let parsed = ChronoDateTime::parse_from_rfc3339(value).map_err(|e| {
            FhirModelError::invalid_primitive_value("instant", format!("'{value}': {e}"))
        })?;
        Ok(Self::of(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parse() {
        let date = Date::parse("2024-03-01").unwrap();
        assert_eq!(date.value(), NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_date_parse_rejects_impossible_date() {
        let err = Date::parse("2024-02-30").unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidPrimitiveValue { .. }));
    }

    #[test]
    fn test_date_time_parse() {
        let date_time = DateTime::parse("2024-03-01T10:30:00+01:00").unwrap();
        assert!(date_time.value().is_some());
    }

    #[test]
    fn test_instant_requires_full_lexical_form() {
        assert!(Instant::parse("2024-03-01T10:30:00Z").is_ok());
        assert!(Instant::parse("2024-03-01").is_err());
    }
}
