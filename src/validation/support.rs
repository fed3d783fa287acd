//! Structural-invariant check catalogue.
//!
//! Every generated `validate()` body is a straight-line sequence of calls
//! into this module, supertype rules first. The checks accumulate nothing:
//! the first failure aborts construction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use url::Url;

use crate::element::Element;
use crate::error::{FhirModelError, Result};
use crate::resource::{AnyResource, ResourceType};
use crate::types::{Code, DataValue, Reference, ValueType};

/// Upper bound for string-shaped primitive values (1 MiB).
const MAX_STRING_LENGTH: usize = 1024 * 1024;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("valid id pattern"));

/// Relative literal reference: `Type/id` with an optional version suffix.
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)/[A-Za-z0-9\-\.]{1,64}(?:/_history/[A-Za-z0-9\-\.]{1,64})?$")
        .expect("valid reference pattern")
});

/// Require a singular field to be present, yielding its value.
pub fn require_non_null<T>(value: Option<T>, element_name: &str) -> Result<T> {
    value.ok_or_else(|| FhirModelError::missing_required_field(element_name))
}

/// Require a repeating field to have at least one entry.
pub fn check_non_empty_list<T>(list: &[T], element_name: &str) -> Result<()> {
    if list.is_empty() {
        return Err(FhirModelError::empty_required_list(element_name));
    }
    Ok(())
}

/// Check an optional choice field against its declared closed type set.
///
/// This is the model's one deliberate closed-world "is-a" check: the
/// concrete type must equal a member of the set, with no supertype fuzzing
/// and no coercion.
pub fn choice_element(
    value: Option<&DataValue>,
    element_name: &str,
    allowed: &[ValueType],
) -> Result<()> {
    if let Some(value) = value {
        let actual = value.value_type();
        if !allowed.contains(&actual) {
            return Err(FhirModelError::invalid_choice_type(
                element_name,
                actual.as_str(),
                value_type_list(allowed),
            ));
        }
    }
    Ok(())
}

/// Like [`choice_element`], but the field is required; yields the value.
pub fn require_choice_element(
    value: Option<DataValue>,
    element_name: &str,
    allowed: &[ValueType],
) -> Result<DataValue> {
    let value = value.ok_or_else(|| FhirModelError::missing_required_choice(element_name))?;
    choice_element(Some(&value), element_name, allowed)?;
    Ok(value)
}

/// Check a reference field against its declared allowed-target-type set.
///
/// The target type is resolved from, in order: a `#fragment` literal
/// against the co-located contained resources, a relative `Type/id` or
/// `Type?query` literal, and the explicit `Reference.type`. A literal with
/// a URI scheme points outside the model's world and is trusted as-is; the
/// policy is to validate what is knowable.
pub fn check_reference_type(
    reference: Option<&Reference>,
    element_name: &str,
    allowed: &[ResourceType],
    contained: &[AnyResource],
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };

    let mut literal_type: Option<ResourceType> = None;

    if let Some(literal) = reference.literal() {
        if let Some(fragment) = literal.strip_prefix('#') {
            if let Some(resource) = contained.iter().find(|r| r.id() == Some(fragment)) {
                let actual = resource.resource_type();
                if !allowed.contains(&actual) {
                    return Err(FhirModelError::invalid_reference_target(
                        element_name,
                        actual.as_str(),
                        resource_type_list(allowed),
                    ));
                }
                literal_type = Some(actual);
            } else {
                trace!(
                    element = element_name,
                    value = literal,
                    "fragment reference has no matching contained resource; skipping target type check"
                );
            }
        } else if !has_scheme(literal) {
            let type_name = match literal.split_once('?') {
                // conditional reference: everything before the query names the type
                Some((head, _)) => Some(head),
                None => REFERENCE_PATTERN
                    .captures(literal)
                    .and_then(|captures| captures.get(1))
                    .map(|m| m.as_str()),
            };
            let Some(type_name) = type_name else {
                return Err(FhirModelError::malformed_reference(element_name, literal));
            };
            let Some(actual) = ResourceType::from_name(type_name) else {
                return Err(FhirModelError::malformed_reference(element_name, literal));
            };
            if !allowed.contains(&actual) {
                return Err(FhirModelError::invalid_reference_target(
                    element_name,
                    actual.as_str(),
                    resource_type_list(allowed),
                ));
            }
            literal_type = Some(actual);
        } else {
            trace!(
                element = element_name,
                value = literal,
                "reference with scheme is not resolvable; skipping target type check"
            );
        }
    }

    if let Some(explicit) = reference.explicit_type() {
        let Some(explicit_type) = ResourceType::from_name(explicit) else {
            return Err(FhirModelError::malformed_reference(element_name, explicit));
        };
        if !allowed.contains(&explicit_type) {
            return Err(FhirModelError::invalid_reference_target(
                element_name,
                explicit_type.as_str(),
                resource_type_list(allowed),
            ));
        }
        if let Some(literal_type) = literal_type
            && literal_type != explicit_type
        {
            // the literal's resolved type must agree with the declared one
            return Err(FhirModelError::invalid_reference_target(
                element_name,
                literal_type.as_str(),
                explicit_type.as_str(),
            ));
        }
    }

    Ok(())
}

/// [`check_reference_type`] over every element of a repeating field.
pub fn check_reference_type_list(
    references: &[Reference],
    element_name: &str,
    allowed: &[ResourceType],
    contained: &[AnyResource],
) -> Result<()> {
    for reference in references {
        check_reference_type(Some(reference), element_name, allowed, contained)?;
    }
    Ok(())
}

/// Check a coded field against an inline closed code list, as generated
/// types do for required-strength bindings the schema enumerates. Value
/// sets the model cannot enumerate go through
/// [`crate::validation::check_coding_binding`] instead.
pub fn check_value_set_binding(
    code: Option<&Code>,
    element_name: &str,
    value_set: &str,
    codes: &[&str],
) -> Result<()> {
    if let Some(value) = code.and_then(Code::value)
        && !codes.is_empty()
        && !codes.contains(&value)
    {
        return Err(FhirModelError::unbounded_coded_value(
            element_name,
            value,
            value_set,
        ));
    }
    Ok(())
}

/// `ele-1`: an element with no value, no populated field and no extension
/// carries nothing and is rejected.
pub fn require_value_or_children<T: Element>(element: &T) -> Result<()> {
    if !element.has_value() && !element.has_children() {
        return Err(FhirModelError::VacuousElement);
    }
    Ok(())
}

/// Reject a populated singular field the type prohibits.
pub fn prohibited<T>(value: Option<&T>, element_name: &str) -> Result<()> {
    if value.is_some() {
        return Err(FhirModelError::prohibited_element(element_name));
    }
    Ok(())
}

/// Reject a non-empty repeating field the type prohibits.
pub fn prohibited_list<T>(list: &[T], element_name: &str) -> Result<()> {
    if !list.is_empty() {
        return Err(FhirModelError::prohibited_element(element_name));
    }
    Ok(())
}

/// Lexical rule for string values: bounded length, at least one
/// non-whitespace character, no control characters below U+0020 other than
/// tab, CR and LF.
pub fn check_string(value: Option<&str>) -> Result<()> {
    let Some(s) = value else {
        return Ok(());
    };
    if s.len() > MAX_STRING_LENGTH {
        return Err(FhirModelError::invalid_primitive_value(
            "string",
            format!(
                "length {} is greater than maximum allowed length {}",
                s.len(),
                MAX_STRING_LENGTH
            ),
        ));
    }
    let mut non_whitespace = 0usize;
    for ch in s.chars() {
        if !ch.is_whitespace() {
            check_control_char("string", s, ch)?;
            non_whitespace += 1;
        } else if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
            return Err(FhirModelError::invalid_primitive_value(
                "string",
                format!("'{s}' is not valid with respect to pattern: [ \\r\\n\\t\\S]+"),
            ));
        }
    }
    if non_whitespace == 0 {
        return Err(FhirModelError::invalid_primitive_value(
            "string",
            "must contain at least one non-whitespace character",
        ));
    }
    Ok(())
}

/// Lexical rule for code values: no leading or trailing whitespace, no
/// internal whitespace other than single spaces.
pub fn check_code(value: Option<&str>) -> Result<()> {
    let Some(s) = value else {
        return Ok(());
    };
    if s.is_empty() || s.starts_with(char::is_whitespace) {
        return Err(FhirModelError::invalid_primitive_value(
            "code",
            format!("'{s}' must begin with a non-whitespace character"),
        ));
    }
    if s.ends_with(char::is_whitespace) {
        return Err(FhirModelError::invalid_primitive_value(
            "code",
            format!("'{s}' must end with a non-whitespace character"),
        ));
    }
    let mut previous_is_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if ch != ' ' {
                return Err(FhirModelError::invalid_primitive_value(
                    "code",
                    format!("'{s}' must not contain whitespace other than a single space"),
                ));
            }
            if previous_is_space {
                return Err(FhirModelError::invalid_primitive_value(
                    "code",
                    format!("'{s}' must not contain consecutive spaces"),
                ));
            }
            previous_is_space = true;
        } else {
            check_control_char("code", s, ch)?;
            previous_is_space = false;
        }
    }
    Ok(())
}

/// Lexical rule for resource ids: `[A-Za-z0-9\-\.]{1,64}`.
pub fn check_id(value: Option<&str>) -> Result<()> {
    let Some(s) = value else {
        return Ok(());
    };
    if !ID_PATTERN.is_match(s) {
        return Err(FhirModelError::invalid_primitive_value(
            "id",
            format!("'{s}' is not valid with respect to pattern: [A-Za-z0-9\\-\\.]{{1,64}}"),
        ));
    }
    Ok(())
}

/// Lexical rule for uri values: bounded length, no whitespace anywhere.
pub fn check_uri(value: Option<&str>) -> Result<()> {
    let Some(s) = value else {
        return Ok(());
    };
    if s.len() > MAX_STRING_LENGTH {
        return Err(FhirModelError::invalid_primitive_value(
            "uri",
            format!(
                "length {} is greater than maximum allowed length {}",
                s.len(),
                MAX_STRING_LENGTH
            ),
        ));
    }
    for ch in s.chars() {
        check_control_char("uri", s, ch)?;
        if ch.is_whitespace() {
            return Err(FhirModelError::invalid_primitive_value(
                "uri",
                format!("'{s}' must not contain whitespace"),
            ));
        }
    }
    Ok(())
}

/// Minimal shape check for narrative content: a single `<div>` fragment.
pub fn check_xhtml(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if !trimmed.starts_with("<div") || !trimmed.ends_with("</div>") {
        return Err(FhirModelError::invalid_primitive_value(
            "xhtml",
            "narrative content must be a single <div> fragment",
        ));
    }
    Ok(())
}

fn check_control_char(type_name: &str, value: &str, ch: char) -> Result<()> {
    if (ch as u32) < 0x20 && !matches!(ch, '\t' | '\r' | '\n') {
        return Err(FhirModelError::invalid_primitive_value(
            type_name,
            format!("'{}' contains an unsupported control character", value.escape_debug()),
        ));
    }
    Ok(())
}

fn has_scheme(literal: &str) -> bool {
    Url::parse(literal).is_ok()
}

fn value_type_list(allowed: &[ValueType]) -> String {
    allowed
        .iter()
        .map(ValueType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn resource_type_list(allowed: &[ResourceType]) -> String {
    allowed
        .iter()
        .map(ResourceType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_null() {
        assert_eq!(require_non_null(Some(1), "count").unwrap(), 1);
        let err = require_non_null::<i32>(None, "count").unwrap_err();
        assert!(matches!(err, FhirModelError::MissingRequiredField { .. }));
    }

    #[test]
    fn test_check_non_empty_list() {
        assert!(check_non_empty_list(&[1], "entries").is_ok());
        let err = check_non_empty_list::<i32>(&[], "entries").unwrap_err();
        assert!(matches!(err, FhirModelError::EmptyRequiredList { .. }));
    }

    #[test]
    fn test_choice_element_membership() {
        let allowed = &[ValueType::Boolean, ValueType::DateTime];
        assert!(choice_element(None, "deceased", allowed).is_ok());
        assert!(choice_element(Some(&DataValue::from(true)), "deceased", allowed).is_ok());

        let err = choice_element(Some(&DataValue::from(5)), "deceased", allowed).unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidChoiceType { .. }));
        let message = format!("{err}");
        assert!(message.contains("integer"));
        assert!(message.contains("boolean, dateTime"));
    }

    #[test]
    fn test_require_choice_element() {
        let allowed = &[ValueType::Boolean];
        let err = require_choice_element(None, "value", allowed).unwrap_err();
        assert!(matches!(err, FhirModelError::MissingRequiredChoice { .. }));

        let value = require_choice_element(Some(DataValue::from(true)), "value", allowed).unwrap();
        assert_eq!(value.value_type(), ValueType::Boolean);
    }

    #[test]
    fn test_prohibited() {
        assert!(prohibited::<i32>(None, "extra").is_ok());
        let err = prohibited(Some(&1), "extra").unwrap_err();
        assert!(matches!(err, FhirModelError::ProhibitedElement { .. }));

        assert!(prohibited_list::<i32>(&[], "extras").is_ok());
        assert!(prohibited_list(&[1], "extras").is_err());
    }

    #[test]
    fn test_check_string_rules() {
        assert!(check_string(None).is_ok());
        assert!(check_string(Some("plain value")).is_ok());
        assert!(check_string(Some("   ")).is_err());
        assert!(check_string(Some("bad\u{0001}char")).is_err());
        assert!(check_string(Some("vertical\u{000b}tab")).is_err());
    }

    #[test]
    fn test_check_code_rules() {
        assert!(check_code(Some("final")).is_ok());
        assert!(check_code(Some("two words")).is_ok());
        assert!(check_code(Some(" leading")).is_err());
        assert!(check_code(Some("trailing ")).is_err());
        assert!(check_code(Some("two  spaces")).is_err());
        assert!(check_code(Some("tab\tinside")).is_err());
        assert!(check_code(Some("")).is_err());
    }

    #[test]
    fn test_check_id_rules() {
        assert!(check_id(Some("example-id.01")).is_ok());
        assert!(check_id(Some("")).is_err());
        assert!(check_id(Some("has space")).is_err());
        assert!(check_id(Some(&"x".repeat(65))).is_err());
    }

    #[test]
    fn test_check_uri_rules() {
        assert!(check_uri(Some("urn:oid:1.2.3")).is_ok());
        assert!(check_uri(Some("white space")).is_err());
    }

    #[test]
    fn test_reference_pattern_resolution() {
        let reference = Reference::to("Observation/abc/_history/2");
        let err = check_reference_type(Some(&reference), "subject", &[ResourceType::Patient], &[])
            .unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidReferenceTarget { .. }));
    }

    #[test]
    fn test_unknown_type_name_is_malformed() {
        let reference = Reference::to("NotAType/abc");
        let err = check_reference_type(Some(&reference), "subject", &[ResourceType::Patient], &[])
            .unwrap_err();
        assert!(matches!(err, FhirModelError::MalformedReference { .. }));
    }

    #[test]
    fn test_scheme_reference_is_trusted() {
        let reference = Reference::to("https://other.example.org/fhir/Device/9");
        assert!(
            check_reference_type(Some(&reference), "subject", &[ResourceType::Patient], &[])
                .is_ok()
        );
    }

    #[test]
    fn test_conditional_reference_resolves_type() {
        let reference = Reference::to("Patient?identifier=mrn|12345");
        assert!(
            check_reference_type(Some(&reference), "subject", &[ResourceType::Patient], &[])
                .is_ok()
        );
        let err = check_reference_type(Some(&reference), "subject", &[ResourceType::Group], &[])
            .unwrap_err();
        assert!(matches!(err, FhirModelError::InvalidReferenceTarget { .. }));
    }
}
