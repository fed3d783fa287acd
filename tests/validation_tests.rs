mod common;

use common::*;
use octofhir_fhirmodel::*;

#[test]
fn test_vacuous_element_rejected() {
    let err = Coding::builder().build().unwrap_err();
    assert!(matches!(err, FhirModelError::VacuousElement));
}

#[test]
fn test_element_with_only_extension_is_accepted() {
    let extension = Extension::builder()
        .url("http://example.org/fhir/StructureDefinition/data-absent-reason")
        .value(DataValue::from("unknown"))
        .build()
        .unwrap();
    let coding = Coding::builder().extension(extension).build().unwrap();
    assert!(coding.code().is_none());
}

#[test]
fn test_empty_optional_list_is_valid() {
    let patient = Patient::builder().id("no-lists").build().unwrap();
    assert!(patient.identifier().is_empty());
    assert!(patient.link().is_empty());
}

#[test]
fn test_missing_required_field_names_the_element() {
    let err = Observation::builder().status("final").build().unwrap_err();
    assert!(matches!(
        err,
        FhirModelError::MissingRequiredField { element } if element == "code"
    ));
}

#[test]
fn test_fail_fast_reports_first_violation_only() {
    // Both the status binding and the subject target are wrong; the
    // earlier rule in declaration order wins.
    let err = Observation::builder()
        .status("draft")
        .code(heart_rate_code())
        .subject(Reference::to("Device/pump-1"))
        .build()
        .unwrap_err();
    assert!(matches!(err, FhirModelError::UnboundedCodedValue { .. }));
}

#[test]
fn test_inline_binding_accepts_members() {
    for code in ["registered", "preliminary", "final", "amended"] {
        let observation = Observation::builder()
            .status(code)
            .code(heart_rate_code())
            .build();
        assert!(observation.is_ok(), "status '{code}' should be accepted");
    }
}

#[test]
fn test_inline_binding_rejects_non_members() {
    let err = Patient::builder().gender("woman").build().unwrap_err();
    match err {
        FhirModelError::UnboundedCodedValue { element, code, value_set } => {
            assert_eq!(element, "gender");
            assert_eq!(code, "woman");
            assert_eq!(value_set, ADMINISTRATIVE_GENDER_VALUE_SET);
        }
        other => panic!("expected UnboundedCodedValue, got {other:?}"),
    }
}

struct StubTerminology {
    members: &'static [&'static str],
}

impl TerminologyProvider for StubTerminology {
    fn is_member(&self, _value_set: &str, _system: Option<&str>, code: &str) -> bool {
        self.members.contains(&code)
    }
}

#[test]
fn test_delegated_binding_accepts_member() {
    let provider = StubTerminology { members: &["8867-4"] };
    let coding = Coding::builder().system("http://loinc.org").code("8867-4").build().unwrap();
    assert!(
        check_coding_binding(
            &provider,
            &coding,
            "code",
            "http://example.org/ValueSet/vitals",
            BindingStrength::Required,
        )
        .is_ok()
    );
}

#[test]
fn test_delegated_binding_rejects_non_member() {
    let provider = StubTerminology { members: &["8867-4"] };
    let coding = Coding::builder().system("http://loinc.org").code("9279-1").build().unwrap();
    let err = check_coding_binding(
        &provider,
        &coding,
        "code",
        "http://example.org/ValueSet/vitals",
        BindingStrength::Required,
    )
    .unwrap_err();
    assert!(matches!(err, FhirModelError::UnboundedCodedValue { .. }));
}

#[test]
fn test_delegated_binding_skips_weaker_strengths() {
    let provider = StubTerminology { members: &[] };
    let coding = Coding::builder().code("anything").build().unwrap();
    assert!(
        check_coding_binding(
            &provider,
            &coding,
            "category",
            "http://example.org/ValueSet/category",
            BindingStrength::Preferred,
        )
        .is_ok()
    );
}

#[test]
fn test_narrative_rules() {
    let narrative = Narrative::builder()
        .status("generated")
        .div("<div xmlns=\"http://www.w3.org/1999/xhtml\">summary</div>")
        .build()
        .unwrap();
    let patient = Patient::builder().text(narrative).build().unwrap();
    assert!(patient.text().is_some());

    let err = Narrative::builder().div("<div>x</div>").build().unwrap_err();
    assert!(matches!(
        err,
        FhirModelError::MissingRequiredField { element } if element == "status"
    ));
}

#[test]
fn test_primitive_lexical_rules_run_at_build() {
    assert!(FhirString::builder().value("ok value").build().is_ok());
    assert!(FhirString::builder().value("   ").build().is_err());
    assert!(Code::builder().value(" padded ").build().is_err());
    assert!(Uri::builder().value("urn:oid:1.2.3").build().is_ok());
}
