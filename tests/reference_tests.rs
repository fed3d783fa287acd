mod common;

use common::*;
use octofhir_fhirmodel::*;

#[test]
fn test_relative_literal_in_target_set() {
    let observation = Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .subject(Reference::to("Patient/example"))
        .build();
    assert!(observation.is_ok());
}

#[test]
fn test_relative_literal_outside_target_set() {
    let err = Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .subject(Reference::to("Device/pump-1"))
        .build()
        .unwrap_err();
    match err {
        FhirModelError::InvalidReferenceTarget { element, actual, allowed } => {
            assert_eq!(element, "subject");
            assert_eq!(actual, "Device");
            assert_eq!(allowed, "Patient, Group");
        }
        other => panic!("expected InvalidReferenceTarget, got {other:?}"),
    }
}

#[test]
fn test_external_url_is_trusted() {
    // An opaque external reference cannot be resolved; the policy is to
    // validate what is knowable and trust the rest.
    let observation = Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .subject(Reference::to("https://other.example.org/fhir/Device/9"))
        .build();
    assert!(observation.is_ok());
}

#[test]
fn test_explicit_type_checked_without_literal() {
    let err = Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .subject(Reference::builder().reference_type("Device").display("a pump").build().unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, FhirModelError::InvalidReferenceTarget { .. }));
}

#[test]
fn test_explicit_type_must_match_literal() {
    let err = Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .subject(
            Reference::builder()
                .reference("Patient/example")
                .reference_type("Group")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap_err();
    assert!(matches!(err, FhirModelError::InvalidReferenceTarget { .. }));
}

#[test]
fn test_contained_resource_resolves_fragment() {
    let contained = example_patient().to_builder().id("p1").build().unwrap();
    let observation = Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .contained(contained)
        .subject(Reference::to("#p1"))
        .build();
    assert!(observation.is_ok());
}

#[test]
fn test_contained_resource_of_disallowed_type_fails() {
    // Patient.managingOrganization only targets Organization; a contained
    // Observation behind the fragment must be rejected.
    let contained = example_observation().to_builder().id("inner").build().unwrap();
    let err = Patient::builder()
        .contained(contained)
        .managing_organization(Reference::to("#inner"))
        .build()
        .unwrap_err();
    assert!(matches!(err, FhirModelError::InvalidReferenceTarget { .. }));
}

#[test]
fn test_unknown_fragment_is_skipped() {
    let patient = Patient::builder()
        .managing_organization(Reference::to("#nowhere"))
        .build();
    assert!(patient.is_ok());
}

#[test]
fn test_unknown_type_name_is_malformed() {
    let err = Patient::builder()
        .managing_organization(Reference::to("Organisation/typo"))
        .build()
        .unwrap_err();
    assert!(matches!(err, FhirModelError::MalformedReference { .. }));
}

#[test]
fn test_reference_list_checks_every_element() {
    let err = Patient::builder()
        .general_practitioner(Reference::to("Practitioner/gp-1"))
        .general_practitioner(Reference::to("Patient/not-a-gp"))
        .build()
        .unwrap_err();
    assert!(matches!(err, FhirModelError::InvalidReferenceTarget { .. }));
}
