mod common;

use common::*;
use octofhir_fhirmodel::*;

#[test]
fn test_round_trip_preserves_equality() {
    let patient = example_patient();
    let copy = patient.to_builder().build().unwrap();
    assert_eq!(copy, patient);

    // And transitively through multiple copy cycles.
    let twice = copy.to_builder().build().unwrap().to_builder().build().unwrap();
    assert_eq!(twice, patient);
}

#[test]
fn test_modified_copy_leaves_original_untouched() {
    let patient = example_patient();
    let original_hash = patient.cached_hash();

    let renamed = patient.to_builder().id("changed").build().unwrap();
    assert_ne!(renamed, patient);
    assert_eq!(patient.id(), Some("example"));
    assert_eq!(patient.cached_hash(), original_hash);
}

#[test]
fn test_equal_instances_share_hash() {
    let a = example_observation();
    let b = example_observation();
    assert_eq!(a, b);
    assert_eq!(a.cached_hash(), b.cached_hash());
}

#[test]
fn test_list_add_accumulates() {
    let patient = Patient::builder()
        .identifier(
            Identifier::builder().system("http://a.example.org").value("1").build().unwrap(),
        )
        .identifier(
            Identifier::builder().system("http://b.example.org").value("2").build().unwrap(),
        )
        .build()
        .unwrap();
    assert_eq!(patient.identifier().len(), 2);
}

#[test]
fn test_list_replace_discards_prior_content() {
    let replacement = vec![
        Identifier::builder().system("http://c.example.org").value("3").build().unwrap(),
    ];
    let patient = Patient::builder()
        .identifier(
            Identifier::builder().system("http://a.example.org").value("1").build().unwrap(),
        )
        .set_identifier(replacement)
        .build()
        .unwrap();
    assert_eq!(patient.identifier().len(), 1);
    assert_eq!(
        patient.identifier()[0].value().and_then(FhirString::value),
        Some("3")
    );
}

#[test]
fn test_seeded_builder_appends_to_existing_list() {
    let patient = example_patient();
    let extended = patient
        .to_builder()
        .identifier(
            Identifier::builder().system("http://other.example.org").value("x").build().unwrap(),
        )
        .build()
        .unwrap();
    assert_eq!(extended.identifier().len(), patient.identifier().len() + 1);
}

#[test]
fn test_build_unchecked_skips_validation() {
    // An out-of-set gender fails build() but passes build_unchecked().
    let unchecked = Patient::builder().gender("f").build_unchecked();
    assert_eq!(unchecked.gender().and_then(Code::value), Some("f"));
    assert!(Patient::builder().gender("f").build().is_err());
}

#[test]
fn test_build_unchecked_matches_validated_build() {
    let checked = example_patient();
    let unchecked = checked.to_builder().build_unchecked();
    assert_eq!(unchecked, checked);
}

#[test]
fn test_serde_round_trip() {
    let observation = example_observation();
    let encoded = serde_json::to_string(&observation).unwrap();
    let decoded: Observation = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, observation);
}
