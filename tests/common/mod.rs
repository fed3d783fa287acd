use octofhir_fhirmodel::*;

#[allow(dead_code)]
pub fn heart_rate_code() -> CodeableConcept {
    CodeableConcept::builder()
        .coding(
            Coding::builder()
                .system("http://loinc.org")
                .code("8867-4")
                .display("Heart rate")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn heart_rate_quantity(beats_per_minute: i64) -> Quantity {
    Quantity::builder()
        .value(rust_decimal::Decimal::new(beats_per_minute, 0))
        .unit("beats/minute")
        .system("http://unitsofmeasure.org")
        .code("/min")
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn example_patient() -> Patient {
    Patient::builder()
        .id("example")
        .identifier(
            Identifier::builder()
                .system("http://hospital.example.org/mrn")
                .value("12345")
                .build()
                .unwrap(),
        )
        .active(true)
        .gender("female")
        .birth_date(Date::parse("1987-02-20").unwrap())
        .deceased_boolean(false)
        .managing_organization(Reference::to("Organization/hospital"))
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn example_observation() -> Observation {
    Observation::builder()
        .id("heart-rate")
        .status("final")
        .code(heart_rate_code())
        .subject(Reference::to("Patient/example"))
        .effective_date_time(DateTime::parse("2024-03-01T10:30:00+01:00").unwrap())
        .value_quantity(heart_rate_quantity(72))
        .component(
            ObservationComponent::builder()
                .code(heart_rate_code())
                .value_quantity(heart_rate_quantity(71))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}
