mod common;

use common::*;
use octofhir_fhirmodel::*;

/// Records every hook invocation as a flat event list.
#[derive(Default)]
struct RecordingVisitor {
    events: Vec<String>,
}

impl RecordingVisitor {
    fn starts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| e.strip_prefix("start "))
            .collect()
    }

    fn ends(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| e.strip_prefix("end "))
            .collect()
    }
}

impl<'m> Visitor<'m> for RecordingVisitor {
    fn visit_start(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        let index = element_index.map(|i| i.to_string()).unwrap_or_default();
        self.events
            .push(format!("start {element_name}[{index}]:{}", node.type_name()));
    }

    fn visit_end(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        let index = element_index.map(|i| i.to_string()).unwrap_or_default();
        self.events
            .push(format!("end {element_name}[{index}]:{}", node.type_name()));
    }
}

fn small_observation() -> Observation {
    Observation::builder()
        .status("final")
        .code(heart_rate_code())
        .value_boolean(true)
        .build()
        .unwrap()
}

#[test]
fn test_traversal_order_is_schema_declaration_order() {
    let observation = small_observation();
    let mut visitor = RecordingVisitor::default();
    observation.accept("Observation", None, &mut visitor);

    assert_eq!(
        visitor.starts(),
        vec![
            "Observation[]:Observation",
            "status[]:code",
            "code[]:CodeableConcept",
            "coding[0]:Coding",
            "system[]:uri",
            "code[]:code",
            "display[]:string",
            "value[]:boolean",
        ]
    );
}

#[test]
fn test_every_start_has_a_matching_end() {
    let observation = example_observation();
    let mut visitor = RecordingVisitor::default();
    observation.accept("Observation", None, &mut visitor);

    let mut starts = visitor.starts();
    let mut ends = visitor.ends();
    starts.sort_unstable();
    ends.sort_unstable();
    assert_eq!(starts, ends);
}

#[test]
fn test_absent_fields_produce_no_calls() {
    let observation = small_observation();
    let mut visitor = RecordingVisitor::default();
    observation.accept("Observation", None, &mut visitor);

    assert!(visitor.events.iter().all(|e| !e.contains("subject")));
    assert!(visitor.events.iter().all(|e| !e.contains("effective")));
}

#[test]
fn test_list_elements_visited_with_positions() {
    let observation = example_observation()
        .to_builder()
        .component(
            ObservationComponent::builder()
                .code(heart_rate_code())
                .value_string("second")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let mut visitor = RecordingVisitor::default();
    observation.accept("Observation", None, &mut visitor);

    let starts = visitor.starts();
    assert!(starts.contains(&"component[0]:ObservationComponent"));
    assert!(starts.contains(&"component[1]:ObservationComponent"));
}

/// Vetoes descent below the observation's code concept but keeps visiting
/// the node itself.
#[derive(Default)]
struct ChildVeto {
    recorder: RecordingVisitor,
}

impl<'m> Visitor<'m> for ChildVeto {
    fn visit(&mut self, _element_name: &str, _element_index: Option<usize>, node: &'m dyn Visitable) -> bool {
        node.type_name() != "CodeableConcept"
    }

    fn visit_start(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        self.recorder.visit_start(element_name, element_index, node);
    }

    fn visit_end(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        self.recorder.visit_end(element_name, element_index, node);
    }
}

#[test]
fn test_visit_veto_skips_children_but_not_end_hooks() {
    let observation = small_observation();
    let mut visitor = ChildVeto::default();
    observation.accept("Observation", None, &mut visitor);

    let starts = visitor.recorder.starts();
    // The vetoed node still gets start and end, its descendants nothing.
    assert!(starts.contains(&"code[]:CodeableConcept"));
    assert!(visitor.recorder.ends().contains(&"code[]:CodeableConcept"));
    assert!(!starts.contains(&"coding[0]:Coding"));
    assert!(!starts.contains(&"system[]:uri"));
}

/// Vetoes the code subtree before any hook fires for it.
#[derive(Default)]
struct SubtreeVeto {
    recorder: RecordingVisitor,
}

impl<'m> Visitor<'m> for SubtreeVeto {
    fn pre_visit(&mut self, node: &'m dyn Visitable) -> bool {
        node.type_name() != "CodeableConcept"
    }

    fn visit_start(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        self.recorder.visit_start(element_name, element_index, node);
    }

    fn visit_end(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        self.recorder.visit_end(element_name, element_index, node);
    }
}

#[test]
fn test_pre_visit_veto_skips_node_entirely() {
    let observation = small_observation();
    let mut visitor = SubtreeVeto::default();
    observation.accept("Observation", None, &mut visitor);

    let starts = visitor.recorder.starts();
    assert!(!starts.iter().any(|s| s.ends_with(":CodeableConcept")));
    assert!(!starts.contains(&"coding[0]:Coding"));
    // Siblings after the vetoed node are still visited.
    assert!(starts.contains(&"value[]:boolean"));
}

#[test]
fn test_collecting_visitor_gathers_every_node_once() {
    let observation = small_observation();
    let mut visitor = CollectingVisitor::new();
    observation.accept("Observation", None, &mut visitor);

    let collected = visitor.into_result();
    assert_eq!(collected.len(), 8);
    assert_eq!(collected[0].type_name(), "Observation");
    let codings = collected
        .iter()
        .filter(|node| node.type_name() == "Coding")
        .count();
    assert_eq!(codings, 1);
}

#[test]
fn test_collected_references_outlive_the_walk() {
    let patient = example_patient();
    let mut visitor = CollectingVisitor::new();
    patient.accept("Patient", None, &mut visitor);

    // The visitor holds borrows of the tree itself, usable after traversal.
    let names: Vec<&str> = visitor.result().iter().map(|n| n.type_name()).collect();
    assert!(names.contains(&"Patient"));
    assert!(names.contains(&"Identifier"));
    assert!(names.contains(&"Reference"));
}
