use atlas_log::{Processor, ProcessorConfig, parse_line_in_year};
use tracing_fluent_assertions::{AssertionRegistry, AssertionsLayer};
use tracing_subscriber::{Registry, layer::SubscriberExt};

const HOSTLOAD_LINE: &str =
    "Aug 22 13:24:05 atl1.shared.phx2 atlas: hostload,13:24:05.630,ARZ,0,13:24:04,29";

#[test]
fn each_line_is_parsed_inside_a_span() {
    let assertion_registry = AssertionRegistry::default();
    let layer = AssertionsLayer::new(&assertion_registry);
    let subscriber = Registry::default().with(layer);

    let parse_span = assertion_registry
        .build()
        .with_name("parse_line")
        .was_entered()
        .was_closed()
        .finalize();

    tracing::subscriber::with_default(subscriber, || {
        parse_line_in_year(HOSTLOAD_LINE, 2024).unwrap();
        parse_line_in_year("Aug 22 13:24:05 h atlas: whatever", 2024).unwrap();
    });

    parse_span.assert();
}

#[test]
fn processor_replaces_parsed_parts_only() {
    let mut message = vec![
        format!("\"{HOSTLOAD_LINE};\"").into_bytes(),
        b"null".to_vec(),
        b"\"too short\"".to_vec(),
    ];

    let assertion_registry = AssertionRegistry::default();
    let layer = AssertionsLayer::new(&assertion_registry);
    let subscriber = Registry::default().with(layer);

    let parse_span = assertion_registry
        .build()
        .with_name("parse_line")
        .was_entered()
        .was_closed()
        .finalize();

    let summary = tracing::subscriber::with_default(subscriber, || {
        Processor::new(ProcessorConfig::default()).process(&mut message)
    });

    parse_span.assert();
    assert_eq!(summary.parsed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 1);

    let json: serde_json::Value = serde_json::from_slice(&message[0]).unwrap();
    assert_eq!(json["command"]["hostload"]["vax"], "ARZ");
    assert_eq!(message[1], b"null");
    assert_eq!(message[2], b"\"too short\"");
}

#[test]
fn processor_targets_selected_parts() {
    let line = format!("\"{HOSTLOAD_LINE}\"").into_bytes();
    let mut message = vec![line.clone(), line.clone()];

    let processor = Processor::new(ProcessorConfig { parts: vec![1, 7] });
    let summary = processor.process(&mut message);

    assert_eq!(summary.parsed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(message[0], line);
    assert_ne!(message[1], line);
}
