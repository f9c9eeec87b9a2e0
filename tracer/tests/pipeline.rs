use std::io::Cursor;
use std::sync::Arc;

use atlas_log::{Command, Processor, ProcessorConfig, Record};
use atlas_log_tracer::pipeline::{self, Totals};
use atlas_log_tracer::{TraceWriter, TracerIdentity, TracerRegistry};
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};

fn writer_with(exporter: &InMemorySpanExporter) -> TraceWriter {
    let exporter = exporter.clone();
    let registry = TracerRegistry::new(move |identity: &TracerIdentity| {
        Ok(SdkTracerProvider::builder()
            .with_resource(identity.resource())
            .with_simple_exporter(exporter.clone())
            .build())
    });
    TraceWriter::new(Arc::new(registry), "atlas")
}

fn input() -> Vec<u8> {
    let mut input = Vec::new();
    input.extend_from_slice(
        b"Aug 22 13:24:05 atl1.shared.phx2 atlas: hostload,13:24:05.630,ARZ,0,13:24:04,29\n",
    );
    input.extend_from_slice(b"Aug 22 13:24:05 atl1.shared.phx2 atlas: syncwait,\xff\xfe\n");
    input.extend_from_slice(
        b"\"Aug 22 10:52:07 atl2.shared.phx2 atlas: response,10:52:07.630,\
          1/192.168.59.44/2/3,EA|duration=0.25,uid=abc;\"\r\n",
    );
    input.extend_from_slice(b"null\n");
    input.extend_from_slice(
        b"Aug 22 10:52:07 h atlas: response,10:52:07.630,1/10.0.0.1/2/3,EA|duration=later",
    );
    input
}

#[test]
fn invalid_utf8_line_does_not_stop_the_run() {
    let exporter = InMemorySpanExporter::default();
    let writer = writer_with(&exporter);
    let processor = Processor::new(ProcessorConfig::default());
    let mut printed = Vec::new();

    let totals = pipeline::run(
        Cursor::new(input()),
        &processor,
        &writer,
        Some(&mut printed),
    )
    .unwrap();

    assert_eq!(
        totals,
        Totals {
            lines: 5,
            skipped: 1,
            parse_errors: 1,
            spans: 1,
            span_errors: 1,
        }
    );

    let spans = exporter.get_finished_spans().unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "response");
}

#[test]
fn printed_records_are_the_processor_output() {
    let exporter = InMemorySpanExporter::default();
    let writer = writer_with(&exporter);
    let processor = Processor::new(ProcessorConfig::default());
    let mut printed = Vec::new();

    pipeline::run(
        Cursor::new(input()),
        &processor,
        &writer,
        Some(&mut printed),
    )
    .unwrap();

    let records: Vec<Record> = printed
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| Record::from_json(line).unwrap())
        .collect();

    assert_eq!(records.len(), 3);
    assert!(matches!(records[0].command, Command::Hostload(_)));
    assert_eq!(records[1].hostname, "atl2.shared.phx2");
    assert!(matches!(records[1].command, Command::Response(_)));
    assert_eq!(records[2].hostname, "h");
}

#[test]
fn nothing_is_printed_without_a_record_sink() {
    let exporter = InMemorySpanExporter::default();
    let writer = writer_with(&exporter);
    let processor = Processor::new(ProcessorConfig::default());

    let totals = pipeline::run(Cursor::new(input()), &processor, &writer, None).unwrap();

    assert_eq!(totals.lines, 5);
    assert_eq!(totals.spans, 1);
    assert_eq!(exporter.get_finished_spans().unwrap().len(), 1);
}
