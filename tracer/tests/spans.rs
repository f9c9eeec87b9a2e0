use atlas_log::{parse_line_in_year, Command, Record, Value};
use atlas_log_tracer::{synthesize, SpanError, TagValue};
use chrono::{TimeDelta, TimeZone, Utc};

fn record(line: &str) -> Record {
    parse_line_in_year(line, 2024).expect("line should parse")
}

fn response(fragments: &str) -> Record {
    record(&format!(
        "Aug 22 10:52:07 atl2.shared.phx2 atlas: response,10:52:07.630,195840581/192.168.59.44/49312/416,000000EA|{fragments}"
    ))
}

#[test]
fn header_without_duration_produces_no_span() {
    let record = response("result=0x0,statmsg=QUE,uid=abc");
    assert_eq!(synthesize(&record), Ok(None));
}

#[test]
fn non_request_records_produce_no_span() {
    let lines = [
        "Aug 22 13:24:05 h atlas: hostload,13:24:05.630,ARZ,0,13:24:04,29",
        "Aug 22 13:24:05 h atlas: error,13:42:56.960,0000016A|duration=1",
        "Aug 22 13:24:05 h atlas: syncwait,duration=1",
    ];
    for line in lines {
        assert_eq!(synthesize(&record(line)), Ok(None), "line `{line}`");
    }
}

#[test]
fn response_with_duration_is_timed() {
    let record = response("result=0x0,duration=0.250,uid=abc,sid=xyz");
    let span = synthesize(&record).unwrap().expect("span");

    let start = Utc.with_ymd_and_hms(2024, 8, 22, 10, 52, 7).unwrap();
    assert_eq!(span.operation_name, "response");
    assert_eq!(span.start_time, start);
    assert_eq!(span.end_time, start + TimeDelta::milliseconds(250));
}

#[test]
fn uid_and_sid_are_renamed() {
    let record = response("duration=1,uid=abc,sid=xyz");
    let span = synthesize(&record).unwrap().expect("span");

    assert_eq!(span.tags["guid:correlation_id"], TagValue::from("abc"));
    assert_eq!(span.tags["guid:sid"], TagValue::from("xyz"));
    assert!(!span.tags.contains_key("uid"));
    assert!(!span.tags.contains_key("sid"));
    assert!(!span.tags.contains_key("duration"));
}

#[test]
fn tags_cover_client_header_and_commands() {
    let record = response("duration=2,statmsg=QUE,cache=1|op=lookup,rows=3");
    let span = synthesize(&record).unwrap().expect("span");

    assert_eq!(span.tags["client"], TagValue::from("192.168.59.44"));
    assert_eq!(span.tags["statmsg"], TagValue::from("QUE"));
    assert_eq!(span.tags["cache"], TagValue::Int(1));
    assert_eq!(span.tags["command1.op"], TagValue::from("lookup"));
    assert_eq!(span.tags["command1.rows"], TagValue::Int(3));
    assert_eq!(span.tags.len(), 5);
}

#[test]
fn embedded_json_skips_nested_command_values() {
    let record = response(
        r#"{\"header\":{\"duration\":0.5,\"uid\":\"u-1\",\"flags\":{\"a\":1}},\"body\":{\"n\":1.5,\"ok\":true,\"list\":[1],\"name\":\"x\"}}"#,
    );
    let span = synthesize(&record).unwrap().expect("span");

    assert_eq!(span.end_time - span.start_time, TimeDelta::milliseconds(500));
    assert_eq!(span.tags["guid:correlation_id"], TagValue::from("u-1"));
    // nested header values are kept as JSON text
    assert_eq!(span.tags["flags"], TagValue::from(r#"{"a":1}"#));
    assert_eq!(span.tags["body.n"], TagValue::Float(1.5));
    assert_eq!(span.tags["body.name"], TagValue::from("x"));
    assert!(!span.tags.contains_key("body.ok"));
    assert!(!span.tags.contains_key("body.list"));
}

#[test]
fn requests_are_eligible_too() {
    let line = "Aug 22 10:52:07 h atlas: request,10:52:07.630,1/10.1.1.1/2/3,EA|duration=1";
    let span = synthesize(&record(line)).unwrap().expect("span");
    assert_eq!(span.operation_name, "request");
    assert_eq!(span.tags["client"], TagValue::from("10.1.1.1"));
}

#[test]
fn bad_duration_is_a_span_error() {
    let record = response("duration=soon");
    assert_eq!(
        synthesize(&record),
        Err(SpanError::InvalidDuration("soon".to_string()))
    );

    let record = response("duration=-1");
    assert!(matches!(
        synthesize(&record),
        Err(SpanError::InvalidDuration(_))
    ));
}

#[test]
fn non_scalar_duration_is_unsupported() {
    let mut record = response("duration=1");
    let Command::Response(body) = &mut record.command else {
        unreachable!();
    };
    let mut header = atlas_log::Map::new();
    header.insert("duration".to_string(), Value::Bool(true));
    body.message.insert("header".to_string(), Value::Map(header));

    assert_eq!(
        synthesize(&record),
        Err(SpanError::UnsupportedDuration("true".to_string()))
    );
}

#[test]
fn null_duration_is_ineligible() {
    let record = response(r#"{\"header\":{\"duration\":null,\"uid\":\"u\"}}"#);
    assert_eq!(synthesize(&record), Ok(None));
}
