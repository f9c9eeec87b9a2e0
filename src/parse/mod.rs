//! Line parsing: header splitting, format dispatch and the sub-parsers.

mod error_log;
mod header;
mod hostload;
mod opuse;
mod reqresp;

use chrono::{Datelike, Utc};
use tracing::debug;

pub use header::{LineHeader, TIMESTAMP_WIDTH, parse_timestamp, split_header};

use crate::error::Error;
use crate::record::{Command, Record};

/// What a sub-parser produced, before the line header is attached.
#[derive(Debug)]
pub(crate) struct ParsedCommand {
    pub command_type: String,
    pub command: Command,
}

type SubParser = fn(&str) -> Result<ParsedCommand, Error>;

/// Payload prefixes, checked in order.
const SUB_PARSERS: [(&str, SubParser); 5] = [
    ("response,", reqresp::parse),
    ("request,", reqresp::parse),
    ("error,", error_log::parse),
    ("opuse,", opuse::parse),
    ("hostload,", hostload::parse),
];

/// Parses one raw line, injecting the current year into its timestamp.
pub fn parse_line(line: &str) -> Result<Record, Error> {
    parse_line_in_year(line, Utc::now().year())
}

/// Parses one raw line with an explicit year for the timestamp.
///
/// Lines whose payload no sub-parser accepts still produce a record with an
/// [`Command::Unparsed`] body. Only a malformed header or an unparseable
/// timestamp is an error.
#[tracing::instrument(name = "parse_line", level = "debug", skip_all, fields(len = line.len()))]
pub fn parse_line_in_year(line: &str, year: i32) -> Result<Record, Error> {
    let header = split_header(line)?;
    let parsed = dispatch(header.payload);
    let timestamp = parse_timestamp(header.timestamp, year)?;

    Ok(Record {
        command_type: parsed.command_type,
        hostname: header.hostname.to_string(),
        timestamp,
        command: parsed.command,
    })
}

pub(crate) fn dispatch(payload: &str) -> ParsedCommand {
    let Some((_, parse)) = SUB_PARSERS
        .iter()
        .find(|(prefix, _)| payload.starts_with(prefix))
    else {
        return unparsed(payload);
    };

    parse(payload).unwrap_or_else(|err| {
        debug!(error = %err, "demoting line to unparsed");
        unparsed(payload)
    })
}

fn unparsed(payload: &str) -> ParsedCommand {
    let command_type = match payload.split(',').next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => "unparsed".to_string(),
    };

    ParsedCommand {
        command_type,
        command: Command::Unparsed(payload.to_string()),
    }
}

pub(crate) fn int_field(kind: &'static str, name: &str, field: &str) -> Result<i64, Error> {
    field
        .parse()
        .map_err(|_| Error::broken(kind, format!("{name} `{field}` is not an integer")))
}
