use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::Error;

/// Width of the syslog style `Mon D HH:MM:SS` prefix.
pub const TIMESTAMP_WIDTH: usize = 15;

/// The fixed-layout parts of a raw line.
///
/// `Aug 22 15:18:32 atl2.shared.phx2 atlas: response,...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHeader<'a> {
    pub timestamp: &'a str,
    pub hostname: &'a str,
    /// Label between hostname and payload, without its trailing colon.
    pub component: &'a str,
    pub payload: &'a str,
}

pub fn split_header(line: &str) -> Result<LineHeader<'_>, Error> {
    let (Some(timestamp), Some(rest)) =
        (line.get(..TIMESTAMP_WIDTH), line.get(TIMESTAMP_WIDTH + 1..))
    else {
        return Err(Error::MalformedLine(format!(
            "expected a {TIMESTAMP_WIDTH} character timestamp prefix in `{line}`"
        )));
    };

    let (hostname, rest) = rest
        .split_once(' ')
        .ok_or_else(|| Error::MalformedLine(format!("no hostname separator in `{line}`")))?;
    let (component, payload) = rest
        .split_once(' ')
        .ok_or_else(|| Error::MalformedLine(format!("no payload separator in `{line}`")))?;

    Ok(LineHeader {
        timestamp,
        hostname,
        component: component.trim_end_matches(':'),
        payload,
    })
}

/// Parses a year-less timestamp, injecting `year`.
pub fn parse_timestamp(text: &str, year: i32) -> Result<DateTime<Utc>, Error> {
    NaiveDateTime::parse_from_str(&format!("{year} {text}"), "%Y %b %e %H:%M:%S")
        .map(|ts| ts.and_utc())
        .map_err(|err| Error::Timestamp(format!("`{text}`: {err}")))
}
