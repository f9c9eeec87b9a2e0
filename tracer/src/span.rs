//! Derives a trace span from a parsed record.
//!
//! Only request/response records whose `header` fragment carries a
//! `duration` (decimal seconds) describe a timed transaction. The span starts
//! at the record timestamp and ends `duration` later.

use std::collections::BTreeMap;

use atlas_log::{Record, Value};
use chrono::{DateTime, TimeDelta, Utc};

use crate::error::SpanError;

/// Header keys that are renamed when turned into tags.
const RENAMED_HEADER_KEYS: [(&str, &str); 2] =
    [("uid", "guid:correlation_id"), ("sid", "guid:sid")];

#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl TagValue {
    /// Strings and numbers only.
    fn scalar(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(TagValue::String(s.clone())),
            Value::Int(n) => Some(TagValue::Int(*n)),
            Value::Float(n) => Some(TagValue::Float(*n)),
            _ => None,
        }
    }

    /// Any non-null value; nested values are flattened to JSON text.
    fn any(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(TagValue::Bool(*b)),
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(value).ok().map(TagValue::String)
            }
            scalar => Self::scalar(scalar),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::String(s.to_string())
    }
}

impl From<TagValue> for opentelemetry::Value {
    fn from(tag: TagValue) -> Self {
        match tag {
            TagValue::String(s) => s.into(),
            TagValue::Int(n) => n.into(),
            TagValue::Float(n) => n.into(),
            TagValue::Bool(b) => b.into(),
        }
    }
}

/// Everything needed to start, tag and finish one span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanSpec {
    pub operation_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tags: BTreeMap<String, TagValue>,
}

/// Builds the span for `record`, or `None` when the record is not a timed
/// request/response.
pub fn synthesize(record: &Record) -> Result<Option<SpanSpec>, SpanError> {
    let Some(body) = record.command.req_resp() else {
        return Ok(None);
    };
    let Some(header) = body.message.get("header").and_then(Value::as_map) else {
        return Ok(None);
    };
    let Some(duration) = header.get("duration").filter(|d| !d.is_null()) else {
        return Ok(None);
    };

    let end_time = parse_duration(duration).and_then(|d| {
        record
            .timestamp
            .checked_add_signed(d)
            .ok_or_else(|| SpanError::InvalidDuration(d.to_string()))
    })?;

    let mut tags = BTreeMap::new();
    tags.insert("client".to_string(), TagValue::from(body.client.ip.as_str()));

    for (key, value) in &body.message {
        if key == "header" {
            for (sub_key, sub_value) in header {
                if sub_key == "duration" {
                    continue;
                }
                let Some(tag) = TagValue::any(sub_value) else {
                    continue;
                };
                let name = RENAMED_HEADER_KEYS
                    .iter()
                    .find(|(from, _)| *from == sub_key.as_str())
                    .map_or(sub_key.as_str(), |(_, to)| *to);
                tags.insert(name.to_string(), tag);
            }
            continue;
        }

        let Some(fields) = value.as_map() else {
            continue;
        };
        for (sub_key, sub_value) in fields {
            if let Some(tag) = TagValue::scalar(sub_value) {
                tags.insert(format!("{key}.{sub_key}"), tag);
            }
        }
    }

    Ok(Some(SpanSpec {
        operation_name: record.command_type.clone(),
        start_time: record.timestamp,
        end_time,
        tags,
    }))
}

fn parse_duration(value: &Value) -> Result<TimeDelta, SpanError> {
    let (secs, text) = match value {
        Value::String(s) => (s.trim().parse::<f64>().ok(), s.clone()),
        Value::Int(n) => (Some(*n as f64), n.to_string()),
        Value::Float(n) => (Some(*n), n.to_string()),
        other => {
            return Err(SpanError::UnsupportedDuration(
                serde_json::to_string(other).unwrap_or_default(),
            ))
        }
    };

    secs.filter(|s| s.is_finite() && *s >= 0.0)
        .and_then(|s| std::time::Duration::try_from_secs_f64(s).ok())
        .and_then(|d| TimeDelta::from_std(d).ok())
        .ok_or(SpanError::InvalidDuration(text))
}
