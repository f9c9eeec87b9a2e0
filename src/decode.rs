//! Field decoder for message fragments.
//!
//! A fragment is either an embedded JSON object (usually with its quotes
//! escaped by the upstream transport) or a flat `key=value,key=value` list.

use crate::error::Error;
use crate::value::{Map, Value};

/// Raw field names that upstream emits and that break decoding.
const REWRITES: [(&str, &str); 2] = [("CITY-S", "CITY_S"), ("LINE#", "LINENUM")];

/// Decodes a message fragment into a field map.
///
/// JSON-shaped fragments keep their nesting. Anything else goes through the
/// `key=value` fallback, which yields a flat map of integers and strings.
pub fn unwrap(fragment: &str) -> Result<Map, Error> {
    let mut fragment = fragment.to_string();
    for (from, to) in REWRITES {
        if fragment.contains(from) {
            fragment = fragment.replace(from, to);
        }
    }

    if fragment.trim_start().starts_with('{') {
        if let Some(map) = decode_json(&fragment) {
            return Ok(map);
        }
    }

    decode_pairs(&fragment)
}

fn decode_json(fragment: &str) -> Option<Map> {
    // The whole line arrives as a quoted string, so embedded objects usually
    // carry `\"` escapes. Try the unescaped form before the raw one.
    let unescaped = serde_json::from_str::<String>(&format!("\"{fragment}\"")).ok();

    unescaped
        .as_deref()
        .into_iter()
        .chain(std::iter::once(fragment))
        .find_map(|candidate| serde_json::from_str::<Map>(candidate).ok())
}

fn decode_pairs(fragment: &str) -> Result<Map, Error> {
    let mut map = Map::new();

    for pair in fragment.split(',').filter(|p| !p.is_empty()) {
        let mut parts = pair.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::FieldDecode(format!("invalid k=v: {pair}")));
        };
        map.insert(key.to_string(), Value::from_field(value));
    }

    Ok(map)
}
