//! Upstream transport framing.
//!
//! Lines arrive quoted (`"Aug 22 ...;"`), and the transport emits a bare
//! `null` for message parts that carry nothing.

/// Marker for a message part with no line in it.
pub const NULL_MARKER: &str = "null";

/// Strips the transport quoting from a raw message part.
///
/// Returns `None` for the [`NULL_MARKER`]. Quotes are only removed when both
/// ends carry one; a single trailing `;` is removed afterwards.
pub fn strip_transport_quoting(raw: &str) -> Option<&str> {
    if raw == NULL_MARKER {
        return None;
    }

    let line = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner,
        None => raw,
    };

    Some(line.strip_suffix(';').unwrap_or(line))
}
