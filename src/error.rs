/// Errors produced while turning a raw Atlas line into a [`Record`](crate::Record).
///
/// Only [`Error::MalformedLine`] and [`Error::Timestamp`] ever escape
/// [`parse_line`](crate::parse_line); sub-parser failures are demoted to an
/// unparsed record by the dispatcher.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed line: {0}")]
    MalformedLine(String),
    #[error("broken {kind} record: {reason}")]
    BrokenFormat { kind: &'static str, reason: String },
    #[error("field decode error: {0}")]
    FieldDecode(String),
    #[error("timestamp error: {0}")]
    Timestamp(String),
    #[error("record encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn broken(kind: &'static str, reason: impl Into<String>) -> Self {
        Error::BrokenFormat {
            kind,
            reason: reason.into(),
        }
    }
}
