/// Why a record that looked eligible could not be turned into a span.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SpanError {
    #[error("invalid duration `{0}`")]
    InvalidDuration(String),
    #[error("duration must be a string or a number, got {0}")]
    UnsupportedDuration(String),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to build span exporter: {0}")]
    Exporter(String),
    #[error("failed to flush tracer {key}: {reason}")]
    Flush { key: String, reason: String },
    #[error("span synthesis failed: {0}")]
    Span(#[from] SpanError),
    #[error("invalid record: {0}")]
    Record(#[from] serde_json::Error),
}
