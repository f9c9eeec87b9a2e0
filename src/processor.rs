//! Applies the line parser to the parts of a multi-part message.

use serde::Deserialize;
use tracing::{error, warn};

use crate::error::Error;
use crate::input::strip_transport_quoting;
use crate::parse::parse_line;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessorConfig {
    /// Indices of the message parts to parse. Empty means every part.
    #[serde(default)]
    pub parts: Vec<usize>,
}

/// Per-message tally of what happened to the targeted parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub parsed: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct Processor {
    config: ProcessorConfig,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// Replaces each targeted part with its JSON record.
    ///
    /// Parts that fail to parse are logged and left as they were; `null`
    /// markers are counted as skipped.
    pub fn process(&self, message: &mut [Vec<u8>]) -> ProcessSummary {
        let targets: Vec<usize> = if self.config.parts.is_empty() {
            (0..message.len()).collect()
        } else {
            self.config.parts.clone()
        };

        let len = message.len();
        let mut summary = ProcessSummary::default();
        for index in targets {
            let Some(part) = message.get_mut(index) else {
                warn!(index, parts = len, "message part index out of range");
                summary.skipped += 1;
                continue;
            };

            match process_part(part) {
                Ok(Some(json)) => {
                    *part = json;
                    summary.parsed += 1;
                }
                Ok(None) => summary.skipped += 1,
                Err(err) => {
                    error!(index, error = %err, "failed to parse message part");
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

fn process_part(part: &[u8]) -> Result<Option<Vec<u8>>, Error> {
    let raw = std::str::from_utf8(part)
        .map_err(|err| Error::MalformedLine(format!("line is not valid UTF-8: {err}")))?;
    let Some(line) = strip_transport_quoting(raw) else {
        return Ok(None);
    };

    parse_line(line)?.to_json().map(Some)
}
