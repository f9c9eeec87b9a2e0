//! Line-at-a-time driver: raw log lines in, records and spans out.

use std::io::{self, BufRead, Write};

use atlas_log::Processor;
use tracing::warn;

use crate::writer::{TraceWriter, WriteOutcome};

/// What happened to the lines of one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub lines: usize,
    /// Empty lines and `null` markers.
    pub skipped: usize,
    pub parse_errors: usize,
    pub spans: usize,
    pub span_errors: usize,
}

/// Feeds every line of `reader` through `processor` and then `writer`.
///
/// Lines are read as raw bytes, so a line that is not valid UTF-8 only
/// counts as a parse error. When `records` is set, each parsed record is
/// also written to it as one JSON line. Only I/O errors stop the run.
pub fn run<R: BufRead>(
    reader: R,
    processor: &Processor,
    writer: &TraceWriter,
    mut records: Option<&mut dyn Write>,
) -> io::Result<Totals> {
    let mut totals = Totals::default();

    for line in reader.split(b'\n') {
        let mut line = line?;
        totals.lines += 1;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            totals.skipped += 1;
            continue;
        }

        let mut message = [line];
        let summary = processor.process(&mut message);
        totals.skipped += summary.skipped;
        totals.parse_errors += summary.failed;
        if summary.parsed == 0 {
            continue;
        }
        let [json] = message;

        if let Some(out) = records.as_deref_mut() {
            out.write_all(&json)?;
            out.write_all(b"\n")?;
        }

        match writer.write_json(&json) {
            Ok(WriteOutcome::Emitted) => totals.spans += 1,
            Ok(WriteOutcome::Skipped) => {}
            Err(err) => {
                warn!(line = totals.lines, error = %err, "failed to emit span");
                totals.span_errors += 1;
            }
        }
    }

    Ok(totals)
}
