//! Output stage that turns parsed records into spans.
//!
//! Mirrors the lifecycle a host pipeline drives: `connect`, a stream of
//! `write` calls, then `close_async` followed by a bounded `wait_for_close`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use atlas_log::Record;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::registry::TracerRegistry;
use crate::span::synthesize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Emitted,
    /// The record does not describe a timed transaction.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStatus {
    Flushed,
    TimedOut,
    /// `close_async` was never called.
    NotClosing,
}

enum CloseState {
    Open,
    Closing(Receiver<usize>),
    Closed,
}

pub struct TraceWriter {
    registry: Arc<TracerRegistry>,
    component: String,
    collector: String,
    close: Mutex<CloseState>,
}

impl TraceWriter {
    pub fn new(registry: Arc<TracerRegistry>, component: impl Into<String>) -> Self {
        Self {
            registry,
            component: component.into(),
            collector: String::new(),
            close: Mutex::new(CloseState::Open),
        }
    }

    /// Collector address reported by [`connect`](Self::connect).
    pub fn with_collector(mut self, collector: impl Into<String>) -> Self {
        self.collector = collector.into();
        self
    }

    pub fn connect(&self) -> Result<(), Error> {
        info!(collector = %self.collector, component = %self.component, "sending traces");
        Ok(())
    }

    /// Emits the span for `record` through its host's tracer.
    pub fn write(&self, record: &Record) -> Result<WriteOutcome, Error> {
        let Some(spec) = synthesize(record)? else {
            return Ok(WriteOutcome::Skipped);
        };

        let tracer = self
            .registry
            .get_or_create(&record.hostname, &self.component)?;
        tracer.emit(&spec);
        debug!(
            hostname = %record.hostname,
            operation = %spec.operation_name,
            tags = spec.tags.len(),
            "emitted span"
        );
        Ok(WriteOutcome::Emitted)
    }

    /// Same as [`write`](Self::write) for a record in its serialized form.
    pub fn write_json(&self, raw: &[u8]) -> Result<WriteOutcome, Error> {
        let record: Record = serde_json::from_slice(raw)?;
        self.write(&record)
    }

    /// Starts flushing every tracer in the background. Later calls are no-ops.
    pub fn close_async(&self) {
        let mut state = self.close.lock();
        if !matches!(*state, CloseState::Open) {
            return;
        }

        let (done, finished) = mpsc::channel();
        let registry = Arc::clone(&self.registry);
        thread::spawn(move || {
            let failed = registry.flush_all();
            let _ = done.send(failed);
        });
        *state = CloseState::Closing(finished);
    }

    /// Waits up to `timeout` for the flush started by
    /// [`close_async`](Self::close_async).
    pub fn wait_for_close(&self, timeout: Duration) -> CloseStatus {
        let mut state = self.close.lock();
        let status = match &*state {
            CloseState::Open => return CloseStatus::NotClosing,
            CloseState::Closed => return CloseStatus::Flushed,
            CloseState::Closing(finished) => match finished.recv_timeout(timeout) {
                Ok(failed) => {
                    if failed > 0 {
                        warn!(failed, "some tracers failed to flush");
                    }
                    CloseStatus::Flushed
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(?timeout, "timed out waiting for tracers to flush");
                    return CloseStatus::TimedOut;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("tracer flush thread exited early");
                    CloseStatus::Flushed
                }
            },
        };
        *state = CloseState::Closed;
        status
    }
}
