//! Per-(hostname, component) tracer sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use opentelemetry::trace::{Span as _, Tracer as _, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ExporterKind, TracerSettings};
use crate::error::Error;
use crate::span::SpanSpec;

/// Instrumentation scope reported on every span.
const INSTRUMENTATION_SCOPE: &str = "atlas-log-tracer";

/// Builds the provider backing a new tracer handle.
pub type ProviderFactory =
    dyn Fn(&TracerIdentity) -> Result<SdkTracerProvider, Error> + Send + Sync;

/// Identifying tags of a tracer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TracerIdentity {
    pub hostname: String,
    pub component: String,
}

impl TracerIdentity {
    pub fn new(hostname: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            component: component.into(),
        }
    }

    /// Registry key, `hostname:component`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.hostname, self.component)
    }

    pub fn resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.component.clone())
            .with_attributes([
                KeyValue::new("host.name", self.hostname.clone()),
                KeyValue::new("component", self.component.clone()),
            ])
            .build()
    }
}

/// A tracer session for one host and component.
pub struct TracerHandle {
    identity: TracerIdentity,
    provider: SdkTracerProvider,
}

impl TracerHandle {
    pub fn identity(&self) -> &TracerIdentity {
        &self.identity
    }

    /// Starts, tags and finishes one span with the given timing.
    pub fn emit(&self, spec: &SpanSpec) {
        let tracer = self.provider.tracer(INSTRUMENTATION_SCOPE);
        let mut span = tracer
            .span_builder(spec.operation_name.clone())
            .with_start_time(spec.start_time)
            .start(&tracer);

        for (key, value) in &spec.tags {
            span.set_attribute(KeyValue::new(key.clone(), value.clone()));
        }

        span.end_with_timestamp(SystemTime::from(spec.end_time));
    }

    pub fn flush(&self) -> Result<(), Error> {
        self.provider.force_flush().map_err(|err| Error::Flush {
            key: self.identity.key(),
            reason: err.to_string(),
        })
    }
}

/// Lazily created tracers, shared by every record of the same host.
pub struct TracerRegistry {
    factory: Box<ProviderFactory>,
    tracers: Mutex<HashMap<String, Arc<TracerHandle>>>,
}

impl TracerRegistry {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&TracerIdentity) -> Result<SdkTracerProvider, Error> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            tracers: Mutex::new(HashMap::new()),
        }
    }

    /// Registry exporting through the exporter selected in `settings`.
    pub fn from_settings(settings: &TracerSettings) -> Self {
        let settings = settings.clone();
        Self::new(move |identity| build_provider(&settings, identity))
    }

    /// Returns the tracer for `hostname:component`, creating it on first use.
    pub fn get_or_create(
        &self,
        hostname: &str,
        component: &str,
    ) -> Result<Arc<TracerHandle>, Error> {
        let identity = TracerIdentity::new(hostname, component);
        let key = identity.key();

        let mut tracers = self.tracers.lock();
        if let Some(handle) = tracers.get(&key) {
            return Ok(Arc::clone(handle));
        }

        let provider = (self.factory)(&identity)?;
        debug!(%key, "created tracer");
        let handle = Arc::new(TracerHandle { identity, provider });
        tracers.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Flushes every tracer, keeping them registered. Returns the number of
    /// tracers that failed to flush.
    pub fn flush_all(&self) -> usize {
        let tracers = self.tracers.lock();
        let mut failed = 0;
        for handle in tracers.values() {
            if let Err(err) = handle.flush() {
                warn!(error = %err, "tracer flush failed");
                failed += 1;
            }
        }
        info!(tracers = tracers.len(), failed, "flushed tracers");
        failed
    }

    pub fn len(&self) -> usize {
        self.tracers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_provider(
    settings: &TracerSettings,
    identity: &TracerIdentity,
) -> Result<SdkTracerProvider, Error> {
    let builder = SdkTracerProvider::builder().with_resource(identity.resource());

    let provider = match settings.exporter {
        ExporterKind::Otlp => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(settings.endpoint())
                .with_headers(settings.headers())
                .build()
                .map_err(|err| Error::Exporter(err.to_string()))?;
            builder.with_batch_exporter(exporter).build()
        }
        ExporterKind::Stdout => builder
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build(),
    };

    Ok(provider)
}
