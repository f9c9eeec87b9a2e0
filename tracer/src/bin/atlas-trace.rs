//! Reads raw Atlas lines, prints their records and exports their spans.
//!
//! ```text
//! tail -F /var/log/atlas.log | atlas-trace --config tracer.toml --print-records
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use atlas_log::{Processor, ProcessorConfig};
use atlas_log_tracer::{pipeline, ExporterKind, TraceWriter, TracerRegistry, TracerSettings};
use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Parse Atlas logs and export transaction spans")]
struct Args {
    /// TOML file with tracer settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File to read lines from. Defaults to stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, env = "ATLAS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, env = "ATLAS_COLLECTOR_HOST")]
    collector_host: Option<String>,

    #[arg(long, env = "ATLAS_COLLECTOR_PORT")]
    collector_port: Option<u16>,

    #[arg(long, value_enum)]
    exporter: Option<ExporterKind>,

    #[arg(long)]
    component: Option<String>,

    #[arg(long)]
    shutdown_timeout_secs: Option<u64>,

    /// Print every parsed record as a JSON line on stdout.
    #[arg(long)]
    print_records: bool,
}

impl Args {
    fn settings(&self) -> Result<TracerSettings, atlas_log_tracer::Error> {
        let mut settings = match &self.config {
            Some(path) => TracerSettings::load(path)?,
            None => TracerSettings::default(),
        };

        if let Some(token) = &self.access_token {
            settings.access_token = token.clone();
        }
        if let Some(host) = &self.collector_host {
            settings.collector_host = host.clone();
        }
        if let Some(port) = self.collector_port {
            settings.collector_port = port;
        }
        if let Some(exporter) = self.exporter {
            settings.exporter = exporter;
        }
        if let Some(component) = &self.component {
            settings.component = component.clone();
        }
        if let Some(secs) = self.shutdown_timeout_secs {
            settings.shutdown_timeout_secs = secs;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let settings = args.settings()?;

    let registry = Arc::new(TracerRegistry::from_settings(&settings));
    let collector = match settings.exporter {
        ExporterKind::Otlp => settings.endpoint(),
        ExporterKind::Stdout => "stdout".to_string(),
    };
    let writer = TraceWriter::new(Arc::clone(&registry), settings.component.clone())
        .with_collector(collector);
    writer.connect()?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let processor = Processor::new(ProcessorConfig::default());
    let mut stdout = io::stdout().lock();
    let records: Option<&mut dyn Write> = if args.print_records {
        Some(&mut stdout)
    } else {
        None
    };
    let totals = pipeline::run(reader, &processor, &writer, records);

    writer.close_async();
    let status = writer.wait_for_close(settings.shutdown_timeout());
    let totals = totals?;

    info!(
        lines = totals.lines,
        skipped = totals.skipped,
        parse_errors = totals.parse_errors,
        spans = totals.spans,
        span_errors = totals.span_errors,
        tracers = registry.len(),
        ?status,
        "done"
    );

    Ok(())
}
