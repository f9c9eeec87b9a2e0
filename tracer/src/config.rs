use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Where synthesized spans are exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExporterKind {
    /// OTLP over HTTP to the configured collector.
    #[default]
    Otlp,
    /// Pretty-printed spans on stdout, for local debugging.
    Stdout,
}

/// Connection settings shared by every tracer in the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct TracerSettings {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub collector_host: String,
    #[serde(default = "default_collector_port")]
    pub collector_port: u16,
    #[serde(default = "default_plaintext")]
    pub plaintext: bool,
    /// Header the access token is sent in.
    #[serde(default = "default_access_token_header")]
    pub access_token_header: String,
    /// Component every tracer is registered under.
    #[serde(default = "default_component")]
    pub component: String,
    #[serde(default)]
    pub exporter: ExporterKind,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            collector_host: String::new(),
            collector_port: default_collector_port(),
            plaintext: default_plaintext(),
            access_token_header: default_access_token_header(),
            component: default_component(),
            exporter: ExporterKind::default(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl TracerSettings {
    /// Loads settings from a TOML file and validates them.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let settings: TracerSettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.component.is_empty() {
            return Err(Error::Config("component must not be empty".to_string()));
        }
        if self.exporter == ExporterKind::Otlp {
            if self.collector_host.is_empty() {
                return Err(Error::Config(
                    "collector_host is required for the otlp exporter".to_string(),
                ));
            }
            if self.access_token.is_empty() {
                return Err(Error::Config(
                    "access_token is required for the otlp exporter".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// OTLP/HTTP traces endpoint of the collector.
    pub fn endpoint(&self) -> String {
        let scheme = if self.plaintext { "http" } else { "https" };
        format!(
            "{scheme}://{}:{}/v1/traces",
            self.collector_host, self.collector_port
        )
    }

    pub(crate) fn headers(&self) -> HashMap<String, String> {
        HashMap::from([(self.access_token_header.clone(), self.access_token.clone())])
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_collector_port() -> u16 {
    4318
}

fn default_plaintext() -> bool {
    true
}

fn default_access_token_header() -> String {
    "lightstep-access-token".to_string()
}

fn default_component() -> String {
    "atlas".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}
