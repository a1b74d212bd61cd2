//! # Logging
//!
//! `tracing-subscriber` setup for the EduMesh core.
//!
//! [`init_logging`] installs a global subscriber with an [`EnvFilter`], one
//! formatting layer (pretty, JSON or compact) and a layer that mirrors every
//! surviving event into the host's [`LoggerSink`], if one is configured.
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use bridge_traits::time::{ConsoleLogger, LogLevel};
//! use std::sync::Arc;
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Compact)
//!         .with_level(LogLevel::Debug)
//!         .with_logger_sink(Arc::new(ConsoleLogger::default())),
//! )?;
//! tracing::info!("EduMesh core started");
//! ```
//!
//! ## Redaction
//!
//! Fields named like secrets (`token`, `password`, `authorization`, ...) and
//! values that look like email addresses are masked before they reach the
//! sink. Request URLs are logged through [`strip_query`] because reset and
//! verification links carry one-time tokens.

use crate::error::{Error, Result};
use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Crates logged at the configured level when no custom filter is given
const WORKSPACE_CRATES: &[&str] = &[
    "edumesh_workspace",
    "core_runtime",
    "core_auth",
    "core_api",
    "core_state",
    "core_calendar",
    "core_mfe",
    "core_service",
    "bridge_desktop",
];

/// Field names containing any of these are masked entirely
const SECRET_FIELD_MARKERS: &[&str] = &[
    "token",
    "password",
    "secret",
    "api_key",
    "authorization",
    "bearer",
];

/// Dependencies kept quiet unless a custom filter says otherwise
const NOISY_DEPENDENCIES: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "rustls", "sqlx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored
    Pretty,
    /// One JSON object per event
    Json,
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level for workspace crates; ignored when `filter` is set
    pub level: LogLevel,
    /// Mask secrets and emails in entries forwarded to the sink
    pub redact_pii: bool,
    /// Full `EnvFilter` directive string, e.g. `core_api=debug,core_state=trace`
    pub filter: Option<String>,
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            redact_pii: true,
            filter: None,
            logger_sink: None,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("redact_pii", &self.redact_pii)
            .field("filter", &self.filter)
            .field("has_logger_sink", &self.logger_sink.is_some())
            .finish()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_pii_redaction(mut self, redact: bool) -> Self {
        self.redact_pii = redact;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// `Error::Config` if the filter does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    let fmt_layer = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
    };
    let sink_layer = LoggerSinkLayer {
        sink: config.logger_sink.clone(),
        redact: config.redact_pii,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(sink_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            let level = config.level.as_str().to_ascii_lowercase();
            WORKSPACE_CRATES
                .iter()
                .map(|krate| format!("{}={}", krate, level))
                .chain(NOISY_DEPENDENCIES.iter().map(|dep| format!("{}=warn", dep)))
                .collect::<Vec<_>>()
                .join(",")
        }
    };

    EnvFilter::try_new(directives).map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

/// Mirrors events into a [`LoggerSink`]
struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
    redact: bool,
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let metadata = event.metadata();
        let level = log_level(metadata.level());
        if level < sink.min_level() {
            return;
        }

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let message = fields.message.unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        for (key, value) in fields.values {
            let value = if self.redact {
                redact_if_sensitive(&key, &value)
            } else {
                value
            };
            entry = entry.with_field(key, value);
        }
        entry.span_id = ctx.lookup_current().map(|span| span.name().to_string());

        let sink = Arc::clone(sink);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = sink.log(entry).await {
                        eprintln!("LoggerSink error: {}", err);
                    }
                });
            }
            Err(_) => {
                if let Err(err) = futures::executor::block_on(sink.log(entry)) {
                    eprintln!("LoggerSink error: {}", err);
                }
            }
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: HashMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{:?}", value));
    }
}

fn log_level(level: &tracing::Level) -> LogLevel {
    match *level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

/// Mask a value for logging based on its field name and shape
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("token", "abc.def"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("email", "ada@uni.edu"), "a***@[REDACTED]");
/// assert_eq!(redact_if_sensitive("job_id", "42"), "42");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    let name = field_name.to_ascii_lowercase();
    if SECRET_FIELD_MARKERS.iter().any(|marker| name.contains(marker)) {
        return "[REDACTED]".to_string();
    }

    let looks_like_email = value.contains('@') && value.contains('.');
    if !looks_like_email {
        return value.to_string();
    }

    match value.chars().next().filter(|c| *c != '@') {
        Some(first) => format!("{}***@[REDACTED]", first),
        None => "***@[REDACTED]".to_string(),
    }
}

/// Strip the query string from a URL before logging it
///
/// Reset and verification links carry one-time tokens in the query.
///
/// ```
/// use core_runtime::logging::strip_query;
///
/// assert_eq!(strip_query("https://api.edumesh.io/v1/jobs?page=2"), "https://api.edumesh.io/v1/jobs");
/// ```
pub fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as SinkResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingSink {
        entries: Mutex<Vec<LogEntry>>,
    }

    #[async_trait]
    impl LoggerSink for CapturingSink {
        async fn log(&self, entry: LogEntry) -> SinkResult<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            LogLevel::Debug
        }
    }

    fn capture(redact: bool, emit: impl FnOnce()) -> Vec<LogEntry> {
        let sink = Arc::new(CapturingSink::default());
        let forward_to: Arc<dyn LoggerSink> = sink.clone();
        let layer = LoggerSinkLayer {
            sink: Some(forward_to),
            redact,
        };
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, emit);
        let entries = sink.entries.lock().unwrap().clone();
        entries
    }

    #[test]
    fn test_default_filter_quiets_dependencies() {
        let filter = build_filter(&LoggingConfig::default().with_level(LogLevel::Debug))
            .unwrap()
            .to_string();
        assert!(filter.contains("core_state=debug"));
        assert!(filter.contains("reqwest=warn"));
        assert!(!filter.contains("core_state=info"));
    }

    #[test]
    fn test_custom_filter_replaces_defaults() {
        let config = LoggingConfig::default().with_filter("core_auth=trace");
        let filter = build_filter(&config).unwrap().to_string();
        assert!(filter.contains("core_auth=trace"));
        assert!(!filter.contains("reqwest"));

        let bad = LoggingConfig::default().with_filter("core_auth=loud");
        assert!(matches!(build_filter(&bad), Err(Error::Config(_))));
    }

    #[test]
    fn test_sink_receives_redacted_fields() {
        let entries = capture(true, || {
            tracing::warn!(target: "core_auth", token = "abc.def", attempt = 2, "token rejected");
            tracing::trace!("below sink level");
        });

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.target, "core_auth");
        assert_eq!(entry.message, "token rejected");
        assert_eq!(entry.fields.get("token").map(String::as_str), Some("[REDACTED]"));
        assert_eq!(entry.fields.get("attempt").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_redaction_can_be_disabled() {
        let entries = capture(false, || {
            tracing::info!(email = "ada@uni.edu", "profile loaded");
        });
        assert_eq!(
            entries[0].fields.get("email").map(String::as_str),
            Some("ada@uni.edu")
        );
    }

    #[test]
    fn test_span_name_is_attached() {
        let entries = capture(true, || {
            let span = tracing::info_span!("fetch_jobs");
            let _enter = span.enter();
            tracing::debug!("request sent");
        });
        assert_eq!(entries[0].span_id.as_deref(), Some("fetch_jobs"));
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert_eq!(redact_if_sensitive("Authorization", "Bearer x"), "[REDACTED]");
        assert_eq!(redact_if_sensitive("email", "user@example.com"), "u***@[REDACTED]");
        assert_eq!(redact_if_sensitive("job_id", "12345"), "12345");
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/jobs#top"), "/jobs");
        assert_eq!(strip_query("/jobs"), "/jobs");
    }
}
