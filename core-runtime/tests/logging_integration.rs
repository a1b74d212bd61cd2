//! Integration tests for logging system

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_query, LogFormat, LoggingConfig,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CollectingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// Global subscriber can only be installed once per process, so every
// assertion that depends on it lives in this one test.
#[test]
fn test_init_logging_forwards_to_sink_once() {
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_filter("logging_integration=debug")
        .with_logger_sink(sink.clone());

    init_logging(config.clone()).unwrap();

    tracing::warn!(password = "hunter2", route = "/login", "Session rejected");
    tracing::trace!("below the filter");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].message, "Session rejected");
        assert_eq!(
            entries[0].fields.get("password"),
            Some(&"[REDACTED]".to_string())
        );
        assert_eq!(entries[0].fields.get("route"), Some(&"/login".to_string()));
    }

    assert!(init_logging(config).is_err());
}

#[test]
fn test_pii_redaction_secrets() {
    assert_eq!(redact_if_sensitive("token", "eyJhbGciOi"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("new_password", "pw"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("authorization", "Bearer abc"), "[REDACTED]");
}

#[test]
fn test_pii_redaction_emails() {
    let redacted = redact_if_sensitive("email", "student@campus.edu");
    assert!(redacted.starts_with('s'));
    assert!(!redacted.contains("campus.edu"));
}

#[test]
fn test_pii_redaction_normal_values() {
    assert_eq!(redact_if_sensitive("job_id", "job-42"), "job-42");
    assert_eq!(redact_if_sensitive("title", "Rust Intern"), "Rust Intern");
}

#[test]
fn test_query_stripping() {
    assert_eq!(
        strip_query("https://api.edumesh.io/api/v1/auth/verify-email?token=abc"),
        "https://api.edumesh.io/api/v1/auth/verify-email"
    );
    assert_eq!(strip_query(""), "");
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}
