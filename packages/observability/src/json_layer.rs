//! JSONL layer: one object per event with timestamp, level, service, pid,
//! target, message and the event's structured fields.
//!
//! Redaction happens while fields are recorded, so a credential never sits
//! in an unredacted entry.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::redact::{redact_message, redact_value};

/// One line of the log file.
#[derive(Debug, Serialize)]
pub struct LogEntry<'a> {
    pub timestamp: String,
    pub level: &'static str,
    pub service: &'a str,
    pub pid: u32,
    pub target: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

struct EventFields {
    redact: bool,
    message: String,
    fields: Map<String, Value>,
}

impl EventFields {
    fn put(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return;
        }
        let value = if self.redact {
            redact_value(name, &value)
        } else {
            value
        };
        self.fields.insert(name.to_string(), value);
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.put(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }
}

/// Layer writing [`LogEntry`] lines to `make_writer`.
pub struct JsonLayer<W> {
    service_name: String,
    pid: u32,
    make_writer: W,
    redact: bool,
}

impl<W> JsonLayer<W> {
    pub fn new(service_name: String, make_writer: W, redact: bool) -> Self {
        Self {
            service_name,
            pid: std::process::id(),
            make_writer,
            redact,
        }
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut recorded = EventFields {
            redact: self.redact,
            message: String::new(),
            fields: Map::new(),
        };
        event.record(&mut recorded);

        let message = if self.redact {
            redact_message(&recorded.message)
        } else {
            recorded.message
        };

        let metadata = event.metadata();
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            level: metadata.level().as_str(),
            service: &self.service_name,
            pid: self.pid,
            target: metadata.target(),
            message,
            fields: recorded.fields,
            span: ctx.event_span(event).map(|span| span.name()),
            file: metadata.file(),
            line: metadata.line(),
        };

        if let Ok(json) = serde_json::to_string(&entry) {
            let mut writer = self.make_writer.make_writer();
            let _ = writeln!(writer, "{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_omitted() {
        let entry = LogEntry {
            timestamp: "2024-01-15T10:30:00.000000Z".to_string(),
            level: "INFO",
            service: "cli",
            pid: 12345,
            target: "group_api_client::dispatcher",
            message: "API request".to_string(),
            fields: Map::new(),
            span: None,
            file: Some("src/dispatcher.rs"),
            line: Some(42),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"service\":\"cli\""));
        assert!(json.contains("\"pid\":12345"));
        assert!(!json.contains("\"fields\""));
        assert!(!json.contains("\"span\""));
    }

    #[cfg(feature = "dev")]
    #[test]
    fn layer_redacts_credentials() {
        use crate::dev::LogFile;
        use tracing_subscriber::layer::SubscriberExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let file = LogFile::open(&path).unwrap();
        let subscriber =
            tracing_subscriber::registry().with(JsonLayer::new("cli".into(), file, true));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(id_token = "secret-value", group_id = "g1", attempt = 2u32, "dispatching");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(line["fields"]["id_token"], "[REDACTED]");
        assert_eq!(line["fields"]["group_id"], "g1");
        assert_eq!(line["fields"]["attempt"], 2);
        assert_eq!(line["message"], "dispatching");
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["service"], "cli");
    }
}
