//! OpenTelemetry span exporter writing one JSON object per finished span.

use super::writer::RotatingWriter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::Value;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

struct FileSpanExporter {
    writer: RotatingWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, resource: &Resource) -> Self {
        let service = resource
            .iter()
            .find(|(key, _)| key.as_str() == "service.name")
            .map_or_else(String::new, |(_, value)| value.to_string());
        Self {
            writer: RotatingWriter::new(file_path),
            service,
            is_shutdown: AtomicBool::new(false),
        }
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        let result = batch
            .iter()
            .map(|span| span_to_json(&self.service, span).to_string())
            .try_for_each(|line| self.writer.write_line(&line))
            .map_err(|e| TraceError::from(e.to_string()));

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Builds a tracer provider that exports every span synchronously to `file_path`.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

fn span_to_json(service: &str, span: &SpanData) -> JsonValue {
    let fields: Map<String, JsonValue> = span
        .attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_to_json(&kv.value)))
        .collect();

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            let fields: Map<String, JsonValue> = event
                .attributes
                .iter()
                .map(|kv| (kv.key.to_string(), attribute_to_json(&kv.value)))
                .collect();
            json!({
                "name": event.name,
                "timeUnixNano": unix_nanos(event.timestamp),
                "fields": fields,
            })
        })
        .collect();

    let parent = (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id));
    let duration_us = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or(Duration::ZERO)
        .as_micros();

    json!({
        "service": service,
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "startTimeUnixNano": unix_nanos(span.start_time),
        "durationMicros": u64::try_from(duration_us).unwrap_or(u64::MAX),
        "fields": fields,
        "events": events,
        "error": match &span.status {
            Status::Error { description } => Some(description.to_string()),
            Status::Unset | Status::Ok => None,
        },
    })
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_nanos().to_string()
}

fn attribute_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_values_keep_their_json_type() {
        assert_eq!(attribute_to_json(&Value::Bool(true)), json!(true));
        assert_eq!(attribute_to_json(&Value::I64(7)), json!(7));
        assert_eq!(attribute_to_json(&Value::from("close")), json!("close"));
    }

    #[test]
    fn timestamps_are_unix_nanos() {
        assert_eq!(unix_nanos(UNIX_EPOCH + Duration::from_millis(2)), "2000000");
        assert_eq!(unix_nanos(UNIX_EPOCH), "0");
    }
}
