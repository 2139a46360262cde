//! Subscriber assembly.

use super::exporter;
use crate::infrastructure::expand_tilde;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "notifeed";

/// Installs the global tracing subscriber.
///
/// Idempotent: only the first call in a process takes effect. Failure to prepare
/// the trace file disables span export but keeps stderr logging.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.trace_level.as_deref().unwrap_or("info")));

    let otel_layer = config
        .trace_file
        .as_deref()
        .and_then(prepare_trace_file)
        .map(|path| {
            let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
            let provider = exporter::create_tracer_provider(path, resource);
            let tracer = provider.tracer(SERVICE_NAME);
            opentelemetry::global::set_tracer_provider(provider);
            OpenTelemetryLayer::new(tracer)
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(otel_layer)
        .try_init();
}

fn prepare_trace_file(raw: &str) -> Option<PathBuf> {
    let path = PathBuf::from(expand_tilde(raw));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("notifeed: span export disabled, cannot create {}: {e}", parent.display());
            return None;
        }
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_file_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("spans.jsonl");

        let prepared = prepare_trace_file(file.to_str().unwrap()).unwrap();

        assert_eq!(prepared, file);
        assert!(dir.path().join("nested").is_dir());
    }
}
