//! Tracing setup: human-readable logs plus optional span export to a file.
//!
//! ```text
//! tracing macros ─┬─▶ fmt layer ─▶ stderr
//!                 └─▶ tracing-opentelemetry ─▶ SDK ─▶ FileSpanExporter ─▶ JSON lines
//! ```
//!
//! The filter comes from `RUST_LOG` when set, otherwise from
//! [`Config::trace_level`](crate::Config::trace_level), otherwise `info`. Span
//! export is only enabled when [`Config::trace_file`](crate::Config::trace_file)
//! is set.
//!
//! # Modules
//!
//! - [`init`]: Subscriber assembly
//! - `exporter`: OpenTelemetry span exporter writing one JSON object per span
//! - `writer`: Size-rotated append-only file

mod exporter;
pub mod init;
mod writer;

pub use init::init_tracing;
