/*!
 * Structured Tracing
 * Subscriber setup and per-tick spans using the tracing crate
 */

use crate::core::limits::SLOW_TICK_THRESHOLD;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SONIFIER_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SONIFIER_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Generate a unique trace ID for tick correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one scheduler pass
pub struct TickSpan {
    span: tracing::Span,
    start: Instant,
    kind: &'static str,
    trace_id: String,
}

impl TickSpan {
    pub fn new(kind: &'static str) -> Self {
        let trace_id = generate_trace_id();
        let span = span!(
            Level::DEBUG,
            "tick",
            trace_id = %trace_id,
            kind = kind,
            hosts = tracing::field::Empty,
            evicted = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            kind,
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn record_hosts(&self, hosts: usize) {
        self.span.record("hosts", hosts);
    }

    pub fn record_evicted(&self, evicted: usize) {
        self.span.record("evicted", evicted);
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for TickSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_TICK_THRESHOLD {
            warn!(
                trace_id = %self.trace_id,
                kind = self.kind,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow tick detected"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                kind = self.kind,
                duration_us = duration.as_micros() as u64,
                "tick completed"
            );
        }
    }
}
