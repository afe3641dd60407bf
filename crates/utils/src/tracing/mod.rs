use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used as the filter.
/// Output goes to stderr, with ANSI colours only when stderr is a terminal.
/// Calling this twice returns an error instead of panicking.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one preheating execution
pub fn preheat_span(strategy: &str) -> Span {
    span!(Level::INFO, "preheat", strategy = %strategy)
}

/// Emit a structured event when a preheating run starts dispatching
pub fn preheat_started(strategy: &str, load: u8, concurrency: u32, timeout_ms: u64) {
    debug!(
        strategy = %strategy,
        load = %load,
        concurrency = %concurrency,
        timeout_ms = %timeout_ms,
        "preheat_started"
    );
}

/// Emit a structured event for preheating completion
pub fn preheat_completed(
    strategy: &str,
    duration_ms: u64,
    items: u64,
    success: bool,
    message: &str,
) {
    if success {
        info!(
            strategy = %strategy,
            duration_ms = %duration_ms,
            items = %items,
            "preheat_completed"
        );
    } else {
        warn!(
            strategy = %strategy,
            duration_ms = %duration_ms,
            items = %items,
            message = %message,
            "preheat_failed"
        );
    }
}

/// Emit a structured event when a queued job is discarded
pub fn preheat_dropped(strategy: &str, queue_capacity: usize) {
    warn!(
        strategy = %strategy,
        queue_capacity = %queue_capacity,
        "preheat_dropped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init("debug");
        assert!(init("debug").is_err());
    }
}
