//! Tracing setup for the engine.

/// Initialize tracing subscriber for logging.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
