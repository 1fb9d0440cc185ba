//! Logging integration.
//!
//! The crates log through [`tracing`]. Applications that do not install a
//! subscriber of their own can call [`setup_logging`].

/// Output format for [`setup_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line output for development.
    Pretty,
    /// One JSON object per event.
    #[default]
    Json,
}

/// Sets up the global tracing subscriber.
///
/// `level` is an [`EnvFilter`](tracing_subscriber::EnvFilter) directive such
/// as `"info"` or `"api_pagination_core=debug"`; an invalid directive falls
/// back to `"info"`. Installing twice is a no-op.
pub fn setup_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .try_init()
                .ok();
        }
        LogFormat::Json => {
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_target(true)
                .json()
                .try_init()
                .ok();
        }
    }
}

/// Creates a span covering one pagination call.
///
/// # Examples
///
/// ```
/// use api_pagination_core::logging::pagination_span;
///
/// let span = pagination_span("scope");
/// let _guard = span.enter();
/// tracing::debug!("paginating");
/// ```
pub fn pagination_span(backend: &str) -> tracing::Span {
    tracing::debug_span!("paginate", backend = backend)
}
