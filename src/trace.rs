use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs the global subscriber.
///
/// `levels` is an `EnvFilter` directive such as `info` or
/// `als_analytics=debug,tonic=info`. Installing twice is a no-op, so tests
/// may call this repeatedly.
pub fn init(color: bool, json: bool, levels: &str) {
    let filter = EnvFilter::try_new(levels).unwrap_or_else(|error| {
        eprintln!("Invalid log filter {levels:?}, falling back to `info`: {error}");
        EnvFilter::new("info")
    });

    let registry = Registry::default().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().flatten_event(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_ansi(color)).try_init()
    };

    // Already installed by an earlier call.
    let _ = result;
}
