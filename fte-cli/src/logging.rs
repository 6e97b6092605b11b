use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr so stdout only carries the report.
/// `RUST_LOG` wins over `default_level` when it parses.
pub fn init(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(std::env::var("RUST_LOG").ok().as_deref(), default_level))
        .with_writer(std::io::stderr)
        .init();
}

fn env_filter(rust_log: Option<&str>, default_level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}
