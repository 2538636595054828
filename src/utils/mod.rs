/// Initializes the global tracing subscriber, writing to stderr so command
/// output on stdout stays clean.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "quick_budget=info".parse() {
        filter = filter.add_directive(directive);
    }

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
