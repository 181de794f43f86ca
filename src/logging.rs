use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber
///
/// `RUST_LOG` wins over `level` when set. Also forwards `log` records, which is
/// where actix-web's request logger writes.
pub fn init_tracing(level: &str) {
    let directives = if level.contains('=') {
        level.to_string()
    } else {
        format!("marchen={level},actix_web={level},actix_server=warn")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let result = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}
