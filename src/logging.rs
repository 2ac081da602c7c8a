use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialise logging. In debug mode the default level is `debug` and the
/// `RUST_LOG` environment variable may override it; otherwise the level is
/// fixed at `info`.
///
/// When `log_file` is given, records are appended to that file instead of
/// stderr. Calling this more than once keeps the first subscriber.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let filter = level_filter(debug, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    let file_appender = log_file.and_then(|path| {
        let file_name = path.file_name()?.to_owned();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Some(tracing_appender::rolling::never(dir, file_name))
    });

    let _ = match file_appender {
        Some(appender) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(appender)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}

/// `rust_log` only counts in debug mode. Directives that fail to parse fall
/// back to the mode's default level.
fn level_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    if !debug {
        return EnvFilter::new("info");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("debug"))
}
