//! Structured logging for the viewer.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. `log` records from dependencies are bridged into
//! the same subscriber.

use std::fs::File;
use std::path::Path;

use orrery_config::Config;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config says otherwise.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written into the log directory.
pub const LOG_FILE: &str = "orrery.log";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the config's `debug.log_level`, which wins over
/// [`DEFAULT_FILTER`]. When `debug_build` is set and `log_dir` can be
/// created, events are also written as JSON lines to [`LOG_FILE`].
///
/// ```no_run
/// use orrery_config::Config;
/// use orrery_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directives = filter_directives(config.map(|c| c.debug.log_level.as_str()));
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = File::create(log_dir.join(LOG_FILE))
    {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// Turn a configured log level into filter directives. A bare level keeps
/// the graphics stack quiet; anything containing directives is used as is.
pub fn filter_directives(level: Option<&str>) -> String {
    match level.map(str::trim) {
        None | Some("") => DEFAULT_FILTER.to_string(),
        Some(level) if level.contains('=') || level.contains(',') => level.to_string(),
        Some(level) => format!("{level},wgpu=warn,naga=warn"),
    }
}

pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

fn json_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter_str = default_env_filter().to_string();
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        assert_eq!(filter_directives(Some("debug")), "debug,wgpu=warn,naga=warn");
        assert_eq!(filter_directives(Some(" trace ")), "trace,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_missing_level_uses_default() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("")), DEFAULT_FILTER);
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        assert_eq!(
            filter_directives(Some("warn,orrery_camera=trace")),
            "warn,orrery_camera=trace"
        );
        assert_eq!(filter_directives(Some("wgpu=info")), "wgpu=info");
    }

    #[test]
    fn test_directives_parse() {
        for level in ["error", "info", "debug,orrery_render=trace"] {
            let directives = filter_directives(Some(level));
            assert!(
                EnvFilter::try_new(&directives).is_ok(),
                "failed to parse filter: {directives}"
            );
        }
    }

    #[test]
    fn test_json_file_layer_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = File::create(&path).unwrap();

        let subscriber = tracing_subscriber::registry().with(json_file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(body = "moon", "orbit updated");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().expect("one json line");
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields"]["message"], "orbit updated");
        assert_eq!(value["fields"]["body"], "moon");
    }
}
