//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "VAULT_LOG";

/// Picks the filter directive.
///
/// Precedence order:
/// 1. `VAULT_LOG` environment variable
/// 2. Config file `log` setting
/// 3. `warn`, raised to `info`, `debug`, `trace` by each `-v`
pub fn filter_directive(env: Option<&str>, config: Option<&str>, verbose: u8) -> String {
    let explicit = env
        .or(config)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(directive) = explicit {
        return directive.to_string();
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
    .to_string()
}

/// Installs a stderr `fmt` subscriber.
///
/// An unparsable directive falls back to `warn`. Installing twice is a no-op.
pub fn init(config_log: Option<&str>, verbose: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env.as_deref(), config_log, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
