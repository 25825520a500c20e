use anyhow::{anyhow, Result};
use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn";
const DEBUG_DIRECTIVES: &str = "wscctl=debug,wsc_cli=debug,wsc_registry=debug,sqlx=warn";

/// Initializes the global tracing subscriber.
///
/// `WSCCTL_LOG` (then `RUST_LOG`) overrides the directives, `WSCCTL_LOG_FORMAT=json`
/// switches to JSON lines. Logs go to stderr so command output stays parseable.
pub fn init_subscriber(debug: bool) -> Result<()> {
    let fallback = if debug {
        DEBUG_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    let env_filter = EnvFilter::try_from_env("WSCCTL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let is_json = env::var("WSCCTL_LOG_FORMAT").is_ok_and(|format| format == "json");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = if is_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
