use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG`
/// (default `info` for `crate_name`, `warn` elsewhere).
pub fn init(crate_name: &str) -> Result<()> {
    let default_filter = format!("warn,{}=info,activity_engine=info", crate_name.replace('-', "_"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Initialise tracing for the calling crate.
#[macro_export]
macro_rules! init_tracing {
    () => {
        $crate::logging::init(env!("CARGO_PKG_NAME"))
    };
}
