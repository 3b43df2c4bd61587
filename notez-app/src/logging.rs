//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over `general.log_level`. Output goes to stderr so that
//! stdout carries only the processed note.

use tracing_subscriber::EnvFilter;

use notez_core::config::GeneralConfig;

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(general: &GeneralConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { general.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if general.log_format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if installed.is_err() {
        tracing::debug!("Subscriber already installed");
    }
}
