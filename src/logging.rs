//! Tracing setup for the CLI.
use tracing_subscriber::{prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "reqs_to_env=warn";
const VERBOSE_FILTER: &str = "reqs_to_env=debug";

/// Install a stderr subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
