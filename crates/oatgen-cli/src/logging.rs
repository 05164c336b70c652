//! tracing subscriber setup

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "oatgen=info,oatgen_core=info,oatgen_emit=info";
const VERBOSE_FILTER: &str = "oatgen=debug,oatgen_core=debug,oatgen_emit=debug";

/// Install the global subscriber. `RUST_LOG` wins over the flags.
pub fn init(verbose: bool, quiet: bool) {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else if quiet {
        "warn"
    } else {
        DEFAULT_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // Ignore the error: a subscriber may already be installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
