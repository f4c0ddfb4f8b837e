// ABOUTME: tracing subscriber setup for the CLI
// ABOUTME: RUST_LOG wins, otherwise a quiet default with this crate at info

use tracing_subscriber::EnvFilter;

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,wildvogelhilfe_client=debug,wvh_client=debug"
    } else {
        "warn,wildvogelhilfe_client=info,wvh_client=info"
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(false).contains("wildvogelhilfe_client=info"));
        assert!(default_filter(true).contains("wildvogelhilfe_client=debug"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
