//! Logging setup
//!
//! Events go to stderr so stdout stays clean for reports. `RUST_LOG` wins
//! over the verbosity flag when it is set.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a `-v` count
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "doccat=warn",
        1 => "doccat=info",
        2 => "doccat=debug",
        _ => "doccat=trace",
    }
}

/// Install the global subscriber; safe to call more than once
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "doccat=warn");
        assert_eq!(default_directive(2), "doccat=debug");
        assert_eq!(default_directive(9), "doccat=trace");
    }

    #[test]
    fn test_init_twice() {
        init(0);
        init(1);
    }
}
