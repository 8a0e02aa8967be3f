//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for an operator watching the console
    Development,
    /// JSON structured output for log shippers
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl FromStr for Profile {
    type Err = String;

    /// Parse the `LOG_FORMAT` spelling of a profile
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "development" => Ok(Profile::Development),
            "json" | "production" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!(
                "unknown log format '{other}' (expected 'pretty' or 'json')"
            )),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// This function should be called once at application startup.
///
/// # Profiles
///
/// - **Development**: Human-readable logs, `pagewatch=debug` unless `RUST_LOG` is set
/// - **Production**: JSON structured logs, `pagewatch=info` unless `RUST_LOG` is set
/// - **Test**: Bare registry; capture is installed via `init_test_capture()`
///
/// Every event carries the subscriber's timestamp, which is what makes the
/// cycle start/end markers timestamped.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("pagewatch=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("pagewatch=info")),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
