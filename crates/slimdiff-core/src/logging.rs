//! Logging initialization
//!
//! Logs go to stderr so stdout stays reserved for the compacted diff.

use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the caller gives a valid one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Only the first call installs
/// anything; it returns the guard that flushes the non-blocking writer on
/// drop, so keep it alive for the lifetime of `main`. Later calls return
/// `None`.
pub fn init(level: &str) -> Option<WorkerGuard> {
    let mut guard = None;

    INIT_ONCE.call_once(|| {
        let (writer, worker_guard) = tracing_appender::non_blocking(std::io::stderr());
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_target(false)
            .try_init()
            .is_ok();

        if installed {
            guard = Some(worker_guard);
        }
    });

    guard
}
