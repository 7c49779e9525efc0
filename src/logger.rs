use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the process-wide logger once. `level` applies to this crate;
/// other crates stay at `warn`. `RUST_LOG` overrides both.
pub fn initialize_logger(level: LevelFilter) {
    // call_once_force recovers if an earlier initialization attempt panicked.
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("songgraph", level)
            .format_timestamp_millis()
            .parse_default_env();

        // Another logger may already be installed (tests, embedding apps).
        let _ = builder.try_init();
    });
}
