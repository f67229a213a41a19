//! Logger setup for the host binaries.
//!
//! `RUST_LOG` wins when set; otherwise the level is `info`, raised to `debug`
//! and `trace` by repeated `-v` flags.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level for `verbosity` repeated `-v` flags.
pub const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let default = level_for(verbosity).as_str().to_ascii_lowercase();
    Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::Info);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(2), LevelFilter::Trace);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(3);
    }
}
