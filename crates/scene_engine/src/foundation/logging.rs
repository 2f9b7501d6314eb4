//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

/// Initialize the logging system with a default level
///
/// `level` uses the `env_logger` filter syntax (`"info"`, `"scene_engine=trace"`).
/// A `RUST_LOG` environment variable takes precedence when it is set.
/// Calling this more than once is harmless; only the first call installs a logger.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}
