//! Logger setup for binaries and tests embedding the client

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Install `env_logger`
///
/// `RUST_LOG` wins when set. Otherwise everything logs at `Warn` and this
/// crate at `Debug`. Calling it twice is harmless.
pub fn init_logger() {
    let result = if std::env::var("RUST_LOG").is_ok() {
        env_logger::try_init()
    } else {
        Builder::new()
            .target(Target::Stdout)
            .filter_level(LevelFilter::Warn)
            .filter_module("gatehouse_client", LevelFilter::Debug)
            .try_init()
    };

    if result.is_ok() {
        log::debug!("[Logging] Logger initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logger();
        init_logger();
        log::info!("still logging");
    }
}
