#![doc(test(attr(deny(warnings))))]

//! Quick Budget tracks weekly spending against a weekly allowance: calendar
//! week arithmetic, recurring expense materialization, aggregation queries,
//! and a local JSON record store, plus a small interactive shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Quick Budget tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
