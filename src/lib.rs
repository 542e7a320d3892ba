#![doc(test(attr(deny(warnings))))]

//! Finance Core implements the transaction lifecycle, recurring installment,
//! and dashboard aggregation rules of a personal finance tracker, together
//! with its JSON persistence gateway.

pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
