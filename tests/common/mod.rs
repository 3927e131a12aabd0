//! Shared test utilities for ldap-frame integration tests.

// Allow dead code since not all test files use all utilities
#![allow(dead_code)]

mod fixtures;
mod hex;

pub use fixtures::*;
pub use hex::{bytes_to_hex, hex_to_bytes};

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG` (once per process).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
