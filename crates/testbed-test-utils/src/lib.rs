//! Shared test fixtures for the svn-testbed workspace.
//!
//! Hermetic stand-ins for the external collaborators, so lifecycle
//! behavior is testable without a live Subversion server:
//!
//! - [`engine`]: [`InMemoryEngine`](engine::InMemoryEngine), a fake engine
//!   that fabricates repository trees and records loaded dumps
//! - [`probe`]: [`ScriptedProbe`](probe::ScriptedProbe) with canned
//!   responses per URL
//! - [`fixture`]: temp parent directories and pre-wired sessions
//!
//! This crate is a dev-dependency only and is never published.

pub mod engine;
pub mod fixture;
pub mod probe;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize a tracing subscriber for test output.
///
/// Uses `RUST_LOG`, defaulting to "info". Safe to call from every test;
/// only the first call in a process wins.
pub fn init_logging() {
    let fmt_layer = fmt::layer().with_target(true).compact();
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
