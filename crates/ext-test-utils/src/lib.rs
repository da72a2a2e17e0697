//! Shared test utilities for the extension-host workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`host`] — [`TestHost`] builder for on-disk package layouts
//! - [`probe`] — instrumented extensions and a recording log sink
//!
//! [`TestHost`]: host::TestHost

pub mod host;
pub mod probe;
