//! Shared test utilities for the capabilities resolver workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Capabilities documents and overlayer records as fixtures
//! - Test data path helpers
//! - An in-process HTTP server standing in for GeoServer
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{FixtureServer, CAPABILITIES_PRODES};
//! ```

pub mod fixtures;
pub mod paths;
pub mod server;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;
pub use server::FixtureServer;
