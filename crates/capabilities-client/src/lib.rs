//! Client side of the capabilities bounds pipeline.
//!
//! build URL → fetch → parse → extract. Each call is independent; nothing is
//! cached or shared between calls beyond the HTTP connection pool.

pub mod config;
pub mod fetch;
pub mod resolver;
pub mod viewport;

pub use config::{ProxyMode, ResolverConfig};
pub use fetch::{CapabilitiesFetcher, HttpFetcher};
pub use resolver::{CapabilitiesBoundsResolver, LayerExtent};
pub use viewport::Viewport;
