#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(clippy::module_name_repetitions)]

//! The `als-analytics` library.
//!
//! Receives Envoy access log streams over gRPC and turns every proxied HTTP
//! exchange into one API analytics record, handed to an [`AnalyticsManager`]
//! for delivery on behalf of a fixed tenant.
//!
//! [`AnalyticsManager`]: crate::analytics::AnalyticsManager

#[macro_use]
extern crate tracing;

#[macro_use]
pub mod internal_events;
pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod signal;
pub mod sources;
pub mod tenant;
#[cfg(test)]
pub mod test_util;
pub mod topology;
pub mod trace;

pub use tenant::TenantContext;

/// The type alias for the top-level error type.
pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The type alias for the top-level result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the version string reported by the binary.
pub fn get_version() -> String {
    let pkg_version = env!("CARGO_PKG_VERSION");
    let target = std::env::consts::ARCH;
    format!("{pkg_version} ({target} {})", std::env::consts::OS)
}
