//! # Certflow
//!
//! Certflow provisions and rotates mutual-TLS certificate material for a
//! fleet of named services and publishes it into the cluster's Secret API.
//! It is a one-shot, re-runnable batch pipeline intended to be invoked
//! periodically (for example by a scheduled job) for rotation.
//!
//! ## Architecture
//!
//! Per service, the pipeline runs a strict linear sequence:
//!
//! ```text
//! Batch Orchestrator → Config Resolver → Certificate Store (cleanup)
//!        → CA Engine (authority, CSRs, signing)
//!        → Certificate Store (transient cleanup)
//!        → Secret Synchronizer (optional)
//! ```
//!
//! ## Core Components
//!
//! - **Config Resolver** ([`plan`]): pure mapping from (base directory,
//!   namespace, service) to a fully-resolved certificate plan
//! - **Certificate Store** ([`storage`]): directory lifecycle and
//!   best-effort artifact removal on the filesystem
//! - **CA Engine** ([`ca`]): drives the external CA toolchain through an
//!   injected command runner
//! - **Secret Synchronizer** ([`secrets`]): upserts issued material into
//!   the cluster secret store with create-or-replace semantics
//! - **Batch Orchestrator** ([`pipeline`]): repeats the per-service
//!   pipeline across a service list, aborting on the first failure

pub mod ca;
pub mod config;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod plan;
pub mod secrets;
pub mod storage;

// Re-export commonly used types
pub use config::Settings;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "certflow");
    }
}
