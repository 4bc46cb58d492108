//! vmship Core - Foundational Types
//!
//! This module provides the types shared by the conversion pipeline and the
//! CLI: the error taxonomy, the pipeline configuration resolved by the
//! caller, and deploy-credential handling.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{registry_host, DeployConfig, DeployCredentials};
pub use error::{Result, ShipError};

/// vmship version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
