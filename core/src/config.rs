use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, ShipError};

/// Default registry for converted containerDisk images.
pub const DEFAULT_REGISTRY: &str = "registry.cmusatyalab.org/cloudlet-discovery/vmship";

/// Environment variable overriding the containerDisk registry.
pub const REGISTRY_ENV: &str = "VMSHIP_REGISTRY";

/// Environment variable supplying deploy credentials (`username:password`).
pub const CREDENTIALS_ENV: &str = "VMSHIP_CREDENTIALS";

/// Pipeline configuration.
///
/// Resolved exactly once by the CLI from flags and environment variables and
/// passed into the pipeline entry point; pipeline logic never reads the
/// environment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Registry where converted containerDisk images are stored.
    pub registry: String,

    /// Raw `username:password` pull credentials for restricted recipes.
    pub deploy_token: Option<String>,

    /// Operator-named working directory; intermediate files are preserved.
    pub work_dir: Option<PathBuf>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            deploy_token: None,
            work_dir: None,
        }
    }
}

/// Registry pull credentials embedded in restricted recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployCredentials {
    pub username: String,
    pub password: String,
}

impl DeployCredentials {
    /// Parse a `username:password` token, split on the first colon.
    ///
    /// The password may itself contain colons; only the absence of a
    /// separator is an error.
    pub fn parse(token: &str) -> Result<Self> {
        let (username, password) = token.split_once(':').ok_or_else(|| {
            ShipError::InvalidCredentials("expected username:password".to_string())
        })?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Host component of a registry path (everything before the first `/`).
pub fn registry_host(registry: &str) -> &str {
    match registry.split_once('/') {
        Some((host, _)) => host,
        None => registry,
    }
}
