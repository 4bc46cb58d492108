//! Deployment recipe emission.
//!
//! Renders the declarative descriptor the external scheduler consumes and
//! persists it keyed by deployment identity. Pure serialization — no
//! network or process side effects. Re-running a conversion overwrites the
//! previous recipe for the same locator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vmship_core::config::registry_host;
use vmship_core::error::{Result, ShipError};
use vmship_core::DeployCredentials;

use crate::package::PackageMetadata;

/// Directory the recipe store lives in, relative to the invocation.
pub const RECIPE_DIR: &str = "RECIPES";

/// Deployment chart consumed by the scheduler.
const CHART_URL: &str = "https://cmusatyalab.github.io/vmship/vmi";
/// Chart version pinned by this pipeline.
const CHART_VERSION: &str = "0.1.2";
/// Disk bus presented to the guest.
const DISK_BUS: &str = "sata";
/// Fixed name override so every deployment's display service gets the same
/// predictable address.
const DISPLAY_SERVICE_NAME: &str = "vmi";

/// Declarative deployment descriptor, keyed by deployment identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecipe {
    pub description: String,
    pub chart: String,
    pub version: String,
    pub values: RecipeValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeValues {
    pub container_disk: ContainerDisk,
    pub resources: Resources,
    pub virtvnc: VirtVnc,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_disk_credentials: Option<RecipeCredentials>,
    pub restricted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDisk {
    pub repository: String,
    pub name: String,
    pub bus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub requests: ResourceRequests,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequests {
    pub cpu: u32,
    pub memory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtVnc {
    #[serde(rename = "fullnameOverride")]
    pub fullname_override: String,
}

/// Pull credentials recorded in a restricted recipe; the registry field is
/// the host component of the configured registry path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCredentials {
    pub registry: String,
    pub username: String,
    pub password: String,
}

impl DeploymentRecipe {
    /// Assemble the recipe for one converted image.
    pub fn new(
        identity: &Uuid,
        metadata: &PackageMetadata,
        registry: &str,
        credentials: Option<&DeployCredentials>,
    ) -> Self {
        DeploymentRecipe {
            description: metadata.name.clone(),
            chart: CHART_URL.to_string(),
            version: CHART_VERSION.to_string(),
            values: RecipeValues {
                container_disk: ContainerDisk {
                    repository: registry.to_string(),
                    name: identity.to_string(),
                    bus: DISK_BUS.to_string(),
                },
                resources: Resources {
                    requests: ResourceRequests {
                        cpu: metadata.cpus,
                        memory: format!("{}Mi", metadata.memory_mib),
                    },
                },
                virtvnc: VirtVnc {
                    fullname_override: DISPLAY_SERVICE_NAME.to_string(),
                },
                container_disk_credentials: credentials.map(|c| RecipeCredentials {
                    registry: registry_host(registry).to_string(),
                    username: c.username.clone(),
                    password: c.password.clone(),
                }),
                restricted: credentials.is_some(),
            },
        }
    }
}

/// Identity-keyed path inside the recipe store.
pub fn recipe_path(recipes_dir: &Path, identity: &Uuid) -> PathBuf {
    recipes_dir.join(format!("{identity}.yaml"))
}

/// Persist the recipe, overwriting any previous one for the same identity.
pub fn emit(recipes_dir: &Path, recipe: &DeploymentRecipe, identity: &Uuid) -> Result<PathBuf> {
    std::fs::create_dir_all(recipes_dir).map_err(|e| ShipError::RecipeWrite {
        path: recipes_dir.display().to_string(),
        message: e.to_string(),
    })?;
    let path = recipe_path(recipes_dir, identity);
    let rendered = serde_yaml::to_string(recipe)?;
    std::fs::write(&path, rendered).map_err(|e| ShipError::RecipeWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "recipe written");
    Ok(path)
}
