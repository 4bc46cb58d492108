//! The conversion pipeline driver.
//!
//! Runs Identity → Fetch → Inspect → Encode → Build → Publish → Recipe
//! strictly in sequence, failing the whole run at the first error. Every
//! artifact name derives from the deployment identity, so a failed run is
//! recovered by simply re-running it.

use std::path::{Path, PathBuf};

use vmship_core::config::DeployConfig;
use vmship_core::error::Result;
use vmship_core::DeployCredentials;

use crate::artifact::{self, PublishOutcome};
use crate::encode;
use crate::fetch;
use crate::identity;
use crate::interact::OperatorPrompt;
use crate::package;
use crate::recipe::{DeploymentRecipe, RECIPE_DIR};
use crate::workdir::{
    WorkDir, DOCKERFILE, DOCKERIGNORE, ENCODED_DISK_FILE, PACKAGE_FILE, RAW_DISK_FILE,
};

/// Convert the image behind `locator` into a containerDisk artifact plus a
/// deployment recipe.
///
/// `local_package` skips the fetch stage and leaves the named file alone
/// during cleanup.
pub async fn convert(
    locator: &str,
    local_package: Option<PathBuf>,
    config: &DeployConfig,
    prompt: &dyn OperatorPrompt,
) -> Result<()> {
    let identity = identity::derive(locator)?;
    println!("UUID: {identity}");

    // Credentials are validated up front, before any artifact or recipe
    // exists.
    let credentials = config
        .deploy_token
        .as_deref()
        .map(DeployCredentials::parse)
        .transpose()?;

    let workdir = WorkDir::prepare(config.work_dir.clone())?;
    tracing::info!(
        identity = %identity,
        workdir = %workdir.path().display(),
        restricted = credentials.is_some(),
        "starting conversion"
    );

    let fetched = local_package.is_none();
    let package_path = match local_package {
        Some(path) => path,
        None => {
            let dest = workdir.path().join(PACKAGE_FILE);
            fetch::download(&fetch::fetch_url(locator)?, &dest).await?;
            dest
        }
    };

    let metadata = package::inspect(&package_path, workdir.path(), prompt)?;
    if fetched {
        workdir.discard(PACKAGE_FILE);
    }

    let raw = workdir.path().join(RAW_DISK_FILE);
    let encoded = workdir.path().join(ENCODED_DISK_FILE);
    encode::encode(&raw, &encoded)?;
    workdir.discard(RAW_DISK_FILE);

    let built = artifact::build(workdir.path(), &identity, &metadata.name, &config.registry)?;

    let outcome = artifact::publish(&built, credentials.is_some(), prompt)?;
    if outcome == PublishOutcome::Declined {
        println!("Leaving {} unpublished", built.tag);
    }
    if !workdir.preserved() {
        artifact::remove_local(&built)?;
    }
    workdir.discard(DOCKERIGNORE);
    workdir.discard(DOCKERFILE);
    workdir.discard(ENCODED_DISK_FILE);

    println!("Creating deployment recipe {identity}");
    let recipe = DeploymentRecipe::new(&identity, &metadata, &config.registry, credentials.as_ref());
    let path = crate::recipe::emit(Path::new(RECIPE_DIR), &recipe, &identity)?;
    println!("Recipe written to {}", path.display());

    Ok(())
}
