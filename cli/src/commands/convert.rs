//! `vmship convert` command — run the image-to-deployment pipeline.
//!
//! Resolves registry and credential configuration from flags and environment
//! variables once, then hands everything to the pipeline.

use std::path::PathBuf;

use clap::Args;

use vmship_core::config::{DeployConfig, CREDENTIALS_ENV, DEFAULT_REGISTRY, REGISTRY_ENV};
use vmship_pipeline::interact::StdioPrompt;

#[derive(Args)]
pub struct ConvertArgs {
    /// Image locator URL
    pub url: String,

    /// Already-fetched package file (skips the download)
    pub package: Option<PathBuf>,

    /// Directory to keep intermediate files
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Registry where the containerDisk is stored [VMSHIP_REGISTRY]
    #[arg(long)]
    pub registry: Option<String>,

    /// Pull credentials added to the recipe as username:password [VMSHIP_CREDENTIALS]
    #[arg(long = "deploy-token")]
    pub deploy_token: Option<String>,
}

pub async fn execute(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = DeployConfig {
        registry: args
            .registry
            .or_else(|| std::env::var(REGISTRY_ENV).ok())
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string()),
        deploy_token: args
            .deploy_token
            .or_else(|| std::env::var(CREDENTIALS_ENV).ok()),
        work_dir: args.work_dir,
    };

    vmship_pipeline::convert(&args.url, args.package, &config, &StdioPrompt).await?;
    Ok(())
}
