//! `vmship launch` command — schedule a converted image on a cloudlet.
//!
//! Derives the deployment identity and hands it to the external scheduler,
//! which places the workload and re-invokes this binary's `connect`
//! subcommand inside the deployment's network context.

use std::process::Command;

use clap::Args;

use vmship_pipeline::identity;

/// Cloudlet-discovery orchestrator the scheduler consults.
const DEFAULT_TIER1_URL: &str = "https://cmu.findcloudlet.org";
/// External scheduling collaborator executable.
const DEFAULT_TIER3: &str = "sinfonia-tier3";

#[derive(Args)]
pub struct LaunchArgs {
    /// Image locator URL
    pub url: String,

    /// Path to the scheduler executable
    #[arg(long, default_value = DEFAULT_TIER3)]
    pub tier3: String,

    /// Cloudlet-discovery orchestrator URL
    #[arg(long, default_value = DEFAULT_TIER1_URL)]
    pub tier1: String,
}

pub async fn execute(args: LaunchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let identity = identity::derive(&args.url)?;

    let current_exe = std::env::current_exe()?;
    let status = Command::new(&args.tier3)
        .arg(&args.tier1)
        .arg(identity.to_string())
        .arg(current_exe)
        .arg("connect")
        .status()
        .map_err(|e| format!("failed to run {}: {e} (is it installed?)", args.tier3))?;
    if !status.success() {
        return Err(format!("{} exited with {status}", args.tier3).into());
    }
    Ok(())
}
