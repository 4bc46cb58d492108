//! CLI command definitions and dispatch.

mod connect;
mod convert;
mod launch;

use clap::{Parser, Subcommand};

/// vmship — package archived VM images as containerDisks and launch them on
/// cloudlets.
#[derive(Parser)]
#[command(name = "vmship", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Convert a packaged VM image into a containerDisk and deployment recipe
    Convert(convert::ConvertArgs),
    /// Schedule a converted image on a cloudlet and connect to it
    Launch(launch::LaunchArgs),
    /// Wait for a scheduled deployment and attach a display client
    Connect(connect::ConnectArgs),
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Convert(args) => convert::execute(args).await,
        Command::Launch(args) => launch::execute(args).await,
        Command::Connect(args) => connect::execute(args).await,
    }
}
