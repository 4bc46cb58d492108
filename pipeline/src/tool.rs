//! Blocking external tool invocation with a checked exit status.
//!
//! Every external collaborator (disk re-encoder, container build/push/remove,
//! remote-display clients) is run synchronously to completion; a non-zero
//! exit is propagated as a fatal error with no retry.

use std::process::Command;

use vmship_core::error::{Result, ShipError};

/// Run an external tool to completion.
///
/// `tool` names the collaborator in diagnostics; a spawn failure or non-zero
/// exit status both map to [`ShipError::ExternalTool`].
pub fn run(tool: &str, cmd: &mut Command) -> Result<()> {
    tracing::debug!(tool, ?cmd, "running external tool");
    let status = cmd.status().map_err(|e| ShipError::ExternalTool {
        tool: tool.to_string(),
        message: format!("failed to start: {e} (is {tool} installed?)"),
    })?;
    if !status.success() {
        return Err(ShipError::ExternalTool {
            tool: tool.to_string(),
            message: format!("exited with {status}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_success() {
        let result = run("sh", Command::new("sh").args(["-c", "exit 0"]));
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_nonzero_exit() {
        let result = run("sh", Command::new("sh").args(["-c", "exit 3"]));
        match result {
            Err(ShipError::ExternalTool { tool, message }) => {
                assert_eq!(tool, "sh");
                assert!(message.contains("exited with"));
            }
            other => panic!("expected ExternalTool error, got {:?}", other),
        }
    }

    #[test]
    fn test_run_missing_binary() {
        let result = run(
            "definitely-not-installed",
            &mut Command::new("definitely-not-installed-xyzzy"),
        );
        match result {
            Err(ShipError::ExternalTool { message, .. }) => {
                assert!(message.contains("failed to start"));
            }
            other => panic!("expected ExternalTool error, got {:?}", other),
        }
    }
}
