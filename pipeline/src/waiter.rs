//! Deployment readiness waiter.
//!
//! Polls the deployment's display endpoint until the remote-framebuffer
//! preamble is observed, then hands off to a locally installed
//! remote-display client. Name-resolution failures, refused connections,
//! timeouts, and foreign preambles are all "not ready yet" and retried
//! indefinitely — the surrounding scheduler owns the timeout for the whole
//! launch, and the operator can simply close the viewer.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use vmship_core::error::{Result, ShipError};

use crate::tool;

/// Well-known hostname alias of the deployment's display service, fixed by
/// the recipe's service name override.
pub const DISPLAY_HOST: &str = "vmi-vnc";
/// Remote-framebuffer port.
pub const DISPLAY_PORT: u16 = 5900;

/// Protocol preamble announcing a ready display server.
const HANDSHAKE_PREAMBLE: [u8; 3] = *b"RFB";
/// Per-attempt connect/read timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);
/// Pause between polling attempts.
const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Pause before giving up with no display client installed, so a terminal
/// spawned just for this process stays readable.
const NO_CLIENT_PAUSE: Duration = Duration::from_secs(10);

/// Clients invoked with a URL argument.
const URL_CLIENTS: &[&str] = &["remote-viewer"];
/// Clients invoked with a host:display argument.
const DISPLAY_CLIENTS: &[&str] = &["gvncviewer", "vncviewer"];

/// Wait for the display endpoint to become ready, then attach a client.
pub fn await_and_connect(host: &str, port: u16) -> Result<()> {
    wait_until_ready(&format!("{host}:{port}"), POLL_INTERVAL);
    connect_client(host, port)
}

/// Poll until the endpoint answers with the handshake preamble.
///
/// Prints a progress dot per attempt and returns the number of attempts
/// taken. Loops forever while the endpoint is not ready.
pub fn wait_until_ready(endpoint: &str, poll_interval: Duration) -> u64 {
    print!("Waiting for display server to become available");
    let _ = std::io::stdout().flush();
    let mut attempts = 0;
    loop {
        attempts += 1;
        print!(".");
        let _ = std::io::stdout().flush();
        if probe(endpoint) {
            println!();
            return attempts;
        }
        std::thread::sleep(poll_interval);
    }
}

/// One probe of the display endpoint: connect, read the leading bytes,
/// check the preamble. Any failure means "not ready yet".
fn probe(endpoint: &str) -> bool {
    let Ok(addrs) = endpoint.to_socket_addrs() else {
        return false;
    };
    for addr in addrs {
        let Ok(mut stream) = TcpStream::connect_timeout(&addr, PROBE_TIMEOUT) else {
            continue;
        };
        let _ = stream.set_read_timeout(Some(PROBE_TIMEOUT));
        let mut preamble = [0u8; 3];
        if stream.read_exact(&mut preamble).is_ok() && preamble == HANDSHAKE_PREAMBLE {
            return true;
        }
    }
    false
}

/// Hand off to the preferred locally installed remote-display client.
fn connect_client(host: &str, port: u16) -> Result<()> {
    // The virt-viewer family expects a URL
    if let Some((name, viewer)) = find_client(URL_CLIENTS, path_dirs()) {
        return tool::run(name, Command::new(viewer).arg(format!("vnc://{host}:{port}")));
    }

    // Other viewers accept host:display on the command line
    if let Some((name, viewer)) = find_client(DISPLAY_CLIENTS, path_dirs()) {
        return tool::run(name, Command::new(viewer).arg(format!("{host}:0")));
    }

    eprintln!("Failed to find a local remote-display client");
    std::thread::sleep(NO_CLIENT_PAUSE);
    Err(ShipError::NoDisplayClient)
}

/// Directories on the executable search path.
fn path_dirs() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// First of `names`, in preference order, that resolves to an executable in
/// `dirs`.
fn find_client(
    names: &[&'static str],
    dirs: Vec<PathBuf>,
) -> Option<(&'static str, PathBuf)> {
    for &name in names {
        for dir in &dirs {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Some((name, candidate));
            }
        }
    }
    None
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
