//! `vmship connect` command — standalone deployment waiter.
//!
//! Invoked by the scheduler inside the deployment's network context. Safe to
//! re-run; carries no state beyond the display endpoint, which defaults to
//! the fixed naming convention every recipe pins.

use clap::Args;

use vmship_pipeline::waiter::{self, DISPLAY_HOST, DISPLAY_PORT};

#[derive(Args)]
pub struct ConnectArgs {
    /// Display endpoint as host:port
    pub endpoint: Option<String>,
}

pub async fn execute(args: ConnectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (host, port) = match &args.endpoint {
        Some(endpoint) => parse_endpoint(endpoint)?,
        None => (DISPLAY_HOST.to_string(), DISPLAY_PORT),
    };
    waiter::await_and_connect(&host, port)?;
    Ok(())
}

/// Split a host:port endpoint.
fn parse_endpoint(endpoint: &str) -> Result<(String, u16), String> {
    let (host, port) = endpoint
        .rsplit_once(':')
        .ok_or_else(|| format!("invalid endpoint '{endpoint}' (expected host:port)"))?;
    if host.is_empty() {
        return Err(format!("invalid endpoint '{endpoint}' (expected host:port)"));
    }
    let port = port
        .parse()
        .map_err(|_| format!("invalid port in endpoint '{endpoint}'"))?;
    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(
            parse_endpoint("vmi-vnc:5900").unwrap(),
            ("vmi-vnc".to_string(), 5900)
        );
    }

    #[test]
    fn test_parse_endpoint_no_port() {
        assert!(parse_endpoint("vmi-vnc").is_err());
    }

    #[test]
    fn test_parse_endpoint_bad_port() {
        assert!(parse_endpoint("vmi-vnc:display").is_err());
        assert!(parse_endpoint("vmi-vnc:99999").is_err());
    }

    #[test]
    fn test_parse_endpoint_empty_host() {
        assert!(parse_endpoint(":5900").is_err());
    }
}
