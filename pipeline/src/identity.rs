//! Deployment identity derivation.
//!
//! Maps a source image locator to a stable 128-bit identifier. The identity
//! is the only thing tying a published artifact, its recipe, and a later
//! launch request together — there is no shared database — so derivation
//! must be a pure name-based hash of the canonicalized locator.

use url::Url;
use uuid::Uuid;

use vmship_core::error::{Result, ShipError};

/// Namespace seed for name-based identity derivation.
const IDENTITY_NAMESPACE: Uuid = uuid::uuid!("835a9728-a1f7-4d0f-82f8-cd0da8838673");

/// Canonical scheme every locator collapses to before hashing, so transport
/// variants of the same host/path yield the same identity.
const CANONICAL_SCHEME: &str = "vmnetx+https";

/// Derive the deployment identity for an image locator.
///
/// The locator must be an absolute URL with a host. Its query and fragment
/// are discarded and its scheme is rewritten to [`CANONICAL_SCHEME`] before
/// the UUIDv5 hash is taken.
pub fn derive(locator: &str) -> Result<Uuid> {
    let url = Url::parse(locator).map_err(|e| ShipError::InvalidLocator {
        locator: locator.to_string(),
        message: e.to_string(),
    })?;
    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => {
            return Err(ShipError::InvalidLocator {
                locator: locator.to_string(),
                message: "missing host".to_string(),
            })
        }
    };

    let mut canonical = format!("{CANONICAL_SCHEME}://{host}");
    if let Some(port) = url.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }
    canonical.push_str(url.path());

    Ok(Uuid::new_v5(&IDENTITY_NAMESPACE, canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_variants_collapse() {
        let a = derive("vmnetx+https://archive.example.org/images/win31.nxpk").unwrap();
        let b = derive("vmnetx+http://archive.example.org/images/win31.nxpk").unwrap();
        let c = derive("https://archive.example.org/images/win31.nxpk").unwrap();
        let d = derive("vmnetx://archive.example.org/images/win31.nxpk").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn test_query_and_fragment_discarded() {
        let plain = derive("https://archive.example.org/images/win31.nxpk").unwrap();
        let query = derive("https://archive.example.org/images/win31.nxpk?token=abc").unwrap();
        let fragment = derive("https://archive.example.org/images/win31.nxpk#section").unwrap();
        assert_eq!(plain, query);
        assert_eq!(plain, fragment);
    }

    #[test]
    fn test_distinct_paths_distinct_identities() {
        let a = derive("https://archive.example.org/images/win31.nxpk").unwrap();
        let b = derive("https://archive.example.org/images/dos622.nxpk").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_distinct_hosts_distinct_identities() {
        let a = derive("https://archive.example.org/images/win31.nxpk").unwrap();
        let b = derive("https://mirror.example.org/images/win31.nxpk").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_explicit_port_is_significant() {
        let a = derive("vmnetx://archive.example.org/images/win31.nxpk").unwrap();
        let b = derive("vmnetx://archive.example.org:8443/images/win31.nxpk").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let locator = "https://archive.example.org/images/win31.nxpk";
        assert_eq!(derive(locator).unwrap(), derive(locator).unwrap());
    }

    #[test]
    fn test_relative_locator_rejected() {
        let result = derive("images/win31.nxpk");
        assert!(matches!(result, Err(ShipError::InvalidLocator { .. })));
    }

    #[test]
    fn test_hostless_locator_rejected() {
        let result = derive("vmnetx:///images/win31.nxpk");
        assert!(matches!(result, Err(ShipError::InvalidLocator { .. })));
    }
}
