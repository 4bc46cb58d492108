//! Package retrieval.
//!
//! Downloads the source package over HTTPS with an in-place percentage
//! progress display. The fetch URL is the locator with its scheme rewritten
//! to plain https; query parameters survive here, unlike in identity
//! derivation.

use std::io::Write;
use std::path::Path;

use url::Url;

use vmship_core::error::{Result, ShipError};

/// Rewrite an image locator into the https URL the package is fetched from.
pub fn fetch_url(locator: &str) -> Result<Url> {
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

    // The scheme swap is done textually: the url crate refuses to switch a
    // non-special scheme like vmnetx+https over to https in place.
    let mut rewritten = format!("https://{host}");
    if let Some(port) = url.port() {
        rewritten.push(':');
        rewritten.push_str(&port.to_string());
    }
    rewritten.push_str(url.path());
    if let Some(query) = url.query() {
        rewritten.push('?');
        rewritten.push_str(query);
    }

    Url::parse(&rewritten).map_err(|e| ShipError::InvalidLocator {
        locator: locator.to_string(),
        message: e.to_string(),
    })
}

/// Download `url` into `dest`, reporting percentage progress when the server
/// announces a content length.
pub async fn download(url: &Url, dest: &Path) -> Result<()> {
    println!("Fetching {url}");
    let mut response = reqwest::get(url.clone()).await.map_err(|e| ShipError::Download {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if !response.status().is_success() {
        return Err(ShipError::Download {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }

    let total = response.content_length().filter(|len| *len > 0);
    let mut file = std::fs::File::create(dest)?;
    let mut copied: u64 = 0;
    loop {
        let chunk = response.chunk().await.map_err(|e| ShipError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let Some(chunk) = chunk else { break };
        file.write_all(&chunk)?;
        copied += chunk.len() as u64;
        if let Some(total) = total {
            print!("\r\t{}%", 100 * copied / total);
            std::io::stdout().flush()?;
        }
    }
    if total.is_some() {
        println!();
    }
    tracing::debug!(url = %url, bytes = copied, "package downloaded");
    Ok(())
}
