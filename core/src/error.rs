use thiserror::Error;

/// vmship error types
#[derive(Error, Debug)]
pub enum ShipError {
    /// Image locator could not be parsed as an absolute URL
    #[error("Invalid image locator '{locator}': {message}")]
    InvalidLocator { locator: String, message: String },

    /// Package archive is missing a required entry or is unreadable
    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    /// Deploy credential string is malformed
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An invoked external tool exited non-zero or could not be started
    #[error("External tool failed: {tool} - {message}")]
    ExternalTool { tool: String, message: String },

    /// Package download failed
    #[error("Download failed: {url} - {message}")]
    Download { url: String, message: String },

    /// No remote-display client is installed
    #[error("No remote-display client available")]
    NoDisplayClient,

    /// Recipe store location is unwritable
    #[error("Recipe write failed: {path} - {message}")]
    RecipeWrite { path: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for ShipError {
    fn from(err: serde_yaml::Error) -> Self {
        ShipError::Serialization(err.to_string())
    }
}

/// Result type alias for vmship operations
pub type Result<T> = std::result::Result<T, ShipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_locator_display() {
        let error = ShipError::InvalidLocator {
            locator: "not a url".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid image locator 'not a url': relative URL without a base"
        );
    }

    #[test]
    fn test_invalid_package_display() {
        let error = ShipError::InvalidPackage("missing archive entry disk.img".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid package: missing archive entry disk.img"
        );
    }

    #[test]
    fn test_invalid_credentials_display() {
        let error = ShipError::InvalidCredentials("expected username:password".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid credentials: expected username:password"
        );
    }

    #[test]
    fn test_external_tool_display() {
        let error = ShipError::ExternalTool {
            tool: "qemu-img".to_string(),
            message: "exited with exit status: 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "External tool failed: qemu-img - exited with exit status: 1"
        );
    }

    #[test]
    fn test_download_display() {
        let error = ShipError::Download {
            url: "https://example.com/pkg".to_string(),
            message: "HTTP 404 Not Found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Download failed: https://example.com/pkg - HTTP 404 Not Found"
        );
    }

    #[test]
    fn test_no_display_client_display() {
        let error = ShipError::NoDisplayClient;
        assert_eq!(error.to_string(), "No remote-display client available");
    }

    #[test]
    fn test_recipe_write_display() {
        let error = ShipError::RecipeWrite {
            path: "RECIPES/abc.yaml".to_string(),
            message: "Permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Recipe write failed: RECIPES/abc.yaml - Permission denied"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ship_error: ShipError = io_error.into();
        assert!(matches!(ship_error, ShipError::Io(_)));
        assert!(ship_error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let yaml_str = "invalid: yaml: content:";
        let result: std::result::Result<serde_yaml::Value, _> = serde_yaml::from_str(yaml_str);
        let yaml_error = result.unwrap_err();
        let ship_error: ShipError = yaml_error.into();
        assert!(matches!(ship_error, ShipError::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(ShipError::NoDisplayClient)
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_is_debug() {
        let error = ShipError::InvalidPackage("test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("InvalidPackage"));
    }
}
