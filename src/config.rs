use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Directory holding the catalog database
    pub data_dir: String,
    /// Directory holding the per-category upload roots and the staging area
    pub upload_root: String,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
    /// How long a login session stays valid
    pub session_ttl_hours: i64,
    /// Credentials for the bootstrap admin, used only when no accounts exist
    pub default_admin_username: String,
    pub default_admin_password: String,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let upload_root = std::env::var("UPLOAD_ROOT").unwrap_or_else(|_| "./uploads".to_string());

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(500 * 1024 * 1024); // 500MB

        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24);

        let default_admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let default_admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            bind_address,
            data_dir,
            upload_root,
            max_upload_size,
            session_ttl_hours,
            default_admin_username,
            default_admin_password,
            test_mode,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.session_ttl_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "SESSION_TTL_HOURS must be greater than 0".to_string(),
            ));
        }

        if self.default_admin_username.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_USERNAME cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
