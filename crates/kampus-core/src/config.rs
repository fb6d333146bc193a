//! Configuration module
//!
//! Server, storage and upload settings read from the environment (and an optional
//! `.env` file). The per-category upload policies are deliberately not configurable
//! here; see [`crate::policy::PolicyTable`].

use std::env;
use std::path::PathBuf;

use crate::messages::Locale;

const SERVER_PORT: u16 = 5000;
const MAX_REQUEST_SIZE_MB: u64 = 100;
const UPLOADS_ROOT: &str = "uploads";

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// File service configuration
#[derive(Clone, Debug)]
pub struct FileServiceConfig {
    pub base: BaseConfig,
    /// Root of `{notes,projects,questions,temp}/`
    pub uploads_root: PathBuf,
    /// Global request ceiling, independent of category
    pub max_request_size_bytes: u64,
    pub message_locale: Locale,
    /// Magic-byte inspection of written files in addition to the extension heuristic
    pub strict_content_sniffing: bool,
}

impl FileServiceConfig {
    /// Development defaults rooted at `uploads_root`
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
            },
            uploads_root: uploads_root.into(),
            max_request_size_bytes: MAX_REQUEST_SIZE_MB * 1024 * 1024,
            message_locale: Locale::default(),
            strict_content_sniffing: false,
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_size_bytes = match env::var("MAX_REQUEST_SIZE_MB") {
            Ok(value) => megabytes_to_bytes(&value)?,
            Err(_) => MAX_REQUEST_SIZE_MB * 1024 * 1024,
        };

        let message_locale = match env::var("UPLOAD_MESSAGE_LOCALE") {
            Ok(value) => value.parse()?,
            Err(_) => Locale::default(),
        };

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        Ok(FileServiceConfig {
            base,
            uploads_root: env::var("UPLOADS_ROOT")
                .unwrap_or_else(|_| UPLOADS_ROOT.to_string())
                .into(),
            max_request_size_bytes,
            message_locale,
            strict_content_sniffing: env::var("STRICT_CONTENT_SNIFFING")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_request_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_SIZE_MB must be greater than 0"));
        }
        if self.uploads_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOADS_ROOT must not be empty"));
        }
        if self.base.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS must list at least one origin"));
        }
        Ok(())
    }
}

/// Parse a whole number of megabytes into bytes.
fn megabytes_to_bytes(value: &str) -> Result<u64, anyhow::Error> {
    let megabytes = value
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("MAX_REQUEST_SIZE_MB must be a valid number"))?;
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_REQUEST_SIZE_MB is too large: {}", megabytes))
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<FileServiceConfig>);

impl Config {
    fn as_files(&self) -> &FileServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = FileServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_files().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_files().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.as_files().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_files().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_files().base.environment
    }

    pub fn uploads_root(&self) -> &std::path::Path {
        &self.as_files().uploads_root
    }

    pub fn max_request_size_bytes(&self) -> u64 {
        self.as_files().max_request_size_bytes
    }

    pub fn message_locale(&self) -> Locale {
        self.as_files().message_locale
    }

    pub fn strict_content_sniffing(&self) -> bool {
        self.as_files().strict_content_sniffing
    }
}

impl From<FileServiceConfig> for Config {
    fn from(config: FileServiceConfig) -> Self {
        Config(Box::new(config))
    }
}
