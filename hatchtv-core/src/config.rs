use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub transcode: TranscodeConfig,
    pub publish: PublishConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upload staging and external transcode script settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Root directory for upload records (one subdirectory per identity)
    pub uploads_dir: String,
    /// Script invoked as `<shell> <script> <identity> <extension> [day]`
    pub script: String,
    pub shell: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            uploads_dir: "uploads".to_string(),
            script: "create-hls-vod.sh".to_string(),
            shell: "bash".to_string(),
        }
    }
}

/// Publish capability selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub mode: PublishMode,
    pub ftp: FtpConfig,
}

/// Publish operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Transcode locally only; no remote store, no hatch manifest
    Local,
    /// Push finished output to the FTP store and maintain hatches.json
    Remote,
}

impl Default for PublishMode {
    fn default() -> Self {
        Self::Local
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Directory on the server that acts as the store root
    pub root_dir: String,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 21,
            username: "anonymous".to_string(),
            password: String::new(),
            root_dir: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided; a named file that does not exist is an error)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        }

        // Override with environment variables (HATCHTV_SERVER_HOST, etc.)
        builder = builder.add_source(
            Environment::with_prefix("HATCHTV")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Get HTTP address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether the remote-publish capability (FTP store + manifest) is on
    #[must_use]
    pub fn remote_publish_enabled(&self) -> bool {
        self.publish.mode == PublishMode::Remote
    }
}
