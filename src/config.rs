use crate::environment::{CONFIG_DIR_VAR, Environment};
use crate::normalize::normalize_url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "jenkins-cli";
const CONFIG_FILE: &str = "config.json";

/// Connection settings persisted by `jenkins configure`.
///
/// The token is not part of this record; it lives in the OS keyring under
/// the same `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Normalized Jenkins URL, always carrying a scheme and no trailing slash
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    #[error("config file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse config file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    fn io(context: impl Into<String>, source: io::Error) -> Self {
        ConfigError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Reads and writes `config.json` under a per-user directory.
///
/// Nothing is cached: every `load` goes back to disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in `JENKINS_CLI_CONFIG_DIR` if set, else `<config dir>/jenkins-cli`.
    pub fn default_location(env: &dyn Environment) -> Result<Self, ConfigError> {
        if let Some(dir) = env.var(CONFIG_DIR_VAR).filter(|dir| !dir.is_empty()) {
            return Ok(Self::at(dir));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::at(base.join(APP_DIR)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Normalize `url` and overwrite the config file with it.
    ///
    /// The directory is created owner-only and the file is replaced by
    /// renaming a fully written temporary file over it.
    pub fn save(&self, url: &str, username: Option<&str>) -> Result<ConnectionConfig, ConfigError> {
        let config = ConnectionConfig {
            url: normalize_url(url),
            username: username.filter(|u| !u.is_empty()).map(str::to_string),
        };

        create_private_dir(&self.dir).map_err(|e| {
            ConfigError::io(
                format!("failed to create config directory {}", self.dir.display()),
                e,
            )
        })?;

        let data = serde_json::to_string_pretty(&config).map_err(ConfigError::Serialize)?;
        let path = self.path();
        let tmp_path = self.dir.join(format!("{}.tmp", CONFIG_FILE));

        write_private_file(&tmp_path, data.as_bytes())
            .map_err(|e| ConfigError::io("failed to write config file", e))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ConfigError::io("failed to replace config file", e)
        })?;

        tracing::debug!(path = %path.display(), url = %config.url, "saved config");
        Ok(config)
    }

    /// Read the config file.
    ///
    /// A missing file is `NotFound`; unparseable content is `Corrupt`. An
    /// empty stored username reads back as `None`.
    pub fn load(&self) -> Result<ConnectionConfig, ConfigError> {
        let path = self.path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path));
            }
            Err(e) => return Err(ConfigError::io("failed to read config file", e)),
        };

        let mut config: ConnectionConfig = serde_json::from_str(&data)
            .map_err(|source| ConfigError::Corrupt { path, source })?;
        if config.username.as_deref() == Some("") {
            config.username = None;
        }
        Ok(config)
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn write_private_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
