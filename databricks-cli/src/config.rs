use std::io;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use thiserror::Error;

pub const DEFAULT_PROFILE: &str = "DEFAULT";
const CONFIG_FILE_NAME: &str = ".databrickscfg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory is unavailable")]
    NoHome,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("no host configured; set DATABRICKS_HOST or add `host` to the [{0}] profile")]
    MissingHost(String),
    #[error("no token configured; set DATABRICKS_TOKEN or add `token` to the [{0}] profile")]
    MissingToken(String),
}

/// Where and as whom the client talks to the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub token: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ProfileSection {
    host: Option<String>,
    token: Option<String>,
}

impl ClientConfig {
    /// `DATABRICKS_HOST` / `DATABRICKS_TOKEN` win over the profile file.
    pub fn resolve(profile: Option<&str>) -> Result<Self, ConfigError> {
        let profile = profile.unwrap_or(DEFAULT_PROFILE);
        let env_host = read_env("DATABRICKS_HOST");
        let env_token = read_env("DATABRICKS_TOKEN");
        let file = if env_host.is_some() && env_token.is_some() {
            None
        } else {
            load_config_file(&config_file_path()?)?
        };
        Self::from_sources(profile, env_host, env_token, file.as_ref())
    }

    fn from_sources(
        profile: &str,
        env_host: Option<String>,
        env_token: Option<String>,
        file: Option<&Ini>,
    ) -> Result<Self, ConfigError> {
        let section = file
            .map(|ini| profile_section(ini, profile))
            .unwrap_or_default();
        let host = env_host
            .or(section.host)
            .ok_or_else(|| ConfigError::MissingHost(profile.to_string()))?;
        let token = env_token
            .or(section.token)
            .ok_or_else(|| ConfigError::MissingToken(profile.to_string()))?;
        tracing::debug!(%host, profile, "resolved client configuration");
        Ok(Self { host, token })
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn config_file_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    Ok(read_env("DATABRICKS_CONFIG_FILE")
        .map(|value| expand_with_home(&value, &home))
        .unwrap_or_else(|| home.join(CONFIG_FILE_NAME)))
}

fn load_config_file(path: &Path) -> Result<Option<Ini>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let mut ini = Ini::new();
    ini.read(content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(Some(ini))
}

fn profile_section(ini: &Ini, profile: &str) -> ProfileSection {
    let value = |key| ini.get(profile, key).filter(|value| !value.is_empty());
    ProfileSection {
        host: value("host"),
        token: value("token"),
    }
}

fn expand_with_home(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = value.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(value)
}
