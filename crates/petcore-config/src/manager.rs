use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{Backend, Config, ConfigError};

pub const HOME_ENV: &str = "PETCORE_HOME";
pub const API_URL_ENV: &str = "PETCORE_API_URL";
pub const BACKEND_ENV: &str = "PETCORE_BACKEND";
pub const USER_ID_ENV: &str = "PETCORE_USER_ID";
const TMP_SUFFIX: &str = "tmp";

/// Handles persistence of [`Config`] under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join("config.json")))
    }

    /// `$PETCORE_HOME`, else the platform config dir joined with `petcore`.
    pub fn default_base_dir() -> PathBuf {
        if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("petcore")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    /// Loads the stored config and layers the process environment on top.
    pub fn load_effective(&self) -> Result<Config, ConfigError> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

/// Applies `PETCORE_API_URL`, `PETCORE_BACKEND`, and `PETCORE_USER_ID` when present.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = present(API_URL_ENV) {
        config.set("api_base_url", &url)?;
    }
    if let Some(raw) = present(BACKEND_ENV) {
        config.backend = Backend::parse(&raw).ok_or(ConfigError::InvalidValue {
            key: BACKEND_ENV.to_string(),
            value: raw.clone(),
        })?;
    }
    if let Some(user) = present(USER_ID_ENV) {
        config.user_id = Some(user.trim().to_string());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
