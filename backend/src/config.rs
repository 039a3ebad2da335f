use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got \"{value}\"")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub upload_folder: PathBuf,
    pub max_content_length: usize,
    pub frontend_dir: PathBuf,
    pub category_profiles: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let manifest_dir = lookup("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/usr/src/app/backend"));

        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let max_content_length = match lookup("MAX_CONTENT_LENGTH") {
            Some(value) => parse_number("MAX_CONTENT_LENGTH", &value)?,
            None => DEFAULT_MAX_CONTENT_LENGTH,
        };

        let upload_folder = lookup("UPLOAD_FOLDER")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("uploads"));

        let frontend_dir = lookup("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| manifest_dir.join("../frontend/dist"));

        let category_profiles = lookup("CATEGORY_PROFILES")
            .map(PathBuf::from)
            .unwrap_or_else(|| manifest_dir.join("../config/categories.yaml"));

        Ok(Self {
            port,
            upload_folder,
            max_content_length,
            frontend_dir,
            category_profiles,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_number<T: std::str::FromStr + PartialOrd + Default>(
    name: &'static str,
    value: &str,
) -> Result<T, ConfigError> {
    match value.trim().parse::<T>() {
        Ok(number) if number > T::default() => Ok(number),
        _ => Err(ConfigError::NotANumber {
            name,
            value: value.to_string(),
        }),
    }
}
