use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub uri: String,
    pub name: String,
    pub collection: String,
    /// Seconds to wait for a reachable server before startup fails
    pub server_selection_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    Memory,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Mongodb,
            uri: "mongodb://localhost:27017".to_string(),
            name: "media".to_string(),
            collection: "media".to_string(),
            server_selection_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Mongodb => write!(f, "mongodb"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("unknown storage backend: {}", other),
        }
    }
}

impl AppConfig {
    /// Load from `.env`, the TOML file and environment overrides, in that order
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var("APP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply environment-style overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGO_URI") {
            self.database.uri = uri;
        }
        if let Some(name) = lookup("MONGO_DATABASE") {
            self.database.name = name;
        }
        if let Some(collection) = lookup("MONGO_COLLECTION") {
            self.database.collection = collection;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.database.backend = backend.parse()?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.backend == StorageBackend::Mongodb {
            if self.database.uri.trim().is_empty() {
                anyhow::bail!("database uri cannot be empty");
            }
            if self.database.name.trim().is_empty() {
                anyhow::bail!("database name cannot be empty");
            }
            if self.database.collection.trim().is_empty() {
                anyhow::bail!("database collection cannot be empty");
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_when_file_is_empty() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, StorageBackend::Mongodb);
        assert_eq!(config.database.collection, "media");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9000

            [database]
            backend = "memory"
            name = "ratings"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.database.name, "ratings");
        assert_eq!(config.database.uri, "mongodb://localhost:27017");
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nuri = \"mongodb://db:27017\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database.uri, "mongodb://db:27017");
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("MONGO_URI", "mongodb://override:27017"),
            ("MONGO_DATABASE", "films"),
            ("STORAGE_BACKEND", "Memory"),
            ("PORT", "3000"),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database.uri, "mongodb://override:27017");
        assert_eq!(config.database.name, "films");
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn empty_database_name_fails_validation() {
        let mut config = AppConfig::default();
        config.database.name = "  ".to_string();
        assert!(config.validate().is_err());

        config.database.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());
    }
}
