use anyhow::Context;
use folio_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Overrides the configured port, as the original server did
pub const PORT_ENV: &str = "SERVER_PORT";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// SQLite database file, relative to the config directory
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve the sample documents when the database cannot be reached
    #[serde(default = "default_demo_fallback")]
    pub demo_fallback: bool,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_database() -> String {
    "folio.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    2022
}

fn default_demo_fallback() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?
        } else {
            // Return default config if none exists
            Config::default()
        };
        config.with_port_override(std::env::var(PORT_ENV).ok())
    }

    fn with_port_override(mut self, value: Option<String>) -> anyhow::Result<Self> {
        if let Some(value) = value {
            self.port = value
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: {:?}", PORT_ENV, value))?;
        }
        Ok(self)
    }

    /// Get absolute path to the database file
    pub fn database_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.database)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            host: default_host(),
            port: default_port(),
            demo_fallback: default_demo_fallback(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "database": "data/docs.db",
            "port": 8080,
            "demoFallback": false,
            "editor": { "rewriteTimeoutMs": 1000 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.database, "data/docs.db");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.demo_fallback);
        assert_eq!(config.editor.rewrite_timeout_ms, 1000);
        assert_eq!(config.editor.undo_levels, 100);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database, "folio.db");
        assert_eq!(config.port, 2022);
        assert!(config.demo_fallback);
    }

    #[test]
    fn test_port_override() {
        let config = Config::default()
            .with_port_override(Some("3000".to_string()))
            .unwrap();
        assert_eq!(config.port, 3000);

        assert!(Config::default()
            .with_port_override(Some("http".to_string()))
            .is_err());
    }
}
