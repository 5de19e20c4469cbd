//! # Configuration Management Module
//!
//! Configuration for the armor shop module and the reference host store it
//! runs against in the CLI.
//!
//! ## Configuration Structure
//!
//! - [`ShopConfig`] - Module name, templates, shop title and trade-in rate
//! - [`StorageConfig`] - Data directory and optional armor catalog seed
//! - [`LoggingConfig`] - Logging level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use armorshop::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("armorshop.toml").await?;
//!     println!("Trade-in rate: {}%", config.shop.trade_in_percent);
//!
//!     Config::create_default("armorshop.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [shop]
//! module_name = "lotgd/module-armor-shop"
//! village_template = "lotgd/module-village/village"
//! shop_title = "Pegasus's Armor"
//! trade_in_percent = 75
//!
//! [storage]
//! data_dir = "data"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::shop::errors::ShopError;
use crate::shop::module::MODULE;
use crate::shop::narrative::DEFAULT_SHOP_TITLE;
use crate::shop::pricing::DEFAULT_TRADE_IN_PERCENT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default = "default_module_name")]
    pub module_name: String,
    /// Scenes with this template get a shop attached on install.
    #[serde(default = "default_village_template")]
    pub village_template: String,
    #[serde(default = "default_shop_title")]
    pub shop_title: String,
    /// Share of an item's cost credited on trade-in, 0-100.
    #[serde(default = "default_trade_in_percent")]
    pub trade_in_percent: u8,
}

fn default_module_name() -> String {
    MODULE.to_string()
}

fn default_village_template() -> String {
    "lotgd/module-village/village".to_string()
}

fn default_shop_title() -> String {
    DEFAULT_SHOP_TITLE.to_string()
}

fn default_trade_in_percent() -> u8 {
    DEFAULT_TRADE_IN_PERCENT
}

impl ShopConfig {
    pub fn validate(&self) -> Result<(), ShopError> {
        if self.trade_in_percent > 100 {
            return Err(ShopError::InvalidConfig(format!(
                "shop.trade_in_percent must be at most 100, got {}",
                self.trade_in_percent
            )));
        }
        if self.village_template.trim().is_empty() {
            return Err(ShopError::InvalidConfig(
                "shop.village_template must not be empty".to_string(),
            ));
        }
        if self.module_name.trim().is_empty() {
            return Err(ShopError::InvalidConfig(
                "shop.module_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            module_name: default_module_name(),
            village_template: default_village_template(),
            shop_title: default_shop_title(),
            trade_in_percent: default_trade_in_percent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// JSON armor catalog used instead of the built-in one on first open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_seed_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            armor_seed_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.shop.validate()?;
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        match self.logging.level.to_ascii_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" | "off" => Ok(()),
            other => Err(anyhow!("logging.level '{}' is not a log level", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shop.trade_in_percent, 75);
        assert_eq!(config.shop.module_name, "lotgd/module-armor-shop");
    }

    #[test]
    fn rejects_trade_in_over_100() {
        let mut config = Config::default();
        config.shop.trade_in_percent = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn shop_section_rejects_blank_template() {
        let config = ShopConfig {
            village_template: "  ".to_string(),
            ..ShopConfig::default()
        };
        assert!(matches!(config.validate(), Err(ShopError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str("[shop]\ntrade_in_percent = 50\n").unwrap();
        assert_eq!(config.shop.trade_in_percent, 50);
        assert_eq!(config.shop.village_template, "lotgd/module-village/village");
        assert_eq!(config.storage.data_dir, "data");
    }

    #[tokio::test]
    async fn default_file_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("armorshop.toml");
        let path = path.to_str().unwrap();

        Config::create_default(path).await.unwrap();
        let loaded = Config::load(path).await.unwrap();
        assert_eq!(loaded.shop.shop_title, "Pegasus's Armor");
        assert_eq!(loaded.logging.level, "info");
    }
}
