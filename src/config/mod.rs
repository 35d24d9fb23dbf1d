use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::payment::PaymentKind;

/// Merchant defaults stored as TOML. Command-line arguments win over these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name printed into tag 59 when none is given.
    #[serde(default)]
    pub business_name: Option<String>,
    /// Payment type used when none is given.
    #[serde(default)]
    pub payment_type: Option<PaymentKind>,
    /// Paybill account reference used when none is given.
    #[serde(default)]
    pub account_number: Option<String>,
}

impl AppConfig {
    /// Config file path: ~/.config/mpesa-qr/config.toml
    pub fn path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mpesa-qr");
        config_dir.join("config.toml")
    }

    /// Load config from disk, or return defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        Self::default()
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mpesa-qr-test-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_path("roundtrip");
        let config = AppConfig {
            business_name: Some("Acme".into()),
            payment_type: Some(PaymentKind::Paybill),
            account_number: Some("00100".into()),
        };
        config.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("payment_type = \"paybill\""));
        assert_eq!(AppConfig::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_path("missing");
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config: AppConfig = toml::from_str("business_name = \"Duka\"").unwrap();
        assert_eq!(config.business_name.as_deref(), Some("Duka"));
        assert_eq!(config.payment_type, None);
    }

    #[test]
    fn test_unparsable_file_gives_defaults() {
        let path = scratch_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "payment_type = \"bank\"").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
