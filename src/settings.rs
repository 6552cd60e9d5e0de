use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TallyError};
use crate::models::PriceTable;

pub const CONFIG_ENV: &str = "BARTALLY_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub prices: PriceTable,
    /// Column picked by default when the CSV has one with this name.
    #[serde(default)]
    pub date_column: Option<String>,
    #[serde(default)]
    pub amount_column: Option<String>,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("bartally")
}

pub fn settings_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => config_dir().join("settings.json"),
    }
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not read {}: {e}; using defaults", path.display());
            return Settings::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!("Could not parse {}: {e}; using defaults", path.display());
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(&path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            prices: PriceTable { soda: 9, beer: 12, energy: 18 },
            date_column: Some("Dato".to_string()),
            amount_column: Some("Beløb".to_string()),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_defaults_when_missing() {
        let s = Settings::default();
        assert_eq!(s.prices, PriceTable::default());
        assert!(s.date_column.is_none());
        assert!(s.amount_column.is_none());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"amount_column": "Beløb"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.prices.soda, 8);
        assert_eq!(s.amount_column.as_deref(), Some("Beløb"));
        assert!(s.date_column.is_none());
    }
}
