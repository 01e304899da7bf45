//! Configuration for settlement engine

use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Netting configuration
    pub netting: NettingConfig,
}

/// Secondary ordering among participants with equal balance magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Earlier registered participants go first
    #[default]
    RegistrationOrder,
    /// Lexicographically smaller names go first
    Name,
}

impl TieBreak {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registration_order" | "registration" => Some(TieBreak::RegistrationOrder),
            "name" => Some(TieBreak::Name),
            _ => None,
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Tie-break among equal magnitudes
    pub tie_break: TieBreak,

    /// Re-apply every plan to its input and check all balances reach zero
    pub verify_plan: bool,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            verify_plan: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(tie_break) = std::env::var("CASHFLOW_TIE_BREAK") {
            config.netting.tie_break = TieBreak::parse(&tie_break).ok_or_else(|| {
                crate::Error::Config(format!("Unknown tie-break: {}", tie_break))
            })?;
        }

        if let Ok(flag) = std::env::var("CASHFLOW_VERIFY_PLAN") {
            config.netting.verify_plan = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.netting.tie_break, TieBreak::RegistrationOrder);
        assert!(config.netting.verify_plan);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[netting]\ntie_break = \"name\"\nverify_plan = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.netting.tie_break, TieBreak::Name);
        assert!(!config.netting.verify_plan);
    }

    #[test]
    fn test_from_file_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[netting]\ntie_break = \"random\"").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(crate::Error::Config(_))
        ));
    }
}
