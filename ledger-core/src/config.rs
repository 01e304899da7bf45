//! Configuration for the ledger

use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to do with transactions whose debtor and creditor are the same
    pub self_transactions: SelfTransactionPolicy,

    /// Actor configuration
    pub actor: ActorConfig,

    /// Collect Prometheus metrics
    pub metrics_enabled: bool,
}

/// Handling of `from == to` transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfTransactionPolicy {
    /// Record the edge; net balances do not move
    #[default]
    Allow,
    /// Fail with `InvalidTransaction`
    Reject,
}

impl SelfTransactionPolicy {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(SelfTransactionPolicy::Reject),
            "allow" => Some(SelfTransactionPolicy::Allow),
            _ => None,
        }
    }
}

/// Actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Mailbox capacity (bounded for backpressure)
    pub mailbox_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1000,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(policy) = std::env::var("CASHFLOW_SELF_TRANSACTIONS") {
            config.self_transactions = SelfTransactionPolicy::parse(&policy).ok_or_else(|| {
                crate::Error::Config(format!("Unknown self-transaction policy: {}", policy))
            })?;
        }

        if let Ok(capacity) = std::env::var("CASHFLOW_MAILBOX_CAPACITY") {
            config.actor.mailbox_capacity = capacity.parse().map_err(|_| {
                crate::Error::Config(format!("Invalid mailbox capacity: {}", capacity))
            })?;
        }

        if let Ok(flag) = std::env::var("CASHFLOW_METRICS") {
            config.metrics_enabled = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the actor cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.actor.mailbox_capacity == 0 {
            return Err(crate::Error::Config(
                "actor.mailbox_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.self_transactions, SelfTransactionPolicy::Allow);
        assert_eq!(config.actor.mailbox_capacity, 1000);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "self_transactions = \"reject\"").unwrap();
        writeln!(file, "[actor]").unwrap();
        writeln!(file, "mailbox_capacity = 8").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.self_transactions, SelfTransactionPolicy::Reject);
        assert_eq!(config.actor.mailbox_capacity, 8);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_from_file_rejects_zero_capacity() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[actor]\nmailbox_capacity = 0").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(SelfTransactionPolicy::parse("ALLOW"), Some(SelfTransactionPolicy::Allow));
        assert_eq!(SelfTransactionPolicy::parse("reject"), Some(SelfTransactionPolicy::Reject));
        assert_eq!(SelfTransactionPolicy::parse("maybe"), None);
    }
}
