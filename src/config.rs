//! Deployment parameters
//!
//! Mirrors the `deployment-params` file used to deploy the token: initial
//! supply, token name and symbol, plus the logic version to deploy behind the
//! proxy. Stored as JSON with upper-case keys:
//!
//! ```json
//! {
//!   "INITIAL_SUPPLY": "10000000000000000000000000000",
//!   "TOKEN_NAME": "Arvol",
//!   "TOKEN_SYMBOL": "ARV",
//!   "LOGIC_VERSION": "arvol-v1"
//! }
//! ```

use crate::core::{parse_amount, unit, Amount, DECIMALS, U256};
use crate::proxy::ARVOL_V1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the data directory
pub const DEPLOYMENT_PARAMS_FILE: &str = "deployment-params.json";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid deployment parameters: {0}")]
    Invalid(String),
}

/// Parameters passed to the initializer at deployment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DeploymentParams {
    /// Initial supply in base units (decimal, or hex with `0x`)
    #[serde(with = "amount_text")]
    pub initial_supply: Amount,
    pub token_name: String,
    pub token_symbol: String,
    #[serde(default = "default_logic_version")]
    pub logic_version: String,
}

fn default_logic_version() -> String {
    ARVOL_V1.to_string()
}

impl Default for DeploymentParams {
    fn default() -> Self {
        Self {
            initial_supply: U256::from(10_000_000_000u64) * unit(DECIMALS),
            token_name: "Arvol".to_string(),
            token_symbol: "ARV".to_string(),
            logic_version: default_logic_version(),
        }
    }
}

impl DeploymentParams {
    /// Load and validate parameters from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&data)?;
        params.validate()?;
        Ok(params)
    }

    /// Load from `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::debug!("Loading deployment parameters from {:?}", path);
            Self::load(path)
        } else {
            log::info!("No deployment parameters at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Write parameters as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Reject parameters the initializer should never see
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_name.trim().is_empty() {
            return Err(ConfigError::Invalid("TOKEN_NAME is empty".to_string()));
        }
        if self.token_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("TOKEN_SYMBOL is empty".to_string()));
        }
        if self.logic_version.trim().is_empty() {
            return Err(ConfigError::Invalid("LOGIC_VERSION is empty".to_string()));
        }
        Ok(())
    }
}

/// Amounts as strings; JSON numbers cannot hold 256-bit values
mod amount_text {
    use super::{parse_amount, Amount};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_amount(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_arvol_deployment() {
        let params = DeploymentParams::default();

        assert_eq!(params.token_name, "Arvol");
        assert_eq!(params.token_symbol, "ARV");
        assert_eq!(params.logic_version, ARVOL_V1);
        assert_eq!(
            params.initial_supply.to_string(),
            "10000000000000000000000000000"
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_parse_upper_case_keys() {
        let json = r#"{
            "INITIAL_SUPPLY": "0x3e8",
            "TOKEN_NAME": "Test Token",
            "TOKEN_SYMBOL": "TST"
        }"#;
        let params: DeploymentParams = serde_json::from_str(json).unwrap();

        assert_eq!(params.initial_supply, U256::from(1000u64));
        assert_eq!(params.token_name, "Test Token");
        assert_eq!(params.logic_version, ARVOL_V1);
    }

    #[test]
    fn test_rejects_numeric_or_invalid_supply() {
        let numeric = r#"{"INITIAL_SUPPLY": 5, "TOKEN_NAME": "A", "TOKEN_SYMBOL": "A"}"#;
        assert!(serde_json::from_str::<DeploymentParams>(numeric).is_err());

        let negative = r#"{"INITIAL_SUPPLY": "-5", "TOKEN_NAME": "A", "TOKEN_SYMBOL": "A"}"#;
        assert!(serde_json::from_str::<DeploymentParams>(negative).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DEPLOYMENT_PARAMS_FILE);

        let params = DeploymentParams {
            initial_supply: U256::from(42u64),
            token_name: "Answer".to_string(),
            token_symbol: "ANS".to_string(),
            logic_version: ARVOL_V1.to_string(),
        };
        params.save(&path).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        assert!(data.contains("\"INITIAL_SUPPLY\": \"42\""));
        assert_eq!(DeploymentParams::load(&path).unwrap(), params);
    }

    #[test]
    fn test_load_or_default_and_validation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert_eq!(
            DeploymentParams::load_or_default(&missing).unwrap(),
            DeploymentParams::default()
        );

        let path = temp_dir.path().join(DEPLOYMENT_PARAMS_FILE);
        fs::write(
            &path,
            r#"{"INITIAL_SUPPLY": "1", "TOKEN_NAME": " ", "TOKEN_SYMBOL": "X"}"#,
        )
        .unwrap();
        assert!(matches!(
            DeploymentParams::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
