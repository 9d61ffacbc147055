//! Coder configuration

use serde::{Deserialize, Serialize};

/// Settings shared by [`AbiCoder`](crate::AbiCoder) and [`Contract`](crate::Contract)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiConfig {
    /// Replace every error by [`AbiError::Censored`](crate::AbiError::Censored)
    #[serde(default)]
    pub censor_errors: bool,
    /// Decode integers of 48 bits or less as `Value::Number`
    #[serde(default = "default_coerce_small_integers")]
    pub coerce_small_integers: bool,
    /// Present decoded call addresses as `41` + hex
    #[serde(default)]
    pub tron_addresses: bool,
}

fn default_coerce_small_integers() -> bool {
    true
}

impl Default for AbiConfig {
    fn default() -> Self {
        Self {
            censor_errors: false,
            coerce_small_integers: default_coerce_small_integers(),
            tron_addresses: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AbiConfig::default();
        assert!(!config.censor_errors);
        assert!(config.coerce_small_integers);
        assert!(!config.tron_addresses);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: AbiConfig = serde_json::from_str(r#"{"tron_addresses": true}"#).unwrap();
        assert!(config.tron_addresses);
        assert!(config.coerce_small_integers);
        assert!(!config.censor_errors);
    }
}
