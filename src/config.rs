//! Store configuration

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{orders::MAX_ORDER_ID_DIGITS, prices::parse_price};

/// Configuration Errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid shipping fee
    #[error("Invalid shipping fee: {0}")]
    InvalidShippingFee(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Order id width out of range
    #[error("Order id digits must be between 1 and 18, got {0}")]
    InvalidOrderIdDigits(u32),
}

/// Settings for a [`CartStore`](crate::store::CartStore) and its checkout.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix of generated order ids
    pub order_id_prefix: String,

    /// Number of low-order millisecond digits in generated order ids
    pub order_id_digits: u32,

    /// Flat shipping fee charged on a non-empty cart
    pub shipping_fee: Decimal,

    /// Tax charged on the subtotal
    pub tax_rate: Percentage,

    /// Status given to orders placed through checkout
    pub confirmed_status: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            order_id_prefix: "WM".to_string(),
            order_id_digits: 8,
            shipping_fee: Decimal::from(99),
            tax_rate: Percentage::from(0.18),
            confirmed_status: "Confirmed".to_string(),
        }
    }
}

/// Config file layout. Every key is optional and falls back to the default.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    order_id_prefix: Option<String>,
    order_id_digits: Option<u32>,
    shipping_fee: Option<String>,
    tax_rate: Option<String>,
    confirmed_status: Option<String>,
}

impl TryFrom<ConfigFile> for StoreConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let defaults = StoreConfig::default();

        let order_id_digits = file.order_id_digits.unwrap_or(defaults.order_id_digits);

        if !(1..=MAX_ORDER_ID_DIGITS).contains(&order_id_digits) {
            return Err(ConfigError::InvalidOrderIdDigits(order_id_digits));
        }

        let shipping_fee = match file.shipping_fee {
            Some(fee) => parse_price(&fee).ok_or(ConfigError::InvalidShippingFee(fee))?,
            None => defaults.shipping_fee,
        };

        let tax_rate = match file.tax_rate {
            Some(rate) => parse_percentage(&rate)?,
            None => defaults.tax_rate,
        };

        Ok(Self {
            order_id_prefix: file.order_id_prefix.unwrap_or(defaults.order_id_prefix),
            order_id_digits,
            shipping_fee,
            tax_rate,
            confirmed_status: file.confirmed_status.unwrap_or(defaults.confirmed_status),
        })
    }
}

impl StoreConfig {
    /// Parse configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, has unknown keys, or holds an
    /// invalid fee, rate or order id width.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = serde_norway::from_str(yaml)?;

        file.try_into()
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`StoreConfig::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }
}

/// Parse percentage string (e.g., "18%" or "0.18") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, ConfigError> {
    let trimmed = s.trim();

    let parsed = match trimmed.strip_suffix('%') {
        Some(percent_str) => percent_str.trim().parse::<f64>().map(|value| value / 100.0),
        None => trimmed.parse::<f64>(),
    };

    let value = parsed.map_err(|_err| ConfigError::InvalidPercentage(s.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_storefront_checkout() {
        let config = StoreConfig::default();

        assert_eq!(config.order_id_prefix, "WM");
        assert_eq!(config.order_id_digits, 8);
        assert_eq!(config.shipping_fee, Decimal::from(99));
        assert_eq!(config.tax_rate, Percentage::from(0.18));
        assert_eq!(config.confirmed_status, "Confirmed");
    }

    #[test]
    fn parse_percentage_accepts_percent_format() -> TestResult {
        assert_eq!(parse_percentage("18%")?, Percentage::from(0.18));
        assert_eq!(parse_percentage("  5 % ")?, Percentage::from(0.05));

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_decimal_format() -> TestResult {
        assert_eq!(parse_percentage("0.18")?, Percentage::from(0.18));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        assert!(matches!(
            parse_percentage("eighteen"),
            Err(ConfigError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("-5%"),
            Err(ConfigError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn yaml_overrides_some_keys() -> TestResult {
        let config = StoreConfig::from_yaml_str(
            "order_id_prefix: SO\nshipping_fee: \"₹49\"\ntax_rate: \"5%\"\n",
        )?;

        assert_eq!(config.order_id_prefix, "SO");
        assert_eq!(config.order_id_digits, 8);
        assert_eq!(config.shipping_fee, Decimal::from(49));
        assert_eq!(config.tax_rate, Percentage::from(0.05));
        assert_eq!(config.confirmed_status, "Confirmed");

        Ok(())
    }

    #[test]
    fn empty_yaml_is_default() -> TestResult {
        let config = StoreConfig::from_yaml_str("")?;

        assert_eq!(config.order_id_prefix, "WM");
        assert_eq!(config.shipping_fee, Decimal::from(99));

        Ok(())
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = StoreConfig::from_yaml_str("currency: INR\n");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn bad_shipping_fee_is_rejected() {
        let result = StoreConfig::from_yaml_str("shipping_fee: free\n");

        assert!(matches!(result, Err(ConfigError::InvalidShippingFee(_))));
    }

    #[test]
    fn order_id_digits_out_of_range_is_rejected() {
        let result = StoreConfig::from_yaml_str("order_id_digits: 0\n");

        assert!(matches!(result, Err(ConfigError::InvalidOrderIdDigits(0))));
    }

    #[test]
    fn from_path_reads_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "confirmed_status: Placed")?;

        let config = StoreConfig::from_path(file.path())?;

        assert_eq!(config.confirmed_status, "Placed");

        Ok(())
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let result = StoreConfig::from_path("/definitely/not/here.yml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
