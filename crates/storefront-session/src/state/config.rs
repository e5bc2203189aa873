//! # Configuration State
//!
//! Session configuration loaded once at start-up.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Config file (`storefront.toml`)
//! 3. Defaults (this file)
//!
//! Read-only after the session opens.
//!
//! ## Example Config File
//! ```toml
//! default_currency = "£"
//! default_category = "clothes"
//! tax_rate_bps = 2000
//! database_path = "/var/lib/storefront/storefront.db"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use storefront_core::validation::{validate_category, validate_currency_symbol};
use storefront_core::{
    Money, Product, TaxRate, ALL_CATEGORIES, DEFAULT_CURRENCY_SYMBOL, PLACEHOLDER_IMAGE,
    STANDARD_TAX_RATE_BPS,
};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Database file name inside the platform data directory.
const DATABASE_FILE: &str = "storefront.db";

/// Config file name inside the platform config directory.
const CONFIG_FILE: &str = "storefront.toml";

/// Highest accepted tax rate (100%).
const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Currency used when nothing valid is persisted.
    /// Default: "$"
    pub default_currency: String,

    /// Category used when nothing valid is persisted.
    /// Default: "all"
    pub default_category: String,

    /// Tax rate in basis points.
    /// Default: 2100 (21%)
    pub tax_rate_bps: u32,

    /// Image shown for products without one.
    pub placeholder_image: String,

    /// Explicit database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            default_currency: DEFAULT_CURRENCY_SYMBOL.to_string(),
            default_category: ALL_CATEGORIES.to_string(),
            tax_rate_bps: STANDARD_TAX_RATE_BPS,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            database_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_CURRENCY`: default currency symbol
    /// - `STOREFRONT_CATEGORY`: default category
    /// - `STOREFRONT_TAX_RATE`: tax rate as a percentage (e.g. "21")
    /// - `STOREFRONT_DB_PATH`: database file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();
        config.apply_overrides(lookup);
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns defaults (plus environment) if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::from_env()
        })
    }

    /// Parses a config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> SessionResult<Self> {
        info!(?path, "Loading storefront config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SessionError::internal(format!("Could not read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parses config file contents.
    pub fn from_toml(contents: &str) -> SessionResult<Self> {
        toml::from_str(contents)
            .map_err(|e| SessionError::validation(format!("Invalid config file: {}", e)))
    }

    /// Checks the defaults a session would fall back to.
    pub fn validate(&self) -> SessionResult<()> {
        validate_currency_symbol(&self.default_currency)?;
        validate_category(&self.default_category)?;

        if self.tax_rate_bps > MAX_TAX_RATE_BPS {
            return Err(SessionError::validation(format!(
                "tax_rate_bps must be at most {}, got {}",
                MAX_TAX_RATE_BPS, self.tax_rate_bps
            )));
        }
        Ok(())
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(currency) = lookup("STOREFRONT_CURRENCY").filter(|v| !v.trim().is_empty()) {
            debug!(currency = %currency, "Overriding default currency from environment");
            self.default_currency = currency.trim().to_string();
        }

        if let Some(category) = lookup("STOREFRONT_CATEGORY").filter(|v| !v.trim().is_empty()) {
            self.default_category = category.trim().to_string();
        }

        if let Some(rate) = lookup("STOREFRONT_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => self.tax_rate_bps = TaxRate::from_percentage(pct).bps(),
                Err(_) => warn!(value = %rate, "Ignoring unparsable STOREFRONT_TAX_RATE"),
            }
        }

        if let Some(path) = lookup("STOREFRONT_DB_PATH").filter(|v| !v.is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Tax rate for totals.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Resolves the database file.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.storefront.storefront/storefront.db`
    /// - **Windows**: `%APPDATA%\storefront\storefront\data\storefront.db`
    /// - **Linux**: `~/.local/share/storefront/storefront.db`
    pub fn database_path(&self) -> SessionResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "storefront", "storefront").ok_or_else(|| {
            SessionError::internal("Could not determine app data directory")
        })?;

        Ok(dirs.data_dir().join(DATABASE_FILE))
    }

    /// Image to show for `product`, using the configured placeholder.
    pub fn product_image<'a>(&'a self, product: &'a Product) -> &'a str {
        product.image_or(&self.placeholder_image)
    }

    /// Formats an amount for display, e.g. `£25.50`.
    pub fn format_currency(&self, symbol: &str, amount: Money) -> String {
        amount.format_with_symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.default_currency, "$");
        assert_eq!(config.default_category, "all");
        assert_eq!(config.tax_rate().bps(), 2100);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ConfigState::from_lookup(lookup_from(&[
            ("STOREFRONT_CURRENCY", "£"),
            ("STOREFRONT_CATEGORY", " tech "),
            ("STOREFRONT_TAX_RATE", "8.25"),
            ("STOREFRONT_DB_PATH", "/tmp/shop.db"),
        ]));

        assert_eq!(config.default_currency, "£");
        assert_eq!(config.default_category, "tech");
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/shop.db"));
    }

    #[test]
    fn test_bad_tax_rate_keeps_default() {
        let config = ConfigState::from_lookup(lookup_from(&[("STOREFRONT_TAX_RATE", "lots")]));
        assert_eq!(config.tax_rate_bps, 2100);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConfigState::from_toml(
            r#"
            default_currency = "£"
            tax_rate_bps = 2000
            "#,
        )
        .unwrap();

        assert_eq!(config.default_currency, "£");
        assert_eq!(config.tax_rate_bps, 2000);
        assert_eq!(config.default_category, "all");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_a_validation_error() {
        let err = ConfigState::from_toml("tax_rate_bps = \"lots\"").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_validate_rejects_bad_defaults() {
        let config = ConfigState {
            tax_rate_bps: 25_000,
            ..ConfigState::default()
        };
        assert!(config.validate().is_err());

        let config = ConfigState {
            default_currency: "U S".to_string(),
            ..ConfigState::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("storefront-config-that-does-not-exist.toml");
        let config = ConfigState::load_or_default(Some(path));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_product_image_uses_configured_placeholder() {
        let config = ConfigState {
            placeholder_image: "/img/none.svg".to_string(),
            ..ConfigState::default()
        };
        let mut product = Product::new("mug", "Mug");
        assert_eq!(config.product_image(&product), "/img/none.svg");

        product.image = Some("mug.png".to_string());
        assert_eq!(config.product_image(&product), "mug.png");
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency("$", Money::from_cents(2550)), "$25.50");
        assert_eq!(config.format_currency("£", Money::from_cents(5)), "£0.05");
    }
}
