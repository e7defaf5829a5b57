//! Runtime settings loaded from a TOML file.
//!
//! ```toml
//! catalog_path = "catalog.toml"
//!
//! [engine]
//! low_coverage_threshold_pct = 50.0
//!
//! [gateway]
//! base_url = "http://localhost:8080"
//! timeout_ms = 30000
//! max_batch_size = 50
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::InstrumentCatalog;
use crate::error::{ConfigResult, Validate, ValidationError};

/// Field mnemonics requested when none are configured.
pub const DEFAULT_FIELDS: &[&str] = &["PX_LAST", "PX_BID", "PX_ASK", "LAST_UPDATE"];

/// Environment variable holding the gateway bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "CURVEFEED_GATEWAY_TOKEN";

/// Curve-engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Coverage (percent) below which a curve is flagged low-coverage.
    #[serde(default = "default_low_coverage_threshold")]
    pub low_coverage_threshold_pct: f64,

    /// Field mnemonics requested from the quote source.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

fn default_low_coverage_threshold() -> f64 {
    50.0
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            low_coverage_threshold_pct: default_low_coverage_threshold(),
            fields: default_fields(),
        }
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(0.0..=100.0).contains(&self.low_coverage_threshold_pct) {
            errors.push(ValidationError::with_rule(
                "engine.low_coverage_threshold_pct",
                "threshold must be between 0 and 100",
                "range",
            ));
        }
        if !self.fields.iter().any(|f| f == "PX_LAST") {
            errors.push(ValidationError::with_rule(
                "engine.fields",
                "PX_LAST must be requested",
                "required",
            ));
        }
        errors
    }
}

/// Reference-data gateway settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Base URL of the gateway.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Reference endpoint path.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum securities per request; larger lists are chunked.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Environment variable that holds the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_endpoint() -> String {
    "/api/bloomberg/reference".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_batch_size() -> usize {
    50
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_batch_size: default_max_batch_size(),
            token_env: default_token_env(),
        }
    }
}

impl GatewaySettings {
    /// Full reference URL.
    pub fn reference_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    /// Bearer token from the configured environment variable, if set and non-empty.
    pub fn token_from_env(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

impl Validate for GatewaySettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(ValidationError::with_rule(
                "gateway.base_url",
                "base URL must start with http:// or https://",
                "url",
            ));
        }
        if self.timeout_ms == 0 {
            errors.push(ValidationError::new("gateway.timeout_ms", "timeout must be positive"));
        }
        if self.max_batch_size == 0 {
            errors.push(ValidationError::new(
                "gateway.max_batch_size",
                "batch size must be positive",
            ));
        }
        errors
    }
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Optional catalog file merged over the built-in catalog.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Engine settings.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Gateway settings.
    #[serde(default)]
    pub gateway: GatewaySettings,
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate_or_error()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    ///
    /// A relative `catalog_path` is resolved against the settings file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_toml_str(&content)?;
        if let (Some(catalog), Some(dir)) = (&settings.catalog_path, path.parent()) {
            if catalog.is_relative() {
                settings.catalog_path = Some(dir.join(catalog));
            }
        }
        Ok(settings)
    }

    /// The built-in catalog with the configured catalog file merged over it.
    pub fn load_catalog(&self) -> ConfigResult<InstrumentCatalog> {
        let mut catalog = InstrumentCatalog::standard()?;
        if let Some(path) = &self.catalog_path {
            catalog.merge(InstrumentCatalog::from_file(path)?);
        }
        Ok(catalog)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.engine.validate();
        errors.extend(self.gateway.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvefeed_core::CurveId;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.engine.low_coverage_threshold_pct, 50.0);
        assert_eq!(settings.gateway.max_batch_size, 50);
        assert_eq!(
            settings.gateway.reference_url(),
            "http://localhost:8080/api/bloomberg/reference"
        );
        assert!(settings.is_valid());
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml_str(
            r#"
            [gateway]
            base_url = "https://gateway.internal/"
            max_batch_size = 20
            "#,
        )
        .unwrap();
        assert_eq!(settings.gateway.max_batch_size, 20);
        assert_eq!(settings.gateway.timeout_ms, 30_000);
        assert_eq!(
            settings.gateway.reference_url(),
            "https://gateway.internal/api/bloomberg/reference"
        );
        assert_eq!(settings.engine.fields.len(), 4);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(Settings::from_toml_str("[engine]\nlow_coverage_threshold_pct = 150.0").is_err());
        assert!(Settings::from_toml_str("[gateway]\nmax_batch_size = 0").is_err());
        assert!(Settings::from_toml_str("[gateway]\nbase_url = \"ftp://x\"").is_err());
        assert!(Settings::from_toml_str("[engine]\nfields = [\"PX_BID\"]").is_err());
    }

    #[test]
    fn test_from_file_resolves_catalog_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("extra.toml"),
            r#"
            [[curves]]
            identifier = "USDVND"
            anchor_ticker = "USDVND Curncy"
            kind = { type = "rates", currency = "USD" }
            "#,
        )
        .unwrap();
        let settings_path = dir.path().join("curvefeed.toml");
        std::fs::write(&settings_path, "catalog_path = \"extra.toml\"\n").unwrap();

        let settings = Settings::from_file(&settings_path).unwrap();
        let catalog = settings.load_catalog().unwrap();
        assert!(catalog.contains(&CurveId::new("USDVND")));
        assert!(catalog.contains(&CurveId::new("EURUSD")));
    }
}
