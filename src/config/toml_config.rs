use crate::adapters::catalog::CatalogFormat;
use crate::app::listing::OutputFormat;
use crate::app::map::{ViewportPolicy, DEFAULT_VIEWPORT_PADDING};
use crate::core::finder::DEFAULT_POSITION_TIMEOUT;
use crate::domain::model::{GeoPoint, UserPosition};
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CATALOG_PATH: &str = "data/markets.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinderConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: String,
    pub format: Option<CatalogFormat>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_CATALOG_PATH.to_string(),
            format: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Written to this file instead of stdout when set.
    pub path: Option<String>,
    pub include_map: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub viewport: ViewportPolicy,
    pub padding_px: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl FinderConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FinderError::TomlError {
            message: e.to_string(),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn user_position(&self) -> Option<UserPosition> {
        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }

    pub fn position_timeout(&self) -> Duration {
        self.location
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POSITION_TIMEOUT)
    }

    pub fn viewport_padding(&self) -> u32 {
        self.map.padding_px.unwrap_or(DEFAULT_VIEWPORT_PADDING)
    }

    pub fn include_map(&self) -> bool {
        self.output.include_map.unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl Validate for FinderConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("catalog.path", &self.catalog.path)?;
        if self.catalog.format.is_none() {
            validation::validate_file_extension("catalog.path", &self.catalog.path, &["csv", "json", "toml"])?;
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => {
                validation::validate_latitude("location.latitude", latitude)?;
                validation::validate_longitude("location.longitude", longitude)?;
            }
            (Some(_), None) => {
                validation::validate_required_field("location.longitude", &self.location.longitude)?;
            }
            (None, Some(_)) => {
                validation::validate_required_field("location.latitude", &self.location.latitude)?;
            }
            (None, None) => {}
        }

        if let Some(timeout) = self.location.timeout_seconds {
            validation::validate_range("location.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(path) = &self.output.path {
            validation::validate_path("output.path", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[catalog]
path = "markets.json"

[location]
latitude = 37.5665
longitude = 126.9780
timeout_seconds = 5

[output]
format = "json"
include_map = true

[map]
viewport = "all_markets"
padding_px = 40

[monitoring]
log_level = "debug"
"#;

        let config = FinderConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog.path, "markets.json");
        assert_eq!(config.user_position(), Some(GeoPoint::new(37.5665, 126.978)));
        assert_eq!(config.position_timeout(), Duration::from_secs(5));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.map.viewport, ViewportPolicy::AllMarkets);
        assert_eq!(config.viewport_padding(), 40);
        assert!(config.include_map());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = FinderConfig::from_toml_str("").unwrap();
        assert_eq!(config.catalog.path, DEFAULT_CATALOG_PATH);
        assert!(config.user_position().is_none());
        assert_eq!(config.position_timeout(), DEFAULT_POSITION_TIMEOUT);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.map.viewport, ViewportPolicy::NearestWithUser);
        assert_eq!(config.viewport_padding(), DEFAULT_VIEWPORT_PADDING);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FIVE_DAY_MARKET_TEST_CATALOG", "/srv/markets.toml");

        let toml_content = r#"
[catalog]
path = "${FIVE_DAY_MARKET_TEST_CATALOG}"
"#;

        let config = FinderConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog.path, "/srv/markets.toml");

        std::env::remove_var("FIVE_DAY_MARKET_TEST_CATALOG");
    }

    #[test]
    fn test_validation_failures() {
        let half_position = FinderConfig::from_toml_str("[location]\nlatitude = 37.5\n").unwrap();
        assert!(matches!(
            half_position.validate(),
            Err(FinderError::MissingConfigError { .. })
        ));

        let out_of_range =
            FinderConfig::from_toml_str("[location]\nlatitude = 97.5\nlongitude = 127.0\n").unwrap();
        assert!(out_of_range.validate().is_err());

        let bad_extension = FinderConfig::from_toml_str("[catalog]\npath = \"markets.xml\"\n").unwrap();
        assert!(bad_extension.validate().is_err());

        let explicit_format =
            FinderConfig::from_toml_str("[catalog]\npath = \"markets.dat\"\nformat = \"csv\"\n").unwrap();
        assert!(explicit_format.validate().is_ok());
    }

    #[test]
    fn test_bad_toml() {
        let err = FinderConfig::from_toml_str("[catalog\npath = 1").unwrap_err();
        assert!(matches!(err, FinderError::TomlError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[catalog]\npath = \"data/markets.toml\"\n")
            .unwrap();

        let config = FinderConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.catalog.path, "data/markets.toml");
    }
}
