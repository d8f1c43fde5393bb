use crate::adapters::catalog::CatalogFormat;
use crate::app::listing::OutputFormat;
use crate::app::map::ViewportPolicy;
use crate::config::{parse_date, FinderConfig};
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "five-day-market")]
#[command(about = "Find the 5-day markets open on a date, nearest first")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Market catalog (.csv, .json or .toml)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Catalog format when the extension does not tell
    #[arg(long)]
    pub catalog_format: Option<CatalogFormat>,

    /// Date to search, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Ignore any configured position and list in catalog order
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub no_location: bool,

    /// Seconds to wait for a position
    #[arg(long)]
    pub location_timeout: Option<u64>,

    /// table, json or csv
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// nearest or all
    #[arg(long)]
    pub viewport: Option<ViewportPolicy>,

    /// Include the map frame (markers and viewport) in the output
    #[arg(long)]
    pub map: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Config file (or defaults) with the command line laid on top.
    pub fn load_config(&self) -> Result<FinderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                FinderConfig::from_file(path)?
            }
            None => FinderConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut FinderConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog.path = catalog.clone();
        }
        if let Some(format) = self.catalog_format {
            config.catalog.format = Some(format);
        }
        if self.no_location {
            config.location.latitude = None;
            config.location.longitude = None;
        } else if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            config.location.latitude = Some(lat);
            config.location.longitude = Some(lng);
        }
        if let Some(timeout) = self.location_timeout {
            config.location.timeout_seconds = Some(timeout);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if let Some(viewport) = self.viewport {
            config.map.viewport = viewport;
        }
        if self.map {
            config.output.include_map = Some(true);
        }
    }

    pub fn date(&self) -> Result<NaiveDate> {
        match &self.date {
            Some(value) => parse_date(value),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let args = CliArgs::parse_from([
            "five-day-market",
            "--catalog",
            "m.json",
            "--lat",
            "-33.86",
            "--lng",
            "151.2",
            "--format",
            "csv",
            "--viewport",
            "all",
            "--map",
        ]);
        let mut config = FinderConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.catalog.path, "m.json");
        assert_eq!(config.location.latitude, Some(-33.86));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.map.viewport, ViewportPolicy::AllMarkets);
        assert!(config.include_map());
    }

    #[test]
    fn test_no_location_clears_config_position() {
        let args = CliArgs::parse_from(["five-day-market", "--no-location"]);
        let mut config =
            FinderConfig::from_toml_str("[location]\nlatitude = 37.5\nlongitude = 127.0\n").unwrap();
        args.apply_overrides(&mut config);
        assert!(config.user_position().is_none());
    }

    #[test]
    fn test_lat_requires_lng() {
        assert!(CliArgs::try_parse_from(["five-day-market", "--lat", "37.5"]).is_err());
    }

    #[test]
    fn test_date_argument() {
        let args = CliArgs::parse_from(["five-day-market", "--date", "2024-02-29"]);
        assert_eq!(args.date().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let args = CliArgs::parse_from(["five-day-market", "--date", "2023-02-29"]);
        assert!(args.date().is_err());
    }
}
