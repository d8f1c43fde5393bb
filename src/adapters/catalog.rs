use crate::core::catalog::MarketCatalog;
use crate::core::Storage;
use crate::domain::model::{GeoPoint, Market, OpenDays};
use crate::utils::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    Csv,
    Json,
    Toml,
}

impl CatalogFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl std::str::FromStr for CatalogFormat {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(CatalogFormat::Csv),
            "json" => Ok(CatalogFormat::Json),
            "toml" => Ok(CatalogFormat::Toml),
            other => Err(FinderError::UnsupportedCatalogFormat {
                format: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MarketEntry {
    name: String,
    #[serde(default)]
    address: String,
    lat: f64,
    lng: f64,
    days: Vec<u8>,
}

/// CSV rows carry the day list as one cell, e.g. `"2,7"` or `"2 7"`.
#[derive(Debug, Deserialize)]
struct CsvMarketRow {
    name: String,
    #[serde(default)]
    address: String,
    lat: f64,
    lng: f64,
    days: String,
}

#[derive(Debug, Deserialize)]
struct TomlCatalog {
    markets: Vec<MarketEntry>,
}

impl MarketEntry {
    fn into_market(self, index: usize) -> Result<Market> {
        let open_days = OpenDays::from_digits(self.days).map_err(|reason| FinderError::InvalidMarket {
            index,
            name: self.name.clone(),
            reason,
        })?;
        Ok(Market {
            name: self.name,
            address: self.address,
            position: GeoPoint::new(self.lat, self.lng),
            open_days,
        })
    }
}

impl CsvMarketRow {
    fn into_entry(self, index: usize) -> Result<MarketEntry> {
        let days = self
            .days
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u8>().map_err(|_| FinderError::InvalidMarket {
                    index,
                    name: self.name.clone(),
                    reason: format!("'{}' is not a day digit", part),
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(MarketEntry {
            name: self.name,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
            days,
        })
    }
}

pub fn parse_catalog(data: &[u8], format: CatalogFormat) -> Result<MarketCatalog> {
    let entries: Vec<MarketEntry> = match format {
        CatalogFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);
            let mut entries = Vec::new();
            for (index, row) in reader.deserialize::<CsvMarketRow>().enumerate() {
                entries.push(row?.into_entry(index)?);
            }
            entries
        }
        CatalogFormat::Json => serde_json::from_slice(data)?,
        CatalogFormat::Toml => {
            let text = std::str::from_utf8(data).map_err(|e| FinderError::TomlError {
                message: e.to_string(),
            })?;
            toml::from_str::<TomlCatalog>(text)
                .map_err(|e| FinderError::TomlError {
                    message: e.to_string(),
                })?
                .markets
        }
    };

    let markets = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_market(index))
        .collect::<Result<Vec<_>>>()?;

    MarketCatalog::new(markets)
}

/// Reads the catalog once at startup. The format comes from the extension unless given.
pub async fn load_catalog<S: Storage>(
    storage: &S,
    path: &str,
    format: Option<CatalogFormat>,
) -> Result<MarketCatalog> {
    let format = match format {
        Some(format) => format,
        None => CatalogFormat::from_path(path)?,
    };
    tracing::info!("📂 Loading market catalog from {} ({:?})", path, format);

    let data = storage.read_file(path).await?;
    let catalog = parse_catalog(&data, format)?;

    tracing::info!("✅ Loaded {} markets", catalog.len());
    Ok(catalog)
}
