pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::FinderConfig;

pub use adapters::{load_catalog, LocalStorage};
pub use app::{FinderSession, MapFrame, OutputFormat, ViewportPolicy};
pub use crate::core::{catalog::MarketCatalog, finder::MarketFinder};
pub use domain::model::{GeoPoint, Market, MarketQuery, RankedMarket, UserPosition};
pub use utils::error::{FinderError, Result};
