use crate::domain::model::Market;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{validate_latitude, validate_longitude, validate_non_empty_string};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, read-only market list, shared by every query.
#[derive(Debug, Clone)]
pub struct MarketCatalog {
    markets: Arc<[Market]>,
}

impl MarketCatalog {
    pub fn new(markets: Vec<Market>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, market) in markets.iter().enumerate() {
            check_market(index, market)?;
            if !seen.insert(market.name.as_str()) {
                tracing::warn!("⚠️ Duplicate market name in catalog: {}", market.name);
            }
        }

        tracing::debug!("Catalog ready with {} markets", markets.len());
        Ok(Self {
            markets: markets.into(),
        })
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

fn check_market(index: usize, market: &Market) -> Result<()> {
    let invalid = |err: FinderError| FinderError::InvalidMarket {
        index,
        name: market.name.clone(),
        reason: match err {
            FinderError::InvalidConfigValueError { field, reason, .. } => {
                format!("{}: {}", field, reason)
            }
            other => other.to_string(),
        },
    };

    validate_non_empty_string("name", &market.name).map_err(invalid)?;
    validate_latitude("lat", market.position.latitude).map_err(invalid)?;
    validate_longitude("lng", market.position.longitude).map_err(invalid)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GeoPoint, OpenDays};

    fn market(name: &str, lat: f64, lng: f64) -> Market {
        Market {
            name: name.to_string(),
            address: "somewhere".to_string(),
            position: GeoPoint::new(lat, lng),
            open_days: OpenDays::from_digits([3, 8]).unwrap(),
        }
    }

    #[test]
    fn test_catalog_keeps_order() {
        let catalog = MarketCatalog::new(vec![market("b", 37.0, 127.0), market("a", 36.0, 128.0)]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.markets()[0].name, "b");
    }

    #[test]
    fn test_catalog_rejects_bad_coordinates() {
        let err = MarketCatalog::new(vec![market("ok", 37.0, 127.0), market("bad", 137.0, 127.0)])
            .unwrap_err();
        match err {
            FinderError::InvalidMarket { index, name, reason } => {
                assert_eq!(index, 1);
                assert_eq!(name, "bad");
                assert!(reason.starts_with("lat"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_rejects_blank_name() {
        assert!(MarketCatalog::new(vec![market("  ", 37.0, 127.0)]).is_err());
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let catalog = MarketCatalog::new(vec![market("a", 37.0, 127.0), market("a", 36.0, 128.0)]).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
