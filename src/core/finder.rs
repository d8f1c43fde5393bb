use crate::core::calendar::{day_ending, open_markets};
use crate::core::catalog::MarketCatalog;
use crate::core::ranker::rank_markets;
use crate::domain::model::{
    DayEnding, MarketQuery, PositionFix, PositionUnavailable, RankedMarket, UnavailableReason,
    UserPosition,
};
use crate::domain::ports::PositionProvider;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;

/// Matches the browser geolocation timeout the finder was built around.
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// No market opens on the date.
    Empty,
    /// Markets found, but no position to rank them by.
    Unranked,
    Ranked,
}

/// Result of one query, built from scratch every time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketListing {
    pub date: NaiveDate,
    pub day_ending: DayEnding,
    pub user_position: Option<UserPosition>,
    pub markets: Vec<RankedMarket>,
}

impl MarketListing {
    pub fn status(&self) -> ListingStatus {
        if self.markets.is_empty() {
            ListingStatus::Empty
        } else if self.user_position.is_none() {
            ListingStatus::Unranked
        } else {
            ListingStatus::Ranked
        }
    }

    pub fn nearest(&self) -> Option<&RankedMarket> {
        self.markets.first().filter(|m| m.distance_km.is_some())
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MarketFinder {
    catalog: MarketCatalog,
}

impl MarketFinder {
    pub fn new(catalog: MarketCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &MarketCatalog {
        &self.catalog
    }

    pub fn query(&self, query: &MarketQuery) -> MarketListing {
        let open = open_markets(self.catalog.markets(), query.date);
        let markets = rank_markets(open, query.user_position);

        tracing::debug!(
            "Query {} (ending {}): {} open, ranked={}",
            query.date,
            day_ending(query.date),
            markets.len(),
            query.user_position.is_some()
        );

        MarketListing {
            date: query.date,
            day_ending: day_ending(query.date),
            user_position: query.user_position,
            markets,
        }
    }

    /// Asks `provider` for a position, bounded by `timeout`, then queries.
    /// A failed or late fix degrades to an unranked listing.
    pub async fn run<P: PositionProvider + ?Sized>(
        &self,
        date: NaiveDate,
        provider: &P,
        timeout: Duration,
    ) -> (MarketListing, PositionFix) {
        let fix = acquire_position(provider, timeout).await;
        if let Err(unavailable) = &fix {
            tracing::warn!(
                "📍 Position unavailable ({:?}), listing in catalog order",
                unavailable.reason
            );
        }
        (self.query(&MarketQuery::with_fix(date, &fix)), fix)
    }
}

pub async fn acquire_position<P: PositionProvider + ?Sized>(
    provider: &P,
    timeout: Duration,
) -> PositionFix {
    match tokio::time::timeout(timeout, provider.acquire()).await {
        Ok(fix) => fix,
        Err(_) => Err(PositionUnavailable::new(UnavailableReason::Timeout)),
    }
}
