//! Data handed to the map widget: markers, the user dot, and a suggested viewport.

use crate::core::finder::MarketListing;
use crate::domain::model::{GeoPoint, UserPosition};
use serde::{Deserialize, Serialize};

/// Markers past this rank are drawn without a number.
const LABELLED_MARKERS: usize = 10;
const HIGHLIGHTED_MARKERS: usize = 3;
pub const DEFAULT_VIEWPORT_PADDING: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportPolicy {
    /// User plus the nearest market; all markets when there is no user position.
    #[default]
    NearestWithUser,
    AllMarkets,
}

impl std::str::FromStr for ViewportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" | "nearest_with_user" => Ok(ViewportPolicy::NearestWithUser),
            "all" | "all_markets" => Ok(ViewportPolicy::AllMarkets),
            other => Err(format!("unknown viewport policy '{}' (nearest, all)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl Bounds {
    pub fn covering<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        points.into_iter().fold(None, |bounds, p| {
            Some(match bounds {
                None => Bounds {
                    south_west: p,
                    north_east: p,
                },
                Some(Bounds {
                    south_west,
                    north_east,
                }) => Bounds {
                    south_west: GeoPoint::new(
                        south_west.latitude.min(p.latitude),
                        south_west.longitude.min(p.longitude),
                    ),
                    north_east: GeoPoint::new(
                        north_east.latitude.max(p.latitude),
                        north_east.longitude.max(p.longitude),
                    ),
                },
            })
        })
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub bounds: Bounds,
    pub padding_px: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub name: String,
    pub position: GeoPoint,
    pub label: Option<usize>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub markers: Vec<MapMarker>,
    pub user_position: Option<UserPosition>,
    pub viewport: Option<Viewport>,
}

impl MapFrame {
    pub fn from_listing(listing: &MarketListing, policy: ViewportPolicy, padding_px: u32) -> Self {
        let markers = listing
            .markets
            .iter()
            .enumerate()
            .map(|(index, ranked)| MapMarker {
                name: ranked.market.name.clone(),
                position: ranked.market.position,
                label: (index < LABELLED_MARKERS).then_some(index + 1),
                highlighted: index < HIGHLIGHTED_MARKERS && ranked.distance_km.is_some(),
            })
            .collect();

        Self {
            markers,
            user_position: listing.user_position,
            viewport: viewport(listing, policy, padding_px),
        }
    }
}

fn viewport(listing: &MarketListing, policy: ViewportPolicy, padding_px: u32) -> Option<Viewport> {
    let nearest = listing.markets.first()?;

    match (policy, listing.user_position) {
        (ViewportPolicy::NearestWithUser, Some(user)) => {
            Bounds::covering([user, nearest.market.position]).map(|bounds| Viewport {
                bounds,
                padding_px: Some(padding_px),
            })
        }
        _ => Bounds::covering(listing.markets.iter().map(|m| m.market.position)).map(|bounds| Viewport {
            bounds,
            padding_px: None,
        }),
    }
}
