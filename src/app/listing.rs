//! List view contract: cards, summary line, and the text/JSON/CSV renderings.

use crate::app::map::MapFrame;
use crate::core::calendar::format_market_days;
use crate::core::distance::format_distance;
use crate::core::finder::{ListingStatus, MarketListing};
use crate::domain::model::RankedMarket;
use crate::utils::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub const NO_LOCATION_LABEL: &str = "위치 정보 없음";
pub const EMPTY_MESSAGE: &str = "이 날은 열리는 5일장이 없습니다.\n다른 날짜를 선택해 보세요.";

/// Only this many ranked cards get a rank badge.
const BADGE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(FinderError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: table, json, csv".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketCard {
    pub rank_badge: Option<usize>,
    pub name: String,
    pub address: String,
    pub distance_label: String,
    pub days_label: String,
}

impl MarketCard {
    pub fn new(index: usize, ranked: &RankedMarket) -> Self {
        let rank_badge = (index < BADGE_COUNT && ranked.distance_km.is_some()).then_some(index + 1);
        Self {
            rank_badge,
            name: ranked.market.name.clone(),
            address: ranked.market.address.clone(),
            distance_label: ranked
                .distance_km
                .map(format_distance)
                .unwrap_or_else(|| NO_LOCATION_LABEL.to_string()),
            days_label: format_market_days(ranked.market.open_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSummary {
    pub count: usize,
    pub day_ending_label: String,
}

impl ListingSummary {
    pub fn of(listing: &MarketListing) -> Self {
        Self {
            count: listing.len(),
            day_ending_label: listing.day_ending.label(),
        }
    }
}

pub fn cards(listing: &MarketListing) -> Vec<MarketCard> {
    listing
        .markets
        .iter()
        .enumerate()
        .map(|(index, ranked)| MarketCard::new(index, ranked))
        .collect()
}

pub fn render_map_text(frame: &MapFrame) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🗺️ {} markers", frame.markers.len());
    if let Some(user) = frame.user_position {
        let _ = writeln!(out, "    내 위치: {:.4}, {:.4}", user.latitude, user.longitude);
    }
    if let Some(viewport) = frame.viewport {
        let center = viewport.bounds.center();
        let _ = writeln!(
            out,
            "    viewport: ({:.4}, {:.4}) - ({:.4}, {:.4}), center ({:.4}, {:.4})",
            viewport.bounds.south_west.latitude,
            viewport.bounds.south_west.longitude,
            viewport.bounds.north_east.latitude,
            viewport.bounds.north_east.longitude,
            center.latitude,
            center.longitude
        );
    }
    out
}

pub fn render_text(listing: &MarketListing) -> String {
    let summary = ListingSummary::of(listing);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "📅 {} | 끝자리 {} | {}곳",
        listing.date.format("%Y-%m-%d"),
        summary.day_ending_label,
        summary.count
    );

    if listing.status() == ListingStatus::Empty {
        let _ = writeln!(out, "🏪 {}", EMPTY_MESSAGE);
        return out;
    }

    for card in cards(listing) {
        let badge = card
            .rank_badge
            .map(|rank| format!("[{}] ", rank))
            .unwrap_or_default();
        let _ = writeln!(out, "{}{} · 📍 {}", badge, card.name, card.distance_label);
        let _ = writeln!(out, "    {}", card.address);
        let _ = writeln!(out, "    장날: {}", card.days_label);
    }
    out
}

#[derive(Debug, Serialize)]
struct JsonListing<'a> {
    status: ListingStatus,
    #[serde(flatten)]
    listing: &'a MarketListing,
    summary: ListingSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<&'a MapFrame>,
}

pub fn render_json(listing: &MarketListing, map: Option<&MapFrame>) -> Result<String> {
    let document = JsonListing {
        status: listing.status(),
        listing,
        summary: ListingSummary::of(listing),
        map,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

const CSV_HEADER: [&str; 7] = ["rank", "name", "address", "lat", "lng", "days", "distance_km"];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    /// Empty when there is no position to rank by.
    rank: Option<usize>,
    name: &'a str,
    address: &'a str,
    lat: f64,
    lng: f64,
    days: String,
    distance_km: Option<f64>,
}

/// Always starts with the header row, so an empty day is still a valid document.
pub fn render_csv(listing: &MarketListing) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    let ranked_order = listing.user_position.is_some();
    for (index, ranked) in listing.markets.iter().enumerate() {
        let days: Vec<String> = ranked
            .market
            .open_days
            .iter()
            .map(|ending| ending.to_string())
            .collect();
        writer.serialize(CsvRow {
            rank: ranked_order.then_some(index + 1),
            name: &ranked.market.name,
            address: &ranked.market.address,
            lat: ranked.market.position.latitude,
            lng: ranked.market.position.longitude,
            days: days.join(","),
            distance_km: ranked.distance_km.map(|km| (km * 1000.0).round() / 1000.0),
        })?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| FinderError::IoError(e.into_error()))?;
    String::from_utf8(data).map_err(|e| FinderError::ProcessingError {
        message: e.to_string(),
    })
}

/// The map frame is left out of CSV, which has no place for it.
pub fn render(listing: &MarketListing, format: OutputFormat, map: Option<&MapFrame>) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = render_text(listing);
            if let Some(frame) = map {
                out.push_str(&render_map_text(frame));
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(listing, map),
        OutputFormat::Csv => render_csv(listing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DayEnding, GeoPoint, Market, OpenDays};
    use chrono::NaiveDate;

    fn ranked(name: &str, distance_km: Option<f64>) -> RankedMarket {
        RankedMarket {
            market: Market {
                name: name.to_string(),
                address: format!("{} 주소", name),
                position: GeoPoint::new(37.0, 127.0),
                open_days: OpenDays::from_digits([0, 5]).unwrap(),
            },
            distance_km,
        }
    }

    fn listing(markets: Vec<RankedMarket>, positioned: bool) -> MarketListing {
        let date = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        MarketListing {
            date,
            day_ending: DayEnding::of(date),
            user_position: positioned.then(|| GeoPoint::new(37.5, 127.0)),
            markets,
        }
    }

    #[test]
    fn test_badges_only_for_top_three_with_distance() {
        let listing = listing(
            vec![
                ranked("a", Some(0.85)),
                ranked("b", Some(1.04)),
                ranked("c", Some(12.34)),
                ranked("d", Some(20.0)),
            ],
            true,
        );
        let cards = cards(&listing);
        let badges: Vec<Option<usize>> = cards.iter().map(|c| c.rank_badge).collect();
        assert_eq!(badges, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(cards[0].distance_label, "850m");
        assert_eq!(cards[1].distance_label, "1.0km");
        assert_eq!(cards[2].distance_label, "12.3km");
        assert_eq!(cards[0].days_label, "5일, 10일");
    }

    #[test]
    fn test_unranked_cards_have_no_badge() {
        let listing = listing(vec![ranked("a", None), ranked("b", None)], false);
        let cards = cards(&listing);
        assert!(cards.iter().all(|c| c.rank_badge.is_none()));
        assert_eq!(cards[0].distance_label, NO_LOCATION_LABEL);
    }

    #[test]
    fn test_summary_and_empty_text() {
        let empty = listing(Vec::new(), true);
        let summary = ListingSummary::of(&empty);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.day_ending_label, "0, 10");

        let text = render_text(&empty);
        assert!(text.contains("열리는 5일장이 없습니다"));
    }

    #[test]
    fn test_json_carries_status() {
        let listing = listing(vec![ranked("a", None)], false);
        let json: serde_json::Value = serde_json::from_str(&render_json(&listing, None).unwrap()).unwrap();
        assert_eq!(json["status"], "unranked");
        assert_eq!(json["markets"][0]["name"], "a");
        assert!(json["markets"][0]["distance_km"].is_null());
        assert_eq!(json["markets"][0]["days"], serde_json::json!([5, 0]));
        assert_eq!(json["summary"]["count"], 1);
        assert!(json.get("map").is_none());
    }

    #[test]
    fn test_render_with_map() {
        use crate::app::map::ViewportPolicy;

        let listing = listing(vec![ranked("a", Some(2.0))], true);
        let frame = MapFrame::from_listing(&listing, ViewportPolicy::NearestWithUser, 80);

        let json: serde_json::Value =
            serde_json::from_str(&render(&listing, OutputFormat::Json, Some(&frame)).unwrap()).unwrap();
        assert_eq!(json["map"]["markers"][0]["label"], 1);
        assert_eq!(json["map"]["viewport"]["padding_px"], 80);

        let text = render(&listing, OutputFormat::Table, Some(&frame)).unwrap();
        assert!(text.contains("[1] a"));
        assert!(text.contains("viewport"));
    }

    #[test]
    fn test_csv_output() {
        let listing = listing(vec![ranked("a", Some(1.23456)), ranked("b", None)], true);
        let csv = render_csv(&listing).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "rank,name,address,lat,lng,days,distance_km");
        assert_eq!(lines.next().unwrap(), "1,a,a 주소,37.0,127.0,\"5,0\",1.235");
        assert_eq!(lines.next().unwrap(), "2,b,b 주소,37.0,127.0,\"5,0\",");
    }

    #[test]
    fn test_csv_unranked_leaves_rank_empty() {
        let listing = listing(vec![ranked("a", None), ranked("b", None)], false);
        let csv = render_csv(&listing).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], ",a,a 주소,37.0,127.0,\"5,0\",");
        assert_eq!(lines[2], ",b,b 주소,37.0,127.0,\"5,0\",");
    }

    #[test]
    fn test_csv_empty_day_keeps_header() {
        let csv = render_csv(&listing(Vec::new(), true)).unwrap();
        assert_eq!(csv, "rank,name,address,lat,lng,days,distance_km\n");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
