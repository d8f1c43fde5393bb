use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Last digit of the day-of-month. Days 10, 20 and 30 share the code 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayEnding(u8);

impl DayEnding {
    pub fn new(digit: u8) -> Option<Self> {
        (digit <= 9).then_some(Self(digit))
    }

    pub fn of(date: NaiveDate) -> Self {
        // day() is always 1..=31, so the remainder is a valid digit
        Self((date.day() % 10) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Summary header text; 0 is shown together with 10 since that is what users look for.
    pub fn label(self) -> String {
        if self.0 == 0 {
            "0, 10".to_string()
        } else {
            self.0.to_string()
        }
    }
}

impl TryFrom<u8> for DayEnding {
    type Error = String;

    fn try_from(digit: u8) -> Result<Self, Self::Error> {
        Self::new(digit).ok_or_else(|| format!("day ending must be 0-9, got {}", digit))
    }
}

impl From<DayEnding> for u8 {
    fn from(ending: DayEnding) -> Self {
        ending.0
    }
}

impl fmt::Display for DayEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty set of day endings a market operates on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct OpenDays(u16);

impl OpenDays {
    pub fn from_digits<I>(digits: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut mask = 0u16;
        for digit in digits {
            let ending = DayEnding::try_from(digit)?;
            mask |= 1 << ending.get();
        }
        if mask == 0 {
            return Err("open days cannot be empty".to_string());
        }
        Ok(Self(mask))
    }

    pub fn contains(self, ending: DayEnding) -> bool {
        self.0 & (1 << ending.get()) != 0
    }

    /// Endings in calendar order: 1 through 9, then 0 (day 10).
    pub fn iter(self) -> impl Iterator<Item = DayEnding> {
        (1..=9u8)
            .chain(std::iter::once(0))
            .filter(move |digit| self.0 & (1 << *digit) != 0)
            .map(DayEnding)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Pairs with `len`. Construction rejects empty sets, so this is false for any value.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<Vec<u8>> for OpenDays {
    type Error = String;

    fn try_from(digits: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_digits(digits)
    }
}

impl From<OpenDays> for Vec<u8> {
    fn from(days: OpenDays) -> Self {
        days.iter().map(DayEnding::get).collect()
    }
}

impl fmt::Debug for OpenDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(DayEnding::get)).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

pub type UserPosition = GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    pub address: String,
    #[serde(flatten)]
    pub position: GeoPoint,
    #[serde(rename = "days")]
    pub open_days: OpenDays,
}

/// A market together with its distance for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMarket {
    #[serde(flatten)]
    pub market: Market,
    pub distance_km: Option<f64>,
}

/// Everything one ranking depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketQuery {
    pub date: NaiveDate,
    pub user_position: Option<UserPosition>,
}

impl MarketQuery {
    pub fn new(date: NaiveDate, user_position: Option<UserPosition>) -> Self {
        Self {
            date,
            user_position,
        }
    }

    /// An unavailable fix ranks exactly like a query without a position.
    pub fn with_fix(date: NaiveDate, fix: &PositionFix) -> Self {
        Self::new(date, fix.as_ref().ok().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
}

impl UnavailableReason {
    pub fn message(self) -> &'static str {
        match self {
            UnavailableReason::PermissionDenied => "위치 권한이 거부되었습니다.",
            UnavailableReason::PositionUnavailable => "위치 정보를 사용할 수 없습니다.",
            UnavailableReason::Timeout => "위치 요청 시간이 초과되었습니다.",
            UnavailableReason::Unsupported => "위치 서비스를 지원하지 않습니다.",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("position unavailable: {reason:?}")]
pub struct PositionUnavailable {
    pub reason: UnavailableReason,
}

impl PositionUnavailable {
    pub fn new(reason: UnavailableReason) -> Self {
        Self { reason }
    }
}

pub type PositionFix = Result<UserPosition, PositionUnavailable>;
