pub mod calendar;
pub mod catalog;
pub mod distance;
pub mod finder;
pub mod ranker;

pub use crate::domain::model::{Market, MarketQuery, RankedMarket};
pub use crate::domain::ports::{PositionProvider, Storage};
pub use crate::utils::error::Result;
