use crate::domain::model::{DayEnding, Market, OpenDays};
use chrono::NaiveDate;

pub fn day_ending(date: NaiveDate) -> DayEnding {
    DayEnding::of(date)
}

pub fn is_market_open(market: &Market, date: NaiveDate) -> bool {
    market.open_days.contains(day_ending(date))
}

/// Markets open on `date`, in catalog order.
pub fn open_markets(catalog: &[Market], date: NaiveDate) -> Vec<&Market> {
    let ending = day_ending(date);
    catalog
        .iter()
        .filter(|market| market.open_days.contains(ending))
        .collect()
}

/// "2일, 7일"; ending 0 is written as the 10th.
pub fn format_market_days(days: OpenDays) -> String {
    days.iter()
        .map(|ending| match ending.get() {
            0 => "10일".to_string(),
            digit => format!("{}일", digit),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
