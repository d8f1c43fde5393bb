use crate::core::distance::haversine_km;
use crate::domain::model::{Market, RankedMarket, UserPosition};
use std::cmp::Ordering;

/// Known distances first, ascending; unknown distances are equal to each other.
pub fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Attaches distances and orders by them. Ties keep input order (`sort_by` is stable).
pub fn rank_markets<'a, I>(open: I, position: Option<UserPosition>) -> Vec<RankedMarket>
where
    I: IntoIterator<Item = &'a Market>,
{
    let mut ranked: Vec<RankedMarket> = open
        .into_iter()
        .map(|market| RankedMarket {
            market: market.clone(),
            distance_km: position.map(|user| haversine_km(user, market.position)),
        })
        .collect();

    if position.is_some() {
        ranked.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));
    }
    ranked
}
