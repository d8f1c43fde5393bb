use crate::core::finder::{MarketFinder, MarketListing};
use crate::domain::model::{MarketQuery, PositionFix, UnavailableReason, UserPosition};
use chrono::NaiveDate;

/// Handle for one position request. Only the newest ticket may update the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionUpdate {
    Applied,
    Failed(UnavailableReason),
    /// A newer request was issued after this one; the fix was dropped.
    Superseded,
}

/// Holds the selected date and the last known position, and recomputes the
/// listing whenever either changes.
#[derive(Debug)]
pub struct FinderSession {
    finder: MarketFinder,
    date: NaiveDate,
    position: Option<UserPosition>,
    latest_request: u64,
    listing: MarketListing,
}

impl FinderSession {
    pub fn new(finder: MarketFinder, date: NaiveDate) -> Self {
        let listing = finder.query(&MarketQuery::new(date, None));
        Self {
            finder,
            date,
            position: None,
            latest_request: 0,
            listing,
        }
    }

    pub fn query(&self) -> MarketQuery {
        MarketQuery::new(self.date, self.position)
    }

    pub fn listing(&self) -> &MarketListing {
        &self.listing
    }

    pub fn position(&self) -> Option<UserPosition> {
        self.position
    }

    pub fn set_date(&mut self, date: NaiveDate) -> &MarketListing {
        self.date = date;
        self.refresh()
    }

    pub fn request_position(&mut self) -> PositionTicket {
        self.latest_request += 1;
        PositionTicket(self.latest_request)
    }

    /// Applies a fix for `ticket`. A failure keeps the previous position.
    pub fn apply_position(&mut self, ticket: PositionTicket, fix: PositionFix) -> PositionUpdate {
        if ticket.0 != self.latest_request {
            tracing::debug!(
                "Dropping stale position fix (ticket {}, latest {})",
                ticket.0,
                self.latest_request
            );
            return PositionUpdate::Superseded;
        }

        match fix {
            Ok(position) => {
                self.position = Some(position);
                self.refresh();
                PositionUpdate::Applied
            }
            Err(unavailable) => {
                tracing::warn!("📍 {}", unavailable.reason.message());
                PositionUpdate::Failed(unavailable.reason)
            }
        }
    }

    fn refresh(&mut self) -> &MarketListing {
        self.listing = self.finder.query(&self.query());
        &self.listing
    }
}
