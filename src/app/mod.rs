// Presentation-facing layer: owns the mutable (date, position) pair and shapes
// listings for the list and map collaborators.

pub mod listing;
pub mod map;
pub mod session;

pub use listing::{render, MarketCard, OutputFormat};
pub use map::{MapFrame, ViewportPolicy};
pub use session::{FinderSession, PositionTicket, PositionUpdate};
