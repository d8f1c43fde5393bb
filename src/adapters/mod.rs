// Adapters layer: concrete implementations for the collaborators around the finder.

pub mod catalog;
pub mod position;
pub mod storage;

pub use catalog::{load_catalog, parse_catalog, CatalogFormat};
pub use position::{DeniedPosition, FixedPosition, NoPosition};
pub use storage::LocalStorage;
