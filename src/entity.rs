//! SeaORM entities of the catalog tables.
pub mod creative;
pub mod placement;

pub use creative::Model as Creative;
pub use placement::Model as AdPlacement;
