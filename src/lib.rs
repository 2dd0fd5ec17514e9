//! # ad-catalog
//!
//! Real-time ad selection over an in-memory catalog of ad placements and creatives.
//!
//! Given a placement ID, the catalog answers with the highest-priced creative matching the placement's format and
//! size. All reads are served from memory; the durable store is only touched on inserts and refreshes.
//!
//! # The Basics
//!
//! The crate is built from three layers:
//!
//! - A durable store, [`CatalogStore`], owning the `AdUnits` and `Creatives` tables. [`DbStore`](store::DbStore)
//!   implements it on top of [SeaORM](https://crates.io/crates/sea-orm) with SQLite or PostgreSQL
//!   [drivers](driver).
//! - The [`CatalogCache`], a full in-memory snapshot of both tables guarded by a single read/write lock.
//! - The pure [selection](selection::select_creative) rule.
//!
//! The cache follows a simple consistency model:
//!
//! - Inserts go to the store first and are appended to the snapshot only if the store accepted them. An insert that
//!   has returned is visible to every read started afterwards.
//! - The whole snapshot is reloaded and swapped by [`CatalogCache::refresh`], either on demand or periodically by the
//!   task started with [`CatalogCache::spawn_refresher`]. A failed refresh keeps the previous snapshot; a stale catalog
//!   is preferred over none.
//! - Readers get owned copies. Nothing handed out aliases the snapshot.
//!
//! With the `server` feature the crate also provides the `adserver` binary, an [axum](https://crates.io/crates/axum)
//! front-end for [`serve_ad`](serve::serve_ad) and on-demand refreshes.

pub mod cache;
pub mod driver;
pub mod entity;
pub mod migrations;
pub mod sample;
pub mod selection;
pub mod serve;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod traits;
pub mod types;

#[doc(inline)]
pub use cache::CatalogCache;
#[doc(inline)]
pub use traits::CatalogStore;

pub mod prelude {
    pub use crate::cache::CatalogCache;
    pub use crate::driver::DatabaseDriver;
    pub use crate::entity::AdPlacement;
    pub use crate::entity::Creative;
    pub use crate::traits::CatalogStore;
    pub use crate::traits::RefreshTicker;
    pub use crate::types::*;
}
