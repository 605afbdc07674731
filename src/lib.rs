//! Repository file inventories for LLM context.
//!
//! Two walkers share one filter chain:
//! - [`scan::LocalWalker`] reads a directory tree synchronously.
//! - [`fetch::RemoteWalker`] pages through a hosted repository's contents API.
//!
//! Both produce an [`inventory::Inventory`] of [`domain::FileRecord`]s in
//! discovery order, which [`render::write_inventory`] persists as JSON.

pub mod cli;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod filter;
pub mod inventory;
pub mod normalize;
pub mod render;
pub mod scan;
pub mod utils;

pub use domain::{Config, FileRecord, InventoryStats, SkipReason};
pub use filter::{FilterSet, IgnoreMatcher};
pub use inventory::Inventory;
