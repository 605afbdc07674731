//! Output rendering

pub mod inventory;

pub use inventory::{render_inventory, write_inventory};
