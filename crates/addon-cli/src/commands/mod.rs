//! Command implementations

pub mod manifest;
pub mod resolve;

pub use manifest::{handle_check, handle_init};
pub use resolve::handle_resolve;
