//! Output generation for the terminal and for JSON files.
//!
//! # Submodules
//!
//! - [`cards`]: Renders a feed snapshot as plain-text article cards
//! - [`json`]: Writes a feed snapshot to a JSON file for other tools

pub mod cards;
pub mod json;
