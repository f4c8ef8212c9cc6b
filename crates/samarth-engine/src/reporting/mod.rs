//! Rendering answers for display.
//!
//! - [`markdown`] turns frames into GitHub-style pipe tables
//! - [`citation`] formats dataset provenance lines

pub mod citation;
pub mod markdown;

pub use citation::Citation;
pub use markdown::{render_table, TableSnapshot};
