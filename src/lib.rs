//! Chrome history export and visualization.
//!
//! The extractor copies the browser's `History` database, queries visits and
//! writes them to CSV. The visualizer reads that CSV back and renders domain,
//! daily and hourly charts.

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod logging;
pub mod metadata;
pub mod parsers;
pub mod util;
pub mod visualize;

pub use error::HistoryError;
