//! Load spreadsheet sheets into a Parquet cache, filter a cached table by
//! column = value criteria, and render the result as a text report, a pivot
//! table, or a chart.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod state;
pub mod ui;
pub mod worker;

pub use error::{ReportError, Result};
