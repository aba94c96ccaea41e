//! Classroom-utilization dashboard service.
//!
//! Consumes the campus classroom-analytics API and serves rendered heatmap
//! view models (week overview, per-classroom detail, used-classroom
//! drill-down) plus a spreadsheet-upload relay to the browser dashboard.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod filter;
pub mod heatmap;
pub mod logging;
pub mod services;
pub mod state;
pub mod upstream;
pub mod utils;
pub mod view;
pub mod web;
