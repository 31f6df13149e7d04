//! pilotscore-report: tables, charts, and dashboards for analysis results.

pub mod chart;
pub mod csv;
pub mod export;
pub mod html;
pub mod raster;
