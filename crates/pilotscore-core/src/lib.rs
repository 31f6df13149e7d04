//! pilotscore-core: score extraction, cleaning, and descriptive statistics.
//!
//! This crate defines the data model and the pure pipeline stages
//! (load → extract → clean → summarize / count) that the rest of
//! pilotscore builds on.

pub mod clean;
pub mod config;
pub mod error;
pub mod extract;
pub mod frequency;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod statistics;
