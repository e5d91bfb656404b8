//! Derived analysis on top of the aggregator.
//!
//! Peaks are annotated with curated events, numbers are sorted into bands,
//! and the insight composer turns a per-category table into short
//! observations for the dashboard cards.

pub mod bands;
pub mod insights;
pub mod peaks;
pub mod types;
