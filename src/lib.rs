pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod output;
pub mod parser;
pub mod payload;
pub mod pipelines;
pub mod stats;
