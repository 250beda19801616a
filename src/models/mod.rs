// src/models/mod.rs

//! Domain models for the collector.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod item;
mod output;

// Re-export all public types
pub use config::{
    Config, CredentialsConfig, DocumentTarget, FetcherConfig, OutputConfig, RankingConfig,
    split_list,
};
pub use item::{Listing, NormalizedItem, RawItem};
pub use output::{PersistReport, RunOutput, RunSummary, SinkOutcome};
