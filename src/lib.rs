// src/lib.rs

//! Forum Pulse Library
//!
//! Collects the newest posts of forum communities, ranks them by engagement
//! (score + comment count) and persists the top posts of each community.

pub mod credentials;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
