//! Service layer for the collector.
//!
//! - `ListingSource`: seam for anything that lists new items of a source
//! - `ListingClient`: HTTP implementation against the forum listing API

mod listing;

pub use listing::{ListingClient, ListingSource, log_fetch_error};
