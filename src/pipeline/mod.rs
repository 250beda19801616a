//! Pipeline entry points for collection runs.
//!
//! - `run_collection`: fetch, normalize and rank every source
//! - `persist`: write a run output to all destinations
//! - `run_pipeline`: both of the above, shared by every trigger

mod collect;
mod normalize;
mod persist;
#[allow(clippy::module_inception)]
mod pipeline;
mod rank;

pub use collect::{Collection, RunSettings, collect_sources, run_collection};
pub use normalize::normalize;
pub use persist::persist;
pub use pipeline::run_pipeline;
pub use rank::rank;
