//! Profile aggregation core

pub mod downloads;
pub mod profile_aggregator;

pub use downloads::distinct_datatokens;
pub use profile_aggregator::{Collaborators, ProfileAggregator, REFRESH_INTERVAL};
