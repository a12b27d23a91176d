//! Quality-weighted random pick of stock media.
//!
//! A small candidate pipeline: a source fetches one page of Pixabay hits,
//! a scorer rates each by likes and downloads per view, and a selector
//! draws one hit from the top of the ranking. How far down the ranking the
//! draw may reach is controlled by a single randomness value from 0 to 100.
//!
//! The draw itself is also available as a plain function,
//! [`select_best_media`], that borrows from its input and takes the random
//! source as a parameter.

pub mod candidate_pipeline;
pub mod components;
pub mod error;
pub mod hit_loader;
pub mod pipelines;
pub mod scorer;
pub mod selector;
pub mod source;
pub mod types;
pub mod util;

pub use components::engagement_scorer::{engagement_score, ScoringWeights};
pub use components::quality_weighted_selector::{
    eligible_pool, select_best_media, PoolPolicy, SelectionPolicy,
};
pub use error::{MediaError, MediaResult};
pub use types::{Category, MediaCandidate, MediaHit, MediaQuery, MediaType, Orientation, Randomness};
