pub mod engagement_scorer;
pub mod pixabay_source;
pub mod quality_weighted_selector;
pub mod static_source;
