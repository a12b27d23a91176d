use async_trait::async_trait;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::engagement_scorer::EngagementScorer;
use crate::components::pixabay_source::{PixabayConfig, PixabaySource};
use crate::components::quality_weighted_selector::{QualityWeightedSelector, SelectionPolicy};
use crate::components::static_source::StaticSource;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::source::Source;
use crate::types::{MediaCandidate, MediaHit, MediaQuery};

/// The random media pipeline.
///
/// Pipeline flow:
/// 1. A source fetches one page of hits (Pixabay, or a preloaded batch)
/// 2. EngagementScorer scores each hit by likes and downloads per view
/// 3. QualityWeightedSelector draws one hit from the top of the ranking,
///    with the pool sized by the query's randomness
pub struct RandomMediaPipeline {
    sources: Vec<Box<dyn Source<MediaQuery, MediaCandidate>>>,
    scorers: Vec<Box<dyn Scorer<MediaQuery, MediaCandidate>>>,
    selector: QualityWeightedSelector,
}

impl RandomMediaPipeline {
    /// Pipeline backed by the Pixabay API.
    pub fn pixabay(config: PixabayConfig, policy: SelectionPolicy) -> Self {
        Self::with_source(Box::new(PixabaySource::new(config)), policy)
    }

    /// Pipeline over hits already in memory.
    pub fn offline(hits: Vec<MediaHit>, total_hits: u64, policy: SelectionPolicy) -> Self {
        Self::with_source(
            Box::new(StaticSource::new(hits).with_total_hits(total_hits)),
            policy,
        )
    }

    pub fn with_source(
        source: Box<dyn Source<MediaQuery, MediaCandidate>>,
        policy: SelectionPolicy,
    ) -> Self {
        let scorers: Vec<Box<dyn Scorer<MediaQuery, MediaCandidate>>> =
            vec![Box::new(EngagementScorer::new(policy.weights))];

        Self {
            sources: vec![source],
            scorers,
            selector: QualityWeightedSelector::new(policy.pool),
        }
    }
}

#[async_trait]
impl CandidatePipeline<MediaQuery, MediaCandidate> for RandomMediaPipeline {
    fn sources(&self) -> &[Box<dyn Source<MediaQuery, MediaCandidate>>] {
        &self.sources
    }

    fn scorers(&self) -> &[Box<dyn Scorer<MediaQuery, MediaCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<MediaQuery, MediaCandidate> {
        &self.selector
    }
}
