use async_trait::async_trait;
use log::{debug, error, info, warn};
use rand::RngCore;

use crate::error::{MediaError, MediaResult};
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::source::{CandidateBatch, Source};

#[derive(Copy, Clone, Debug)]
pub enum PipelineStage {
    Source,
    Scorer,
    Selector,
}

pub struct PipelineResult<Q, C> {
    /// Number of candidates the sources returned, before selection.
    pub retrieved_count: usize,
    /// Total matches the provider reported, which may exceed one page.
    pub total_hits: u64,
    /// The chosen candidate, `None` when there was nothing to choose from.
    pub selected: Option<C>,
    pub query: Q,
}

/// Provides a stable request identifier for log correlation.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Fetch, score and pick.
///
/// Stages run one after another; the only suspension points are inside the
/// sources. The random draw happens last and uses only the `rng` handed in
/// by the caller.
#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;

    async fn execute(
        &self,
        query: Q,
        rng: &mut (dyn RngCore + Send),
    ) -> MediaResult<PipelineResult<Q, C>> {
        let batch = self.fetch_candidates(&query).await?;
        let retrieved_count = batch.candidates.len();

        let scored = self.score(&query, batch.candidates).await;

        let selected = self.select(&query, scored, rng);

        Ok(PipelineResult {
            retrieved_count,
            total_hits: batch.total_hits,
            selected,
            query,
        })
    }

    /// Run every enabled source and concatenate their batches.
    ///
    /// A failing source is logged and skipped. The call fails only when no
    /// source is enabled or every enabled source failed.
    async fn fetch_candidates(&self, query: &Q) -> MediaResult<CandidateBatch<C>> {
        let request_id = query.request_id().to_string();
        let sources: Vec<_> = self.sources().iter().filter(|s| s.enable(query)).collect();
        if sources.is_empty() {
            return Err(MediaError::NoSources { request_id });
        }

        let mut collected = CandidateBatch::empty();
        let mut failures = 0;
        let mut last_error = None;
        for source in &sources {
            match source.get_candidates(query).await {
                Ok(mut batch) => {
                    info!(
                        "request_id={} stage={:?} component={} fetched {} candidates (total_hits={})",
                        request_id,
                        PipelineStage::Source,
                        source.name(),
                        batch.candidates.len(),
                        batch.total_hits
                    );
                    collected.candidates.append(&mut batch.candidates);
                    collected.total_hits += batch.total_hits;
                }
                Err(err) => {
                    error!(
                        "request_id={} stage={:?} component={} failed: {}",
                        request_id,
                        PipelineStage::Source,
                        source.name(),
                        err
                    );
                    failures += 1;
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if failures == sources.len() => {
                if failures == 1 {
                    Err(err)
                } else {
                    Err(MediaError::AllSourcesFailed {
                        count: failures,
                        last: Box::new(err),
                    })
                }
            }
            _ => Ok(collected),
        }
    }

    /// Run all scorers sequentially and apply their results to candidates.
    async fn score(&self, query: &Q, mut candidates: Vec<C>) -> Vec<C> {
        let request_id = query.request_id().to_string();
        let expected_len = candidates.len();
        for scorer in self.scorers().iter().filter(|s| s.enable(query)) {
            match scorer.score(query, &candidates).await {
                Ok(scored) => {
                    if scored.len() == expected_len {
                        scorer.update_all(&mut candidates, scored);
                    } else {
                        warn!(
                            "request_id={} stage={:?} component={} skipped: length_mismatch expected={} got={}",
                            request_id,
                            PipelineStage::Scorer,
                            scorer.name(),
                            expected_len,
                            scored.len()
                        );
                    }
                }
                Err(err) => {
                    error!(
                        "request_id={} stage={:?} component={} failed: {}",
                        request_id,
                        PipelineStage::Scorer,
                        scorer.name(),
                        err
                    );
                }
            }
        }
        candidates
    }

    /// Draw one candidate with the configured selector. A disabled selector
    /// falls back to the first candidate in source order.
    fn select(&self, query: &Q, candidates: Vec<C>, rng: &mut dyn RngCore) -> Option<C> {
        let selector = self.selector();
        if !selector.enable(query) {
            return candidates.into_iter().next();
        }
        let offered = candidates.len();
        let selected = selector.select(query, candidates, rng);
        debug!(
            "request_id={} stage={:?} component={} offered={} selected={}",
            query.request_id(),
            PipelineStage::Selector,
            selector.name(),
            offered,
            selected.is_some()
        );
        selected
    }
}
