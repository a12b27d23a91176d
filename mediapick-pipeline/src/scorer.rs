use async_trait::async_trait;

use crate::util;

/// Scorers populate score fields on candidates and run sequentially.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this scorer should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Score candidates, returning copies with this scorer's fields set.
    ///
    /// The returned vector must hold the same candidates in the same order.
    /// Dropping candidates here is not allowed.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy this scorer's fields from `scored` into `candidate`.
    fn update(&self, candidate: &mut C, scored: C);

    /// Apply `update` pairwise across the whole batch.
    fn update_all(&self, candidates: &mut [C], scored: Vec<C>) {
        for (c, s) in candidates.iter_mut().zip(scored) {
            self.update(c, s);
        }
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
