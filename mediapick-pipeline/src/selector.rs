use std::cmp::Ordering;

use rand::{Rng, RngCore};

use crate::util;

/// Descending order on scores with NaN pushed to the end.
///
/// Used with a stable sort, so equal scores keep their input order.
pub fn by_score_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Selectors rank the scored candidates and draw one from the top of the list.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Default selection: sort, keep the top `pool_size` candidates and
    /// draw one of them uniformly from `rng`.
    fn select(&self, query: &Q, candidates: Vec<C>, rng: &mut dyn RngCore) -> Option<C> {
        if candidates.is_empty() {
            return None;
        }
        let pool = self.pool_size(query, candidates.len()).clamp(1, candidates.len());
        let sorted = self.sort(candidates);
        let pick = rng.gen_range(0..pool);
        sorted.into_iter().nth(pick)
    }

    /// Decide if this selector should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Extract the score from a candidate to use for sorting.
    fn score(&self, candidate: &C) -> f64;

    /// Sort candidates by score, highest first.
    ///
    /// The sort is stable: ties keep the order the source returned them in,
    /// which for Pixabay reflects its own ranking.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| by_score_descending(self.score(a), self.score(b)));
        sorted
    }

    /// How many of the top candidates are eligible for the draw.
    /// Defaults to all of them.
    fn pool_size(&self, _query: &Q, len: usize) -> usize {
        len
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
