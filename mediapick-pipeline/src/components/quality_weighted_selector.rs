use rand::Rng;

use crate::components::engagement_scorer::{engagement_score, ScoringWeights};
use crate::selector::{by_score_descending, Selector};
use crate::types::{MediaCandidate, MediaHit, MediaQuery, Randomness};

/// Share of the ranked list eligible at randomness 0.
pub const MIN_POOL_FRACTION: f64 = 0.05;
/// Share of the ranked list eligible at randomness 100.
pub const MAX_POOL_FRACTION: f64 = 1.0;
/// Share used by the fixed-pool variant.
pub const LEGACY_POOL_FRACTION: f64 = 0.10;

/// How much of the ranked list the draw may reach into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PoolPolicy {
    /// Grows linearly from `min` to `max` of the list as randomness goes
    /// from 0 to 100.
    Parametric { min: f64, max: f64 },
    /// Same share of the list whatever the randomness.
    FixedFraction(f64),
}

impl Default for PoolPolicy {
    fn default() -> Self {
        PoolPolicy::Parametric {
            min: MIN_POOL_FRACTION,
            max: MAX_POOL_FRACTION,
        }
    }
}

impl PoolPolicy {
    /// Fraction of the list in the pool for the given randomness.
    pub fn fraction(self, randomness: Randomness) -> f64 {
        match self {
            PoolPolicy::Parametric { min, max } => min + randomness.fraction() * (max - min),
            PoolPolicy::FixedFraction(fraction) => fraction,
        }
    }

    /// `ceil(len * fraction)`, kept within `[1, len]`. Zero only for an
    /// empty list.
    pub fn pool_size(self, len: usize, randomness: Randomness) -> usize {
        if len == 0 {
            return 0;
        }
        let size = (len as f64 * self.fraction(randomness)).ceil();
        if size.is_nan() || size < 1.0 {
            1
        } else if size >= len as f64 {
            len
        } else {
            size as usize
        }
    }
}

/// Scoring weights and pool sizing used together for one draw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelectionPolicy {
    pub weights: ScoringWeights,
    pub pool: PoolPolicy,
}

impl SelectionPolicy {
    /// Download-weighted scores and a fixed top-10% pool. Randomness is ignored.
    pub const LEGACY: SelectionPolicy = SelectionPolicy {
        weights: ScoringWeights::DOWNLOAD_WEIGHTED,
        pool: PoolPolicy::FixedFraction(LEGACY_POOL_FRACTION),
    };
}

/// Hits ranked best first, truncated to the pool the draw picks from.
pub fn eligible_pool<'a>(
    hits: &'a [MediaHit],
    randomness: Randomness,
    policy: &SelectionPolicy,
) -> Vec<&'a MediaHit> {
    let mut ranked: Vec<(&MediaHit, f64)> = hits
        .iter()
        .map(|hit| (hit, engagement_score(hit, policy.weights)))
        .collect();
    ranked.sort_by(|a, b| by_score_descending(a.1, b.1));
    ranked.truncate(policy.pool.pool_size(hits.len(), randomness));
    ranked.into_iter().map(|(hit, _)| hit).collect()
}

/// Pick one hit, favouring high engagement.
///
/// Hits are ranked by [`engagement_score`], the top of the ranking sized by
/// `randomness` forms the pool, and one pool member is drawn uniformly from
/// `rng`. Returns `None` only for an empty slice. The result always borrows
/// from `hits`.
pub fn select_best_media<'a, R: Rng + ?Sized>(
    hits: &'a [MediaHit],
    randomness: Randomness,
    policy: &SelectionPolicy,
    rng: &mut R,
) -> Option<&'a MediaHit> {
    let pool = eligible_pool(hits, randomness, policy);
    if pool.is_empty() {
        return None;
    }
    let pick = rng.gen_range(0..pool.len());
    pool.get(pick).copied()
}

/// Pipeline selector that draws from the top of the scored candidates.
///
/// Expects `EngagementScorer` to have run; unscored candidates rank last.
#[derive(Default)]
pub struct QualityWeightedSelector {
    pub pool: PoolPolicy,
}

impl QualityWeightedSelector {
    pub fn new(pool: PoolPolicy) -> Self {
        Self { pool }
    }
}

impl Selector<MediaQuery, MediaCandidate> for QualityWeightedSelector {
    fn score(&self, candidate: &MediaCandidate) -> f64 {
        candidate.score.unwrap_or(f64::NEG_INFINITY)
    }

    fn pool_size(&self, query: &MediaQuery, len: usize) -> usize {
        self.pool.pool_size(len, query.randomness)
    }
}
