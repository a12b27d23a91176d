use async_trait::async_trait;

use crate::scorer::Scorer;
use crate::types::{MediaCandidate, MediaHit, MediaQuery};

/// Relative weight of the two per-view rates. The two fields sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringWeights {
    pub engagement: f64,
    pub download: f64,
}

impl ScoringWeights {
    /// Likes count for more than downloads.
    pub const ENGAGEMENT_WEIGHTED: ScoringWeights = ScoringWeights {
        engagement: 0.7,
        download: 0.3,
    };

    /// Older variant that favoured downloads.
    pub const DOWNLOAD_WEIGHTED: ScoringWeights = ScoringWeights {
        engagement: 0.3,
        download: 0.7,
    };

    /// Weights from an engagement share in [0, 1]; the download share is the
    /// remainder. Out-of-range or NaN shares fall back to the default.
    pub fn from_engagement_share(share: f64) -> Self {
        if !(0.0..=1.0).contains(&share) {
            return Self::default();
        }
        Self {
            engagement: share,
            download: 1.0 - share,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::ENGAGEMENT_WEIGHTED
    }
}

/// Per-view rates for a hit. A hit with no views divides by one instead.
pub fn rates(hit: &MediaHit) -> (f64, f64) {
    let views = hit.views.max(1) as f64;
    (hit.likes as f64 / views, hit.downloads as f64 / views)
}

/// Quality score for a single hit.
pub fn engagement_score(hit: &MediaHit, weights: ScoringWeights) -> f64 {
    let (engagement_rate, download_rate) = rates(hit);
    engagement_rate * weights.engagement + download_rate * weights.download
}

/// Scores hits by likes and downloads per view.
///
/// Counters are read and never modified; the score lands in
/// `MediaCandidate::score`.
#[derive(Default)]
pub struct EngagementScorer {
    pub weights: ScoringWeights,
}

impl EngagementScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

#[async_trait]
impl Scorer<MediaQuery, MediaCandidate> for EngagementScorer {
    async fn score(
        &self,
        _query: &MediaQuery,
        candidates: &[MediaCandidate],
    ) -> Result<Vec<MediaCandidate>, String> {
        let scored = candidates
            .iter()
            .map(|c| MediaCandidate {
                score: Some(engagement_score(&c.hit, self.weights)),
                ..MediaCandidate::default()
            })
            .collect();

        Ok(scored)
    }

    fn update(&self, candidate: &mut MediaCandidate, scored: MediaCandidate) {
        candidate.score = scored.score;
    }
}
