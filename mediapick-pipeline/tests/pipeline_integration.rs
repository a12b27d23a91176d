use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockito::Matcher;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use mediapick_pipeline::candidate_pipeline::CandidatePipeline;
use mediapick_pipeline::components::engagement_scorer::EngagementScorer;
use mediapick_pipeline::components::pixabay_source::PixabayConfig;
use mediapick_pipeline::components::quality_weighted_selector::QualityWeightedSelector;
use mediapick_pipeline::components::static_source::StaticSource;
use mediapick_pipeline::error::{MediaError, MediaResult};
use mediapick_pipeline::pipelines::random_media::RandomMediaPipeline;
use mediapick_pipeline::scorer::Scorer;
use mediapick_pipeline::selector::Selector;
use mediapick_pipeline::source::{CandidateBatch, Source};
use mediapick_pipeline::types::*;
use mediapick_pipeline::SelectionPolicy;

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn hit(id: u64, views: u64, likes: u64, downloads: u64) -> MediaHit {
    MediaHit {
        id,
        views,
        likes,
        downloads,
        tags: format!("tag-{}", id),
        user: format!("user-{}", id),
        ..MediaHit::default()
    }
}

/// item1 scores 0.41, item2 0.31, item3 0.66 under default weights.
fn worked_example() -> Vec<MediaHit> {
    vec![hit(1, 100, 50, 20), hit(2, 100, 10, 80), hit(3, 10, 9, 1)]
}

fn query(randomness: i64) -> MediaQuery {
    MediaQuery {
        request_id: "test-001".into(),
        randomness: Randomness::new(randomness),
        ..MediaQuery::default()
    }
}

/// Source that always fails, for error-path tests.
struct BrokenSource;

#[async_trait]
impl Source<MediaQuery, MediaCandidate> for BrokenSource {
    async fn get_candidates(&self, _query: &MediaQuery) -> MediaResult<CandidateBatch<MediaCandidate>> {
        Err(MediaError::ProviderStatus { status: 503 })
    }
}

/// Scorer that always fails; the pipeline must skip it.
struct BrokenScorer;

#[async_trait]
impl Scorer<MediaQuery, MediaCandidate> for BrokenScorer {
    async fn score(
        &self,
        _query: &MediaQuery,
        _candidates: &[MediaCandidate],
    ) -> Result<Vec<MediaCandidate>, String> {
        Err("model unavailable".into())
    }

    fn update(&self, candidate: &mut MediaCandidate, scored: MediaCandidate) {
        candidate.score = scored.score;
    }
}

/// Scorer that returns the wrong number of candidates.
struct TruncatingScorer;

#[async_trait]
impl Scorer<MediaQuery, MediaCandidate> for TruncatingScorer {
    async fn score(
        &self,
        _query: &MediaQuery,
        candidates: &[MediaCandidate],
    ) -> Result<Vec<MediaCandidate>, String> {
        Ok(candidates
            .iter()
            .take(1)
            .map(|_| MediaCandidate {
                score: Some(-1000.0),
                ..MediaCandidate::default()
            })
            .collect())
    }

    fn update(&self, candidate: &mut MediaCandidate, scored: MediaCandidate) {
        candidate.score = scored.score;
    }
}

/// Hand-wired pipeline for exercising stage behaviour.
struct CustomPipeline {
    sources: Vec<Box<dyn Source<MediaQuery, MediaCandidate>>>,
    scorers: Vec<Box<dyn Scorer<MediaQuery, MediaCandidate>>>,
    selector: QualityWeightedSelector,
}

#[async_trait]
impl CandidatePipeline<MediaQuery, MediaCandidate> for CustomPipeline {
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

// ---------------------------------------------------------------------------
// Full pipeline tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_randomness_always_picks_best_scoring_item() {
    let pipeline = RandomMediaPipeline::offline(worked_example(), 3, SelectionPolicy::default());
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = pipeline.execute(query(0), &mut rng).await.unwrap();
        let selected = result.selected.expect("non-empty batch selects");
        assert_eq!(selected.hit.id, 3);
        assert!((selected.score.unwrap() - 0.66).abs() < 1e-9);
        assert_eq!(result.retrieved_count, 3);
        assert_eq!(result.total_hits, 3);
        assert_eq!(result.query.request_id, "test-001");
    }
}

#[tokio::test]
async fn full_randomness_reaches_every_item() {
    let pipeline = RandomMediaPipeline::offline(worked_example(), 3, SelectionPolicy::default());
    let mut seen = HashSet::new();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = pipeline.execute(query(100), &mut rng).await.unwrap();
        seen.insert(result.selected.unwrap().hit.id);
    }
    assert_eq!(seen, HashSet::from([1, 2, 3]));
}

#[tokio::test]
async fn selection_is_a_member_of_the_batch() {
    let hits = worked_example();
    let pipeline = RandomMediaPipeline::offline(hits.clone(), 3, SelectionPolicy::default());
    let mut rng = StdRng::seed_from_u64(77);
    for r in [0, 33, 66, 100] {
        let result = pipeline.execute(query(r), &mut rng).await.unwrap();
        let selected = result.selected.unwrap();
        assert!(hits.contains(&selected.hit));
    }
}

#[tokio::test]
async fn empty_batch_is_not_an_error() {
    let pipeline = RandomMediaPipeline::offline(Vec::new(), 0, SelectionPolicy::default());
    for r in [0, 50, 100] {
        let mut rng = StdRng::seed_from_u64(1);
        let result = pipeline.execute(query(r), &mut rng).await.unwrap();
        assert!(result.selected.is_none());
        assert_eq!(result.retrieved_count, 0);
    }
}

#[tokio::test]
async fn out_of_range_randomness_is_clamped() {
    let pipeline = RandomMediaPipeline::offline(worked_example(), 3, SelectionPolicy::default());
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..50 {
        let result = pipeline.execute(query(-40), &mut rng).await.unwrap();
        assert_eq!(result.selected.unwrap().hit.id, 3);
    }
}

#[tokio::test]
async fn legacy_policy_prefers_downloads() {
    let pipeline = RandomMediaPipeline::offline(worked_example(), 3, SelectionPolicy::LEGACY);
    let mut rng = StdRng::seed_from_u64(2);
    let result = pipeline.execute(query(100), &mut rng).await.unwrap();
    assert_eq!(result.selected.unwrap().hit.id, 2);
}

#[tokio::test]
async fn concurrent_requests_share_nothing() {
    let pipeline = Arc::new(RandomMediaPipeline::offline(
        worked_example(),
        3,
        SelectionPolicy::default(),
    ));
    let handles: Vec<_> = (0..8)
        .map(|seed| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let mut rng = StdRng::seed_from_u64(seed);
                pipeline.execute(query(0), &mut rng).await.map(|r| r.selected)
            })
        })
        .collect();
    for handle in handles {
        let selected = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(selected.hit.id, 3);
    }
}

// ---------------------------------------------------------------------------
// Stage error handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_failing_source_fails_the_run() {
    let pipeline = RandomMediaPipeline::with_source(Box::new(BrokenSource), SelectionPolicy::default());
    let mut rng = StdRng::seed_from_u64(1);
    let err = pipeline.execute(query(50), &mut rng).await.err().unwrap();
    assert!(matches!(err, MediaError::ProviderStatus { status: 503 }));
}

#[tokio::test]
async fn one_healthy_source_is_enough() {
    let pipeline = CustomPipeline {
        sources: vec![
            Box::new(BrokenSource),
            Box::new(StaticSource::new(worked_example())),
        ],
        scorers: vec![Box::new(EngagementScorer::default())],
        selector: QualityWeightedSelector::default(),
    };
    let mut rng = StdRng::seed_from_u64(1);
    let result = pipeline.execute(query(0), &mut rng).await.unwrap();
    assert_eq!(result.selected.unwrap().hit.id, 3);
}

#[tokio::test]
async fn every_source_failing_is_reported() {
    let pipeline = CustomPipeline {
        sources: vec![Box::new(BrokenSource), Box::new(BrokenSource)],
        scorers: Vec::new(),
        selector: QualityWeightedSelector::default(),
    };
    let mut rng = StdRng::seed_from_u64(1);
    let err = pipeline.execute(query(0), &mut rng).await.err().unwrap();
    assert!(matches!(err, MediaError::AllSourcesFailed { count: 2, .. }));
    assert!(err.is_provider_failure());
}

#[tokio::test]
async fn no_enabled_source_is_an_error() {
    let pipeline = CustomPipeline {
        sources: vec![Box::new(
            StaticSource::new(worked_example()).for_media_type(MediaType::Video),
        )],
        scorers: Vec::new(),
        selector: QualityWeightedSelector::default(),
    };
    let mut rng = StdRng::seed_from_u64(1);
    let err = pipeline.execute(query(0), &mut rng).await.err().unwrap();
    assert!(matches!(err, MediaError::NoSources { .. }));
}

#[tokio::test]
async fn failing_and_mismatched_scorers_are_skipped() {
    let pipeline = CustomPipeline {
        sources: vec![Box::new(StaticSource::new(worked_example()))],
        scorers: vec![
            Box::new(BrokenScorer),
            Box::new(EngagementScorer::default()),
            Box::new(TruncatingScorer),
        ],
        selector: QualityWeightedSelector::default(),
    };
    let mut rng = StdRng::seed_from_u64(4);
    let result = pipeline.execute(query(0), &mut rng).await.unwrap();
    let selected = result.selected.unwrap();
    assert_eq!(selected.hit.id, 3);
    assert!((selected.score.unwrap() - 0.66).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Pixabay-backed pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pixabay_pipeline_selects_from_provider_hits() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/")
        .match_query(Matcher::UrlEncoded("key".into(), "k".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 12,
                "totalHits": 12,
                "hits": [
                    { "id": 1, "views": 100, "downloads": 20, "likes": 50, "comments": 0, "tags": "a", "user": "x", "pageURL": "https://pixabay.com/1" },
                    { "id": 2, "views": 100, "downloads": 80, "likes": 10, "comments": 0, "tags": "b", "user": "y", "pageURL": "https://pixabay.com/2" },
                    { "id": 3, "views": 10, "downloads": 1, "likes": 9, "comments": 0, "tags": "c", "user": "z", "pageURL": "https://pixabay.com/3" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = PixabayConfig {
        api_key: Some("k".into()),
        image_endpoint: format!("{}/api/", server.url()),
        video_endpoint: format!("{}/api/videos/", server.url()),
        ..PixabayConfig::default()
    };
    let pipeline = RandomMediaPipeline::pixabay(config, SelectionPolicy::default());
    let mut rng = StdRng::seed_from_u64(10);
    let result = pipeline.execute(query(0), &mut rng).await.unwrap();

    let selected = result.selected.unwrap();
    assert_eq!(selected.hit.id, 3);
    assert_eq!(selected.hit.page_url(), Some("https://pixabay.com/3"));
    assert_eq!(result.total_hits, 12);
}

#[tokio::test]
async fn pixabay_pipeline_surfaces_provider_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let config = PixabayConfig {
        api_key: Some("k".into()),
        image_endpoint: format!("{}/api/", server.url()),
        ..PixabayConfig::default()
    };
    let pipeline = RandomMediaPipeline::pixabay(config, SelectionPolicy::default());
    let mut rng = StdRng::seed_from_u64(10);
    let err = pipeline.execute(query(50), &mut rng).await.err().unwrap();
    assert!(err.is_provider_failure());
}
