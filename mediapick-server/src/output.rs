//! Printing a single pick for the `pick` subcommand.

use serde::Serialize;

use mediapick_pipeline::candidate_pipeline::PipelineResult;
use mediapick_pipeline::{MediaCandidate, MediaHit, MediaQuery, MediaType};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PickJson<'a> {
    pub request_id: &'a str,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub randomness: u8,
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
    pub candidates: usize,
    pub pipeline_ms: u128,
    pub media: &'a MediaHit,
    pub score: Option<f64>,
    #[serde(rename = "downloadUrl", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<&'a str>,
    pub filename: String,
}

pub fn build_json<'a>(
    result: &'a PipelineResult<MediaQuery, MediaCandidate>,
    selected: &'a MediaCandidate,
    pipeline_ms: u128,
) -> PickJson<'a> {
    let media_type = result.query.media_type;
    PickJson {
        request_id: &result.query.request_id,
        media_type,
        randomness: result.query.randomness.get(),
        total_hits: result.total_hits,
        candidates: result.retrieved_count,
        pipeline_ms,
        media: &selected.hit,
        score: selected.score,
        download_url: selected.hit.download_url(media_type),
        filename: selected.hit.download_filename(media_type),
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

pub fn print_human(
    result: &PipelineResult<MediaQuery, MediaCandidate>,
    selected: &MediaCandidate,
    pipeline_ms: u128,
) {
    let query = &result.query;
    let hit = &selected.hit;

    println!();
    println!(
        "  {} \u{00b7} randomness {} \u{00b7} {} candidates of {} matches",
        query.media_type, query.randomness, result.retrieved_count, result.total_hits
    );
    println!("  {:\u{2500}<64}", "");
    println!(
        "  #{}  by {}  score {:.3}",
        hit.id,
        if hit.user.is_empty() { "unknown" } else { hit.user.as_str() },
        selected.score.unwrap_or(0.0)
    );
    println!(
        "       {} views \u{00b7} {} likes \u{00b7} {} downloads \u{00b7} {} comments",
        hit.views, hit.likes, hit.downloads, hit.comments
    );
    if !hit.tags.is_empty() {
        println!("       tags: {}", hit.tags);
    }
    if let Some(page) = hit.page_url() {
        println!("       page: {}", page);
    }
    match hit.download_url(query.media_type) {
        Some(url) => println!(
            "       download: {} ({})",
            url,
            hit.download_filename(query.media_type)
        ),
        None => println!("       download: not available"),
    }
    println!("  {:\u{2500}<64}", "");
    println!("  \u{23f1}  Pipeline ran in {}ms", pipeline_ms);
    println!();
}
