use async_trait::async_trait;

use crate::error::MediaResult;
use crate::source::{CandidateBatch, Source};
use crate::types::{MediaCandidate, MediaHit, MediaQuery, MediaType};

/// Serves a batch of hits already in memory, for offline runs and tests.
///
/// When `media_type` is set the source only answers queries for that type.
pub struct StaticSource {
    hits: Vec<MediaHit>,
    total_hits: u64,
    media_type: Option<MediaType>,
}

impl StaticSource {
    pub fn new(hits: Vec<MediaHit>) -> Self {
        let total_hits = hits.len() as u64;
        Self {
            hits,
            total_hits,
            media_type: None,
        }
    }

    pub fn with_total_hits(mut self, total_hits: u64) -> Self {
        self.total_hits = total_hits;
        self
    }

    pub fn for_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }
}

#[async_trait]
impl Source<MediaQuery, MediaCandidate> for StaticSource {
    fn enable(&self, query: &MediaQuery) -> bool {
        self.media_type.map_or(true, |t| t == query.media_type)
    }

    async fn get_candidates(&self, _query: &MediaQuery) -> MediaResult<CandidateBatch<MediaCandidate>> {
        Ok(CandidateBatch::new(
            self.hits.iter().cloned().map(MediaCandidate::from).collect(),
            self.total_hits,
        ))
    }
}
