use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::error::{MediaError, MediaResult};
use crate::source::{CandidateBatch, Source};
use crate::types::{MediaCandidate, MediaHit, MediaQuery, MediaType};

pub const PIXABAY_IMAGE_API: &str = "https://pixabay.com/api/";
pub const PIXABAY_VIDEO_API: &str = "https://pixabay.com/api/videos/";
/// Largest page Pixabay serves.
pub const DEFAULT_PER_PAGE: u32 = 200;

/// Connection settings for the Pixabay search API.
#[derive(Clone, Debug)]
pub struct PixabayConfig {
    pub api_key: Option<String>,
    pub image_endpoint: String,
    pub video_endpoint: String,
    pub per_page: u32,
    pub editors_choice: bool,
}

impl Default for PixabayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            image_endpoint: PIXABAY_IMAGE_API.to_string(),
            video_endpoint: PIXABAY_VIDEO_API.to_string(),
            per_page: DEFAULT_PER_PAGE,
            editors_choice: true,
        }
    }
}

impl PixabayConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, media_type: MediaType) -> &str {
        match media_type {
            MediaType::Image => &self.image_endpoint,
            MediaType::Video => &self.video_endpoint,
        }
    }
}

/// Body of a Pixabay search response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PixabayResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "totalHits", default)]
    pub total_hits: u64,
    #[serde(default)]
    pub hits: Vec<MediaHit>,
}

/// Query-string parameters for one search, excluding the API key.
///
/// Free text and category are only sent when set; orientation only applies
/// to image searches.
pub fn search_params(config: &PixabayConfig, query: &MediaQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("image_type", "photo".to_string()),
        ("video_type", "film".to_string()),
        ("editors_choice", config.editors_choice.to_string()),
        ("per_page", config.per_page.to_string()),
    ];
    if let Some(q) = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        params.push(("q", q.to_string()));
    }
    if let Some(category) = query.category {
        params.push(("category", category.as_str().to_string()));
    }
    if query.media_type == MediaType::Image {
        if let Some(orientation) = query.orientation.as_param() {
            params.push(("orientation", orientation.to_string()));
        }
    }
    params
}

/// Fetches one page of hits from Pixabay.
pub struct PixabaySource {
    client: reqwest::Client,
    config: PixabayConfig,
}

impl PixabaySource {
    pub fn new(config: PixabayConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: PixabayConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PixabayConfig {
        &self.config
    }
}

#[async_trait]
impl Source<MediaQuery, MediaCandidate> for PixabaySource {
    async fn get_candidates(&self, query: &MediaQuery) -> MediaResult<CandidateBatch<MediaCandidate>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(MediaError::MissingApiKey)?;

        let endpoint = self.config.endpoint(query.media_type);
        let params = search_params(&self.config, query);
        debug!(
            "request_id={} GET {} params={:?}",
            query.request_id, endpoint, params
        );

        let response = self
            .client
            .get(endpoint)
            .query(&[("key", api_key)])
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::ProviderStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let page: PixabayResponse = serde_json::from_slice(&body)?;

        Ok(CandidateBatch::new(
            page.hits.into_iter().map(MediaCandidate::from).collect(),
            page.total_hits,
        ))
    }
}
