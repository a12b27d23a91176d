use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Which Pixabay catalogue to search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(format!("unknown media type '{}' (expected image or video)", other)),
        }
    }
}

/// The fixed category list Pixabay accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Backgrounds,
    Fashion,
    Nature,
    Science,
    Education,
    Feelings,
    Health,
    People,
    Religion,
    Places,
    Animals,
    Industry,
    Computer,
    Food,
    Sports,
    Transportation,
    Travel,
    Buildings,
    Business,
    Music,
}

impl Category {
    pub const ALL: [Category; 20] = [
        Category::Backgrounds,
        Category::Fashion,
        Category::Nature,
        Category::Science,
        Category::Education,
        Category::Feelings,
        Category::Health,
        Category::People,
        Category::Religion,
        Category::Places,
        Category::Animals,
        Category::Industry,
        Category::Computer,
        Category::Food,
        Category::Sports,
        Category::Transportation,
        Category::Travel,
        Category::Buildings,
        Category::Business,
        Category::Music,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Backgrounds => "backgrounds",
            Category::Fashion => "fashion",
            Category::Nature => "nature",
            Category::Science => "science",
            Category::Education => "education",
            Category::Feelings => "feelings",
            Category::Health => "health",
            Category::People => "people",
            Category::Religion => "religion",
            Category::Places => "places",
            Category::Animals => "animals",
            Category::Industry => "industry",
            Category::Computer => "computer",
            Category::Food => "food",
            Category::Sports => "sports",
            Category::Transportation => "transportation",
            Category::Travel => "travel",
            Category::Buildings => "buildings",
            Category::Business => "business",
            Category::Music => "music",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Image orientation filter. Pixabay ignores it for videos.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    All,
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Value for the provider `orientation` parameter, `None` when unfiltered.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Orientation::All => None,
            Orientation::Horizontal => Some("horizontal"),
            Orientation::Vertical => Some("vertical"),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Orientation::All),
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(format!(
                "unknown orientation '{}' (expected all, horizontal or vertical)",
                other
            )),
        }
    }
}

/// How far the selector strays from the best-scoring candidates, 0 to 100.
///
/// Construction clamps, so every value of this type is in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Randomness(u8);

impl Randomness {
    pub const MIN: Randomness = Randomness(0);
    pub const MAX: Randomness = Randomness(100);
    pub const DEFAULT: Randomness = Randomness(50);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Position on the quality-to-uniform scale, in [0.0, 1.0].
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Randomness {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for Randomness {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Randomness> for i64 {
    fn from(value: Randomness) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Randomness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One request for a random media item.
#[derive(Clone, Debug, Default)]
pub struct MediaQuery {
    pub request_id: String,
    pub media_type: MediaType,
    pub query: Option<String>,
    pub category: Option<Category>,
    pub orientation: Orientation,
    pub randomness: Randomness,
}

impl HasRequestId for MediaQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// A single hit returned by the provider.
///
/// Only the popularity counters feed the selector. Everything else the
/// provider sends is kept in `extra` and written back out untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaHit {
    pub id: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub user: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaHit {
    /// Best downloadable URL for this hit: the large rendition first,
    /// falling back to smaller ones.
    pub fn download_url(&self, media_type: MediaType) -> Option<&str> {
        match media_type {
            MediaType::Image => ["largeImageURL", "webformatURL"]
                .iter()
                .find_map(|key| non_empty_str(self.extra.get(*key))),
            MediaType::Video => {
                let videos = self.extra.get("videos")?;
                ["large", "medium", "small"]
                    .iter()
                    .find_map(|size| non_empty_str(videos.get(*size).and_then(|v| v.get("url"))))
            }
        }
    }

    /// File name to save the download under.
    pub fn download_filename(&self, media_type: MediaType) -> String {
        match media_type {
            MediaType::Image => format!("pixabay-image-{}.jpg", self.id),
            MediaType::Video => format!("pixabay-video-{}.mp4", self.id),
        }
    }

    /// Link back to the provider page, when present.
    pub fn page_url(&self) -> Option<&str> {
        non_empty_str(self.extra.get("pageURL"))
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// A hit travelling through the pipeline together with its derived score.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaCandidate {
    pub hit: MediaHit,

    // Populated by scorers
    pub score: Option<f64>,
}

impl From<MediaHit> for MediaCandidate {
    fn from(hit: MediaHit) -> Self {
        Self { hit, score: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn randomness_clamps_out_of_range_values() {
        assert_eq!(Randomness::new(-20).get(), 0);
        assert_eq!(Randomness::new(250).get(), 100);
        assert_eq!(Randomness::new(37).get(), 37);
        assert_eq!(Randomness::default().get(), 50);
    }

    #[test]
    fn randomness_deserializes_with_clamping() {
        let r: Randomness = serde_json::from_value(json!(140)).unwrap();
        assert_eq!(r, Randomness::MAX);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Nature".parse::<Category>().unwrap(), Category::Nature);
        assert_eq!(
            "transportation".parse::<Category>().unwrap(),
            Category::Transportation
        );
        assert!("cats".parse::<Category>().is_err());
    }

    #[test]
    fn orientation_all_sends_no_parameter() {
        assert_eq!("".parse::<Orientation>().unwrap().as_param(), None);
        assert_eq!(Orientation::Vertical.as_param(), Some("vertical"));
    }

    #[test]
    fn hit_keeps_unknown_fields_verbatim() {
        let raw = json!({
            "id": 7,
            "views": 10,
            "downloads": 2,
            "likes": 3,
            "comments": 0,
            "tags": "sea, boat",
            "user": "ana",
            "pageURL": "https://pixabay.com/photos/7",
            "imageWidth": 1920
        });
        let hit: MediaHit = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(hit.likes, 3);
        assert_eq!(hit.page_url(), Some("https://pixabay.com/photos/7"));
        assert_eq!(serde_json::to_value(&hit).unwrap(), raw);
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let hit: MediaHit = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!((hit.views, hit.likes, hit.downloads), (0, 0, 0));
    }

    #[test]
    fn image_download_prefers_large_rendition() {
        let hit: MediaHit = serde_json::from_value(json!({
            "id": 9,
            "largeImageURL": "https://cdn.pixabay.com/large.jpg",
            "webformatURL": "https://cdn.pixabay.com/web.jpg"
        }))
        .unwrap();
        assert_eq!(
            hit.download_url(MediaType::Image),
            Some("https://cdn.pixabay.com/large.jpg")
        );
        assert_eq!(hit.download_filename(MediaType::Image), "pixabay-image-9.jpg");
    }

    #[test]
    fn video_download_falls_back_through_sizes() {
        let hit: MediaHit = serde_json::from_value(json!({
            "id": 4,
            "videos": {
                "large": { "url": "" },
                "medium": { "url": "https://cdn.pixabay.com/medium.mp4" },
                "small": { "url": "https://cdn.pixabay.com/small.mp4" }
            }
        }))
        .unwrap();
        assert_eq!(
            hit.download_url(MediaType::Video),
            Some("https://cdn.pixabay.com/medium.mp4")
        );
        assert_eq!(hit.download_url(MediaType::Image), None);
        assert_eq!(hit.download_filename(MediaType::Video), "pixabay-video-4.mp4");
    }
}
