//! Load saved provider responses from disk.
//!
//! Accepts either a full search response (`{"totalHits": n, "hits": [...]}`)
//! or a bare JSON array of hits.

use std::io::Read;

use serde::Deserialize;

use crate::components::pixabay_source::PixabayResponse;
use crate::error::{MediaError, MediaResult};
use crate::types::MediaHit;

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedHits {
    Response(PixabayResponse),
    Bare(Vec<MediaHit>),
}

/// Hits read from a saved file, with the total the provider reported.
#[derive(Clone, Debug, Default)]
pub struct LoadedHits {
    pub hits: Vec<MediaHit>,
    pub total_hits: u64,
}

/// Load hits from a JSON reader.
pub fn load_hits<R: Read>(reader: R) -> MediaResult<LoadedHits> {
    let saved: SavedHits = serde_json::from_reader(reader)?;
    Ok(match saved {
        SavedHits::Response(page) => LoadedHits {
            hits: page.hits,
            total_hits: page.total_hits,
        },
        SavedHits::Bare(hits) => {
            let total_hits = hits.len() as u64;
            LoadedHits { hits, total_hits }
        }
    })
}

/// Load hits from a JSON file path.
pub fn load_hits_file(path: &str) -> MediaResult<LoadedHits> {
    let file = std::fs::File::open(path).map_err(|source| MediaError::Io {
        path: path.to_string(),
        source,
    })?;
    load_hits(std::io::BufReader::new(file))
}
