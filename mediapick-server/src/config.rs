//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use mediapick_pipeline::components::pixabay_source::PixabayConfig;
use mediapick_pipeline::{Category, MediaType, Orientation, SelectionPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "mediapick",
    version,
    about = "Pick one Pixabay image or video, weighted toward well-liked media"
)]
pub struct Cli {
    /// Pixabay API key.
    #[arg(long, env = "PIXABAY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Score by downloads (30/70) and draw from a fixed top 10%, ignoring randomness.
    #[arg(long, env = "MEDIAPICK_LEGACY_SCORING", global = true)]
    pub legacy_scoring: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve GET /api/random-media over HTTP.
    Serve(ServeArgs),
    /// Run a single pick and print the result.
    Pick(PickArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "MEDIAPICK_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,
}

#[derive(Debug, Args)]
pub struct PickArgs {
    /// image or video.
    #[arg(long = "type", default_value = "image")]
    pub media_type: MediaType,

    /// Free-text search.
    #[arg(short, long)]
    pub q: Option<String>,

    #[arg(long)]
    pub category: Option<Category>,

    /// all, horizontal or vertical. Images only.
    #[arg(long, default_value = "all")]
    pub orientation: Orientation,

    /// 0 picks from the best 5%, 100 picks from everything. Clamped to 0..=100.
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    pub randomness: i64,

    /// Seed the draw for a reproducible pick.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read hits from a saved Pixabay response instead of calling the API.
    #[arg(long)]
    pub from_file: Option<String>,

    /// Print JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn selection_policy(&self) -> SelectionPolicy {
        if self.legacy_scoring {
            SelectionPolicy::LEGACY
        } else {
            SelectionPolicy::default()
        }
    }

    pub fn pixabay_config(&self) -> PixabayConfig {
        PixabayConfig {
            api_key: self.api_key.clone(),
            ..PixabayConfig::default()
        }
    }
}
