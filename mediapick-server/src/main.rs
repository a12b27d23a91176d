use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mediapick_pipeline::candidate_pipeline::CandidatePipeline;
use mediapick_pipeline::hit_loader::load_hits_file;
use mediapick_pipeline::pipelines::random_media::RandomMediaPipeline;
use mediapick_pipeline::{MediaQuery, Randomness};

mod config;
mod output;
mod routes;

use config::{Cli, Command, PickArgs, ServeArgs};

fn init_logging() {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.parse_default_env();
    clog.init();
}

async fn serve(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    if cli.api_key.as_deref().map_or(true, str::is_empty) {
        log::warn!("PIXABAY_API_KEY is not set; every request will fail until it is");
    }
    let pipeline = RandomMediaPipeline::pixabay(cli.pixabay_config(), cli.selection_policy());
    let app = routes::router(routes::AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding to {}", args.listen))?;
    info!("listening on http://{}", args.listen);

    axum::serve(listener, app)
        .await
        .context("running HTTP server")?;
    Ok(())
}

async fn pick(cli: &Cli, args: &PickArgs) -> anyhow::Result<()> {
    let pipeline = match &args.from_file {
        Some(path) => {
            let loaded = load_hits_file(path)?;
            info!("loaded {} hits from {}", loaded.hits.len(), path);
            RandomMediaPipeline::offline(loaded.hits, loaded.total_hits, cli.selection_policy())
        }
        None => RandomMediaPipeline::pixabay(cli.pixabay_config(), cli.selection_policy()),
    };

    let query = MediaQuery {
        request_id: "pick-001".into(),
        media_type: args.media_type,
        query: args.q.clone(),
        category: args.category,
        orientation: args.orientation,
        randomness: Randomness::new(args.randomness),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let started = Instant::now();
    let result = pipeline.execute(query, &mut rng).await?;
    let pipeline_ms = started.elapsed().as_millis();

    let Some(selected) = result.selected.as_ref() else {
        bail!("No media found");
    };

    if args.json {
        let json = output::build_json(&result, selected, pipeline_ms);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        output::print_human(&result, selected, pipeline_ms);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Command::Serve(args) => serve(&cli, args).await,
        Command::Pick(args) => pick(&cli, args).await,
    }
}
