//! product-scene - compose a product and a person into one lifestyle shot.

mod adapters;
mod cassette;
mod cli;
mod compose;
mod config;
mod context;
mod data_url;
mod error;
mod mime;
mod model;
mod output;
mod ports;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{read_image_as_data_url, Cli};
use crate::compose::Composer;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::data_url::ImagePayload;
use crate::error::ImageError;
use crate::model::{resolve_model, validate_model, DEFAULT_MODEL};
use crate::output::{resolve_output_path, save_image, validate_format};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "product_scene=debug" } else { "product_scene=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), ImageError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(ImageError::Config)?;

    let requested_model =
        cli.model.clone().or_else(|| config.defaults.model.clone()).unwrap_or(DEFAULT_MODEL.into());
    let model = resolve_model(&requested_model);
    validate_model(&model).map_err(ImageError::InvalidArgument)?;
    tracing::debug!("Model: {model} (resolved from '{requested_model}')");

    let format = cli.format.clone().or_else(|| config.defaults.format.clone());
    if let Some(ref format) = format {
        validate_format(format).map_err(ImageError::InvalidArgument)?;
    }

    let product = read_image_as_data_url(&cli.product)?;
    let person = read_image_as_data_url(&cli.person)?;

    let replay_path = std::env::var("PRODUCT_SCENE_REPLAY").ok();
    let is_recording =
        std::env::var("PRODUCT_SCENE_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!("Replaying from: {cassette_path}");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("Recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    let composer = Composer::new(ctx.generator, model);
    let result = composer.generate(&product, &person).await;
    drop(composer);

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => tracing::warn!("Failed to save cassette: {e}"),
        }
    }

    let scene_url = result?;
    let scene = ImagePayload::from_data_url(&scene_url)
        .map_err(|reason| ImageError::InvalidDataUrl { which: "generated".into(), reason })?;

    let output_path =
        resolve_output_path(cli.output.as_deref(), &cli.product, scene.mime_type(), format.as_deref());
    save_image(scene.data(), scene.mime_type(), format.as_deref(), &output_path)?;
    eprintln!("Saved: {}", output_path.display());

    if cli.print_data_url {
        println!("{scene_url}");
    }

    Ok(())
}
