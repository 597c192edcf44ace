//! ainame - name an image file with a vision model.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use ainame::config::{self, Config};
use ainame::context::ServiceContext;
use ainame::{name_image, ImageBuffer, NamingError};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter_directive = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose { "info,ainame=debug" } else { "warn,ainame=info" }.to_string()
    });
    fmt().with_writer(std::io::stderr).with_env_filter(EnvFilter::new(filter_directive)).init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, NamingError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(NamingError::Config)?;
    let mut settings = config.settings();

    // Apply CLI overrides
    if let Some(strategy) = cli.strategy {
        settings.thumbnail.strategy = strategy;
    }
    if let Some(max_dimension) = cli.max_dimension {
        settings.thumbnail.max_dimension = max_dimension;
    }
    if let Some(max_bytes) = cli.max_bytes {
        settings.thumbnail.max_bytes = max_bytes;
    }
    if let Some(ref model) = cli.model {
        settings.naming.model.clone_from(model);
    }
    if cli.force {
        settings.naming.enabled = true;
    }

    let data = std::fs::read(&cli.image)?;
    if !settings.naming.enabled {
        eprintln!("AI naming disabled; use --force or set AI_NAMING_ENABLED=true");
        return Ok(fallback_exit(&settings.naming));
    }
    let buffer = ImageBuffer::new(data, cli.media_type());

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("AINAME_REPLAY").ok();
    let is_recording = std::env::var("AINAME_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&settings.naming)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&settings.naming)?, None)
    };

    let cancel = CancellationToken::new();
    let name = name_image(&buffer, &settings, ctx.namer.as_ref(), &cancel).await;
    drop(ctx);

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    match name {
        Some(name) => {
            println!("{name}");
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(fallback_exit(&settings.naming)),
    }
}

/// Report the fallback scheme and return the "no AI name" exit code.
fn fallback_exit(naming: &ainame::NamingConfig) -> ExitCode {
    eprintln!("No AI name; caller falls back to '{}'", naming.fallback_name_type.as_str());
    ExitCode::from(2)
}
