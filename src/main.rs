//! Command-line front end: initializes a preview against an in-memory layer
//! stack and prints what a host would display.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use kurbo::Size;
use mosaic_preview::config::Configuration;
use mosaic_preview::fetch::HttpManifestSource;
use mosaic_preview::manifest::sheet_extent;
use mosaic_preview::render::surface::PreviewSurface;
use mosaic_preview::{
    LayerStack, MediaCustomization, PreviewEngine, PreviewEvent, PreviewMode, PreviewSession, api,
};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "mosaic-preview",
    version,
    about = "Sprite-sheet thumbnail preview engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize a preview and print the entry point response
    Inspect(SourceArgs),
    /// Initialize, then simulate a gesture and print every rendered frame
    Sweep {
        #[command(flatten)]
        source: SourceArgs,
        /// Pointer positions (scrubbing) or timer ticks (animation)
        #[arg(long, default_value_t = 10)]
        steps: usize,
    },
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Path to YAML config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Media to look up on the webservice
    #[arg(long, value_name = "ID")]
    media_id: Option<String>,
    /// Webservice host (protocol optional)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,
    /// Read the customization block from a JSON file instead
    #[arg(long, value_name = "FILE")]
    customization: Option<PathBuf>,
    /// Pretend the cover loaded with this natural size, e.g. 1920x1080
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    cover_size: Option<Size>,
}

fn parse_size(raw: &str) -> Result<Size> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width: f64 = w.trim().parse().context("invalid width")?;
    let height: f64 = h.trim().parse().context("invalid height")?;
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        bail!("size must be positive, got {raw:?}");
    }
    Ok(Size::new(width, height))
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_configuration(args: &SourceArgs) -> Result<Configuration> {
    let mut cfg = match &args.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(id) = &args.media_id {
        cfg.media_id = Some(id.clone());
    }
    if let Some(host) = &args.host {
        cfg.host = Some(host.clone());
    }
    if let Some(path) = &args.customization {
        cfg.customization_path = Some(path.clone());
    }
    cfg.validated().context("invalid configuration values")
}

async fn load_customization(cfg: &Configuration) -> Result<MediaCustomization> {
    if let Some(path) = &cfg.customization_path {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let customization: MediaCustomization = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse customization from {}", path.display()))?;
        customization
            .validate()
            .with_context(|| format!("unusable customization in {}", path.display()))?;
        return Ok(customization);
    }
    let media_id = cfg
        .media_id
        .as_deref()
        .ok_or_else(|| anyhow!("no media id configured"))?;
    let client = reqwest::Client::new();
    api::get_media_customization(&client, cfg.host.as_deref(), media_id).await
}

/// Loads the sheet the session is waiting on, sized from the tiles it holds.
fn settle_sprite(session: &mut PreviewSession<LayerStack>) {
    let surface = session.surface();
    if surface.sprite_natural_size().is_some() {
        return;
    }
    let Some(url) = surface.sprite_source() else {
        return;
    };
    let extent = sheet_extent(session.active_frames(), url);
    debug!(url, width = extent.width, height = extent.height, "simulating sprite load");
    session.surface_mut().finish_sprite_load(extent);
    session.handle(PreviewEvent::SpriteLoaded);
}

fn print_step(step: usize, session: &PreviewSession<LayerStack>) -> Result<()> {
    let line = json!({
        "step": step,
        "frame": session.current_frame(),
        "render": session.last_render(),
    });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

fn sweep(session: &mut PreviewSession<LayerStack>, mode: PreviewMode, steps: usize) -> Result<()> {
    let rect = session.surface().container_rect();
    if mode == PreviewMode::Animation {
        session.handle(PreviewEvent::PointerEnter);
    }
    for step in 0..steps {
        let event = match mode {
            PreviewMode::Animation => PreviewEvent::Tick,
            _ => PreviewEvent::PointerMove {
                client_x: rect.x0 + (step as f64 + 0.5) / steps as f64 * rect.width(),
            },
        };
        session.handle(event);
        settle_sprite(session);
        print_step(step, session)?;
    }
    session.handle(PreviewEvent::PointerLeave);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (source, steps) = match cli.command {
        Command::Inspect(source) => (source, None),
        Command::Sweep { source, steps } => (source, Some(steps)),
    };
    let cfg = load_configuration(&source)?;
    let customization = load_customization(&cfg).await?;

    let mut stack = LayerStack::with_size(cfg.container.width, cfg.container.height);
    if let Some(size) = source.cover_size {
        stack.finish_cover_load(size);
    }

    let engine = PreviewEngine::new(HttpManifestSource::new()?);
    let initialized = engine
        .initialize(Some(stack), Some(&customization), &cfg.preview)
        .await;
    println!("{}", serde_json::to_string(&initialized.response)?);
    info!(
        res = initialized.response.res,
        errors = initialized.response.errors.as_deref(),
        "preview initialized"
    );

    if let (Some(steps), Some(mut session)) = (steps, initialized.session) {
        if session.active_frames().is_empty() {
            info!("no frames to sweep");
            return Ok(());
        }
        sweep(&mut session, cfg.preview.mode, steps)?;
    }
    Ok(())
}
