//! rhiquad demo: opens an 800x600 window and renders one of three variants.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use rhiquad_engine::assets::{AssetRoot, load_image};
use rhiquad_engine::device::GpuInit;
use rhiquad_engine::logging::{LoggingConfig, init_logging};
use rhiquad_engine::scenes::{ClearScene, TextureScene, TwoPassScene};
use rhiquad_engine::window::{Runtime, RuntimeConfig};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    /// Rotating quad rendered offscreen, then composited onto the window
    TwoPass,
    /// Rotating quad rendered straight into the window
    Texture,
    /// Clear the window, nothing else
    Clear,
}

/// Minimal windowed renderer on a hardware-abstraction layer
#[derive(Parser, Debug)]
#[command(name = "rhiquad")]
#[command(version)]
struct Args {
    /// Which demo to run
    #[arg(short, long, value_enum, default_value_t = Variant::TwoPass)]
    variant: Variant,

    /// Directory holding `shaders/` and `textures/` (defaults to the bundled assets)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Log filter, env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let assets = args.assets.map(AssetRoot::new).unwrap_or_else(AssetRoot::bundled);
    log::info!("{:?} variant, assets at {}", args.variant, assets.path().display());

    let config = RuntimeConfig {
        title: format!("rhiquad ({:?})", args.variant),
        ..RuntimeConfig::default()
    };
    let gpu_init = GpuInit::default();

    match args.variant {
        Variant::TwoPass => {
            let image = load_image(assets.texture_path()).context("loading quad texture")?;
            Runtime::run(config, gpu_init, TwoPassScene::from_assets(&assets, image))
        }
        Variant::Texture => {
            let image = load_image(assets.texture_path()).context("loading quad texture")?;
            Runtime::run(config, gpu_init, TextureScene::from_assets(&assets, image))
        }
        Variant::Clear => Runtime::run(config, gpu_init, ClearScene::default()),
    }
}
