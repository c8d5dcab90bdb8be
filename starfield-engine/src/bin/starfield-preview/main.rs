// starfield-preview - Render the loading screen star field to PNG frames
//
// Drives the same renderer loop the browser does, with frames fired at a
// fixed interval instead of by the display.
//
// Usage: cargo run --bin starfield-preview -- [--width 800] [--height 600]
//        [--frames 30] [--interval 16.67] [--seed 1] [--config file.json]
//        [--resize 400x300] [--out preview]

mod export;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starfield_engine::headless::{self, HeadlessHost};
use starfield_engine::{PixelBuffer, StarfieldConfig, StarfieldRenderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "starfield-preview", about = "Render star field frames to PNG")]
struct Args {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    #[arg(long, default_value_t = 30)]
    frames: u32,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    interval: f64,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON file overriding the default star field settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resize the surface to WxH halfway through
    #[arg(long)]
    resize: Option<Size>,

    #[arg(long, default_value = "preview")]
    out: PathBuf,
}

/// Canvas side limit shared by the major browsers.
const MAX_SIDE: u32 = 16_384;

#[derive(Clone, Copy, Debug)]
struct Size {
    w: u32,
    h: u32,
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or_else(|| format!("expected WxH, got {s:?}"))?;
        let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{v:?}: {e}"));
        Ok(Size { w: parse(w)?, h: parse(h)? })
    }
}

fn check_size(flag: &str, w: u32, h: u32) -> Result<()> {
    if w > MAX_SIDE || h > MAX_SIDE {
        bail!("{flag} {w}x{h} exceeds the {MAX_SIDE}x{MAX_SIDE} canvas limit");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();
    if !(args.interval.is_finite() && args.interval >= 0.0) {
        bail!("--interval must be a non-negative number of milliseconds");
    }
    check_size("--width/--height", args.width, args.height)?;
    if let Some(size) = args.resize {
        check_size("--resize", size.w, size.h)?;
    }

    let config = match &args.config {
        Some(path) => StarfieldConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => StarfieldConfig::default(),
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    info!(
        "rendering {} frames of {} stars at {}x{} (seed {})",
        args.frames, config.star_count, args.width, args.height, args.seed
    );

    let rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut renderer = StarfieldRenderer::new(config, HeadlessHost::new(), rng);
    renderer.start(Some(PixelBuffer::new(args.width, args.height)?))?;

    let mut now = 0.0;
    let mut written = 0;
    for i in 0..args.frames {
        if i == args.frames / 2
            && let Some(size) = args.resize
        {
            if let Some(buf) = renderer.surface_mut() {
                buf.resize(size.w, size.h)?;
            }
            headless::notify_resize(&mut renderer);
        }

        if !headless::fire(&mut renderer, now) {
            warn!("no frame pending at {now}ms, stopping early");
            break;
        }
        now += args.interval;

        let Some(buf) = renderer.surface() else { break };
        if buf.is_empty() {
            warn!("frame {i}: empty surface, nothing written");
            continue;
        }
        let path = args.out.join(format!("frame_{i:04}.png"));
        export::write_png(buf, &path)?;
        written += 1;
    }

    renderer.stop();
    info!("wrote {written} frames to {}", args.out.display());
    Ok(())
}
