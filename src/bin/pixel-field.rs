//! Headless driver for pixel fields.
//!
//! Builds a field, runs it for a number of frames and writes the final
//! particle positions to a PNG.
//!
//! ```text
//! pixel-field image hero.png --pointer 640,360 --frames 30 --out hero-field.png
//! pixel-field text "SENPO STUDIOS" --form --frames 120 --out text.png
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use pixel_field::prelude::*;

#[derive(Parser)]
#[command(name = "pixel-field", version, about = "Run a pixel-particle field headlessly")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280, global = true)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720, global = true)]
    height: u32,

    /// Frames to simulate before the snapshot
    #[arg(long, default_value_t = 60, global = true)]
    frames: u32,

    /// JSON config overriding the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long, default_value = "field.png", global = true)]
    out: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Sample an image and push particles around a fixed pointer
    Image {
        path: PathBuf,

        /// Pointer position in screen pixels, as `x,y`
        #[arg(long, value_parser = parse_point)]
        pointer: Option<Vec2>,
    },
    /// Sample a sphere and (optionally) form text
    Text {
        text: String,

        /// Ease toward the text instead of idling on the sphere
        #[arg(long)]
        form: bool,

        /// Pixel font JSON (defaults to the built-in font)
        #[arg(long)]
        font: Option<PathBuf>,

        /// Visible world height of the scene
        #[arg(long, default_value_t = 6.0)]
        world_height: f32,
    },
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Vec2::new(x, y))
}

/// Log level for a `-v` count. `RUST_LOG` still overrides it.
fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    let screen = Vec2::new(cli.width as f32, cli.height as f32);
    let snapshot = match &cli.command {
        Command::Image { path, pointer } => run_image(&cli, path, *pointer, screen)?,
        Command::Text {
            text,
            form,
            font,
            world_height,
        } => run_text(&cli, text, *form, font.as_deref(), *world_height, screen)?,
    };

    snapshot
        .save(&cli.out)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    log::info!("wrote {}", cli.out.display());
    Ok(())
}

fn run_image(cli: &Cli, path: &Path, pointer: Option<Vec2>, screen: Vec2) -> Result<RgbaImage> {
    let config = match &cli.config {
        Some(p) => ImageFieldConfig::from_json_file(p)
            .with_context(|| format!("loading config {}", p.display()))?,
        None => ImageFieldConfig::default(),
    };
    let mut field = ImageField::from_path(path, screen, config)
        .with_context(|| format!("loading image {}", path.display()))?;

    let mut tracker = PointerTracker::new(Rect::new(0.0, 0.0, screen.x, screen.y), screen);
    if let Some(p) = pointer {
        tracker.handle_event(PointerEvent::Moved(p));
    }

    let mut processed = 0;
    for _ in 0..cli.frames {
        if field.update(tracker.state()) {
            processed += 1;
        }
    }
    log::info!(
        "{} particles, {processed}/{} frames processed",
        field.len(),
        cli.frames
    );

    // Field space is pixel-sized and centred, y up.
    Ok(rasterize(&field.cloud().vertices(), cli.width, cli.height, 1.0))
}

fn run_text(
    cli: &Cli,
    text: &str,
    form: bool,
    font: Option<&Path>,
    world_height: f32,
    screen: Vec2,
) -> Result<RgbaImage> {
    let config = match &cli.config {
        Some(p) => MeshFieldConfig::from_json_file(p)
            .with_context(|| format!("loading config {}", p.display()))?,
        None => MeshFieldConfig::default(),
    };
    let font = match font {
        Some(p) => PixelFont::from_json_file(p).with_context(|| format!("loading font {}", p.display()))?,
        None => PixelFont::builtin(),
    };

    let viewport = Vec2::new(world_height * screen.x / screen.y, world_height);
    let mut field = MeshField::new(config)?;
    if let Err(e) = field.rebuild_targets(text, &font, viewport) {
        log::warn!("text targets unavailable, idling: {e}");
    }
    field.set_formed(form);

    let mut clock = FrameClock::fixed(1.0 / 60.0);
    for _ in 0..cli.frames {
        field.update(clock.tick());
    }

    let pixels_per_unit = screen.y / world_height;
    Ok(rasterize(&field.vertices(), cli.width, cli.height, pixels_per_unit))
}

/// Plot points onto a black canvas, origin at the centre, y up.
fn rasterize(vertices: &[PointVertex], width: u32, height: u32, pixels_per_unit: f32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);

    for v in vertices {
        let px = cx + v.position[0] * pixels_per_unit;
        let py = cy - v.position[1] * pixels_per_unit;
        if px < 0.0 || py < 0.0 || px >= width as f32 || py >= height as f32 {
            continue;
        }
        let [r, g, b] = v.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        canvas.put_pixel(px as u32, py as u32, Rgba([r, g, b, 255]));
    }
    canvas
}
