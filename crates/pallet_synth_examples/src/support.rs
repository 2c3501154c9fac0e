//! Shared helpers for the example binaries: logging setup and PNG input/output.
use std::path::Path;

use anyhow::Context;
use image::RgbImage;
use pallet_synth::prelude::SynthTexture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber. Honors `RUST_LOG`, defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Decoded 8-bit RGB reference image.
pub struct ReferenceImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Loads any image format `image` can decode and converts it to packed RGB.
pub fn load_rgb8(path: impl AsRef<Path>) -> anyhow::Result<ReferenceImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    info!("Loaded reference {} ({}x{}).", path.display(), width, height);
    Ok(ReferenceImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

/// Builds a wood-grain-like reference image so the examples run without assets.
///
/// `tint` is the base RGB color; stripes vary brightness along x.
pub fn procedural_wood_rgb8(width: u32, height: u32, tint: [u8; 3], seed: u64) -> ReferenceImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
    for _y in 0..height {
        for x in 0..width {
            let stripe = ((x as f32 * 0.35).sin() * 0.5 + 0.5) * 0.35;
            let noise = rng.random::<f32>() * 0.15;
            let k = 0.6 + stripe + noise;
            for c in tint {
                pixels.push((c as f32 * k).clamp(0.0, 255.0) as u8);
            }
        }
    }
    ReferenceImage {
        width,
        height,
        pixels,
    }
}

/// Writes a packed RGB buffer as PNG.
pub fn save_rgb8_png(
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    out: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let out = out.as_ref();
    let img = RgbImage::from_raw(width, height, pixels)
        .context("pixel buffer does not match image dimensions")?;
    img.save(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!("Wrote {} ({}x{}).", out.display(), width, height);
    Ok(())
}

pub fn save_texture_png(texture: &SynthTexture, out: impl AsRef<Path>) -> anyhow::Result<()> {
    save_rgb8_png(texture.width, texture.height, texture.to_rgb8(), out)
}
