//! Procedural color textures synthesized from reference histograms.
//!
//! A [`TextureSynth`] holds a weighted palette of [`HistogramColorSampler`]s. Each
//! generated texture picks one palette entry, then fills every pixel with a color
//! drawn from it and darkened toward black by a random factor.
use glam::Vec3;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distribution::{Distribution, WeightedSampler};
use crate::error::{Error, Result};
use crate::histogram::HistogramColorSampler;
use crate::rng::rand_range;

/// Configuration for generated textures.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Lower bound of the per-pixel darkening factor.
    pub darken_min: f32,
    /// Upper bound (exclusive) of the per-pixel darkening factor.
    pub darken_max: f32,
}

/// 100 x 100 pixels, darkening factor in `[0.0, 1.0)`.
///
/// `darken_min` plays the role of a wood color variance: raising it darkens every
/// pixel by at least that much, while the upper bound stays at `1.0`.
impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            darken_min: 0.0,
            darken_max: 1.0,
        }
    }
}

impl TextureConfig {
    /// Creates a new [`TextureConfig`] with the given size and default darkening.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Sets the darkening range. Equal bounds darken every pixel by exactly that factor.
    pub fn with_darkening(mut self, min: f32, max: f32) -> Self {
        self.darken_min = min;
        self.darken_max = max;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "texture width and height must be > 0".into(),
            ));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.darken_min) || !unit.contains(&self.darken_max) {
            return Err(Error::InvalidConfig(
                "darkening factors must lie in [0, 1]".into(),
            ));
        }
        if self.darken_min > self.darken_max {
            return Err(Error::InvalidConfig(
                "darken_min must be <= darken_max".into(),
            ));
        }

        Ok(())
    }
}

/// Row-major RGB texture produced by [`TextureSynth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthTexture {
    pub width: u32,
    pub height: u32,
    /// Index of the palette entry the colors were drawn from.
    pub palette_index: usize,
    pub pixels: Vec<[u8; 3]>,
}

impl SynthTexture {
    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Flattens pixels into a tightly packed RGB buffer.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Generates textures from a weighted palette of histogram color samplers.
#[derive(Debug, Clone)]
pub struct TextureSynth {
    palette: WeightedSampler<HistogramColorSampler>,
    config: TextureConfig,
}

impl TextureSynth {
    pub fn try_new(
        palette: WeightedSampler<HistogramColorSampler>,
        config: TextureConfig,
    ) -> Result<Self> {
        config.validate()?;
        debug!(
            "Texture synth ready: {} palette entries, {}x{} pixels.",
            palette.len(),
            config.width,
            config.height
        );
        Ok(Self { palette, config })
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn palette(&self) -> &WeightedSampler<HistogramColorSampler> {
        &self.palette
    }

    /// Generates one texture.
    pub fn generate<R: RngCore + ?Sized>(&self, rng: &mut R) -> SynthTexture {
        let palette_index = self.palette.sample_index(rng);
        let colors = &self.palette.values()[palette_index];

        let count = self.config.width as usize * self.config.height as usize;
        let lo = self.config.darken_min as f64;
        let hi = self.config.darken_max as f64;

        let mut pixels = Vec::with_capacity(count);
        for _ in 0..count {
            let color = colors.sample(rng);
            let t = rand_range(rng, lo, hi) as f32;
            pixels.push(darken(color, t));
        }

        SynthTexture {
            width: self.config.width,
            height: self.config.height,
            palette_index,
            pixels,
        }
    }
}

impl Distribution<SynthTexture> for TextureSynth {
    fn sample(&self, rng: &mut dyn RngCore) -> SynthTexture {
        self.generate(rng)
    }
}

/// Linearly interpolates `color` toward black by `t` in `[0, 1]`.
fn darken(color: [u8; 3], t: f32) -> [u8; 3] {
    let c = Vec3::new(color[0] as f32, color[1] as f32, color[2] as f32) / 255.0;
    let out = (c.lerp(Vec3::ZERO, t) * 255.0).round();
    [out.x as u8, out.y as u8, out.z as u8]
}
