#![forbid(unsafe_code)]
//! pallet_synth: Weighted discrete sampling for synthetic warehouse pallet imagery.
//!
//! Modules:
//! - distribution: weighted inverse-CDF sampler over opaque payloads
//! - histogram: per-channel intensity histograms and independent-channel color sampling
//! - texture: procedural color textures from a weighted palette of histograms
//! - presets: default weight tables for pallet class, stack height and damage targets
//!
//! For examples and docs, see README and docs.rs.
pub mod distribution;
pub mod error;
pub mod histogram;
pub mod presets;
mod rng;
pub mod texture;

/// Convenient re-exports for common types. Import with `use pallet_synth::prelude::*;`.
pub mod prelude {
    pub use crate::distribution::{Distribution, FnDistribution, WeightedEntry, WeightedSampler};
    pub use crate::error::{Error, Result};
    pub use crate::histogram::{
        ChannelHistogram, ColorChannel, HistogramColorSampler, RgbHistogram, BIN_COUNT,
    };
    pub use crate::presets::{
        load_tag, BrickSlot, DistributionConfig, PalletClass, PalletDistributions, PlankSlot,
    };
    pub use crate::texture::{SynthTexture, TextureConfig, TextureSynth};
}
