use pallet_synth::prelude::*;
use pallet_synth_examples::{init_tracing, procedural_wood_rgb8, save_texture_png};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Three reference woods: fresh, weathered and dark.
    let references = [
        (0.5, [196, 150, 100], 1),
        (0.3, [150, 140, 128], 2),
        (0.2, [110, 80, 56], 3),
    ];

    let mut entries = Vec::with_capacity(references.len());
    for (weight, tint, seed) in references {
        let image = procedural_wood_rgb8(64, 64, tint, seed);
        entries.push((weight, HistogramColorSampler::from_rgb8(&image.pixels)?));
    }
    let palette = WeightedSampler::new(entries)?;

    let config = TextureConfig::new(100, 100).with_darkening(0.0, 0.3);
    let synth = TextureSynth::try_new(palette, config)?;

    let mut rng = StdRng::seed_from_u64(42);
    for i in 0..4 {
        let texture = synth.generate(&mut rng);
        info!(
            "Texture {} drawn from palette entry {}.",
            i, texture.palette_index
        );
        save_texture_png(&texture, format!("texture-synth-palette-{i}.png"))?;
    }

    Ok(())
}
