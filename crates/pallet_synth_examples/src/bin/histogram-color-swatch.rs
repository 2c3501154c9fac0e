use pallet_synth::prelude::*;
use pallet_synth_examples::{
    init_tracing, load_rgb8, procedural_wood_rgb8, save_rgb8_png, ReferenceImage,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Use the image given on the command line, or a generated wood sample.
    let reference = match std::env::args().nth(1) {
        Some(path) => load_rgb8(path)?,
        None => procedural_wood_rgb8(128, 128, [176, 128, 84], 7),
    };
    save_rgb8_png(
        reference.width,
        reference.height,
        reference.pixels.clone(),
        "histogram-color-swatch-reference.png",
    )?;

    let ReferenceImage { pixels, .. } = reference;
    let hist = RgbHistogram::from_rgb8(&pixels)?;
    info!("Histogram covers {} pixels.", hist.pixel_count());

    let sampler = HistogramColorSampler::from_histogram(&hist)?;

    // Every swatch pixel is an independent draw per channel.
    let (w, h) = (128u32, 128u32);
    let mut rng = StdRng::seed_from_u64(2025);
    let swatch: Vec<u8> = (0..w * h).flat_map(|_| sampler.sample(&mut rng)).collect();

    save_rgb8_png(w, h, swatch, "histogram-color-swatch.png")?;
    Ok(())
}
