//! Per-channel intensity histograms and color sampling from them.
//!
//! - Count intensities with [`ChannelHistogram`] / [`RgbHistogram`].
//! - Draw colors with [`HistogramColorSampler`], which treats R, G and B as
//!   independent and samples each from its own histogram.
use std::fmt;
use std::ops::Index;

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::distribution::{Distribution, WeightedSampler};
use crate::error::{Error, Result};

/// Number of bins in a channel histogram, one per 8-bit intensity.
pub const BIN_COUNT: usize = 256;

/// Color channel of an RGB histogram.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    R,
    G,
    B,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 3] = [ColorChannel::R, ColorChannel::G, ColorChannel::B];
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorChannel::R => "R",
            ColorChannel::G => "G",
            ColorChannel::B => "B",
        };
        f.write_str(name)
    }
}

/// Pixel counts for each of the 256 intensities of one channel.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    bins: [u32; BIN_COUNT],
}

impl ChannelHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self {
            bins: [0; BIN_COUNT],
        }
    }

    pub fn from_bins(bins: [u32; BIN_COUNT]) -> Self {
        Self { bins }
    }

    /// Copies bin counts from a slice, which must hold exactly [`BIN_COUNT`] values.
    pub fn from_slice(bins: &[u32]) -> Result<Self> {
        let bins: [u32; BIN_COUNT] = bins.try_into().map_err(|_| {
            Error::InvalidArgument(format!(
                "channel histogram needs {BIN_COUNT} bins, got {}",
                bins.len()
            ))
        })?;
        Ok(Self { bins })
    }

    /// Histogram with all `count` samples in a single bin.
    pub fn spike(bin: u8, count: u32) -> Self {
        let mut hist = Self::new();
        hist.bins[bin as usize] = count;
        hist
    }

    /// Counts one pixel with the given intensity.
    #[inline]
    pub fn record(&mut self, intensity: u8) {
        let bin = &mut self.bins[intensity as usize];
        *bin = bin.saturating_add(1);
    }

    pub fn bins(&self) -> &[u32; BIN_COUNT] {
        &self.bins
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Returns `true` if no pixel was counted.
    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(|&c| c == 0)
    }
}

impl Default for ChannelHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u8> for ChannelHistogram {
    type Output = u32;

    fn index(&self, intensity: u8) -> &u32 {
        &self.bins[intensity as usize]
    }
}

impl fmt::Debug for ChannelHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied = self.bins.iter().filter(|&&c| c > 0).count();
        f.debug_struct("ChannelHistogram")
            .field("total", &self.total())
            .field("occupied_bins", &occupied)
            .finish()
    }
}

/// Histograms of the R, G and B channels of one reference image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RgbHistogram {
    pub r: ChannelHistogram,
    pub g: ChannelHistogram,
    pub b: ChannelHistogram,
}

impl RgbHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a tightly packed 8-bit RGB buffer.
    pub fn from_rgb8(pixels: &[u8]) -> Result<Self> {
        Self::from_packed(pixels, 3)
    }

    /// Counts a tightly packed 8-bit RGBA buffer. Alpha is ignored.
    pub fn from_rgba8(pixels: &[u8]) -> Result<Self> {
        Self::from_packed(pixels, 4)
    }

    fn from_packed(pixels: &[u8], stride: usize) -> Result<Self> {
        if pixels.len() % stride != 0 {
            return Err(Error::InvalidArgument(format!(
                "pixel buffer length {} is not a multiple of {stride}",
                pixels.len()
            )));
        }
        let mut hist = Self::new();
        for px in pixels.chunks_exact(stride) {
            hist.record([px[0], px[1], px[2]]);
        }
        debug!(
            "Counted {} pixels into RGB histogram.",
            pixels.len() / stride
        );
        Ok(hist)
    }

    /// Counts colors with channels in `[0, 1]`. Each channel maps to bin
    /// `floor(c * 255)`, clamped to the valid range.
    pub fn from_unit_colors(colors: impl IntoIterator<Item = [f32; 3]>) -> Self {
        let mut hist = Self::new();
        for c in colors {
            hist.record(c.map(|v| (v * 255.0).clamp(0.0, 255.0) as u8));
        }
        hist
    }

    /// Counts one pixel.
    #[inline]
    pub fn record(&mut self, [r, g, b]: [u8; 3]) {
        self.r.record(r);
        self.g.record(g);
        self.b.record(b);
    }

    pub fn channel(&self, channel: ColorChannel) -> &ChannelHistogram {
        match channel {
            ColorChannel::R => &self.r,
            ColorChannel::G => &self.g,
            ColorChannel::B => &self.b,
        }
    }

    /// Number of pixels counted (taken from the R channel).
    pub fn pixel_count(&self) -> u64 {
        self.r.total()
    }
}

/// Samples colors whose channels follow the empirical histograms of a reference image.
#[derive(Clone, Debug)]
pub struct HistogramColorSampler {
    r: WeightedSampler<u8>,
    g: WeightedSampler<u8>,
    b: WeightedSampler<u8>,
}

impl HistogramColorSampler {
    /// Builds one sampler per channel with entries `(count[i], i)` for `i` in `0..=255`.
    ///
    /// Fails with [`Error::InvalidChannel`] naming the first channel whose histogram is empty.
    pub fn new(r: &ChannelHistogram, g: &ChannelHistogram, b: &ChannelHistogram) -> Result<Self> {
        Ok(Self {
            r: channel_sampler(ColorChannel::R, r)?,
            g: channel_sampler(ColorChannel::G, g)?,
            b: channel_sampler(ColorChannel::B, b)?,
        })
    }

    pub fn from_histogram(hist: &RgbHistogram) -> Result<Self> {
        Self::new(&hist.r, &hist.g, &hist.b)
    }

    /// Counts an 8-bit RGB buffer and builds a sampler from it.
    pub fn from_rgb8(pixels: &[u8]) -> Result<Self> {
        Self::from_histogram(&RgbHistogram::from_rgb8(pixels)?)
    }

    pub fn channel(&self, channel: ColorChannel) -> &WeightedSampler<u8> {
        match channel {
            ColorChannel::R => &self.r,
            ColorChannel::G => &self.g,
            ColorChannel::B => &self.b,
        }
    }

    /// Draws `[r, g, b]` with one independent draw per channel, in R, G, B order.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> [u8; 3] {
        let r = self.r.sample(rng);
        let g = self.g.sample(rng);
        let b = self.b.sample(rng);
        [r, g, b]
    }
}

impl Distribution<[u8; 3]> for HistogramColorSampler {
    fn sample(&self, rng: &mut dyn RngCore) -> [u8; 3] {
        HistogramColorSampler::sample(self, rng)
    }
}

fn channel_sampler(
    channel: ColorChannel,
    hist: &ChannelHistogram,
) -> Result<WeightedSampler<u8>> {
    let entries = (0..=u8::MAX).map(|i| (hist[i] as f64, i));
    WeightedSampler::new(entries).map_err(|source| {
        warn!("Histogram channel {} cannot be sampled: {}", channel, source);
        Error::InvalidChannel {
            channel,
            source: Box::new(source),
        }
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn spike_channel_always_returns_its_bin() {
        let spike = ChannelHistogram::spike(128, 100);
        let sampler = HistogramColorSampler::new(&spike, &spike, &spike).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10_000 {
            assert_eq!(sampler.sample(&mut rng), [128, 128, 128]);
        }
    }

    #[test]
    fn spikes_compose_into_fixed_color() {
        let sampler = HistogramColorSampler::new(
            &ChannelHistogram::spike(10, 5),
            &ChannelHistogram::spike(200, 1),
            &ChannelHistogram::spike(0, 42),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1000 {
            assert_eq!(sampler.sample(&mut rng), [10, 200, 0]);
        }
    }

    #[test]
    fn spike_at_last_bin_is_reachable() {
        let top = ChannelHistogram::spike(255, 1);
        let sampler = HistogramColorSampler::new(&top, &top, &top).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(sampler.sample(&mut rng), [255, 255, 255]);
    }

    #[test]
    fn empty_channel_is_reported() {
        let full = ChannelHistogram::spike(1, 1);
        let err = HistogramColorSampler::new(&full, &ChannelHistogram::new(), &full).unwrap_err();
        assert!(err.is_invalid_argument());
        match err {
            Error::InvalidChannel { channel, source } => {
                assert_eq!(channel, ColorChannel::G);
                assert!(matches!(*source, Error::InvalidArgument(_)));
            }
            other => panic!("expected a channel error, got {other:?}"),
        }
    }

    #[test]
    fn random_histograms_sample_within_occupied_bins() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut bins = [[0u32; BIN_COUNT]; 3];
        for channel in bins.iter_mut() {
            for bin in channel.iter_mut() {
                // Roughly half the bins stay empty.
                if rng.random::<f32>() < 0.5 {
                    *bin = 1 + (rng.random::<f32>() * 50.0) as u32;
                }
            }
            channel[7] = 3;
        }
        let hist = RgbHistogram {
            r: ChannelHistogram::from_bins(bins[0]),
            g: ChannelHistogram::from_bins(bins[1]),
            b: ChannelHistogram::from_bins(bins[2]),
        };
        let sampler = HistogramColorSampler::from_histogram(&hist).unwrap();
        for _ in 0..20_000 {
            let color = sampler.sample(&mut rng);
            for (i, channel) in ColorChannel::ALL.into_iter().enumerate() {
                assert!(hist.channel(channel)[color[i]] > 0);
            }
        }
    }

    #[test]
    fn channel_frequencies_follow_counts() {
        let mut bins = [0u32; BIN_COUNT];
        bins[50] = 3;
        bins[150] = 1;
        let two = ChannelHistogram::from_bins(bins);
        let sampler = HistogramColorSampler::new(&two, &two, &two).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let n = 100_000;
        let hits = (0..n)
            .filter(|_| sampler.channel(ColorChannel::R).sample(&mut rng) == 50)
            .count();
        let freq = hits as f64 / n as f64;
        assert!((freq - 0.75).abs() < 0.01, "freq {freq}");
    }

    #[test]
    fn counts_rgb_and_rgba_buffers() {
        let rgb = [10, 20, 30, 10, 21, 30];
        let hist = RgbHistogram::from_rgb8(&rgb).unwrap();
        assert_eq!(hist.pixel_count(), 2);
        assert_eq!(hist.r[10], 2);
        assert_eq!(hist.g[20], 1);
        assert_eq!(hist.g[21], 1);
        assert_eq!(hist.b[30], 2);

        let rgba = [1, 2, 3, 255, 1, 2, 3, 0];
        let hist = RgbHistogram::from_rgba8(&rgba).unwrap();
        assert_eq!(hist.b[3], 2);

        assert!(RgbHistogram::from_rgb8(&[1, 2]).is_err());
        assert!(RgbHistogram::from_rgba8(&[1, 2, 3]).is_err());
    }

    #[test]
    fn unit_colors_truncate_to_bins() {
        let hist = RgbHistogram::from_unit_colors([[1.0, 0.5, 0.0], [1.2, -0.1, 0.999]]);
        assert_eq!(hist.r[255], 2);
        assert_eq!(hist.g[127], 1);
        assert_eq!(hist.g[0], 1);
        assert_eq!(hist.b[0], 1);
        assert_eq!(hist.b[254], 1);
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(ChannelHistogram::from_slice(&[1; BIN_COUNT]).is_ok());
        let err = ChannelHistogram::from_slice(&[1; 10]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn sampler_from_pixels_reproduces_palette() {
        let pixels = [255, 0, 0, 0, 0, 255];
        let sampler = HistogramColorSampler::from_rgb8(&pixels).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let [r, g, b] = sampler.sample(&mut rng);
            assert!(r == 0 || r == 255);
            assert_eq!(g, 0);
            assert!(b == 0 || b == 255);
        }
    }

    #[test]
    fn empty_histogram_reports_emptiness() {
        let mut hist = ChannelHistogram::default();
        assert!(hist.is_empty());
        hist.record(9);
        assert!(!hist.is_empty());
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn shared_sampler_draws_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HistogramColorSampler>();

        let sampler = HistogramColorSampler::new(
            &ChannelHistogram::spike(10, 3),
            &ChannelHistogram::spike(200, 3),
            &ChannelHistogram::from_bins({
                let mut bins = [0; BIN_COUNT];
                bins[0] = 1;
                bins[1] = 1;
                bins
            }),
        )
        .unwrap();

        let drawn: Vec<Vec<[u8; 3]>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4u64)
                .map(|seed| {
                    let sampler = &sampler;
                    s.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed);
                        (0..1_000)
                            .map(|_| sampler.sample(&mut rng))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (seed, colors) in drawn.iter().enumerate() {
            assert!(colors.iter().all(|&[r, g, b]| r == 10 && g == 200 && b <= 1));
            let mut rng = StdRng::seed_from_u64(seed as u64);
            let expected: Vec<_> = (0..1_000).map(|_| sampler.sample(&mut rng)).collect();
            assert_eq!(colors, &expected);
        }
    }
}
