//! Weight tables for pallet scene content.
//!
//! [`DistributionConfig`] holds one weight table per content category. The defaults are
//! best guesses from inspecting real warehouse footage; override any table with the
//! `with_*` setters (or deserialize the config with the `serde` feature) and call
//! [`DistributionConfig::build`] to get ready-to-use [`PalletDistributions`].
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::distribution::{WeightedEntry, WeightedSampler};
use crate::error::{Error, Result};

/// Condition class of a pallet.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PalletClass {
    New,
    ClassA,
    ClassB,
    ClassC,
    Bad,
}

impl PalletClass {
    pub const ALL: [PalletClass; 5] = [
        PalletClass::New,
        PalletClass::ClassA,
        PalletClass::ClassB,
        PalletClass::ClassC,
        PalletClass::Bad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PalletClass::New => "New",
            PalletClass::ClassA => "ClassA",
            PalletClass::ClassB => "ClassB",
            PalletClass::ClassC => "ClassC",
            PalletClass::Bad => "Bad",
        }
    }
}

/// Plank position on a pallet.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlankSlot {
    Top,
    Middle,
    Bottom,
}

impl PlankSlot {
    /// Scene tag of planks in this slot.
    pub fn tag(&self) -> &'static str {
        match self {
            PlankSlot::Top => "Pallet.Plank.Top",
            PlankSlot::Middle => "Pallet.Plank.Middle",
            PlankSlot::Bottom => "Pallet.Plank.Bottom",
        }
    }
}

/// Brick (block) position on a pallet.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BrickSlot {
    Corner,
    Side,
    Front,
}

impl BrickSlot {
    /// Scene tag of bricks in this slot.
    pub fn tag(&self) -> &'static str {
        match self {
            BrickSlot::Corner => "Pallet.Brick.Corner",
            BrickSlot::Side => "Pallet.Brick.Side",
            BrickSlot::Front => "Pallet.Brick.Front",
        }
    }
}

/// Scene tag for a pallet carrying `layers` layers of load.
pub fn load_tag(layers: u32) -> String {
    format!("pallet.load.{layers}")
}

/// Weight tables for every content category.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionConfig {
    pub pallet_class: Vec<WeightedEntry<PalletClass>>,
    /// Number of stacked pallets.
    pub stack_height: Vec<WeightedEntry<u32>>,
    pub plank_damage: Vec<WeightedEntry<PlankSlot>>,
    pub brick_rotated: Vec<WeightedEntry<BrickSlot>>,
    pub brick_missing: Vec<WeightedEntry<BrickSlot>>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            pallet_class: table([
                (0.2, PalletClass::New),
                (0.2, PalletClass::ClassA),
                (0.25, PalletClass::ClassB),
                (0.25, PalletClass::ClassC),
                (0.1, PalletClass::Bad),
            ]),
            stack_height: table([(0.3, 4), (0.4, 3), (0.2, 2), (0.1, 1)]),
            plank_damage: table([
                (0.3, PlankSlot::Top),
                (0.1, PlankSlot::Middle),
                (0.6, PlankSlot::Bottom),
            ]),
            brick_rotated: table([
                (0.4, BrickSlot::Corner),
                (0.1, BrickSlot::Side),
                (0.5, BrickSlot::Front),
            ]),
            brick_missing: table([
                (0.3, BrickSlot::Corner),
                (0.1, BrickSlot::Side),
                (0.6, BrickSlot::Front),
            ]),
        }
    }
}

impl DistributionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pallet_class<E: Into<WeightedEntry<PalletClass>>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.pallet_class = table(entries);
        self
    }

    pub fn with_stack_height<E: Into<WeightedEntry<u32>>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.stack_height = table(entries);
        self
    }

    pub fn with_plank_damage<E: Into<WeightedEntry<PlankSlot>>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.plank_damage = table(entries);
        self
    }

    pub fn with_brick_rotated<E: Into<WeightedEntry<BrickSlot>>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.brick_rotated = table(entries);
        self
    }

    pub fn with_brick_missing<E: Into<WeightedEntry<BrickSlot>>>(
        mut self,
        entries: impl IntoIterator<Item = E>,
    ) -> Self {
        self.brick_missing = table(entries);
        self
    }

    /// Validates every table, returning an error naming the first invalid one.
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// Builds one sampler per table.
    pub fn build(&self) -> Result<PalletDistributions> {
        let dists = PalletDistributions {
            pallet_class: sampler("pallet_class", &self.pallet_class)?,
            stack_height: sampler("stack_height", &self.stack_height)?,
            plank_damage: sampler("plank_damage", &self.plank_damage)?,
            brick_rotated: sampler("brick_rotated", &self.brick_rotated)?,
            brick_missing: sampler("brick_missing", &self.brick_missing)?,
        };
        debug!("Built pallet distributions.");
        Ok(dists)
    }
}

/// Samplers for every content category, built by [`DistributionConfig::build`].
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PalletDistributions {
    pub pallet_class: WeightedSampler<PalletClass>,
    pub stack_height: WeightedSampler<u32>,
    pub plank_damage: WeightedSampler<PlankSlot>,
    pub brick_rotated: WeightedSampler<BrickSlot>,
    pub brick_missing: WeightedSampler<BrickSlot>,
}

impl PalletDistributions {
    pub fn sample_pallet_class<R: RngCore + ?Sized>(&self, rng: &mut R) -> PalletClass {
        self.pallet_class.sample(rng)
    }

    pub fn sample_stack_height<R: RngCore + ?Sized>(&self, rng: &mut R) -> u32 {
        self.stack_height.sample(rng)
    }

    /// Plank slot that receives damage.
    // TODO: condition on the pallet class once per-class damage statistics exist.
    pub fn sample_damaged_plank<R: RngCore + ?Sized>(&self, rng: &mut R) -> PlankSlot {
        self.plank_damage.sample(rng)
    }

    pub fn sample_rotated_brick<R: RngCore + ?Sized>(&self, rng: &mut R) -> BrickSlot {
        self.brick_rotated.sample(rng)
    }

    pub fn sample_missing_brick<R: RngCore + ?Sized>(&self, rng: &mut R) -> BrickSlot {
        self.brick_missing.sample(rng)
    }
}

fn table<T, E: Into<WeightedEntry<T>>>(
    entries: impl IntoIterator<Item = E>,
) -> Vec<WeightedEntry<T>> {
    entries.into_iter().map(Into::into).collect()
}

fn sampler<T: Clone>(name: &str, entries: &[WeightedEntry<T>]) -> Result<WeightedSampler<T>> {
    let zero = entries.iter().filter(|e| e.weight == 0.0).count();
    if zero > 0 {
        warn!("Table '{}' has {} zero-weight entries.", name, zero);
    }
    WeightedSampler::new(entries.iter().cloned())
        .map_err(|err| Error::InvalidConfig(format!("table '{name}': {err}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn default_tables_are_valid_and_normalized() {
        let config = DistributionConfig::default();
        assert!(config.validate().is_ok());
        let dists = config.build().unwrap();
        assert_eq!(dists.pallet_class.total_weight(), 1.0);
        assert_eq!(dists.stack_height.total_weight(), 1.0);
        assert_eq!(dists.plank_damage.total_weight(), 1.0);
        assert_eq!(dists.brick_rotated.total_weight(), 1.0);
        assert_eq!(dists.brick_missing.total_weight(), 1.0);
        assert_eq!(dists.pallet_class.len(), PalletClass::ALL.len());
    }

    #[test]
    fn stack_heights_follow_default_weights() {
        let dists = DistributionConfig::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(2025);
        let n = 100_000;
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for _ in 0..n {
            *counts.entry(dists.sample_stack_height(&mut rng)).or_default() += 1;
        }
        for (height, expected) in [(4, 0.3), (3, 0.4), (2, 0.2), (1, 0.1)] {
            let freq = counts[&height] as f64 / n as f64;
            assert!(
                (freq - expected).abs() < 0.01,
                "height {height}: {freq} vs {expected}"
            );
        }
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn invalid_table_is_named() {
        let config = DistributionConfig::new().with_brick_missing([
            (0.0, BrickSlot::Corner),
            (0.0, BrickSlot::Front),
        ]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("brick_missing")));

        let config = DistributionConfig::new().with_stack_height(Vec::<(f64, u32)>::new());
        let err = config.build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("stack_height")));
    }

    #[test]
    fn overridden_table_is_used() {
        let dists = DistributionConfig::new()
            .with_pallet_class([(1.0, PalletClass::Bad)])
            .with_plank_damage([(0.0, PlankSlot::Top), (2.0, PlankSlot::Middle)])
            .with_brick_rotated([(5.0, BrickSlot::Side)])
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..1000 {
            assert_eq!(dists.sample_pallet_class(&mut rng), PalletClass::Bad);
            assert_eq!(dists.sample_damaged_plank(&mut rng), PlankSlot::Middle);
            assert_eq!(dists.sample_rotated_brick(&mut rng), BrickSlot::Side);
        }
        let missing = dists.sample_missing_brick(&mut rng);
        assert!(missing.tag().starts_with("Pallet.Brick."));
    }

    #[test]
    fn tags_match_scene_naming() {
        assert_eq!(PlankSlot::Bottom.tag(), "Pallet.Plank.Bottom");
        assert_eq!(BrickSlot::Corner.tag(), "Pallet.Brick.Corner");
        assert_eq!(load_tag(3), "pallet.load.3");
        assert_eq!(PalletClass::ClassB.as_str(), "ClassB");
    }
}
