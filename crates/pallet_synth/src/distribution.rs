//! Weighted discrete distributions over opaque payloads.
//!
//! [`WeightedSampler`] is the canonical inverse-CDF sampler used by every content
//! category of the generator: materials, stack heights, damage targets and the
//! per-channel intensity tables in [`crate::histogram`]. Build it once from a list of
//! `(weight, value)` entries and draw with any [`rand::RngCore`].
//!
//! Weights need not be normalized: a draw picks `r` uniformly in `[0, total)` and
//! returns the first entry whose cumulative weight is strictly greater than `r`.
//!
//! [`Distribution`] is the object-safe seam shared by all samplers, and
//! [`FnDistribution`] adapts a closure that produces a fresh value per draw.
use std::fmt;

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::rng::rand01;

/// Trait for anything that produces one value per draw from an injected random source.
pub trait Distribution<T>: Send + Sync {
    fn sample(&self, rng: &mut dyn RngCore) -> T;
}

/// A single `(weight, value)` pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEntry<T> {
    /// Relative likelihood, must be finite and `>= 0`.
    pub weight: f64,
    /// Opaque payload returned when this entry is drawn.
    pub value: T,
}

impl<T> WeightedEntry<T> {
    pub fn new(weight: f64, value: T) -> Self {
        Self { weight, value }
    }
}

impl<T> From<(f64, T)> for WeightedEntry<T> {
    fn from((weight, value): (f64, T)) -> Self {
        Self { weight, value }
    }
}

/// Neumaier summation. Keeps decimal tables such as `0.7 / 0.2 / 0.1` summing to `1.0`.
#[derive(Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Immutable weighted sampler using a cumulative table and binary search.
///
/// Invariants, established by [`WeightedSampler::new`]:
/// - at least one entry;
/// - cumulative weights are non-decreasing and the last one equals the (finite,
///   strictly positive) total weight;
/// - values are stored in input order, one per entry, never merged.
#[derive(Clone)]
pub struct WeightedSampler<T> {
    cumulative: Vec<f64>,
    /// Weights as given, kept so accessors do not subtract cumulative values.
    weights: Vec<f64>,
    values: Vec<T>,
    /// Last entry with a positive weight. Used when `r` rounds up to the total.
    fallback: usize,
}

impl<T> WeightedSampler<T> {
    /// Builds a sampler from `(weight, value)` entries in the given order.
    ///
    /// Fails with [`Error::InvalidArgument`] if `entries` is empty, if any weight is
    /// negative or not finite, or if the weights sum to zero.
    pub fn new<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<WeightedEntry<T>>,
    {
        let entries = entries.into_iter();
        let (lower, _) = entries.size_hint();
        let mut cumulative = Vec::with_capacity(lower);
        let mut weights = Vec::with_capacity(lower);
        let mut values = Vec::with_capacity(lower);
        let mut fallback = None;
        let mut running = CompensatedSum::default();

        for (i, entry) in entries.enumerate() {
            let WeightedEntry { weight, value } = entry.into();
            if !weight.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "weight at index {i} is not finite ({weight})"
                )));
            }
            if weight < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "weight at index {i} is negative ({weight})"
                )));
            }
            if weight > 0.0 {
                fallback = Some(i);
            }

            running.add(weight);
            let cum = running.value();
            if !cum.is_finite() || !running.sum.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "cumulative weight overflows at index {i}"
                )));
            }
            let prev = cumulative.last().copied().unwrap_or(0.0);
            cumulative.push(cum.max(prev));
            weights.push(weight);
            values.push(value);
        }

        if values.is_empty() {
            return Err(Error::InvalidArgument(
                "weighted entries must not be empty".into(),
            ));
        }

        let Some(fallback) = fallback else {
            return Err(Error::InvalidArgument("total weight is zero".into()));
        };

        debug!(
            "Built weighted sampler with {} entries (total weight {}).",
            values.len(),
            cumulative[cumulative.len() - 1]
        );

        Ok(Self {
            cumulative,
            weights,
            values,
            fallback,
        })
    }

    /// Builds a sampler where every value has the same weight.
    pub fn uniform(values: impl IntoIterator<Item = T>) -> Result<Self> {
        Self::new(values.into_iter().map(|v| (1.0, v)))
    }

    /// Number of entries, including zero-weight ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a sampler cannot be constructed without entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all entry weights.
    pub fn total_weight(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Values in construction order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Cumulative weights in construction order.
    pub fn cumulative_weights(&self) -> &[f64] {
        &self.cumulative
    }

    /// Weight of the entry at `index`, exactly as passed to [`WeightedSampler::new`].
    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Probability of drawing the entry at `index`.
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.weight(index).map(|w| w / self.total_weight())
    }

    /// Iterates `(weight, &value)` pairs in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> + '_ {
        self.weights.iter().copied().zip(self.values.iter())
    }

    /// Returns a sampler with the same weights and transformed values.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> WeightedSampler<U> {
        WeightedSampler {
            cumulative: self.cumulative,
            weights: self.weights,
            values: self.values.into_iter().map(f).collect(),
            fallback: self.fallback,
        }
    }

    /// Maps a uniform `u` in `[0, 1)` to an entry index.
    ///
    /// Selects the first entry whose cumulative weight is strictly greater than
    /// `u * total`; if none is, the last positive-weight entry.
    pub fn index_for_uniform(&self, u: f64) -> usize {
        debug_assert!((0.0..1.0).contains(&u), "uniform {u} out of [0, 1)");
        self.index_for_weight(u * self.total_weight())
    }

    fn index_for_weight(&self, r: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c <= r);
        if idx < self.cumulative.len() {
            idx
        } else {
            self.fallback
        }
    }

    /// Returns the value selected by a uniform `u` in `[0, 1)`.
    pub fn value_for_uniform(&self, u: f64) -> &T {
        &self.values[self.index_for_uniform(u)]
    }

    /// Draws an entry index.
    pub fn sample_index<R: RngCore + ?Sized>(&self, rng: &mut R) -> usize {
        self.index_for_uniform(rand01(rng))
    }

    /// Draws a value by reference.
    pub fn sample_ref<R: RngCore + ?Sized>(&self, rng: &mut R) -> &T {
        &self.values[self.sample_index(rng)]
    }

    /// Draws a value.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> T
    where
        T: Clone,
    {
        self.sample_ref(rng).clone()
    }
}

impl WeightedSampler<usize> {
    /// Builds a sampler over indices `0..n` from a list of weights.
    pub fn from_weights(weights: impl IntoIterator<Item = f64>) -> Result<Self> {
        Self::new(weights.into_iter().enumerate().map(|(i, w)| (w, i)))
    }
}

impl<T: fmt::Debug> fmt::Debug for WeightedSampler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedSampler")
            .field("entries", &self.iter().collect::<Vec<_>>())
            .field("total_weight", &self.total_weight())
            .finish()
    }
}

impl<T: Clone + Send + Sync> Distribution<T> for WeightedSampler<T> {
    fn sample(&self, rng: &mut dyn RngCore) -> T {
        WeightedSampler::sample(self, rng)
    }
}

/// Distribution backed by a closure that builds a new value per draw.
pub struct FnDistribution<F> {
    f: F,
}

impl<F> FnDistribution<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, F> Distribution<T> for FnDistribution<F>
where
    F: Fn(&mut dyn RngCore) -> T + Send + Sync,
{
    fn sample(&self, rng: &mut dyn RngCore) -> T {
        (self.f)(rng)
    }
}
