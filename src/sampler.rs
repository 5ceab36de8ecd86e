// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Randomized parameter sampling.
//!
//! A [`FieldSpec`] describes a scalar that is resolved fresh on every play: a fixed value, a
//! uniform range or a weighted list. Candidate clips are drawn with the same weighted selection
//! through the [`Weighted`] trait.

use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An item that can take part in a weighted draw.
pub trait Weighted {
    /// The relative weight of this item. Negative, NaN and infinite weights count as zero.
    fn weight(&self) -> f32;
}

/// A value paired with its selection weight.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct WeightedValue<T> {
    /// The value returned when this entry is drawn.
    pub value: T,
    /// The relative weight of this entry.
    pub weight: f32,
}

impl<T> WeightedValue<T> {
    /// Creates a new weighted value.
    pub fn new(value: T, weight: f32) -> Self {
        Self { value, weight }
    }
}

impl<T> Weighted for WeightedValue<T> {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// A randomized scalar. Exactly one mode is active, selected by the `mode` tag.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FieldSpec<T> {
    /// Always resolves to the same value.
    Fixed { value: T },
    /// Resolves to a uniform draw in `[low, high]`.
    Range { low: T, high: T },
    /// Resolves to one entry's value, chosen in proportion to its weight.
    Weighted { items: Vec<WeightedValue<T>> },
}

/// A scalar that can be drawn uniformly between two bounds.
pub trait Scalar: SampleUniform + PartialOrd + Copy {
    /// Draws from `[low, high]`, where `low < high`.
    fn sample_between<R>(low: Self, high: Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized;
}

macro_rules! float_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn sample_between<R>(low: Self, high: Self, rng: &mut R) -> Self
                where
                    R: Rng + ?Sized,
                {
                    if (high - low).is_finite() {
                        return rng.gen_range(low..=high);
                    }
                    if !low.is_finite() || !high.is_finite() {
                        return low;
                    }

                    // The span overflows, so weight each bound separately.
                    let t: $t = rng.gen();
                    (low * (1.0 - t) + high * t).clamp(low, high)
                }
            }
        )*
    };
}

macro_rules! int_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn sample_between<R>(low: Self, high: Self, rng: &mut R) -> Self
                where
                    R: Rng + ?Sized,
                {
                    rng.gen_range(low..=high)
                }
            }
        )*
    };
}

float_scalar!(f32, f64);
int_scalar!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl<T> FieldSpec<T>
where
    T: Scalar,
{
    /// Resolves a concrete value from this spec.
    ///
    /// Returns `None` only for an empty weighted list, which the caller treats as "nothing to
    /// play".
    pub fn resolve<R>(&self, rng: &mut R) -> Option<T>
    where
        R: Rng + ?Sized,
    {
        match self {
            FieldSpec::Fixed { value } => Some(*value),
            FieldSpec::Range { low, high } => Some(sample_range(*low, *high, rng)),
            FieldSpec::Weighted { items } => choose_weighted(items, rng).map(|item| item.value),
        }
    }
}

/// Draws uniformly from the inclusive range between `low` and `high`, in either order.
fn sample_range<T, R>(low: T, high: T, rng: &mut R) -> T
where
    T: Scalar,
    R: Rng + ?Sized,
{
    if low < high {
        T::sample_between(low, high, rng)
    } else if high < low {
        T::sample_between(high, low, rng)
    } else {
        // Equal or unordered (NaN) bounds.
        low
    }
}

fn sanitize_weight(weight: f32) -> f32 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Chooses one item with probability proportional to its weight.
///
/// Returns `None` for an empty slice. When no item has a positive weight, or the weights don't
/// sum to a finite total, the draw falls back to a uniform choice over all items.
pub fn choose_weighted<'a, W, R>(items: &'a [W], rng: &mut R) -> Option<&'a W>
where
    W: Weighted,
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return None;
    }

    // Summed in f64 so that large f32 weights can't overflow the total.
    let weights: Vec<f64> = items
        .iter()
        .map(|item| f64::from(sanitize_weight(item.weight())))
        .collect();
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return items.choose(rng);
    }

    match WeightedIndex::new(&weights) {
        Ok(index) => items.get(index.sample(rng)),
        Err(_) => items.choose(rng),
    }
}

/// Chooses one item uniformly at random. Returns `None` for an empty slice.
pub fn choose_uniform<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}
