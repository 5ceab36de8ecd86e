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

//! Positions and distance rolloff for spatialized voices.

use std::ops::{Add, Sub};
use std::sync::Arc;

use parking_lot::RwLock;

/// Lowest accepted rolloff power.
pub const MIN_ROLLOFF_POWER: u8 = 1;

/// Highest accepted rolloff power.
pub const MAX_ROLLOFF_POWER: u8 = 4;

/// A point or offset in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Vec3) -> f32 {
        let d = self - other;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A movable parent transform. Clones share the same position, so the owner can move it while
/// voices follow.
#[derive(Clone, Debug, Default)]
pub struct Anchor(Arc<RwLock<Vec3>>);

impl Anchor {
    /// Creates an anchor at the given position.
    pub fn new(position: Vec3) -> Self {
        Self(Arc::new(RwLock::new(position)))
    }

    /// Gets the current position.
    pub fn position(&self) -> Vec3 {
        *self.0.read()
    }

    /// Moves the anchor.
    pub fn set_position(&self, position: Vec3) {
        *self.0.write() = position;
    }
}

/// A reusable rolloff preset: a distance range and a falloff power.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rolloff {
    min_distance: f32,
    max_distance: f32,
    power: u8,
}

impl Rolloff {
    /// Creates a preset. The power is clamped to `[1, 4]`.
    pub fn new(min_distance: f32, max_distance: f32, power: i32) -> Self {
        Self {
            min_distance,
            max_distance,
            power: power.clamp(MIN_ROLLOFF_POWER as i32, MAX_ROLLOFF_POWER as i32) as u8,
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn power(&self) -> u8 {
        self.power
    }

    /// Applies this preset at an offset, optionally relative to a moving origin.
    pub fn with_offset(self, offset: Vec3, origin: Option<Anchor>) -> SpatialRolloff {
        SpatialRolloff {
            rolloff: self,
            offset,
            origin,
        }
    }

    /// The falloff curve for this preset.
    pub fn curve(&self) -> RolloffCurve {
        RolloffCurve::new(self.min_distance, self.max_distance, self.power)
    }
}

impl Default for Rolloff {
    fn default() -> Self {
        Self::new(5.0, 30.0, 1)
    }
}

/// Per-call spatial settings for a one-shot voice.
#[derive(Clone, Debug)]
pub struct SpatialRolloff {
    rolloff: Rolloff,
    offset: Vec3,
    origin: Option<Anchor>,
}

impl SpatialRolloff {
    /// Creates spatial settings from a distance range and power (clamped to `[1, 4]`).
    pub fn new(range: (f32, f32), power: i32, offset: Vec3, origin: Option<Anchor>) -> Self {
        Rolloff::new(range.0, range.1, power).with_offset(offset, origin)
    }

    pub fn rolloff(&self) -> Rolloff {
        self.rolloff
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn origin(&self) -> Option<&Anchor> {
        self.origin.as_ref()
    }

    /// The world position the voice starts at: the origin's position plus the offset, or just the
    /// offset when there is no origin.
    pub fn position(&self) -> Vec3 {
        match &self.origin {
            Some(origin) => origin.position() + self.offset,
            None => self.offset,
        }
    }

    pub fn curve(&self) -> RolloffCurve {
        self.rolloff.curve()
    }
}

/// A custom falloff curve from full volume at `min_distance` to silence at `max_distance`.
///
/// The curve is a cubic Hermite segment between the keys `(min, 1)` with outgoing slope
/// `-power / (max - min)` and `(max, 0)` with a flat tangent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RolloffCurve {
    min_distance: f32,
    max_distance: f32,
    start_slope: f32,
}

impl RolloffCurve {
    pub fn new(min_distance: f32, max_distance: f32, power: u8) -> Self {
        let span = max_distance - min_distance;
        let start_slope = if span > 0.0 {
            -(power as f32) / span
        } else {
            0.0
        };
        Self {
            min_distance,
            max_distance,
            start_slope,
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Slope of the curve as it leaves the first key.
    pub fn start_slope(&self) -> f32 {
        self.start_slope
    }

    /// Gain in `[0, 1]` at the given distance from the source.
    pub fn gain(&self, distance: f32) -> f32 {
        if distance <= self.min_distance {
            return 1.0;
        }
        if distance >= self.max_distance {
            return 0.0;
        }

        let span = self.max_distance - self.min_distance;
        let t = (distance - self.min_distance) / span;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        (h00 + h10 * self.start_slope * span).clamp(0.0, 1.0)
    }
}
