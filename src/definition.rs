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

//! Playable audio definitions and the concrete parameters resolved from them.

use std::fmt;
use std::time::Duration;

use rand::Rng;

use crate::sampler::{choose_uniform, choose_weighted, FieldSpec, Weighted};

/// Default volume for a clip spec that doesn't specify one.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Default pitch for a clip spec that doesn't specify one.
pub const DEFAULT_PITCH: f32 = 1.0;

/// Default selection weight for a clip spec.
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// The pitch domain accepted by playback sources.
pub const PITCH_RANGE: (f32, f32) = (-3.0, 3.0);

/// A handle to a decoded clip owned by the playback backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    /// The backend's name for the clip.
    name: String,
    /// How long one pass of the clip plays at normal pitch.
    length: Duration,
}

impl Clip {
    /// Creates a new clip handle.
    pub fn new(name: impl Into<String>, length: Duration) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    /// Gets the name of the clip.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the length of the clip.
    pub fn length(&self) -> Duration {
        self.length
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.name, self.length)
    }
}

/// The mixer group a voice is routed to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MixerGroup(String);

impl MixerGroup {
    /// Creates a mixer group reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The group used when a definition doesn't name one.
    pub fn master() -> Self {
        Self::new("master")
    }

    /// Gets the name of the group.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for MixerGroup {
    fn default() -> Self {
        Self::master()
    }
}

impl fmt::Display for MixerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate sound within an [`AudioDefinition`].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClipSpec {
    clip: Option<Clip>,
    weight: f32,
    volume: FieldSpec<f32>,
    pitch: FieldSpec<f32>,
}

impl AudioClipSpec {
    /// Creates a spec with default weight, volume and pitch. A `None` clip is allowed and
    /// resolves to nothing.
    pub fn new(clip: Option<Clip>) -> Self {
        Self {
            clip,
            weight: DEFAULT_WEIGHT,
            volume: FieldSpec::Fixed {
                value: DEFAULT_VOLUME,
            },
            pitch: FieldSpec::Fixed {
                value: DEFAULT_PITCH,
            },
        }
    }

    /// Sets the selection weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the volume spec.
    pub fn with_volume(mut self, volume: FieldSpec<f32>) -> Self {
        self.volume = volume;
        self
    }

    /// Sets the pitch spec.
    pub fn with_pitch(mut self, pitch: FieldSpec<f32>) -> Self {
        self.pitch = pitch;
        self
    }

    /// Gets the clip, if any.
    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    /// Gets the volume spec.
    pub fn volume(&self) -> &FieldSpec<f32> {
        &self.volume
    }

    /// Gets the pitch spec.
    pub fn pitch(&self) -> &FieldSpec<f32> {
        &self.pitch
    }

    /// Resolves the concrete clip, volume and pitch for one playback.
    ///
    /// Returns `None` when there is no clip or when a weighted list has no entries. Volume is
    /// clamped to `[0, 1]` and pitch to [`PITCH_RANGE`].
    pub fn resolve<R>(&self, rng: &mut R) -> Option<Resolved>
    where
        R: Rng + ?Sized,
    {
        let clip = self.clip.as_ref()?.clone();
        let volume = self.volume.resolve(rng)?.clamp(0.0, 1.0);
        let pitch = self.pitch.resolve(rng)?.clamp(PITCH_RANGE.0, PITCH_RANGE.1);
        Some(Resolved {
            clip,
            volume,
            pitch,
        })
    }
}

impl Weighted for AudioClipSpec {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// A mixer target plus the candidate sounds one of which plays per request.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioDefinition {
    output: MixerGroup,
    specs: Vec<AudioClipSpec>,
    use_weights: bool,
}

impl AudioDefinition {
    /// Creates a definition that selects among its specs by weight.
    pub fn new(output: MixerGroup, specs: Vec<AudioClipSpec>) -> Self {
        Self {
            output,
            specs,
            use_weights: true,
        }
    }

    /// Chooses between weighted (`true`) and uniform (`false`) spec selection.
    pub fn with_use_weights(mut self, use_weights: bool) -> Self {
        self.use_weights = use_weights;
        self
    }

    /// Gets the mixer group.
    pub fn output(&self) -> &MixerGroup {
        &self.output
    }

    /// Gets the candidate specs.
    pub fn specs(&self) -> &[AudioClipSpec] {
        &self.specs
    }

    /// Whether specs are selected by weight.
    pub fn use_weights(&self) -> bool {
        self.use_weights
    }

    /// Returns true if there is nothing to choose from.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Selects one candidate spec, or `None` if there are none.
    pub fn select<R>(&self, rng: &mut R) -> Option<&AudioClipSpec>
    where
        R: Rng + ?Sized,
    {
        if self.use_weights {
            choose_weighted(&self.specs, rng)
        } else {
            choose_uniform(&self.specs, rng)
        }
    }

    /// Selects a spec and resolves its parameters in one step.
    pub fn resolve<R>(&self, rng: &mut R) -> Option<Resolved>
    where
        R: Rng + ?Sized,
    {
        self.select(rng)?.resolve(rng)
    }
}

impl fmt::Display for AudioDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "output: {}, specs: {}, selection: {}",
            self.output,
            self.specs.len(),
            if self.use_weights {
                "weighted"
            } else {
                "uniform"
            }
        )
    }
}

/// Concrete parameters for one playback.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub clip: Clip,
    pub volume: f32,
    pub pitch: f32,
}
