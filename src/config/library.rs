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
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ConfigError;
use super::parse_duration;
use crate::definition::{AudioClipSpec, AudioDefinition, Clip, MixerGroup, DEFAULT_WEIGHT};
use crate::library::Library;
use crate::sampler::FieldSpec;
use crate::spatial::Rolloff;

fn default_use_weights() -> bool {
    true
}

fn default_weight() -> f32 {
    DEFAULT_WEIGHT
}

/// A YAML representation of an audio library file.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct LibraryFile {
    /// Named rolloff presets.
    #[serde(default)]
    rolloffs: HashMap<String, RolloffPreset>,

    /// Named audio definitions.
    #[serde(default)]
    audio: HashMap<String, Audio>,
}

/// A named distance rolloff.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RolloffPreset {
    /// `[min, max]` distance.
    range: Vec<f32>,
    /// Falloff power, clamped to `[1, 4]`.
    power: i32,
}

/// A mixer target plus candidate clips.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Audio {
    /// The mixer group to play through. The master group is used when unset.
    output: Option<String>,

    /// Select specs by weight instead of uniformly.
    #[serde(default = "default_use_weights")]
    use_weights: bool,

    /// The candidate clips.
    #[serde(default)]
    specs: Vec<ClipSpec>,
}

/// One candidate clip.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ClipSpec {
    /// The clip. A spec without a clip never plays.
    clip: Option<ClipRef>,

    #[serde(default = "default_weight")]
    weight: f32,

    volume: Option<FieldSpec<f32>>,

    pitch: Option<FieldSpec<f32>>,
}

/// A clip handle and its length.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ClipRef {
    name: String,
    /// A duration string, e.g. `350ms`.
    length: String,
}

impl RolloffPreset {
    pub fn new(min_distance: f32, max_distance: f32, power: i32) -> RolloffPreset {
        RolloffPreset {
            range: vec![min_distance, max_distance],
            power,
        }
    }

    fn to_rolloff(&self, name: &str) -> Result<Rolloff, ConfigError> {
        let &[min, max] = self.range.as_slice() else {
            return Err(ConfigError::Invalid(format!(
                "rolloff {name}: range must have exactly two entries"
            )));
        };
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
            return Err(ConfigError::Invalid(format!(
                "rolloff {name}: range must satisfy 0 <= min < max, got [{min}, {max}]"
            )));
        }
        Ok(Rolloff::new(min, max, self.power))
    }
}

impl Audio {
    pub fn new(output: Option<&str>, use_weights: bool, specs: Vec<ClipSpec>) -> Audio {
        Audio {
            output: output.map(str::to_string),
            use_weights,
            specs,
        }
    }

    fn to_definition(&self, name: &str) -> Result<AudioDefinition, ConfigError> {
        let output = match &self.output {
            Some(output) => MixerGroup::new(output.as_str()),
            None => MixerGroup::master(),
        };
        let specs = self
            .specs
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.to_spec(&format!("{name}.specs[{index}]")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AudioDefinition::new(output, specs).with_use_weights(self.use_weights))
    }
}

impl ClipSpec {
    pub fn new(clip: Option<ClipRef>, weight: f32) -> ClipSpec {
        ClipSpec {
            clip,
            weight,
            volume: None,
            pitch: None,
        }
    }

    pub fn with_volume(mut self, volume: FieldSpec<f32>) -> ClipSpec {
        self.volume = Some(volume);
        self
    }

    pub fn with_pitch(mut self, pitch: FieldSpec<f32>) -> ClipSpec {
        self.pitch = Some(pitch);
        self
    }

    fn to_spec(&self, path: &str) -> Result<AudioClipSpec, ConfigError> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{path}: weight must be finite and non-negative, got {}",
                self.weight
            )));
        }

        let clip = match &self.clip {
            Some(clip) => Some(Clip::new(
                clip.name.as_str(),
                parse_duration(&format!("{path}.clip.length"), &clip.length)?,
            )),
            None => None,
        };

        let mut spec = AudioClipSpec::new(clip).with_weight(self.weight);
        if let Some(volume) = &self.volume {
            validate_field(&format!("{path}.volume"), volume)?;
            spec = spec.with_volume(volume.clone());
        }
        if let Some(pitch) = &self.pitch {
            validate_field(&format!("{path}.pitch"), pitch)?;
            spec = spec.with_pitch(pitch.clone());
        }
        Ok(spec)
    }
}

impl ClipRef {
    pub fn new(name: &str, length: &str) -> ClipRef {
        ClipRef {
            name: name.to_string(),
            length: length.to_string(),
        }
    }
}

/// Rejects non-finite values and negative weights.
fn validate_field(path: &str, field: &FieldSpec<f32>) -> Result<(), ConfigError> {
    let valid = match field {
        FieldSpec::Fixed { value } => value.is_finite(),
        FieldSpec::Range { low, high } => low.is_finite() && high.is_finite(),
        FieldSpec::Weighted { items } => items
            .iter()
            .all(|item| item.value.is_finite() && item.weight.is_finite() && item.weight >= 0.0),
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{path}: values must be finite and weights non-negative"
        )))
    }
}

impl LibraryFile {
    pub fn new() -> LibraryFile {
        LibraryFile::default()
    }

    pub fn with_rolloff(mut self, name: &str, rolloff: RolloffPreset) -> LibraryFile {
        self.rolloffs.insert(name.to_string(), rolloff);
        self
    }

    pub fn with_audio(mut self, name: &str, audio: Audio) -> LibraryFile {
        self.audio.insert(name.to_string(), audio);
        self
    }

    /// Parses a library from a YAML file.
    pub fn deserialize(path: &Path) -> Result<LibraryFile, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<LibraryFile>()?)
    }

    /// Serializes the library and writes it to the given path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let serialized = serde_yml::to_string(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(serialized.as_bytes())?;
        info!(path = %path.display(), "Saved audio library");
        Ok(())
    }

    /// Validates the file and converts it into runtime definitions.
    pub fn to_library(&self) -> Result<Library, ConfigError> {
        let audio = self
            .audio
            .iter()
            .map(|(name, audio)| Ok((name.clone(), Arc::new(audio.to_definition(name)?))))
            .collect::<Result<HashMap<_, _>, ConfigError>>()?;
        let rolloffs = self
            .rolloffs
            .iter()
            .map(|(name, rolloff)| Ok((name.clone(), rolloff.to_rolloff(name)?)))
            .collect::<Result<HashMap<_, _>, ConfigError>>()?;
        Ok(Library::new(audio, rolloffs))
    }
}
