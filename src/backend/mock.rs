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
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tracing::debug;

use super::BackendError;
use crate::definition::{Clip, MixerGroup};
use crate::spatial::{RolloffCurve, Vec3};

/// Everything a mock source has been told.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceState {
    pub clip: Option<Clip>,
    pub volume: f32,
    pub pitch: f32,
    pub spatial_blend: f32,
    pub rolloff: Option<RolloffCurve>,
    pub looping: bool,
    pub position: Vec3,
    pub output: Option<MixerGroup>,
    pub playing: bool,
    pub play_count: usize,
}

impl Default for SourceState {
    fn default() -> Self {
        SourceState {
            clip: None,
            volume: 1.0,
            pitch: 1.0,
            spatial_blend: 0.0,
            rolloff: None,
            looping: false,
            position: Vec3::ZERO,
            output: None,
            playing: false,
            play_count: 0,
        }
    }
}

impl SourceState {
    /// The level heard by a listener at the given position: volume scaled by the rolloff
    /// curve in proportion to the spatial blend.
    pub fn gain_at(&self, listener: Vec3) -> f32 {
        let attenuation = self
            .rolloff
            .map_or(1.0, |curve| curve.gain(self.position.distance(listener)));
        self.volume * (1.0 - self.spatial_blend + self.spatial_blend * attenuation)
    }
}

/// A mock backend. Doesn't actually play anything, but records every source it hands out.
#[derive(Clone)]
pub struct Backend {
    name: String,
    sources: Arc<Mutex<Vec<Arc<Mutex<SourceState>>>>>,
    fail_creates: Arc<AtomicBool>,
}

impl Backend {
    /// Creates a new mock backend. Clones share the recorded sources.
    pub fn new(name: &str) -> Backend {
        Backend {
            name: name.to_string(),
            sources: Arc::new(Mutex::new(Vec::new())),
            fail_creates: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes subsequent source creation fail (or succeed again).
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::Relaxed);
    }

    /// Number of sources created so far.
    pub fn source_count(&self) -> usize {
        self.sources.lock().len()
    }

    /// A snapshot of the source created at the given index.
    pub fn source(&self, index: usize) -> Option<SourceState> {
        self.sources
            .lock()
            .get(index)
            .map(|state| state.lock().clone())
    }

    /// Total number of play calls across all sources.
    pub fn total_plays(&self) -> usize {
        self.sources
            .lock()
            .iter()
            .map(|state| state.lock().play_count)
            .sum()
    }
}

impl super::Backend for Backend {
    fn create_source(&mut self) -> Result<Box<dyn super::Source>, BackendError> {
        if self.fail_creates.load(Ordering::Relaxed) {
            return Err(BackendError::CreateSource(format!(
                "{} is configured to fail",
                self.name
            )));
        }

        let state = Arc::new(Mutex::new(SourceState::default()));
        let mut sources = self.sources.lock();
        sources.push(state.clone());
        Ok(Box::new(Source {
            backend: self.name.clone(),
            index: sources.len() - 1,
            state,
        }))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}

/// A mock source that writes into its shared state.
struct Source {
    backend: String,
    index: usize,
    state: Arc<Mutex<SourceState>>,
}

impl super::Source for Source {
    fn set_clip(&mut self, clip: &Clip) {
        self.state.lock().clip = Some(clip.clone());
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.lock().volume = volume;
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.state.lock().pitch = pitch;
    }

    fn set_spatial_blend(&mut self, blend: f32) {
        self.state.lock().spatial_blend = blend;
    }

    fn set_rolloff(&mut self, curve: RolloffCurve) {
        self.state.lock().rolloff = Some(curve);
    }

    fn set_loop(&mut self, looping: bool) {
        self.state.lock().looping = looping;
    }

    fn set_position(&mut self, position: Vec3) {
        self.state.lock().position = position;
    }

    fn set_output(&mut self, output: &MixerGroup) {
        self.state.lock().output = Some(output.clone());
    }

    fn play(&mut self) {
        let mut state = self.state.lock();
        state.playing = true;
        state.play_count += 1;
        debug!(
            backend = self.backend,
            source = self.index,
            clip = state.clip.as_ref().map(|clip| clip.name().to_string()),
            volume = state.volume,
            pitch = state.pitch,
            gain = state.gain_at(Vec3::ZERO),
            "Playing source."
        );
    }

    fn stop(&mut self) {
        self.state.lock().playing = false;
        debug!(backend = self.backend, source = self.index, "Stopped source.");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::backend::Backend as _;

    #[test]
    fn test_records_source_state() {
        let mut backend = Backend::new("mock");
        let observer = backend.clone();

        let mut source = backend.create_source().unwrap();
        source.set_clip(&Clip::new("a.wav", Duration::from_secs(1)));
        source.set_volume(0.25);
        source.set_loop(true);
        source.play();

        let state = observer.source(0).unwrap();
        assert_eq!(state.clip.unwrap().name(), "a.wav");
        assert_eq!(state.volume, 0.25);
        assert!(state.looping);
        assert!(state.playing);
        assert_eq!(observer.total_plays(), 1);

        source.stop();
        assert!(!observer.source(0).unwrap().playing);
    }

    #[test]
    fn test_gain_at_listener() {
        let mut backend = Backend::new("mock");
        let observer = backend.clone();

        let mut source = backend.create_source().unwrap();
        source.set_volume(0.8);
        source.set_position(Vec3::new(0.0, 0.0, 40.0));
        assert_eq!(observer.source(0).unwrap().gain_at(Vec3::ZERO), 0.8);

        source.set_rolloff(RolloffCurve::new(5.0, 30.0, 1));
        source.set_spatial_blend(1.0);
        assert_eq!(observer.source(0).unwrap().gain_at(Vec3::ZERO), 0.0);
        assert_eq!(
            observer.source(0).unwrap().gain_at(Vec3::new(0.0, 0.0, 38.0)),
            0.8
        );

        source.set_spatial_blend(0.5);
        assert!((observer.source(0).unwrap().gain_at(Vec3::ZERO) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_fail_creates() {
        let mut backend = Backend::new("mock");
        backend.fail_creates(true);
        assert!(backend.create_source().is_err());
        assert_eq!(backend.source_count(), 0);

        backend.fail_creates(false);
        assert!(backend.create_source().is_ok());
        assert_eq!(backend.source_count(), 1);
    }
}
