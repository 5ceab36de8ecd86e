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
use std::fmt;

use crate::definition::{Clip, MixerGroup};
use crate::spatial::{RolloffCurve, Vec3};

pub mod mock;

/// Errors raised by a playback backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("unable to create playback source: {0}")]
    CreateSource(String),
    #[error("unknown backend '{0}'")]
    UnknownBackend(String),
}

/// A single playback resource. The scheduler decides what plays and when; the source only
/// carries the parameters to the audio engine.
pub trait Source: Send {
    fn set_clip(&mut self, clip: &Clip);
    fn set_volume(&mut self, volume: f32);
    fn set_pitch(&mut self, pitch: f32);
    /// 0 is fully 2D, 1 is fully spatialized.
    fn set_spatial_blend(&mut self, blend: f32);
    fn set_rolloff(&mut self, curve: RolloffCurve);
    fn set_loop(&mut self, looping: bool);
    fn set_position(&mut self, position: Vec3);
    fn set_output(&mut self, output: &MixerGroup);
    /// Starts the current clip from the beginning.
    fn play(&mut self);
    fn stop(&mut self);
}

/// Creates playback sources.
pub trait Backend: fmt::Display + Send {
    fn create_source(&mut self) -> Result<Box<dyn Source>, BackendError>;
}

/// Gets a backend with the given name.
pub fn get_backend(name: &str) -> Result<Box<dyn Backend>, BackendError> {
    if name.starts_with("mock") {
        return Ok(Box::new(mock::Backend::new(name)));
    }

    Err(BackendError::UnknownBackend(name.to_string()))
}
