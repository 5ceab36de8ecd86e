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

//! Voice management for pooled one-shot playback.
//!
//! Handles voice allocation, stealing and the end-time ordering the allocator relies on.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::backend::{Backend, BackendError, Source};
use crate::definition::{MixerGroup, Resolved};
use crate::follow::Follow;
use crate::spatial::{SpatialRolloff, Vec3};

/// Global voice ID counter.
static NEXT_VOICE_ID: AtomicU64 = AtomicU64::new(1);

/// Default number of pooled voices.
pub const DEFAULT_POOL_SIZE: usize = 30;

/// One pooled playback source.
pub struct Voice {
    /// Unique ID for this voice.
    id: u64,
    /// The backend source this voice drives.
    source: Box<dyn Source>,
    /// When the current clip finishes.
    end_time: Duration,
    /// The moving parent this voice tracks, if any.
    follow: Option<Follow>,
}

impl Voice {
    /// Wraps a freshly created source.
    pub fn new(source: Box<dyn Source>) -> Self {
        Self {
            id: NEXT_VOICE_ID.fetch_add(1, Ordering::SeqCst),
            source,
            end_time: Duration::ZERO,
            follow: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn end_time(&self) -> Duration {
        self.end_time
    }

    pub fn follow(&self) -> Option<&Follow> {
        self.follow.as_ref()
    }

    /// Whether the voice has finished its clip.
    pub fn is_available(&self, now: Duration) -> bool {
        now > self.end_time
    }

    /// Configures the voice for a new sound starting at `now`.
    ///
    /// Without spatial settings the voice is forced to 2D and any previous follow target is
    /// dropped.
    pub fn setup(
        &mut self,
        resolved: &Resolved,
        output: &MixerGroup,
        spatial: Option<&SpatialRolloff>,
        now: Duration,
    ) {
        self.source.set_output(output);
        self.source.set_clip(&resolved.clip);
        self.source.set_volume(resolved.volume);
        self.source.set_pitch(resolved.pitch);

        match spatial {
            Some(spatial) => {
                self.source.set_spatial_blend(1.0);
                self.source.set_rolloff(spatial.curve());
                self.follow = spatial
                    .origin()
                    .map(|origin| Follow::new(origin.clone(), spatial.offset()));
                self.source.set_position(spatial.position());
            }
            None => {
                self.source.set_spatial_blend(0.0);
                self.follow = None;
                self.source.set_position(Vec3::ZERO);
            }
        }

        self.end_time = now.saturating_add(resolved.clip.length());
    }

    /// Starts playback of the configured clip.
    pub fn play(&mut self) {
        self.source.play();
    }

    /// Moves the voice to its follow target. Voices without a target are left where they are.
    pub fn update_position(&mut self) {
        if let Some(follow) = &self.follow {
            self.source.set_position(follow.position());
        }
    }

    fn stop(&mut self) {
        self.source.stop();
    }
}

impl fmt::Debug for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Voice")
            .field("id", &self.id)
            .field("end_time", &self.end_time)
            .field("following", &self.follow.is_some())
            .finish()
    }
}

/// A bounded set of voices kept in ascending end-time order.
pub struct VoicePool {
    /// Pooled voices, earliest-ending first.
    voices: Vec<Voice>,
    /// Maximum number of voices.
    capacity: usize,
}

impl VoicePool {
    /// Creates an empty pool. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            voices: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of voices currently in the pool.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Voices in ascending end-time order.
    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }

    /// Number of voices still playing at `now`.
    pub fn active_count(&self, now: Duration) -> usize {
        self.voices
            .iter()
            .filter(|voice| !voice.is_available(now))
            .count()
    }

    /// Checks a voice out of the pool for new playback.
    ///
    /// 1. The earliest-ending voice is reused if it has finished.
    /// 2. Otherwise, a full pool gives up its earliest-ending voice even though it is still
    ///    playing.
    /// 3. Otherwise a new voice is created.
    ///
    /// The voice must be handed back with [`VoicePool::reinsert`] once configured. If the
    /// backend can't create a source the pool is left unchanged.
    pub fn acquire(
        &mut self,
        now: Duration,
        backend: &mut dyn Backend,
    ) -> Result<Voice, BackendError> {
        if self
            .voices
            .first()
            .is_some_and(|voice| voice.is_available(now))
        {
            return Ok(self.voices.remove(0));
        }

        if self.voices.len() >= self.capacity {
            let stolen = self.voices.remove(0);
            debug!(
                voice = stolen.id,
                end_time = ?stolen.end_time,
                capacity = self.capacity,
                "Voice pool full, stealing voice nearest to completion"
            );
            return Ok(stolen);
        }

        let voice = Voice::new(backend.create_source()?);
        debug!(
            voice = voice.id,
            pooled = self.voices.len() + 1,
            capacity = self.capacity,
            "Created pooled voice"
        );
        Ok(voice)
    }

    /// Returns a voice to the pool at the position that keeps end times ascending. Voices with
    /// equal end times keep their arrival order.
    pub fn reinsert(&mut self, voice: Voice) {
        let index = self
            .voices
            .iter()
            .position(|pooled| pooled.end_time > voice.end_time)
            .unwrap_or(self.voices.len());
        self.voices.insert(index, voice);
    }

    /// Stops and drops every voice.
    pub fn clear(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.stop();
        }
        self.voices.clear();
    }
}

impl fmt::Debug for VoicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoicePool")
            .field("voices", &self.voices.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
