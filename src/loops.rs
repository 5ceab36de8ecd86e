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

//! Crossfading loop slots.
//!
//! Each slot owns two looping sources. A new request fades the audible source out while the
//! silent one takes the new clip and fades in, then the two swap roles for the next request.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::backend::{Backend, BackendError, Source};
use crate::definition::{Clip, MixerGroup, Resolved};
use crate::tasks::Ramp;

/// Application-chosen key for a loop slot.
pub type SlotId = u32;

/// One of the two looping sources in a slot.
struct LoopVoice {
    source: Box<dyn Source>,
    volume: f32,
    clip: Option<Clip>,
    playing: bool,
    /// At most one ramp drives a voice; a newer one replaces it.
    fade: Option<Ramp>,
}

impl LoopVoice {
    fn new(mut source: Box<dyn Source>) -> Self {
        source.set_loop(true);
        source.set_volume(0.0);
        Self {
            source,
            volume: 0.0,
            clip: None,
            playing: false,
            fade: None,
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.source.set_volume(volume);
    }

    /// Starts a ramp from the current volume and applies its first step.
    fn fade_to(&mut self, to: f32, duration: Duration, now: Duration) {
        self.fade = Some(Ramp::new(self.volume, to, now, duration));
        self.step(now);
    }

    fn step(&mut self, now: Duration) {
        if let Some(ramp) = self.fade {
            self.set_volume(ramp.value_at(now));
            if ramp.is_finished(now) {
                self.fade = None;
            }
        }
    }

    fn play(&mut self) {
        self.source.play();
        self.playing = true;
    }

    fn stop(&mut self) {
        self.source.stop();
        self.playing = false;
        self.fade = None;
    }
}

struct LoopSlot {
    voices: [LoopVoice; 2],
    /// Index of the voice that is (or is becoming) audible.
    audible: usize,
}

impl LoopSlot {
    /// Returns `(audible, silent)`.
    fn roles(&mut self) -> (&mut LoopVoice, &mut LoopVoice) {
        let [first, second] = &mut self.voices;
        if self.audible == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }
}

/// Current volumes of a slot's two voices.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotLevels {
    /// The voice carrying the most recent clip.
    pub audible: f32,
    /// The voice carrying the previous clip.
    pub previous: f32,
    /// The most recent clip.
    pub clip: Option<Clip>,
}

/// Loop slots by ID. Slots are created on first use and live until the table is cleared.
#[derive(Default)]
pub struct LoopSlotTable {
    slots: HashMap<SlotId, LoopSlot>,
}

impl LoopSlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crossfades `slot` to the resolved clip over `fade`.
    ///
    /// If the slot's sources can't be created the table is left unchanged.
    pub fn play(
        &mut self,
        slot: SlotId,
        output: &MixerGroup,
        resolved: &Resolved,
        fade: Duration,
        now: Duration,
        backend: &mut dyn Backend,
    ) -> Result<(), BackendError> {
        let pair = match self.slots.entry(slot) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let first = LoopVoice::new(backend.create_source()?);
                let second = LoopVoice::new(backend.create_source()?);
                debug!(slot, "Created loop slot");
                entry.insert(LoopSlot {
                    voices: [first, second],
                    audible: 0,
                })
            }
        };

        let (outgoing, incoming) = pair.roles();
        outgoing.fade_to(0.0, fade, now);

        incoming.source.set_output(output);
        incoming.source.set_clip(&resolved.clip);
        incoming.source.set_pitch(resolved.pitch);
        incoming.clip = Some(resolved.clip.clone());
        incoming.set_volume(0.0);
        incoming.fade_to(resolved.volume, fade, now);

        incoming.play();
        // Restarting a loop that is already fading out would be audible.
        if !outgoing.playing && outgoing.clip.is_some() {
            outgoing.play();
        }

        pair.audible = 1 - pair.audible;
        debug!(
            slot,
            clip = resolved.clip.name(),
            volume = resolved.volume,
            fade = ?fade,
            "Crossfading loop slot"
        );
        Ok(())
    }

    /// Advances every in-flight fade.
    pub fn advance(&mut self, now: Duration) {
        for slot in self.slots.values_mut() {
            for voice in slot.voices.iter_mut() {
                voice.step(now);
            }
        }
    }

    /// Whether any fade is still running.
    pub fn is_fading(&self) -> bool {
        self.slots
            .values()
            .any(|slot| slot.voices.iter().any(|voice| voice.fade.is_some()))
    }

    pub fn levels(&self, slot: SlotId) -> Option<SlotLevels> {
        self.slots.get(&slot).map(|pair| {
            let audible = &pair.voices[pair.audible];
            let previous = &pair.voices[1 - pair.audible];
            SlotLevels {
                audible: audible.volume,
                previous: previous.volume,
                clip: audible.clip.clone(),
            }
        })
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stops and drops every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            for voice in slot.voices.iter_mut() {
                voice.stop();
            }
        }
        self.slots.clear();
    }
}

impl fmt::Debug for LoopSlotTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopSlotTable")
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock;

    fn resolved(name: &str, volume: f32) -> Resolved {
        Resolved {
            clip: Clip::new(name, Duration::from_secs(30)),
            volume,
            pitch: 1.0,
        }
    }

    fn secs(secs: f32) -> Duration {
        Duration::from_secs_f32(secs)
    }

    #[test]
    fn test_first_request_creates_looping_pair() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();

        table
            .play(
                3,
                &MixerGroup::new("music"),
                &resolved("calm.ogg", 0.8),
                secs(2.0),
                Duration::ZERO,
                &mut backend,
            )
            .unwrap();

        assert!(table.contains(3));
        assert_eq!(backend.source_count(), 2);
        let first = backend.source(0).unwrap();
        let second = backend.source(1).unwrap();
        assert!(first.looping && second.looping);

        // The silent voice took the clip and started from zero.
        assert_eq!(second.clip.unwrap().name(), "calm.ogg");
        assert_eq!(second.volume, 0.0);
        assert!(second.playing);
        assert_eq!(second.output, Some(MixerGroup::new("music")));
        // Nothing to restart on the voice that never had a clip.
        assert!(!first.playing);
        assert!(table.is_fading());
    }

    #[test]
    fn test_crossfade_reaches_exact_endpoints() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        let output = MixerGroup::new("music");

        table
            .play(5, &output, &resolved("a.ogg", 0.8), secs(2.0), Duration::ZERO, &mut backend)
            .unwrap();
        table
            .play(5, &output, &resolved("b.ogg", 0.6), secs(2.0), Duration::ZERO, &mut backend)
            .unwrap();

        table.advance(secs(1.0));
        let levels = table.levels(5).unwrap();
        assert!((levels.audible - 0.3).abs() < 1e-6);

        table.advance(secs(2.0));
        let levels = table.levels(5).unwrap();
        assert_eq!(levels.audible, 0.6);
        assert_eq!(levels.previous, 0.0);
        assert_eq!(levels.clip.unwrap().name(), "b.ogg");
        assert!(!table.is_fading());
    }

    #[test]
    fn test_crossfade_from_audible_loop() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        let output = MixerGroup::new("music");

        table
            .play(1, &output, &resolved("a.ogg", 1.0), secs(1.0), Duration::ZERO, &mut backend)
            .unwrap();
        table.advance(secs(1.0));
        assert_eq!(table.levels(1).unwrap().audible, 1.0);

        table
            .play(1, &output, &resolved("b.ogg", 0.5), secs(2.0), secs(1.0), &mut backend)
            .unwrap();
        table.advance(secs(2.0));
        let levels = table.levels(1).unwrap();
        assert!((levels.audible - 0.25).abs() < 1e-6);
        assert!((levels.previous - 0.5).abs() < 1e-6);

        table.advance(secs(3.0));
        let levels = table.levels(1).unwrap();
        assert_eq!(levels.audible, 0.5);
        assert_eq!(levels.previous, 0.0);

        // The outgoing loop kept playing instead of being restarted.
        assert_eq!(backend.source(1).unwrap().play_count, 1);
        assert_eq!(backend.source(0).unwrap().play_count, 1);
    }

    #[test]
    fn test_zero_fade_assigns_immediately() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        let output = MixerGroup::master();

        table
            .play(0, &output, &resolved("a.ogg", 0.7), Duration::ZERO, Duration::ZERO, &mut backend)
            .unwrap();
        let levels = table.levels(0).unwrap();
        assert_eq!(levels.audible, 0.7);
        assert!(!table.is_fading());

        table
            .play(0, &output, &resolved("b.ogg", 0.9), Duration::ZERO, Duration::ZERO, &mut backend)
            .unwrap();
        let levels = table.levels(0).unwrap();
        assert_eq!(levels.audible, 0.9);
        assert_eq!(levels.previous, 0.0);
    }

    #[test]
    fn test_newer_fade_replaces_older() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        let output = MixerGroup::master();

        table
            .play(2, &output, &resolved("a.ogg", 1.0), secs(4.0), Duration::ZERO, &mut backend)
            .unwrap();
        table.advance(secs(1.0));
        table
            .play(2, &output, &resolved("b.ogg", 1.0), secs(1.0), secs(1.0), &mut backend)
            .unwrap();

        table.advance(secs(2.0));
        assert_eq!(table.levels(2).unwrap().previous, 0.0);

        // The older, longer fade-in on the same voice no longer applies.
        table.advance(secs(4.0));
        let levels = table.levels(2).unwrap();
        assert_eq!(levels.previous, 0.0);
        assert_eq!(levels.audible, 1.0);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        let output = MixerGroup::master();

        table
            .play(1, &output, &resolved("a.ogg", 1.0), Duration::ZERO, Duration::ZERO, &mut backend)
            .unwrap();
        table
            .play(2, &output, &resolved("b.ogg", 1.0), Duration::ZERO, Duration::ZERO, &mut backend)
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(backend.source_count(), 4);
    }

    #[test]
    fn test_create_failure_leaves_table_unchanged() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        backend.fail_creates(true);

        let result = table.play(
            9,
            &MixerGroup::master(),
            &resolved("a.ogg", 1.0),
            Duration::ZERO,
            Duration::ZERO,
            &mut backend,
        );
        assert!(result.is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_clear_stops_sources() {
        let mut backend = mock::Backend::new("mock");
        let mut table = LoopSlotTable::new();
        table
            .play(
                1,
                &MixerGroup::master(),
                &resolved("a.ogg", 1.0),
                Duration::ZERO,
                Duration::ZERO,
                &mut backend,
            )
            .unwrap();

        table.clear();
        assert!(table.is_empty());
        assert!(!backend.source(1).unwrap().playing);
    }
}
