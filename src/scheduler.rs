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

//! The playback scheduler.
//!
//! Owns the voice pool, the loop slot table and every time-based task. All mutation happens
//! through `&mut self` on one logical thread; [`crate::driver`] wraps it for use from elsewhere.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::backend::{Backend, Source};
use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::definition::{AudioDefinition, Clip, MixerGroup, PITCH_RANGE};
use crate::follow;
use crate::loops::{LoopSlotTable, SlotId};
use crate::pool::VoicePool;
use crate::spatial::SpatialRolloff;
use crate::tasks::TimerQueue;

/// Work deferred by a non-zero delay.
enum Pending {
    OneShot {
        definition: Arc<AudioDefinition>,
        spatial: Option<SpatialRolloff>,
    },
    Looping {
        definition: Arc<AudioDefinition>,
        fade: Duration,
        slot: SlotId,
    },
}

/// A diagnostic source that lives outside the pool until its clip ends.
struct Preview {
    source: Box<dyn Source>,
    dispose_at: Duration,
}

/// Decides when and with which parameters voices play.
pub struct Scheduler {
    pool: VoicePool,
    loops: LoopSlotTable,
    timers: TimerQueue<Pending>,
    previews: Vec<Preview>,
    backend: Box<dyn Backend>,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
    /// Whether pooled state survives the end of a scope.
    persist: bool,
}

impl Scheduler {
    /// Creates a scheduler. The random source is seeded from the config when a seed is set.
    pub fn new(
        config: &SchedulerConfig,
        backend: Box<dyn Backend>,
        clock: Arc<dyn Clock>,
    ) -> Scheduler {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            backend = %backend,
            pool_size = config.pool_size(),
            persist = config.persist(),
            "Scheduler created"
        );
        Scheduler {
            pool: VoicePool::new(config.pool_size()),
            loops: LoopSlotTable::new(),
            timers: TimerQueue::new(),
            previews: Vec::new(),
            backend,
            clock,
            rng: Box::new(rng),
            persist: config.persist(),
        }
    }

    /// Replaces the random source.
    pub fn with_rng<R>(mut self, rng: R) -> Scheduler
    where
        R: RngCore + Send + 'static,
    {
        self.rng = Box::new(rng);
        self
    }

    /// The scheduler's current time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn loops(&self) -> &LoopSlotTable {
        &self.loops
    }

    /// Number of delayed plays that have not fired yet.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Number of preview sources still alive.
    pub fn previews(&self) -> usize {
        self.previews.len()
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    /// Plays one sound from the definition on a pooled voice.
    ///
    /// A zero delay plays before this call returns. Otherwise the play fires on the first tick at
    /// or after `now + delay`. A missing or empty definition, or a selected spec without a clip,
    /// plays nothing.
    pub fn play(
        &mut self,
        definition: Option<&Arc<AudioDefinition>>,
        spatial: Option<SpatialRolloff>,
        delay: Duration,
    ) {
        let Some(definition) = playable(definition) else {
            return;
        };

        if delay.is_zero() {
            self.start_one_shot(definition, spatial.as_ref());
        } else {
            let deadline = self.clock.now().saturating_add(delay);
            debug!(deadline = ?deadline, "Scheduled delayed play");
            self.timers.schedule(
                deadline,
                Pending::OneShot {
                    definition: definition.clone(),
                    spatial,
                },
            );
        }
    }

    /// Crossfades the given loop slot to a sound from the definition over `fade`.
    ///
    /// Delay and quiet-failure rules are the same as [`Scheduler::play`].
    pub fn play_looping(
        &mut self,
        definition: Option<&Arc<AudioDefinition>>,
        fade: Duration,
        slot: SlotId,
        delay: Duration,
    ) {
        let Some(definition) = playable(definition) else {
            return;
        };

        if delay.is_zero() {
            self.start_looping(definition, fade, slot);
        } else {
            let deadline = self.clock.now().saturating_add(delay);
            debug!(slot, deadline = ?deadline, "Scheduled delayed loop");
            self.timers.schedule(
                deadline,
                Pending::Looping {
                    definition: definition.clone(),
                    fade,
                    slot,
                },
            );
        }
    }

    /// Plays a clip once on a temporary source outside the pool. The source is dropped on the
    /// first tick after the clip ends.
    pub fn preview(&mut self, clip: Option<&Clip>, volume: f32, pitch: f32) {
        let Some(clip) = clip else {
            trace!("Preview without a clip, nothing to play");
            return;
        };

        let mut source = match self.backend.create_source() {
            Ok(source) => source,
            Err(e) => {
                warn!(err = %e, clip = clip.name(), "Unable to create preview source");
                return;
            }
        };

        source.set_output(&MixerGroup::master());
        source.set_clip(clip);
        source.set_volume(volume.clamp(0.0, 1.0));
        source.set_pitch(pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1));
        source.set_spatial_blend(0.0);
        source.play();

        let dispose_at = self.clock.now().saturating_add(clip.length());
        debug!(clip = clip.name(), dispose_at = ?dispose_at, "Previewing clip");
        self.previews.push(Preview { source, dispose_at });
    }

    /// Advances every time-based task to the current time: due delayed plays fire, fades step,
    /// followed voices move and finished previews are dropped.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        for pending in self.timers.pop_due(now) {
            match pending {
                Pending::OneShot {
                    definition,
                    spatial,
                } => self.start_one_shot(&definition, spatial.as_ref()),
                Pending::Looping {
                    definition,
                    fade,
                    slot,
                } => self.start_looping(&definition, fade, slot),
            }
        }

        self.loops.advance(now);
        follow::update_positions(&mut self.pool);

        self.previews.retain_mut(|preview| {
            if now >= preview.dispose_at {
                preview.source.stop();
                false
            } else {
                true
            }
        });
    }

    /// Whether nothing is pending, fading, previewing or playing.
    pub fn is_idle(&self) -> bool {
        let now = self.clock.now();
        self.timers.is_empty()
            && self.previews.is_empty()
            && !self.loops.is_fading()
            && self.pool.active_count(now) == 0
    }

    /// Ends the owning scope. Unless the scheduler persists, every pending timer, fade, preview,
    /// pooled voice and loop slot is discarded.
    pub fn end_scope(&mut self) {
        if self.persist {
            debug!("Scope ended, keeping persistent scheduler state");
            return;
        }

        self.discard();
        info!("Scope ended, scheduler state discarded");
    }

    /// Discards everything regardless of persistence.
    pub fn shutdown(&mut self) {
        self.discard();
        info!("Scheduler shut down");
    }

    fn discard(&mut self) {
        self.timers.clear();
        for preview in self.previews.iter_mut() {
            preview.source.stop();
        }
        self.previews.clear();
        self.pool.clear();
        self.loops.clear();
    }

    fn start_one_shot(&mut self, definition: &AudioDefinition, spatial: Option<&SpatialRolloff>) {
        let Some(resolved) = definition.resolve(&mut *self.rng) else {
            trace!(definition = %definition, "Nothing resolved, skipping play");
            return;
        };

        let now = self.clock.now();
        let mut voice = match self.pool.acquire(now, self.backend.as_mut()) {
            Ok(voice) => voice,
            Err(e) => {
                warn!(err = %e, clip = resolved.clip.name(), "Unable to acquire voice");
                return;
            }
        };

        voice.setup(&resolved, definition.output(), spatial, now);
        voice.play();
        trace!(
            voice = voice.id(),
            clip = resolved.clip.name(),
            volume = resolved.volume,
            pitch = resolved.pitch,
            spatial = spatial.is_some(),
            "Playing"
        );
        self.pool.reinsert(voice);
    }

    fn start_looping(&mut self, definition: &AudioDefinition, fade: Duration, slot: SlotId) {
        let Some(resolved) = definition.resolve(&mut *self.rng) else {
            trace!(slot, definition = %definition, "Nothing resolved, skipping loop");
            return;
        };

        let now = self.clock.now();
        if let Err(e) = self.loops.play(
            slot,
            definition.output(),
            &resolved,
            fade,
            now,
            self.backend.as_mut(),
        ) {
            warn!(err = %e, slot, "Unable to create loop slot");
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("backend", &self.backend.to_string())
            .field("pool", &self.pool)
            .field("loops", &self.loops)
            .field("pending", &self.timers.len())
            .field("previews", &self.previews.len())
            .field("persist", &self.persist)
            .finish()
    }
}

/// Filters out definitions that can never play.
fn playable(definition: Option<&Arc<AudioDefinition>>) -> Option<&Arc<AudioDefinition>> {
    match definition {
        None => {
            trace!("No audio definition, nothing to play");
            None
        }
        Some(definition) if definition.is_empty() => {
            trace!("Audio definition has no specs, nothing to play");
            None
        }
        Some(definition) => Some(definition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock;
    use crate::clock::ManualClock;
    use crate::definition::AudioClipSpec;
    use crate::sampler::FieldSpec;
    use crate::spatial::{Anchor, Rolloff, Vec3};

    struct Fixture {
        scheduler: Scheduler,
        backend: mock::Backend,
        clock: ManualClock,
    }

    impl Fixture {
        fn new(config: SchedulerConfig) -> Fixture {
            let backend = mock::Backend::new("mock");
            let clock = ManualClock::new();
            let scheduler = Scheduler::new(
                &config.with_seed(42),
                Box::new(backend.clone()),
                Arc::new(clock.clone()),
            );
            Fixture {
                scheduler,
                backend,
                clock,
            }
        }

        fn with_pool(pool_size: usize) -> Fixture {
            Fixture::new(SchedulerConfig::new(pool_size))
        }

        fn advance_to(&mut self, millis: u64) {
            self.clock.set(Duration::from_millis(millis));
            self.scheduler.tick();
        }
    }

    fn definition(clip_millis: u64, volume: f32) -> Arc<AudioDefinition> {
        Arc::new(AudioDefinition::new(
            MixerGroup::new("sfx"),
            vec![
                AudioClipSpec::new(Some(Clip::new("hit.wav", Duration::from_millis(clip_millis))))
                    .with_volume(FieldSpec::Fixed { value: volume }),
            ],
        ))
    }

    #[test]
    fn test_quiet_failures_play_nothing() {
        let mut fixture = Fixture::with_pool(4);
        let empty = Arc::new(AudioDefinition::new(MixerGroup::master(), vec![]));
        let no_clip = Arc::new(AudioDefinition::new(
            MixerGroup::master(),
            vec![AudioClipSpec::new(None)],
        ));

        let scheduler = &mut fixture.scheduler;
        scheduler.play(None, None, Duration::ZERO);
        scheduler.play(Some(&empty), None, Duration::ZERO);
        scheduler.play(Some(&no_clip), None, Duration::ZERO);
        scheduler.play(Some(&no_clip), None, Duration::from_millis(100));
        scheduler.play_looping(None, Duration::ZERO, 1, Duration::ZERO);
        scheduler.play_looping(Some(&empty), Duration::ZERO, 1, Duration::ZERO);
        scheduler.play_looping(Some(&no_clip), Duration::ZERO, 1, Duration::ZERO);
        fixture.advance_to(200);

        assert_eq!(fixture.backend.total_plays(), 0);
        assert_eq!(fixture.backend.source_count(), 0);
        assert!(fixture.scheduler.pool().is_empty());
        assert!(fixture.scheduler.loops().is_empty());
    }

    #[test]
    fn test_zero_delay_plays_synchronously() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 0.8);

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);

        // No tick in between.
        assert_eq!(fixture.backend.total_plays(), 1);
        let source = fixture.backend.source(0).unwrap();
        assert!(source.playing);
        assert_eq!(source.volume, 0.8);
        assert_eq!(source.output, Some(MixerGroup::new("sfx")));
        assert_eq!(fixture.scheduler.pending(), 0);
    }

    #[test]
    fn test_delay_fires_only_after_elapsed() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 0.8);

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::from_millis(500));
        assert_eq!(fixture.scheduler.pending(), 1);
        assert_eq!(fixture.backend.total_plays(), 0);

        fixture.advance_to(0);
        fixture.advance_to(499);
        assert_eq!(fixture.backend.total_plays(), 0);

        fixture.advance_to(500);
        assert_eq!(fixture.backend.total_plays(), 1);
        assert_eq!(fixture.scheduler.pending(), 0);

        // The voice's end time counts from when it fired.
        let voice = fixture.scheduler.pool().iter().next().unwrap();
        assert_eq!(voice.end_time(), Duration::from_millis(1500));
    }

    #[test]
    fn test_three_plays_on_two_voices_steal_first() {
        let mut fixture = Fixture::with_pool(2);
        let definition = definition(1000, 1.0);

        for _ in 0..3 {
            fixture
                .scheduler
                .play(Some(&definition), None, Duration::ZERO);
        }

        assert_eq!(fixture.backend.source_count(), 2);
        assert_eq!(fixture.backend.total_plays(), 3);
        assert_eq!(fixture.backend.source(0).unwrap().play_count, 2);
        assert_eq!(fixture.backend.source(1).unwrap().play_count, 1);
        assert_eq!(fixture.scheduler.pool().len(), 2);
    }

    #[test]
    fn test_finished_voice_is_reused() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 1.0);

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        fixture.advance_to(1001);
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);

        assert_eq!(fixture.backend.source_count(), 1);
        assert_eq!(fixture.backend.total_plays(), 2);
    }

    #[test]
    fn test_crossfade_endpoints() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(30_000, 0.8);
        let fade = Duration::from_secs(2);

        fixture
            .scheduler
            .play_looping(Some(&definition), fade, 5, Duration::ZERO);
        fixture
            .scheduler
            .play_looping(Some(&definition), fade, 5, Duration::ZERO);
        assert!(!fixture.scheduler.is_idle());

        fixture.advance_to(1000);
        let levels = fixture.scheduler.loops().levels(5).unwrap();
        assert!((levels.audible - 0.4).abs() < 1e-6);

        fixture.advance_to(2000);
        let levels = fixture.scheduler.loops().levels(5).unwrap();
        assert_eq!(levels.audible, 0.8);
        assert_eq!(levels.previous, 0.0);

        // Loop voices never enter the pool.
        assert!(fixture.scheduler.pool().is_empty());
        assert_eq!(fixture.backend.source_count(), 2);
    }

    #[test]
    fn test_delayed_loop() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(30_000, 1.0);

        fixture.scheduler.play_looping(
            Some(&definition),
            Duration::ZERO,
            2,
            Duration::from_secs(1),
        );
        fixture.advance_to(999);
        assert!(!fixture.scheduler.loops().contains(2));

        fixture.advance_to(1000);
        assert_eq!(fixture.scheduler.loops().levels(2).unwrap().audible, 1.0);
    }

    #[test]
    fn test_parented_voice_follows_anchor() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(5000, 1.0);
        let anchor = Anchor::new(Vec3::new(1.0, 0.0, 0.0));
        let spatial = Rolloff::new(2.0, 20.0, 2)
            .with_offset(Vec3::new(0.0, 2.0, 0.0), Some(anchor.clone()));

        fixture
            .scheduler
            .play(Some(&definition), Some(spatial), Duration::ZERO);
        let source = fixture.backend.source(0).unwrap();
        assert_eq!(source.spatial_blend, 1.0);
        assert_eq!(source.position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(source.rolloff, Some(Rolloff::new(2.0, 20.0, 2).curve()));

        anchor.set_position(Vec3::new(5.0, 0.0, -1.0));
        fixture.advance_to(16);
        assert_eq!(
            fixture.backend.source(0).unwrap().position,
            Vec3::new(5.0, 2.0, -1.0)
        );
    }

    #[test]
    fn test_static_positional_voice() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(5000, 1.0);
        let spatial = Rolloff::default().with_offset(Vec3::new(3.0, 0.0, 4.0), None);

        fixture
            .scheduler
            .play(Some(&definition), Some(spatial), Duration::ZERO);
        fixture.advance_to(16);

        let source = fixture.backend.source(0).unwrap();
        assert_eq!(source.spatial_blend, 1.0);
        assert_eq!(source.position, Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn test_reuse_without_spatial_clears_follow() {
        let mut fixture = Fixture::with_pool(1);
        let definition = definition(1000, 1.0);
        let anchor = Anchor::new(Vec3::new(1.0, 1.0, 1.0));
        let spatial = Rolloff::default().with_offset(Vec3::ZERO, Some(anchor.clone()));

        fixture
            .scheduler
            .play(Some(&definition), Some(spatial), Duration::ZERO);
        fixture.advance_to(1001);
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);

        anchor.set_position(Vec3::new(9.0, 9.0, 9.0));
        fixture.advance_to(1017);

        let source = fixture.backend.source(0).unwrap();
        assert_eq!(fixture.backend.source_count(), 1);
        assert_eq!(source.spatial_blend, 0.0);
        assert_eq!(source.position, Vec3::ZERO);
        assert!(fixture.scheduler.pool().iter().all(|v| v.follow().is_none()));
    }

    #[test]
    fn test_backend_failure_is_contained() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 1.0);

        fixture.backend.fail_creates(true);
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        fixture
            .scheduler
            .play_looping(Some(&definition), Duration::ZERO, 1, Duration::ZERO);
        assert!(fixture.scheduler.pool().is_empty());
        assert!(fixture.scheduler.loops().is_empty());

        fixture.backend.fail_creates(false);
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        assert_eq!(fixture.scheduler.pool().len(), 1);
        assert_eq!(fixture.backend.total_plays(), 1);
    }

    #[test]
    fn test_preview_is_disposed_after_clip() {
        let mut fixture = Fixture::with_pool(4);
        let clip = Clip::new("test.wav", Duration::from_secs(1));

        fixture.scheduler.preview(None, 1.0, 1.0);
        assert_eq!(fixture.backend.source_count(), 0);

        fixture.scheduler.preview(Some(&clip), 1.5, 1.2);
        let source = fixture.backend.source(0).unwrap();
        assert!(source.playing);
        assert_eq!(source.volume, 1.0);
        assert_eq!(source.pitch, 1.2);
        assert!(fixture.scheduler.pool().is_empty());
        assert_eq!(fixture.scheduler.previews(), 1);

        fixture.advance_to(999);
        assert_eq!(fixture.scheduler.previews(), 1);

        fixture.advance_to(1000);
        assert_eq!(fixture.scheduler.previews(), 0);
        assert!(!fixture.backend.source(0).unwrap().playing);
    }

    #[test]
    fn test_end_scope_discards_everything() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 1.0);

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::from_secs(1));
        fixture
            .scheduler
            .play_looping(Some(&definition), Duration::from_secs(1), 3, Duration::ZERO);

        fixture.scheduler.end_scope();
        assert_eq!(fixture.scheduler.pending(), 0);
        assert!(fixture.scheduler.pool().is_empty());
        assert!(fixture.scheduler.loops().is_empty());
        assert!(fixture.scheduler.is_idle());

        // The discarded delayed play never fires.
        fixture.advance_to(2000);
        assert_eq!(fixture.backend.total_plays(), 2);
    }

    #[test]
    fn test_persistent_scope_survives() {
        let mut fixture = Fixture::new(SchedulerConfig::new(4).with_persist(true));
        let definition = definition(1000, 1.0);

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::from_secs(1));

        fixture.scheduler.end_scope();
        assert_eq!(fixture.scheduler.pool().len(), 1);
        assert_eq!(fixture.scheduler.pending(), 1);

        fixture.scheduler.shutdown();
        assert!(fixture.scheduler.pool().is_empty());
        assert_eq!(fixture.scheduler.pending(), 0);
    }

    #[test]
    fn test_extreme_delays_never_fire() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 1.0);
        fixture.clock.set(Duration::from_secs(1));

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::MAX);
        fixture.scheduler.play_looping(
            Some(&definition),
            Duration::from_secs(1),
            1,
            Duration::MAX,
        );
        assert_eq!(fixture.scheduler.pending(), 2);

        fixture.advance_to(1_000_000);
        assert_eq!(fixture.scheduler.pending(), 2);
        assert_eq!(fixture.backend.total_plays(), 0);
    }

    #[test]
    fn test_extreme_clip_lengths() {
        let mut fixture = Fixture::with_pool(1);
        let endless = Clip::new("endless.wav", Duration::MAX);
        let definition = Arc::new(AudioDefinition::new(
            MixerGroup::master(),
            vec![AudioClipSpec::new(Some(endless.clone()))],
        ));
        fixture.clock.set(Duration::from_secs(1));

        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        let voice = fixture.scheduler.pool().iter().next().unwrap();
        assert_eq!(voice.end_time(), Duration::MAX);

        // A full pool still steals the voice that will never finish.
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        assert_eq!(fixture.backend.source_count(), 1);
        assert_eq!(fixture.backend.total_plays(), 2);

        fixture.scheduler.preview(Some(&endless), 1.0, 1.0);
        fixture
            .scheduler
            .play_looping(Some(&definition), Duration::MAX, 3, Duration::ZERO);
        fixture.advance_to(1_000_000);
        assert_eq!(fixture.scheduler.previews(), 1);
        assert!(fixture.scheduler.loops().is_fading());
        assert!(!fixture.scheduler.is_idle());
    }

    #[test]
    fn test_idle_after_voices_finish() {
        let mut fixture = Fixture::with_pool(4);
        let definition = definition(1000, 1.0);

        assert!(fixture.scheduler.is_idle());
        fixture
            .scheduler
            .play(Some(&definition), None, Duration::ZERO);
        assert!(!fixture.scheduler.is_idle());

        fixture.advance_to(1001);
        assert!(fixture.scheduler.is_idle());
    }

    #[test]
    fn test_weighted_selection_through_scheduler() {
        let mut fixture = Fixture::with_pool(1);
        let definition = Arc::new(AudioDefinition::new(
            MixerGroup::master(),
            vec![
                AudioClipSpec::new(Some(Clip::new("never.wav", Duration::from_millis(1))))
                    .with_weight(0.0),
                AudioClipSpec::new(Some(Clip::new("always.wav", Duration::from_millis(1)))),
            ],
        ));

        for _ in 0..20 {
            fixture
                .scheduler
                .play(Some(&definition), None, Duration::ZERO);
            let source = fixture.backend.source(0).unwrap();
            assert_eq!(source.clip.unwrap().name(), "always.wav");
        }
    }
}
