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

//! Frame driver for the scheduler.
//!
//! Callers on any thread hold a [`SchedulerHandle`] and send fire-and-forget commands. The
//! [`Driver`] owns the scheduler, drains those commands in order and ticks the scheduler once
//! per frame.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::definition::{AudioDefinition, Clip};
use crate::loops::SlotId;
use crate::scheduler::Scheduler;
use crate::spatial::SpatialRolloff;

/// Shortest accepted frame interval.
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// A request for the scheduler.
pub enum Command {
    Play {
        definition: Option<Arc<AudioDefinition>>,
        spatial: Option<SpatialRolloff>,
        delay: Duration,
    },
    PlayLooping {
        definition: Option<Arc<AudioDefinition>>,
        fade: Duration,
        slot: SlotId,
        delay: Duration,
    },
    Preview {
        clip: Option<Clip>,
        volume: f32,
        pitch: f32,
    },
    EndScope,
}

/// A cloneable, thread-safe way to request playback. Nothing is returned and nothing blocks.
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: Sender<Command>,
}

impl SchedulerHandle {
    pub fn play(
        &self,
        definition: Option<Arc<AudioDefinition>>,
        spatial: Option<SpatialRolloff>,
        delay: Duration,
    ) {
        self.send(Command::Play {
            definition,
            spatial,
            delay,
        });
    }

    pub fn play_looping(
        &self,
        definition: Option<Arc<AudioDefinition>>,
        fade: Duration,
        slot: SlotId,
        delay: Duration,
    ) {
        self.send(Command::PlayLooping {
            definition,
            fade,
            slot,
            delay,
        });
    }

    pub fn preview(&self, clip: Option<Clip>, volume: f32, pitch: f32) {
        self.send(Command::Preview {
            clip,
            volume,
            pitch,
        });
    }

    pub fn end_scope(&self) {
        self.send(Command::EndScope);
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            trace!("Driver is gone, dropping command");
        }
    }
}

/// Owns the scheduler and advances it.
pub struct Driver {
    scheduler: Scheduler,
    rx: Receiver<Command>,
    frame_interval: Duration,
}

/// Wraps a scheduler in a driver and returns a handle for sending it commands.
pub fn channel(scheduler: Scheduler, frame_interval: Duration) -> (Driver, SchedulerHandle) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let driver = Driver {
        scheduler,
        rx,
        frame_interval: frame_interval.max(MIN_FRAME_INTERVAL),
    };
    (driver, SchedulerHandle { tx })
}

impl Driver {
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn into_scheduler(self) -> Scheduler {
        self.scheduler
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Runs every queued command in arrival order, then ticks once. Zero-delay commands
    /// therefore play before this pump's tick.
    pub fn pump(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            self.execute(command);
        }
        self.scheduler.tick();
    }

    /// Pumps once per frame until `duration` has elapsed. A duration past the end of time runs
    /// forever.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now().checked_add(duration);
        let mut interval = self.interval();
        loop {
            interval.tick().await;
            self.pump();
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
        }
    }

    /// Pumps once per frame until nothing is queued, pending or playing.
    pub async fn run_until_idle(&mut self) {
        let mut interval = self.interval();
        loop {
            interval.tick().await;
            self.pump();
            if self.rx.is_empty() && self.scheduler.is_idle() {
                debug!("Scheduler idle");
                break;
            }
        }
    }

    fn interval(&self) -> tokio::time::Interval {
        let mut interval = tokio::time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Play {
                definition,
                spatial,
                delay,
            } => self.scheduler.play(definition.as_ref(), spatial, delay),
            Command::PlayLooping {
                definition,
                fade,
                slot,
                delay,
            } => self
                .scheduler
                .play_looping(definition.as_ref(), fade, slot, delay),
            Command::Preview {
                clip,
                volume,
                pitch,
            } => self.scheduler.preview(clip.as_ref(), volume, pitch),
            Command::EndScope => self.scheduler.end_scope(),
        }
    }
}
