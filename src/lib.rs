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

//! A bounded voice-pool playback scheduler.
//!
//! Sounds are described by [`definition::AudioDefinition`]s whose clip, volume and pitch are
//! resolved fresh on every play. One-shots run on a fixed-size [`pool::VoicePool`] that steals
//! the voice nearest to finishing when full. Looping sounds crossfade within
//! [`loops::LoopSlotTable`] slots. The [`scheduler::Scheduler`] ties it together and is advanced
//! one tick at a time, usually by a [`driver::Driver`].

pub mod backend;
pub mod clock;
pub mod config;
pub mod definition;
pub mod driver;
pub mod follow;
pub mod library;
pub mod loops;
pub mod pool;
pub mod sampler;
pub mod scheduler;
pub mod spatial;
pub mod tasks;
#[cfg(test)]
mod testutil;
