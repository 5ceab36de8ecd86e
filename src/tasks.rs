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

//! Tick-polled tasks: volume ramps and one-shot timers.
//!
//! Nothing here sleeps or spawns. The owner polls each task once per tick with the current time.

use std::time::Duration;

/// A linear ramp from one value to another over a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
}

impl Ramp {
    pub fn new(from: f32, to: f32, start: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }

    /// The ramp's value at `now`. Once the duration has elapsed, the exact target is returned. A
    /// zero duration yields the target immediately.
    pub fn value_at(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.start);
        if elapsed >= self.duration {
            return self.to;
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }
}

struct Timer<T> {
    deadline: Duration,
    payload: T,
}

/// One-shot timers ordered by deadline. Timers with equal deadlines fire in scheduling order.
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Schedules a payload to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, payload: T) {
        let index = self
            .timers
            .iter()
            .position(|timer| timer.deadline > deadline)
            .unwrap_or(self.timers.len());
        self.timers.insert(index, Timer { deadline, payload });
    }

    /// Removes and returns every payload whose deadline is at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: Duration) -> Vec<T> {
        let due = self
            .timers
            .iter()
            .position(|timer| timer.deadline > now)
            .unwrap_or(self.timers.len());
        self.timers.drain(..due).map(|timer| timer.payload).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drops all pending timers without firing them.
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
