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

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::backend::mock;
use crate::clock::{Clock, ManualClock};
use crate::config::SchedulerConfig;
use crate::definition::{AudioClipSpec, AudioDefinition, Clip, MixerGroup};
use crate::sampler::FieldSpec;
use crate::scheduler::Scheduler;

/// A single-clip definition with a fixed volume on the `sfx` group.
pub fn one_shot(name: &str, length_millis: u64, volume: f32) -> Arc<AudioDefinition> {
    Arc::new(AudioDefinition::new(
        MixerGroup::new("sfx"),
        vec![
            AudioClipSpec::new(Some(Clip::new(name, Duration::from_millis(length_millis))))
                .with_volume(FieldSpec::Fixed { value: volume }),
        ],
    ))
}

/// A seeded scheduler on a mock backend and a manual clock.
pub fn scheduler(pool_size: usize) -> (Scheduler, mock::Backend, ManualClock) {
    let clock = ManualClock::new();
    let (scheduler, backend) = scheduler_with_clock(pool_size, Arc::new(clock.clone()));
    (scheduler, backend, clock)
}

/// A seeded scheduler on a mock backend and the given clock.
pub fn scheduler_with_clock(
    pool_size: usize,
    clock: Arc<dyn Clock>,
) -> (Scheduler, mock::Backend) {
    let backend = mock::Backend::new("mock");
    let config = SchedulerConfig::new(pool_size).with_seed(7);
    let scheduler = Scheduler::new(&config, Box::new(backend.clone()), clock);
    (scheduler, backend)
}

/// Wait for the given async predicate to return true or fail.
#[inline]
pub async fn eventually_async<F, Fut>(mut predicate: F, error_msg: &str)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = SystemTime::now();
    let tick = Duration::from_millis(10);
    let timeout = Duration::from_secs(3);

    loop {
        let elapsed = start.elapsed();
        if elapsed.is_err() {
            panic!("System time error");
        }
        let elapsed = elapsed.unwrap();

        if elapsed > timeout {
            panic!("{}", error_msg);
        }
        if predicate().await {
            return;
        }
        tokio::time::sleep(tick).await;
    }
}
