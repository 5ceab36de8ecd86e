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
use std::sync::Arc;

use crate::definition::AudioDefinition;
use crate::spatial::Rolloff;

/// Named audio definitions and rolloff presets.
#[derive(Clone, Debug, Default)]
pub struct Library {
    audio: HashMap<String, Arc<AudioDefinition>>,
    rolloffs: HashMap<String, Rolloff>,
}

impl Library {
    pub fn new(
        audio: HashMap<String, Arc<AudioDefinition>>,
        rolloffs: HashMap<String, Rolloff>,
    ) -> Library {
        Library { audio, rolloffs }
    }

    /// Gets a definition by name. The result can be handed straight to
    /// [`crate::scheduler::Scheduler::play`], so an unknown name plays nothing.
    pub fn get(&self, name: &str) -> Option<&Arc<AudioDefinition>> {
        self.audio.get(name)
    }

    pub fn rolloff(&self, name: &str) -> Option<&Rolloff> {
        self.rolloffs.get(name)
    }

    /// Definition names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.audio.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Rolloff preset names in sorted order.
    pub fn rolloff_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rolloffs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}
