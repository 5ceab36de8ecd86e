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

//! Keeps parented voices attached to their moving origin.

use crate::pool::VoicePool;
use crate::spatial::{Anchor, Vec3};

/// A follow target: a moving parent plus a fixed offset from it.
#[derive(Clone, Debug)]
pub struct Follow {
    anchor: Anchor,
    offset: Vec3,
}

impl Follow {
    pub fn new(anchor: Anchor, offset: Vec3) -> Self {
        Self { anchor, offset }
    }

    /// The parent's current position plus the offset.
    pub fn position(&self) -> Vec3 {
        self.anchor.position() + self.offset
    }
}

/// Runs once per tick: moves every pooled voice that has a follow target. Non-positional and
/// static positional voices are not touched.
pub fn update_positions(pool: &mut VoicePool) {
    for voice in pool.iter_mut() {
        voice.update_position();
    }
}
