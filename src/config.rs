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

//! YAML configuration for the scheduler and the audio library.

use std::path::Path;
use std::time::Duration;

use duration_string::DurationString;
use tracing::info;

use crate::library::Library;

mod error;
mod library;
mod scheduler;

pub use self::error::ConfigError;
pub use self::library::{Audio, ClipRef, ClipSpec, LibraryFile, RolloffPreset};
pub use self::scheduler::SchedulerConfig;

/// Loads and validates an audio library file.
pub fn load_library(path: &Path) -> Result<Library, ConfigError> {
    let library = LibraryFile::deserialize(path)?.to_library()?;
    info!(
        path = %path.display(),
        audio = library.len(),
        rolloffs = library.rolloff_names().len(),
        "Loaded audio library"
    );
    Ok(library)
}

/// Parses a human duration string such as `350ms` or `2s`.
pub(crate) fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    match DurationString::from_string(value.to_string()) {
        Ok(duration) => Ok(duration.into()),
        Err(e) => Err(ConfigError::Duration {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
