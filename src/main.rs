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
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{crate_version, Parser, Subcommand};
use duration_string::DurationString;
use tracing::info;

use voicepool::backend;
use voicepool::clock::SystemClock;
use voicepool::config::{self, ConfigError, LibraryFile, SchedulerConfig};
use voicepool::definition::{AudioDefinition, Clip};
use voicepool::driver::{self, Driver, SchedulerHandle};
use voicepool::library::Library;
use voicepool::sampler::Weighted;
use voicepool::scheduler::Scheduler;
use voicepool::spatial::Vec3;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A bounded voice-pool playback scheduler."
)]
struct Cli {
    /// The path to the scheduler config. Defaults are used when unset.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists and verifies all definitions in an audio library.
    Library {
        /// The path to the library file.
        path: String,
    },
    /// Rewrites an audio library in normalized form.
    Normalize {
        /// The path to the library file.
        path: String,
        /// Where to write the normalized library.
        output: String,
    },
    /// Plays a definition from an audio library.
    Play {
        /// The path to the library file.
        library: String,
        /// The name of the definition to play.
        name: String,
        /// How many times to play it.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Delay before each play, e.g. 250ms.
        #[arg(short, long)]
        delay: Option<String>,
        /// A rolloff preset from the library. Plays spatialized when set.
        #[arg(short, long)]
        rolloff: Option<String>,
        /// The position for spatialized playback, in the form x,y,z.
        #[arg(short, long)]
        position: Option<String>,
    },
    /// Crossfades a loop slot through one or more definitions.
    Loop {
        /// The path to the library file.
        library: String,
        /// The definitions to crossfade through, in order.
        names: Vec<String>,
        /// The loop slot to use.
        #[arg(short, long, default_value_t = 0)]
        slot: u32,
        /// The crossfade duration, e.g. 2s.
        #[arg(short, long, default_value = "1s")]
        fade: String,
    },
    /// Plays a single clip outside the pool.
    Preview {
        /// The clip name.
        clip: String,
        /// The clip length, e.g. 1500ms.
        length: String,
        #[arg(short, long, default_value_t = 1.0)]
        volume: f32,
        #[arg(short, long, default_value_t = 1.0)]
        pitch: f32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Library { path } => {
            let library = config::load_library(&PathBuf::from(&path))?;

            if library.is_empty() {
                println!("No audio definitions found in {}.", path);
                return Ok(());
            }

            println!("Audio definitions (count: {}):", library.len());
            for name in library.names() {
                if let Some(definition) = library.get(name) {
                    println!("- {}: {}", name, definition);
                    for spec in definition.specs() {
                        match spec.clip() {
                            Some(clip) => println!("  - {} (weight: {})", clip, spec.weight()),
                            None => println!("  - <no clip> (weight: {})", spec.weight()),
                        }
                    }
                }
            }

            let rolloffs = library.rolloff_names();
            if !rolloffs.is_empty() {
                println!("Rolloff presets (count: {}):", rolloffs.len());
                for name in rolloffs {
                    if let Some(rolloff) = library.rolloff(name) {
                        println!(
                            "- {}: range {}..{}, power {}",
                            name,
                            rolloff.min_distance(),
                            rolloff.max_distance(),
                            rolloff.power()
                        );
                    }
                }
            }
        }
        Commands::Normalize { path, output } => {
            let file = LibraryFile::deserialize(&PathBuf::from(&path))?;
            file.to_library()?;
            file.save(&PathBuf::from(&output))?;
        }
        Commands::Play {
            library,
            name,
            count,
            delay,
            rolloff,
            position,
        } => {
            let library = config::load_library(&PathBuf::from(&library))?;
            let definition = lookup(&library, &name)?;
            let delay = match delay {
                Some(delay) => DurationString::from_string(delay)?.into(),
                None => Duration::ZERO,
            };
            let spatial = match rolloff {
                Some(rolloff) => {
                    let preset = library
                        .rolloff(&rolloff)
                        .ok_or_else(|| ConfigError::Missing(format!("rolloff {}", rolloff)))?;
                    let position = match position {
                        Some(position) => parse_position(&position)?,
                        None => Vec3::ZERO,
                    };
                    Some(preset.with_offset(position, None))
                }
                None => None,
            };

            let (mut driver, handle) = start_driver(cli.config)?;
            for _ in 0..count {
                handle.play(Some(definition.clone()), spatial.clone(), delay);
            }
            driver.run_until_idle().await;
            finish(driver);
        }
        Commands::Loop {
            library,
            names,
            slot,
            fade,
        } => {
            let library = config::load_library(&PathBuf::from(&library))?;
            let fade: Duration = DurationString::from_string(fade)?.into();
            let definitions = names
                .iter()
                .map(|name| lookup(&library, name))
                .collect::<Result<Vec<_>, _>>()?;

            let (mut driver, handle) = start_driver(cli.config)?;
            for definition in definitions {
                handle.play_looping(Some(definition), fade, slot, Duration::ZERO);
                driver.run_for(fade).await;
                if let Some(levels) = driver.scheduler().loops().levels(slot) {
                    info!(
                        slot,
                        audible = levels.audible,
                        previous = levels.previous,
                        "Crossfade complete"
                    );
                }
            }
            finish(driver);
        }
        Commands::Preview {
            clip,
            length,
            volume,
            pitch,
        } => {
            let length: Duration = DurationString::from_string(length)?.into();
            let (mut driver, handle) = start_driver(cli.config)?;
            handle.preview(Some(Clip::new(clip, length)), volume, pitch);
            driver.run_until_idle().await;
            finish(driver);
        }
    }

    Ok(())
}

/// Builds a scheduler from the optional config path and wraps it in a driver.
fn start_driver(config: Option<String>) -> Result<(Driver, SchedulerHandle), Box<dyn Error>> {
    let config = match config {
        Some(path) => SchedulerConfig::deserialize(&PathBuf::from(path))?,
        None => SchedulerConfig::default(),
    };
    let backend = backend::get_backend(config.backend())?;
    let scheduler = Scheduler::new(&config, backend, Arc::new(SystemClock::new()));
    Ok(driver::channel(scheduler, config.frame_interval()?))
}

fn finish(driver: Driver) {
    let mut scheduler = driver.into_scheduler();
    println!(
        "Done: {} pooled voice(s), {} loop slot(s).",
        scheduler.pool().len(),
        scheduler.loops().len()
    );
    scheduler.shutdown();
}

fn lookup(library: &Library, name: &str) -> Result<Arc<AudioDefinition>, ConfigError> {
    library
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigError::Missing(format!("audio definition {}", name)))
}

/// Parses a position in the form x,y,z.
fn parse_position(position: &str) -> Result<Vec3, Box<dyn Error>> {
    let parts = position
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()?;
    match parts.as_slice() {
        &[x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("malformed position '{}', expected x,y,z", position).into()),
    }
}
