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
use clap::{crate_version, Parser, Subcommand};
use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use atmo::catalogue::Catalogue;
use atmo::{cdn, config, engine, spdx, util};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "An ambient sound mixer."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists and verifies all sounds in the given library manifest.
    Sounds {
        /// The path to the library manifest on disk.
        manifest: String,
    },
    /// Searches the library for sounds matching a query.
    Search {
        /// The path to the library manifest on disk.
        manifest: String,
        /// The search query. Matches sound names, group names and tags.
        query: String,
    },
    /// Shows playback details and source attributions for a sound.
    Info {
        /// The path to the library manifest on disk.
        manifest: String,
        /// The id of the sound.
        sound: String,
    },
    /// Fetches the library manifest from a CDN and prints a summary.
    Fetch {
        /// The CDN endpoint to fetch the manifest from.
        #[arg(short, long)]
        endpoint: Option<String>,
    },
    /// Plays one or more sounds until interrupted.
    Play {
        /// The path to the library manifest on disk.
        manifest: String,
        /// The sounds to play. Entries may carry a volume, e.g. rain=0.4.
        sounds: Vec<String>,
    },
    /// Start will start the ambient mixer.
    Start {
        /// The path to the mixer config.
        config_path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sounds { manifest } => {
            let library = config::parse_manifest(&PathBuf::from(&manifest))?;

            if library.is_empty() {
                println!("No sounds found in {}.", manifest.as_str());
                return Ok(());
            }

            println!("{}", Catalogue::new(&library));

            // Record all of the tags found in the library. Sort the tags so
            // that the output is consistent.
            let mut all_tags: BTreeSet<String> = BTreeSet::new();
            for sound in library.list() {
                for tag in sound.tags() {
                    all_tags.insert(tag.clone());
                }
            }

            println!("Tags (count: {}):", all_tags.len());
            for tag in all_tags.iter() {
                println!("- {}", tag)
            }
        }
        Commands::Search { manifest, query } => {
            let library = config::parse_manifest(&PathBuf::from(&manifest))?;

            let filtered = Catalogue::new(&library).filter(&query);
            if filtered.is_empty() {
                println!("No sounds match '{}'.", query);
            } else {
                println!("{}", filtered);
            }
        }
        Commands::Info { manifest, sound } => {
            let library = config::parse_manifest(&PathBuf::from(&manifest))?;
            let sound = library.get(&sound)?;

            println!("{}", sound);

            if sound.is_seamless() {
                println!("\nThis sound plays seamlessly.");
            } else {
                println!(
                    "\nThis sound repeats once every {}.",
                    util::format_seconds(sound.max_silence().as_secs())
                );
            }

            println!("\nStreams:");
            for segment in sound.segments() {
                let access = if segment.is_free() {
                    ""
                } else {
                    " (subscription)"
                };
                println!("- {}{}", sound.stream_url(segment), access);
            }

            println!("\nMedia sources:");
            for source in sound.sources() {
                let license = spdx::lookup(source.license())?;
                match source.author() {
                    Some(author) => println!(
                        "- {} ({}) by {} ({})",
                        source.name(),
                        source.url(),
                        author.name(),
                        author.url()
                    ),
                    None => println!("- {} ({})", source.name(), source.url()),
                }
                println!("  License: {} ({})", license.name, license.url);
            }
        }
        Commands::Fetch { endpoint } => {
            let client = cdn::Client::new(endpoint.as_deref().unwrap_or(cdn::DEFAULT_ENDPOINT));
            let manifest = client.fetch_manifest().await?;

            println!("Manifest from {}:", client.manifest_url());
            println!("- Updated At: {} (UNIX ms)", manifest.updated_at());
            println!("- Groups: {}", manifest.groups().len());
            println!("- Tags: {}", manifest.tags().len());
            println!("- Sounds: {}", manifest.sounds().len());
        }
        Commands::Play { manifest, sounds } => {
            if sounds.is_empty() {
                return Err("no sounds given to play".into());
            }

            let library = config::parse_manifest(&PathBuf::from(&manifest))?;
            let session = engine::get_session(None)?;

            for entry in sounds.iter() {
                let (id, volume) = match entry.split_once('=') {
                    Some((id, volume)) => (id, Some(volume.parse::<f64>()?)),
                    None => (entry.as_str(), None),
                };

                session.play(library.get(id)?);
                if let Some(volume) = volume {
                    session.set_sound_volume(id, volume.clamp(0.0, 1.0));
                }
            }

            println!("Playing. Press Ctrl-C to stop.");
            tokio::signal::ctrl_c().await?;

            session.stop_all();
            while session.state() != engine::SessionState::Idle {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
        Commands::Start { config_path } => {
            config::init_mixer_and_controller(&PathBuf::from(config_path))
                .await?
                .join()
                .await?;
        }
    }

    Ok(())
}
