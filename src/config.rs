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
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::cdn;
use crate::engine;
use crate::library::Library;
use crate::mixer::Mixer;
use crate::preferences::FileStore;

use self::mixer::ManifestSource;

pub mod controller;
pub mod error;
pub mod manifest;
pub mod mixer;

/// Parses a sound library from a manifest JSON file on disk.
pub fn parse_manifest(file: &PathBuf) -> Result<Arc<Library>, Box<dyn Error>> {
    Ok(Arc::new(
        manifest::Manifest::deserialize(file)?.to_library()?,
    ))
}

/// Initializes the mixer and controller from the given config file and
/// returns the controller. The controller owns the mixer, which can be
/// waited on until it exits. Realistically, the controller is not expected
/// to exit.
pub async fn init_mixer_and_controller(
    config_path: &Path,
) -> Result<crate::controller::Controller, Box<dyn Error>> {
    let mixer_config = mixer::Mixer::deserialize(config_path)?;

    let library = match mixer_config.manifest_source()? {
        ManifestSource::Path(path) => parse_manifest(&path)?,
        ManifestSource::Cdn(endpoint) => cdn::Client::new(&endpoint).fetch_library().await?,
    };
    let library = if mixer_config.free_only() {
        Arc::new(library.free_only())
    } else {
        library
    };
    info!(sounds = library.len(), "Loaded sound library.");

    let session = engine::get_session(mixer_config.engine.clone())?;
    let preferences = Arc::new(FileStore::new(&PathBuf::from(&mixer_config.preferences))?);
    let mixer = Mixer::new(library, session, preferences);

    let controller = crate::controller::Controller::new(mixer, mixer_config.controller.driver())?;
    Ok(controller)
}
