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
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use super::controller::Controller;
use super::error::ConfigError;

/// Where the mixer loads the library manifest from.
pub enum ManifestSource {
    /// A manifest JSON file on disk.
    Path(PathBuf),
    /// A CDN endpoint serving the manifest.
    Cdn(String),
}

/// The configuration for the ambient mixer.
#[derive(Deserialize)]
pub struct Mixer {
    /// The path to a library manifest on disk.
    manifest: Option<String>,
    /// The CDN endpoint to fetch the library manifest from.
    cdn_endpoint: Option<String>,
    /// Whether to restrict the library to sounds with free segments.
    free_only: Option<bool>,
    /// The path to the preference file.
    pub preferences: String,
    /// The controller configuration.
    pub controller: Controller,
    /// The engine configuration.
    pub engine: Option<Engine>,
}

impl Mixer {
    /// Deserializes a file from the path into a mixer configuration struct.
    pub fn deserialize(path: &Path) -> Result<Mixer, Box<dyn Error>> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(ConfigError::Load)?
            .try_deserialize::<Mixer>()
            .map_err(ConfigError::Load)?)
    }

    /// Gets the manifest source. Exactly one of the manifest path and the
    /// CDN endpoint must be configured.
    pub fn manifest_source(&self) -> Result<ManifestSource, Box<dyn Error>> {
        match (&self.manifest, &self.cdn_endpoint) {
            (Some(manifest), None) => Ok(ManifestSource::Path(PathBuf::from(manifest))),
            (None, Some(endpoint)) => Ok(ManifestSource::Cdn(endpoint.clone())),
            (Some(_), Some(_)) => {
                Err("only one of manifest and cdn_endpoint may be configured".into())
            }
            (None, None) => Err("one of manifest and cdn_endpoint must be configured".into()),
        }
    }

    /// Returns true if the library should be restricted to sounds with at
    /// least one free segment. This is the default.
    pub fn free_only(&self) -> bool {
        self.free_only.unwrap_or(true)
    }
}

/// The configuration for the playback engine.
#[derive(Clone, Default, Deserialize)]
pub struct Engine {
    /// The seconds spent resolving a sound's stream before playback starts.
    buffering: Option<f64>,
    /// The nominal seconds of audio in a single streamed segment.
    segment_seconds: Option<f64>,
}

impl Engine {
    /// Creates a new engine configuration.
    pub fn new(buffering: Option<f64>, segment_seconds: Option<f64>) -> Engine {
        Engine {
            buffering,
            segment_seconds,
        }
    }

    /// Gets the stream resolution latency.
    pub fn buffering(&self) -> Duration {
        Duration::from_secs_f64(self.buffering.unwrap_or(0.5))
    }

    /// Gets the nominal duration of a single streamed segment.
    pub fn segment_duration(&self) -> Duration {
        Duration::from_secs_f64(self.segment_seconds.unwrap_or(30.0))
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{ManifestSource, Mixer};

    #[test]
    fn test_deserialize() -> Result<(), Box<dyn Error>> {
        let mixer = Mixer::deserialize(&PathBuf::from("assets/mixer.yaml"))?;

        assert!(matches!(
            mixer.manifest_source()?,
            ManifestSource::Path(path) if path == PathBuf::from("assets/library-manifest.json")
        ));
        assert!(mixer.free_only());
        assert_eq!("/tmp/atmo-preferences.json", mixer.preferences);

        let engine = mixer.engine.expect("engine config should be present");
        assert_eq!(Duration::from_millis(100), engine.buffering());
        assert_eq!(Duration::from_secs(1), engine.segment_duration());
        Ok(())
    }

    #[test]
    fn test_engine_defaults() {
        let engine = super::Engine::default();
        assert_eq!(Duration::from_millis(500), engine.buffering());
        assert_eq!(Duration::from_secs(30), engine.segment_duration());
    }

    #[test]
    fn test_manifest_source_validation() {
        let neither = Mixer {
            manifest: None,
            cdn_endpoint: None,
            free_only: None,
            preferences: "preferences.json".to_string(),
            controller: super::Controller::Keyboard,
            engine: None,
        };
        assert!(neither.manifest_source().is_err());

        let both = Mixer {
            manifest: Some("manifest.json".to_string()),
            cdn_endpoint: Some("https://cdn.example.test".to_string()),
            free_only: None,
            preferences: "preferences.json".to_string(),
            controller: super::Controller::Keyboard,
            engine: None,
        };
        assert!(both.manifest_source().is_err());
    }
}
