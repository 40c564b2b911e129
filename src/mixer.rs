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
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{info, span, warn, Level, Span};

use crate::catalogue::Catalogue;
use crate::engine::{self, SessionState, SoundState};
use crate::library::Library;
use crate::preferences::{self, DEFAULT_FADE_SECONDS, FADE_IN_SECONDS, FADE_OUT_SECONDS};

/// The upper bound for the fade duration preferences, in seconds.
const MAX_FADE_SECONDS: u64 = 30;

/// The three-way icon bucket for a volume level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    High,
}

/// Maps a volume to the icon bucket shown next to a volume control. This is
/// a threshold mapping, not a continuous scale: zero is muted, anything
/// below half is low, the rest is high.
pub fn volume_level(volume: f64) -> VolumeLevel {
    if volume <= 0.0 {
        VolumeLevel::Muted
    } else if volume < 0.5 {
        VolumeLevel::Low
    } else {
        VolumeLevel::High
    }
}

/// Adapts user intent to a playback engine session and mirrors the state
/// the session reports. The mixer performs no error handling of its own:
/// engine failures are observed passively through sound states.
pub struct Mixer {
    /// The sound library the mixer plays from.
    library: Arc<Library>,
    /// The playback engine session.
    session: Arc<dyn engine::Session>,
    /// The preference store backing the fade durations.
    preferences: Arc<dyn preferences::Store>,
    /// The logging span.
    span: Span,
}

impl Mixer {
    /// Creates a new mixer. The persisted fade durations are pushed to the
    /// session immediately so that the preference store and the engine
    /// agree from the start.
    pub fn new(
        library: Arc<Library>,
        session: Arc<dyn engine::Session>,
        preferences: Arc<dyn preferences::Store>,
    ) -> Mixer {
        let mixer = Mixer {
            library,
            session,
            preferences,
            span: span!(Level::INFO, "mixer"),
        };

        let fade_in = mixer.clamped_preference(FADE_IN_SECONDS);
        let fade_out = mixer.clamped_preference(FADE_OUT_SECONDS);
        mixer.session.set_fade_in_seconds(fade_in);
        mixer.session.set_fade_out_seconds(fade_out);

        mixer
    }

    /// Reads a fade preference, clamping values outside the valid range.
    /// The file is user-editable, so out-of-range values are tolerated on
    /// load but rejected on set.
    fn clamped_preference(&self, key: &str) -> u64 {
        let value = self.preferences.get(key, DEFAULT_FADE_SECONDS);
        if value > MAX_FADE_SECONDS {
            warn!(
                key = key,
                value = value,
                "Persisted fade duration is out of range, clamping."
            );
            return MAX_FADE_SECONDS;
        }
        value
    }

    /// Gets the library the mixer plays from.
    pub fn library(&self) -> Arc<Library> {
        Arc::clone(&self.library)
    }

    /// Builds the grouped catalogue view of the mixer's library.
    pub fn catalogue(&self) -> Catalogue {
        Catalogue::new(&self.library)
    }

    /// Gets the aggregate session state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Gets the state of a single sound.
    pub fn sound_state(&self, id: &str) -> SoundState {
        self.session.sound_state(id)
    }

    /// Gets the volume of a single sound.
    pub fn sound_volume(&self, id: &str) -> f64 {
        self.session.sound_volume(id)
    }

    /// Gets the master volume.
    pub fn master_volume(&self) -> f64 {
        self.session.master_volume()
    }

    /// Toggles playback of the given sound: a stopped or stopping sound is
    /// started, anything else is stopped. This mirrors the single
    /// play/stop control a sound exposes.
    pub fn toggle(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let _enter = self.span.enter();

        let sound = self.library.get(id)?;
        match self.session.sound_state(id) {
            SoundState::Stopped | SoundState::Stopping => {
                info!(sound = id, "Starting sound.");
                self.session.play(sound);
            }
            _ => {
                info!(sound = id, "Stopping sound.");
                self.session.stop(id);
            }
        }

        Ok(())
    }

    /// Stops the given sound.
    pub fn stop(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let _enter = self.span.enter();

        self.library.get(id)?;
        self.session.stop(id);
        Ok(())
    }

    /// Sets the volume of the given sound. The volume is clamped to `[0, 1]`.
    pub fn set_volume(&self, id: &str, volume: f64) -> Result<(), Box<dyn Error>> {
        self.library.get(id)?;
        self.session.set_sound_volume(id, volume.clamp(0.0, 1.0));
        Ok(())
    }

    /// Resumes playback of all sounds. No-op while the session is idle.
    pub fn resume(&self) {
        let _enter = self.span.enter();

        if self.session.state() == SessionState::Idle {
            info!("Session is idle, nothing to resume.");
            return;
        }
        self.session.resume();
    }

    /// Pauses playback of all sounds. No-op while the session is idle.
    pub fn pause(&self) {
        let _enter = self.span.enter();

        if self.session.state() == SessionState::Idle {
            info!("Session is idle, nothing to pause.");
            return;
        }
        self.session.pause();
    }

    /// Stops all sounds. No-op while the session is idle.
    pub fn stop_all(&self) {
        let _enter = self.span.enter();

        if self.session.state() == SessionState::Idle {
            info!("Session is idle, nothing to stop.");
            return;
        }
        self.session.stop_all();
    }

    /// Sets the master volume. The volume is clamped to `[0, 1]`.
    pub fn set_master_volume(&self, volume: f64) {
        self.session.set_master_volume(volume.clamp(0.0, 1.0));
    }

    /// Sets the fade-in duration preference. The value is persisted and
    /// then pushed to the engine session; the two must never diverge.
    pub fn set_fade_in_seconds(&self, seconds: u64) -> Result<(), Box<dyn Error>> {
        Mixer::validate_fade(seconds)?;
        self.preferences.set(FADE_IN_SECONDS, seconds)?;
        self.session.set_fade_in_seconds(seconds);
        Ok(())
    }

    /// Sets the fade-out duration preference. The value is persisted and
    /// then pushed to the engine session; the two must never diverge.
    pub fn set_fade_out_seconds(&self, seconds: u64) -> Result<(), Box<dyn Error>> {
        Mixer::validate_fade(seconds)?;
        self.preferences.set(FADE_OUT_SECONDS, seconds)?;
        self.session.set_fade_out_seconds(seconds);
        Ok(())
    }

    fn validate_fade(seconds: u64) -> Result<(), Box<dyn Error>> {
        if seconds > MAX_FADE_SECONDS {
            return Err(format!(
                "fade duration must be between 0 and {} seconds, got {}",
                MAX_FADE_SECONDS, seconds
            )
            .into());
        }
        Ok(())
    }

    /// Renders a status summary of the session and all non-stopped sounds.
    pub fn status(&self) -> String {
        let mut status = format!(
            "Session: {} (master volume: {:.2})",
            self.session.state(),
            self.session.master_volume()
        );

        for sound in self.library.sorted_list() {
            let state = self.session.sound_state(sound.id());
            if state == SoundState::Stopped {
                continue;
            }

            let volume = self.session.sound_volume(sound.id());
            let _ = write!(
                status,
                "\n  - {} ({}): {}, volume {:.2} ({:?})",
                sound.name(),
                sound.id(),
                state,
                volume,
                volume_level(volume),
            );
        }

        status
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::config;
    use crate::engine::{simulated, SessionState, SoundState};
    use crate::preferences::{
        FileStore, Store, DEFAULT_FADE_SECONDS, FADE_IN_SECONDS, FADE_OUT_SECONDS,
    };
    use crate::test::test::eventually;

    use super::{volume_level, Mixer, VolumeLevel};

    fn mixer() -> Result<(Mixer, Arc<simulated::Session>, Arc<FileStore>, tempfile::TempDir), Box<dyn Error>>
    {
        let library = config::parse_manifest(&PathBuf::from("assets/library-manifest.json"))?;
        let session = Arc::new(simulated::Session::new(config::mixer::Engine::new(
            Some(0.02),
            Some(0.05),
        )));
        let dir = tempfile::tempdir()?;
        let store = Arc::new(FileStore::new(&dir.path().join("preferences.json"))?);
        let mixer = Mixer::new(library, session.clone(), store.clone());
        Ok((mixer, session, store, dir))
    }

    #[test]
    fn test_volume_level_thresholds() {
        assert_eq!(VolumeLevel::Muted, volume_level(0.0));
        assert_eq!(VolumeLevel::Low, volume_level(0.01));
        assert_eq!(VolumeLevel::Low, volume_level(0.49));
        assert_eq!(VolumeLevel::High, volume_level(0.5));
        assert_eq!(VolumeLevel::High, volume_level(1.0));
    }

    #[test]
    fn test_new_pushes_persisted_fades() -> Result<(), Box<dyn Error>> {
        let (_mixer, session, store, _dir) = mixer()?;

        // Defaults flow into the engine on construction.
        assert_eq!(DEFAULT_FADE_SECONDS, session.fade_in_seconds());
        assert_eq!(DEFAULT_FADE_SECONDS, session.fade_out_seconds());
        assert_eq!(
            DEFAULT_FADE_SECONDS,
            store.get(FADE_IN_SECONDS, DEFAULT_FADE_SECONDS)
        );
        Ok(())
    }

    #[test]
    fn test_set_fade_updates_store_and_session() -> Result<(), Box<dyn Error>> {
        let (mixer, session, store, _dir) = mixer()?;

        for seconds in [0, 1, 15, 30] {
            mixer.set_fade_in_seconds(seconds)?;
            assert_eq!(seconds, store.get(FADE_IN_SECONDS, DEFAULT_FADE_SECONDS));
            assert_eq!(seconds, session.fade_in_seconds());
        }

        mixer.set_fade_out_seconds(7)?;
        assert_eq!(7, store.get(FADE_OUT_SECONDS, DEFAULT_FADE_SECONDS));
        assert_eq!(7, session.fade_out_seconds());

        // Out-of-range values are rejected and change nothing.
        assert!(mixer.set_fade_in_seconds(31).is_err());
        assert_eq!(30, store.get(FADE_IN_SECONDS, DEFAULT_FADE_SECONDS));
        assert_eq!(30, session.fade_in_seconds());
        Ok(())
    }

    #[test]
    fn test_toggle() -> Result<(), Box<dyn Error>> {
        let (mixer, _session, _store, _dir) = mixer()?;
        mixer.set_fade_out_seconds(0)?;

        // A stopped sound starts.
        mixer.toggle("rain")?;
        eventually(
            || mixer.sound_state("rain") == SoundState::Playing,
            "Rain never started playing",
        );

        // A playing sound stops.
        mixer.toggle("rain")?;
        eventually(
            || mixer.sound_state("rain") == SoundState::Stopped,
            "Rain never stopped",
        );

        // Unknown sounds are a lookup error.
        assert!(mixer.toggle("lava").is_err());
        Ok(())
    }

    #[test]
    fn test_global_controls_inert_while_idle() -> Result<(), Box<dyn Error>> {
        let (mixer, _session, _store, _dir) = mixer()?;
        mixer.set_fade_out_seconds(0)?;

        assert_eq!(SessionState::Idle, mixer.state());

        // Pausing an idle session leaves it idle.
        mixer.pause();
        assert_eq!(SessionState::Idle, mixer.state());
        mixer.resume();
        mixer.stop_all();
        assert_eq!(SessionState::Idle, mixer.state());

        // Once a sound plays, the global controls are live.
        mixer.toggle("campfire")?;
        eventually(
            || mixer.state() == SessionState::Playing,
            "Session never started playing",
        );
        mixer.pause();
        assert_eq!(SessionState::Paused, mixer.state());
        mixer.resume();
        assert_eq!(SessionState::Playing, mixer.state());

        mixer.stop_all();
        eventually(|| mixer.state() == SessionState::Idle, "Session never idled");
        Ok(())
    }

    #[test]
    fn test_volume_clamping() -> Result<(), Box<dyn Error>> {
        let (mixer, _session, _store, _dir) = mixer()?;
        mixer.set_fade_out_seconds(0)?;

        mixer.toggle("rain")?;
        eventually(
            || mixer.sound_state("rain") == SoundState::Playing,
            "Rain never started playing",
        );

        mixer.set_volume("rain", 1.5)?;
        assert_eq!(1.0, mixer.sound_volume("rain"));
        mixer.set_volume("rain", -0.5)?;
        assert_eq!(0.0, mixer.sound_volume("rain"));
        mixer.set_volume("rain", 0.25)?;
        assert_eq!(0.25, mixer.sound_volume("rain"));

        mixer.set_master_volume(2.0);
        assert_eq!(1.0, mixer.master_volume());

        assert!(mixer.set_volume("lava", 0.5).is_err());
        Ok(())
    }
}
