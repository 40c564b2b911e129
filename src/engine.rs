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
use std::{error::Error, fmt, sync::Arc};

use crate::config;
use crate::library::Sound;

pub mod simulated;

/// The aggregate state of a playback engine session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No sound is active. There is nothing to control.
    Idle,
    /// At least one sound is resolving its stream and none is playing yet.
    Buffering,
    /// At least one sound is playing.
    Playing,
    /// Playback is suspended for all sounds.
    Paused,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Buffering => write!(f, "buffering"),
            SessionState::Playing => write!(f, "playing"),
            SessionState::Paused => write!(f, "paused"),
        }
    }
}

/// The state of a single sound within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundState {
    /// The sound is not playing.
    Stopped,
    /// The sound is resolving its stream before playback.
    Buffering,
    /// The sound is playing.
    Playing,
    /// The sound is fading out before coming to a stop.
    Stopping,
}

impl fmt::Display for SoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundState::Stopped => write!(f, "stopped"),
            SoundState::Buffering => write!(f, "buffering"),
            SoundState::Playing => write!(f, "playing"),
            SoundState::Stopping => write!(f, "stopping"),
        }
    }
}

/// A playback engine session. The engine owns all audio resources; this
/// crate only issues commands and mirrors the state the engine reports.
/// Engine failures surface as state transitions (e.g. a sound reverting to
/// stopped), never as return values on the command paths.
pub trait Session: Send + Sync {
    /// Gets the aggregate state of the session.
    fn state(&self) -> SessionState;

    /// Gets the master volume in `[0, 1]`.
    fn master_volume(&self) -> f64;

    /// Sets the master volume.
    fn set_master_volume(&self, volume: f64);

    /// Resumes playback of all sounds.
    fn resume(&self);

    /// Suspends playback of all sounds.
    fn pause(&self);

    /// Stops all sounds.
    fn stop_all(&self);

    /// Sets the duration over which a starting sound ramps up.
    fn set_fade_in_seconds(&self, seconds: u64);

    /// Sets the duration over which a stopping sound ramps down.
    fn set_fade_out_seconds(&self, seconds: u64);

    /// Starts playing the given sound.
    fn play(&self, sound: Arc<Sound>);

    /// Stops the sound with the given id.
    fn stop(&self, id: &str);

    /// Gets the state of the sound with the given id. Sounds the session
    /// has never seen report as stopped.
    fn sound_state(&self, id: &str) -> SoundState;

    /// Gets the volume of the sound with the given id in `[0, 1]`.
    fn sound_volume(&self, id: &str) -> f64;

    /// Sets the volume of the sound with the given id.
    fn set_sound_volume(&self, id: &str, volume: f64);
}

/// Gets a session from the given engine configuration.
pub fn get_session(
    config: Option<config::mixer::Engine>,
) -> Result<Arc<dyn Session>, Box<dyn Error>> {
    Ok(Arc::new(simulated::Session::new(
        config.unwrap_or_default(),
    )))
}
