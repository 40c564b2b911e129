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
use std::{
    cmp,
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    thread,
    time::Duration,
};

use rand::Rng;
use tracing::{debug, info, span, warn, Level, Span};

use crate::{config, library::Sound, playsync::CancelHandle};

use super::{SessionState, SoundState};

/// The slice size for interruptible waits. Pausing and cancellation are
/// observed at this granularity.
const TICK: Duration = Duration::from_millis(10);

/// A player entry for a single active sound.
struct Player {
    /// The reported state of the sound.
    state: Arc<RwLock<SoundState>>,
    /// The volume of the sound.
    volume: Arc<RwLock<f64>>,
    /// Cancels the worker for this sound.
    cancel: CancelHandle,
}

/// A playback engine session that honors the engine contract without
/// touching an audio device. Segment playlists are resolved to their URLs
/// and playback time passes as timed waits: sounds buffer for a configured
/// resolve latency, cycle through their free segments, insert a random
/// silence between repeats of non-seamless sounds, and fade out over the
/// configured duration when stopped.
pub struct Session {
    /// How long a sound buffers before it starts playing.
    buffering: Duration,
    /// The nominal duration of a single streamed segment.
    segment_duration: Duration,
    /// The master volume of the session.
    master_volume: RwLock<f64>,
    /// Whether playback is suspended.
    paused: Arc<AtomicBool>,
    /// The duration over which a starting sound ramps up.
    fade_in: RwLock<Duration>,
    /// The duration over which a stopping sound ramps down.
    fade_out: Arc<RwLock<Duration>>,
    /// The active sound players, keyed by sound id.
    sounds: Arc<RwLock<HashMap<String, Player>>>,
    /// The logging span.
    span: Span,
}

impl Session {
    /// Creates a new simulated session from the given engine configuration.
    pub fn new(config: config::mixer::Engine) -> Session {
        Session {
            buffering: config.buffering(),
            segment_duration: config.segment_duration(),
            master_volume: RwLock::new(1.0),
            paused: Arc::new(AtomicBool::new(false)),
            fade_in: RwLock::new(Duration::from_secs(
                crate::preferences::DEFAULT_FADE_SECONDS,
            )),
            fade_out: Arc::new(RwLock::new(Duration::from_secs(
                crate::preferences::DEFAULT_FADE_SECONDS,
            ))),
            sounds: Arc::new(RwLock::new(HashMap::new())),
            span: span!(Level::INFO, "engine (simulated)"),
        }
    }

    /// Runs the playback loop for a single sound until cancellation.
    fn run(
        sound: Arc<Sound>,
        state: Arc<RwLock<SoundState>>,
        paused: Arc<AtomicBool>,
        cancel: CancelHandle,
        buffering: Duration,
        segment_duration: Duration,
        fade_out: Arc<RwLock<Duration>>,
    ) {
        let span = span!(Level::INFO, "engine worker", sound = sound.id());
        let _enter = span.enter();

        let segments = sound.free_segments();
        if segments.is_empty() {
            // The stream cannot be resolved. The failure is reported as a
            // state transition back to stopped, not as an error.
            warn!(sound = sound.id(), "Sound has no free segments.");
            *state.write().expect("Error getting lock") = SoundState::Stopped;
            return;
        }

        if cancel.wait_for(buffering) {
            // Stopped before playback started, there is nothing to fade.
            *state.write().expect("Error getting lock") = SoundState::Stopped;
            return;
        }

        *state.write().expect("Error getting lock") = SoundState::Playing;
        info!(sound = sound.id(), "Playing sound.");

        'playback: loop {
            for segment in segments.iter() {
                debug!(url = sound.stream_url(segment), "Streaming segment.");
                if Session::sleep(&cancel, &paused, segment_duration) {
                    break 'playback;
                }
            }

            if !sound.is_seamless() {
                let silence = Duration::from_secs(
                    rand::thread_rng().gen_range(0..=sound.max_silence().as_secs()),
                );
                debug!(
                    sound = sound.id(),
                    silence = format!("{:?}", silence),
                    "Inserting silence between repeats."
                );
                if Session::sleep(&cancel, &paused, silence) {
                    break 'playback;
                }
            }
        }

        let fade_out = *fade_out.read().expect("Error getting lock");
        *state.write().expect("Error getting lock") = SoundState::Stopping;
        info!(
            sound = sound.id(),
            fade_out = format!("{:?}", fade_out),
            "Stopping sound."
        );
        thread::sleep(fade_out);

        *state.write().expect("Error getting lock") = SoundState::Stopped;
        info!(sound = sound.id(), "Sound stopped.");
    }

    /// Sleeps for the given duration in slices, not advancing while the
    /// session is paused. Returns true if the wait was cancelled.
    fn sleep(cancel: &CancelHandle, paused: &AtomicBool, duration: Duration) -> bool {
        let mut remaining = duration;
        while !remaining.is_zero() {
            let tick = cmp::min(TICK, remaining);
            if cancel.wait_for(tick) {
                return true;
            }
            if !paused.load(Ordering::Relaxed) {
                remaining = remaining.saturating_sub(tick);
            }
        }

        false
    }

    /// Gets the fade-in duration currently configured on the session.
    #[cfg(test)]
    pub fn fade_in_seconds(&self) -> u64 {
        self.fade_in.read().expect("Error getting lock").as_secs()
    }

    /// Gets the fade-out duration currently configured on the session.
    #[cfg(test)]
    pub fn fade_out_seconds(&self) -> u64 {
        self.fade_out.read().expect("Error getting lock").as_secs()
    }
}

impl super::Session for Session {
    fn state(&self) -> SessionState {
        let sounds = self.sounds.read().expect("Error getting lock");
        let states: Vec<SoundState> = sounds
            .values()
            .map(|player| *player.state.read().expect("Error getting lock"))
            .collect();

        if !states.iter().any(|state| *state != SoundState::Stopped) {
            return SessionState::Idle;
        }
        if self.paused.load(Ordering::Relaxed) {
            return SessionState::Paused;
        }
        if states
            .iter()
            .any(|state| matches!(state, SoundState::Playing | SoundState::Stopping))
        {
            return SessionState::Playing;
        }

        SessionState::Buffering
    }

    fn master_volume(&self) -> f64 {
        *self.master_volume.read().expect("Error getting lock")
    }

    fn set_master_volume(&self, volume: f64) {
        let _enter = self.span.enter();

        *self.master_volume.write().expect("Error getting lock") = volume;
        debug!(volume = volume, "Set master volume.");
    }

    fn resume(&self) {
        let _enter = self.span.enter();

        self.paused.store(false, Ordering::Relaxed);
        info!("Resumed playback.");
    }

    fn pause(&self) {
        let _enter = self.span.enter();

        self.paused.store(true, Ordering::Relaxed);
        info!("Paused playback.");
    }

    fn stop_all(&self) {
        let _enter = self.span.enter();

        let sounds = self.sounds.read().expect("Error getting lock");
        info!(count = sounds.len(), "Stopping all sounds.");
        for player in sounds.values() {
            player.cancel.cancel();
        }
    }

    fn set_fade_in_seconds(&self, seconds: u64) {
        *self.fade_in.write().expect("Error getting lock") = Duration::from_secs(seconds);
        debug!(seconds = seconds, "Set fade-in duration.");
    }

    fn set_fade_out_seconds(&self, seconds: u64) {
        *self.fade_out.write().expect("Error getting lock") = Duration::from_secs(seconds);
        debug!(seconds = seconds, "Set fade-out duration.");
    }

    fn play(&self, sound: Arc<Sound>) {
        let _enter = self.span.enter();

        let mut sounds = self.sounds.write().expect("Error getting lock");
        if let Some(player) = sounds.get(sound.id()) {
            let state = *player.state.read().expect("Error getting lock");
            if !matches!(state, SoundState::Stopped | SoundState::Stopping) {
                info!(sound = sound.id(), "Sound is already active.");
                return;
            }
            // A stopping player is superseded: its worker keeps fading the
            // old playback while the fresh player takes over the entry.
            player.cancel.cancel();
        }

        let state = Arc::new(RwLock::new(SoundState::Buffering));
        let volume = Arc::new(RwLock::new(1.0));
        let cancel = CancelHandle::new();
        sounds.insert(
            sound.id().to_string(),
            Player {
                state: state.clone(),
                volume,
                cancel: cancel.clone(),
            },
        );

        info!(
            sound = sound.id(),
            fade_in = format!("{:?}", *self.fade_in.read().expect("Error getting lock")),
            "Starting sound."
        );

        let paused = self.paused.clone();
        let buffering = self.buffering;
        let segment_duration = self.segment_duration;
        let fade_out = self.fade_out.clone();
        thread::spawn(move || {
            Session::run(
                sound,
                state,
                paused,
                cancel,
                buffering,
                segment_duration,
                fade_out,
            );
        });
    }

    fn stop(&self, id: &str) {
        let _enter = self.span.enter();

        let sounds = self.sounds.read().expect("Error getting lock");
        match sounds.get(id) {
            Some(player) => player.cancel.cancel(),
            None => info!(sound = id, "Sound is not active, nothing to stop."),
        }
    }

    fn sound_state(&self, id: &str) -> SoundState {
        let sounds = self.sounds.read().expect("Error getting lock");
        sounds
            .get(id)
            .map(|player| *player.state.read().expect("Error getting lock"))
            .unwrap_or(SoundState::Stopped)
    }

    fn sound_volume(&self, id: &str) -> f64 {
        let sounds = self.sounds.read().expect("Error getting lock");
        sounds
            .get(id)
            .map(|player| *player.volume.read().expect("Error getting lock"))
            .unwrap_or(1.0)
    }

    fn set_sound_volume(&self, id: &str, volume: f64) {
        let _enter = self.span.enter();

        let sounds = self.sounds.read().expect("Error getting lock");
        match sounds.get(id) {
            Some(player) => {
                *player.volume.write().expect("Error getting lock") = volume;
                debug!(sound = id, volume = volume, "Set sound volume.");
            }
            None => info!(sound = id, "Sound is not active, volume not set."),
        }
    }
}
