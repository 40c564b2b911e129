// Copyright (C) 2024 Michael Wilson <mike@mdwn.dev>
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
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{error, info, span, Level};

use crate::mixer::Mixer;

pub mod keyboard;

/// Controller events that will trigger behavior in the mixer.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Toggles playback of a sound: starts it when it is stopped or
    /// stopping, stops it otherwise.
    Toggle(String),

    /// Stops a sound.
    Stop(String),

    /// Sets the volume of a sound.
    SetVolume(String, f64),

    /// Resumes playback of all sounds. Does nothing while the session is
    /// idle.
    ResumeAll,

    /// Pauses playback of all sounds. Does nothing while the session is
    /// idle.
    PauseAll,

    /// Stops all sounds. Does nothing while the session is idle.
    StopAll,

    /// Sets the master volume.
    SetMasterVolume(f64),

    /// Prints the catalogue narrowed by a search query.
    Search(String),

    /// Prints the session status.
    Status,
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Controls a mixer.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Creates a new controller with the given driver.
    pub fn new(mixer: Mixer, driver: Arc<dyn Driver>) -> Result<Controller, Box<dyn Error>> {
        Ok(Controller {
            handle: tokio::spawn(async move { Controller::trigger_events(mixer, driver).await }),
        })
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Triggers mixer events by watching the driver and getting events from it.
    async fn trigger_events(mixer: Mixer, driver: Arc<dyn Driver>) {
        let span = span!(Level::INFO, "controller");
        let _enter = span.enter();

        let (events_tx, mut events_rx) = mpsc::channel(1);
        let join_handle = driver.monitor_events(events_tx);

        info!(
            sounds = mixer.library().len(),
            "Controller started."
        );

        loop {
            if let Some(event) = events_rx.recv().await {
                info!(event = format!("{:?}", event), "Received event.");

                if let Err(e) = match event {
                    Event::Toggle(id) => mixer.toggle(&id),
                    Event::Stop(id) => mixer.stop(&id),
                    Event::SetVolume(id, volume) => mixer.set_volume(&id, volume),
                    Event::ResumeAll => {
                        mixer.resume();
                        Ok(())
                    }
                    Event::PauseAll => {
                        mixer.pause();
                        Ok(())
                    }
                    Event::StopAll => {
                        mixer.stop_all();
                        Ok(())
                    }
                    Event::SetMasterVolume(volume) => {
                        mixer.set_master_volume(volume);
                        Ok(())
                    }
                    Event::Search(query) => {
                        let filtered = mixer.catalogue().filter(&query);
                        if filtered.is_empty() {
                            println!("No sounds match '{}'.", query);
                        } else {
                            println!("{}", filtered);
                        }
                        Ok(())
                    }
                    Event::Status => {
                        println!("{}", mixer.status());
                        Ok(())
                    }
                } {
                    error!("Error talking to mixer: {}", e);
                }
            } else {
                info!("Controller closing.");
                if let Err(e) = join_handle.await {
                    error!("Error waiting for event monitor to stop: {}", e);
                }
                return;
            }
        }
    }
}
