// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
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
use std::io;

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{info, span, warn, Level};

use super::Event;

const PLAY: &str = "play";
const STOP: &str = "stop";
const VOLUME: &str = "volume";
const MASTER: &str = "master";
const RESUME: &str = "resume";
const PAUSE: &str = "pause";
const STOP_ALL: &str = "stop_all";
const SEARCH: &str = "search";
const STATUS: &str = "status";

/// A controller that controls a mixer using the keyboard. The play command
/// toggles a sound's control, mirroring the single play/stop control each
/// sound exposes.
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    fn monitor_io<R, W>(
        events_tx: &Sender<Event>,
        mut reader: R,
        mut writer: W,
    ) -> Result<(), io::Error>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(
            writer,
            "Command ({} <sound>, {} <sound>, {} <sound> <volume>, {} <volume>, {}, {}, {}, {} <query>, {}): ",
            PLAY, STOP, VOLUME, MASTER, RESUME, PAUSE, STOP_ALL, SEARCH, STATUS,
        )?;
        writer.flush()?;
        let mut input: String = String::default();
        reader.read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        let mut words = input.split_whitespace();
        let event = match words.next() {
            Some(PLAY) => words.next().map(|sound| Event::Toggle(sound.to_string())),
            Some(STOP) => words.next().map(|sound| Event::Stop(sound.to_string())),
            Some(VOLUME) => match (words.next(), words.next().map(str::parse::<f64>)) {
                (Some(sound), Some(Ok(volume))) => {
                    Some(Event::SetVolume(sound.to_string(), volume))
                }
                _ => None,
            },
            Some(MASTER) => match words.next().map(str::parse::<f64>) {
                Some(Ok(volume)) => Some(Event::SetMasterVolume(volume)),
                _ => None,
            },
            Some(RESUME) => Some(Event::ResumeAll),
            Some(PAUSE) => Some(Event::PauseAll),
            Some(STOP_ALL) => Some(Event::StopAll),
            Some(SEARCH) => Some(Event::Search(
                words.collect::<Vec<&str>>().join(" "),
            )),
            Some(STATUS) => Some(Event::Status),
            _ => None,
        };

        match event {
            Some(event) => events_tx
                .blocking_send(event)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?,
            None => warn!(input = input, "Unrecognized input"),
        }
        Ok(())
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            loop {
                Self::monitor_io(&events_tx, io::stdin().lock(), io::stdout())?;
            }
        })
    }
}
