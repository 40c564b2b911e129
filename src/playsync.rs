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
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Represents the current cancel state.
#[derive(PartialEq)]
enum CancelState {
    Untouched,
    Cancelled,
}

/// A cancel handle is handed to an engine worker when a sound starts playing.
/// It's the worker's responsibility to observe cancellation between its timed
/// waits.
#[derive(Clone)]
pub struct CancelHandle {
    /// Set once the underlying operation should be cancelled.
    cancelled: Arc<Mutex<CancelState>>,
    /// The condvar will handle notification of cancelling.
    condvar: Arc<Condvar>,
}

impl CancelHandle {
    /// Creates a new cancel handle.
    pub fn new() -> CancelHandle {
        CancelHandle {
            cancelled: Arc::new(Mutex::new(CancelState::Untouched)),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Returns true if the handle has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().expect("Error getting lock") == CancelState::Cancelled
    }

    /// Sleeps for the given duration, waking early on cancellation. Returns
    /// true if the handle was cancelled before the timeout elapsed.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let guard = self.cancelled.lock().expect("Error getting lock");
        let (guard, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |cancelled| {
                *cancelled == CancelState::Untouched
            })
            .expect("Error getting lock");

        *guard == CancelState::Cancelled
    }

    /// Cancels the underlying operation and wakes any waiting worker.
    pub fn cancel(&self) {
        let mut cancel_state = self.cancelled.lock().expect("Error getting lock");
        if *cancel_state == CancelState::Untouched {
            *cancel_state = CancelState::Cancelled;
            self.condvar.notify_all();
        }
    }
}

#[cfg(test)]
mod test {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_cancel_handle_cancelled() {
        let cancel_handle = CancelHandle::new();
        assert!(!cancel_handle.is_cancelled());

        let join = {
            let cancel_handle = cancel_handle.clone();
            thread::spawn(move || cancel_handle.wait_for(Duration::from_secs(30)))
        };

        cancel_handle.cancel();
        assert!(join.join().expect("Error joining thread"));
        assert!(cancel_handle.is_cancelled());
    }

    #[test]
    fn test_cancel_handle_timeout() {
        let cancel_handle = CancelHandle::new();

        // The wait should elapse without a cancellation.
        assert!(!cancel_handle.wait_for(Duration::from_millis(10)));
        assert!(!cancel_handle.is_cancelled());
    }
}
