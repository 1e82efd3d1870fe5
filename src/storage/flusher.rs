//! Background flusher
//!
//! A dedicated thread that runs a callback on a fixed tick until stopped.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, select, Sender};

use crate::error::Result;

/// Handle to the background flush thread
///
/// Stopping (explicitly or on drop) waits for an in-progress tick to finish.
pub struct Flusher {
    stop: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Flusher {
    /// Spawn a thread named `name` that calls `on_tick` every `interval`
    pub fn spawn<F>(name: &str, interval: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let ticker = channel::tick(interval);
        let thread_name = name.to_string();

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || loop {
            select! {
                recv(ticker) -> _ => on_tick(),
                recv(stop_rx) -> _ => {
                    tracing::debug!(thread = %thread_name, "flusher stopped");
                    return;
                }
            }
        })?;

        Ok(Self {
            stop: stop_tx,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.stop.try_send(());
        if handle.join().is_err() {
            tracing::error!("flusher thread panicked");
        }
    }
}

impl Drop for Flusher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
