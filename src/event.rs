use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::error::{AppError, Result};

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// No input within one tick; used to expire status messages.
    Tick,
    Resize(u16, u16),
    /// Paths the watcher saw change.
    FsChange(Vec<PathBuf>),
}

/// Serializes terminal input and watcher notifications onto one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Start polling the terminal every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let input_tx = tx.clone();

        tokio::task::spawn_blocking(move || loop {
            let next = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(raw) => translate(raw),
                    Err(e) => {
                        error!(error = %e, "failed to read terminal event");
                        return;
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    error!(error = %e, "failed to poll terminal");
                    return;
                }
            };
            if let Some(ev) = next {
                if input_tx.send(ev).is_err() {
                    debug!("event channel closed, stopping input poller");
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for producers outside the input poller, such as the watcher.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (waits until one is available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| AppError::Terminal("Event channel closed".into()))
    }
}

fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
