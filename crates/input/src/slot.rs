//! Latest-value hand-off between the key pump and the game loop.
//!
//! The pump overwrites; the loop takes. Anything pressed between two takes
//! except the most recent event is dropped, so a burst of keys can never queue
//! up behind a slow frame.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::map::{map_key, InputEvent};

/// Create a connected writer/reader pair.
pub fn action_slot() -> (SlotWriter, ActionSlot) {
    let (tx, rx) = watch::channel(None);
    (SlotWriter { tx }, ActionSlot { rx })
}

/// Producer side, owned by the key pump.
#[derive(Debug)]
pub struct SlotWriter {
    tx: watch::Sender<Option<InputEvent>>,
}

impl SlotWriter {
    /// Replace any pending event.
    pub fn put(&self, event: InputEvent) {
        self.tx.send_replace(Some(event));
    }

    /// The reader has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, read by the game loop between steps.
#[derive(Debug)]
pub struct ActionSlot {
    rx: watch::Receiver<Option<InputEvent>>,
}

impl ActionSlot {
    /// Take the pending event, if one arrived since the last take.
    pub fn take(&mut self) -> Option<InputEvent> {
        let current = self.rx.borrow_and_update();
        if current.has_changed() {
            *current
        } else {
            None
        }
    }

    /// Drop whatever is pending (e.g. keys pressed during a restart).
    pub fn clear(&mut self) {
        drop(self.rx.borrow_and_update());
    }

    /// The writer has gone away.
    pub fn is_disconnected(&self) -> bool {
        self.rx.has_changed().is_err()
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Read terminal keys on a background thread and feed them to `writer`.
///
/// The thread stops after forwarding a quit, when the reader is dropped, or
/// when the terminal stops producing events.
pub fn spawn_key_pump(writer: SlotWriter) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("key-pump".to_string())
        .spawn(move || {
            if let Err(e) = pump(&writer) {
                warn!(error = %e, "key pump stopped");
                writer.put(InputEvent::Quit);
            }
        })
}

fn pump(writer: &SlotWriter) -> io::Result<()> {
    while !writer.is_closed() {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if let Some(input) = map_key(key) {
            writer.put(input);
            if input == InputEvent::Quit {
                debug!("quit key, key pump exiting");
                break;
            }
        }
    }
    Ok(())
}
