use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

use crate::error::{Result, StoreError};
use crate::explorer::bridge::ExplorerEvent;
use crate::explorer::controller::Mutation;
use crate::explorer::entry::RequestId;
use crate::store::ListedEntry;

/// Result of a store call, delivered back to the event loop.
#[derive(Debug)]
pub enum StoreCompletion {
    /// A directory listing requested by the explorer.
    Listing {
        path: String,
        request: RequestId,
        result: std::result::Result<Vec<ListedEntry>, StoreError>,
    },
    /// A create or delete requested by the explorer.
    Mutation {
        mutation: Mutation,
        result: std::result::Result<(), StoreError>,
    },
    /// File content requested by the editor pane.
    FileRead {
        path: String,
        request: u64,
        result: std::result::Result<String, StoreError>,
    },
}

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// A spawned store call finished.
    Store(StoreCompletion),
    /// Event published by the explorer bridge.
    Explorer(ExplorerEvent),
    /// A collaborator asked for a directory refresh.
    RefreshRequested(String),
}

/// Async event handler that polls crossterm events and forwards them via a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        // crossterm polling blocks, keep it off the async workers
        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                    Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                }
            } else {
                Event::Tick
            };
            if event_tx.send(event).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Get a sender clone for store tasks and collaborators.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (waits until one is available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
