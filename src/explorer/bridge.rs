//! Selection/notification bridge between the explorer and its collaborators.
//!
//! The explorer publishes typed [`ExplorerEvent`]s to any number of
//! subscribers (editor pane, status bar, header) and accepts refresh
//! requests through a [`RefreshHandle`]. The bridge holds no tree state.

use std::fmt;

use tokio::sync::mpsc;

use crate::error::StoreError;
use crate::event::Event;

/// Store operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    CreateFile,
    CreateDirectory,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::List => "list",
            Operation::CreateFile => "create file",
            Operation::CreateDirectory => "create directory",
            Operation::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Events published by the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerEvent {
    /// `path` became the active selection.
    Selected { path: String },
    /// The active selection no longer exists in the tree.
    SelectionCleared,
    /// A create or delete succeeded; `path` is the directory whose listing changed.
    TreeMutated { path: String },
    /// A directory listing was applied.
    DirectoryLoaded { path: String },
    /// A store call failed; the tree kept its last known-good state.
    OperationFailed {
        operation: Operation,
        path: String,
        error: StoreError,
    },
}

/// Handle returned by [`EventBus::subscribe`].
pub type SubscriptionId = u64;

type Callback = Box<dyn FnMut(&ExplorerEvent) + Send>;

/// Fan-out of explorer events to registered callbacks.
#[derive(Default)]
pub struct EventBus {
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl EventBus {
    /// Register a callback for every event.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ExplorerEvent) + Send + 'static,
    {
        self.next_id += 1;
        self.subscribers.push((self.next_id, Box::new(callback)));
        self.next_id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Call `callback` with the path of every successful selection.
    pub fn on_select<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.subscribe(move |event| {
            if let ExplorerEvent::Selected { path } = event {
                callback(path);
            }
        })
    }

    /// Call `callback` after every create/delete that changed the tree.
    pub fn on_mutated<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut() + Send + 'static,
    {
        self.subscribe(move |event| {
            if matches!(event, ExplorerEvent::TreeMutated { .. }) {
                callback();
            }
        })
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn publish(&mut self, event: &ExplorerEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Cloneable refresh signal for collaborators outside the explorer.
///
/// Requests go through the application event channel, so the explorer stays
/// the only writer of the tree.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl RefreshHandle {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    /// Ask the explorer to refresh `path`. Returns `false` once the event
    /// loop has shut down.
    pub fn refresh(&self, path: impl Into<String>) -> bool {
        self.tx.send(Event::RefreshRequested(path.into())).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn subscribers_receive_events_in_order() {
        let mut bus = EventBus::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = seen.clone();
        let second = seen.clone();
        bus.subscribe(move |e| first.lock().unwrap().push(("first", e.clone())));
        bus.subscribe(move |e| second.lock().unwrap().push(("second", e.clone())));

        bus.publish(&ExplorerEvent::SelectionCleared);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::default();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let id = bus.subscribe(move |_| *counter.lock().unwrap() += 1);

        bus.publish(&ExplorerEvent::SelectionCleared);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&ExplorerEvent::SelectionCleared);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn on_select_filters_selection_events() {
        let mut bus = EventBus::default();
        let selected = Arc::new(Mutex::new(Vec::new()));
        let sink = selected.clone();
        bus.on_select(move |path| sink.lock().unwrap().push(path.to_string()));

        bus.publish(&ExplorerEvent::TreeMutated {
            path: "demo".into(),
        });
        bus.publish(&ExplorerEvent::Selected {
            path: "demo/a.txt".into(),
        });

        assert_eq!(*selected.lock().unwrap(), vec!["demo/a.txt".to_string()]);
    }

    #[test]
    fn on_mutated_fires_for_tree_mutations_only() {
        let mut bus = EventBus::default();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        bus.on_mutated(move || *counter.lock().unwrap() += 1);

        bus.publish(&ExplorerEvent::DirectoryLoaded {
            path: "demo".into(),
        });
        bus.publish(&ExplorerEvent::TreeMutated {
            path: "demo".into(),
        });

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn refresh_handle_posts_to_event_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = RefreshHandle::new(tx);
        assert!(handle.refresh("demo/src"));
        match rx.try_recv() {
            Ok(Event::RefreshRequested(path)) => assert_eq!(path, "demo/src"),
            other => panic!("unexpected event: {:?}", other),
        }
        drop(rx);
        assert!(!handle.refresh("demo"));
    }
}
