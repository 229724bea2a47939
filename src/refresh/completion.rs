//! One-shot completion tokens handed to refresh and load-more actions.
//!
//! A token may be completed from any thread. Completing it only sends a
//! signal; the owning [`RefreshMachine`](super::RefreshMachine) applies the
//! state change when it next drains its channel with `pump`.

use std::sync::mpsc::Sender;

use log::{debug, warn};

use super::Edge;

/// Signal sent back to the owner loop when an action finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CompletionSignal {
    pub edge: Edge,
    /// Identifies the loading cycle the token was issued for.
    pub generation: u64,
}

/// Completion token for one in-flight action.
///
/// Consuming [`Completion::complete`] is the only way to finish the action.
/// A token dropped without completing leaves the machine loading; that is
/// logged but not repaired.
#[derive(Debug)]
pub struct Completion {
    signal: CompletionSignal,
    tx: Sender<CompletionSignal>,
    completed: bool,
}

impl Completion {
    pub(crate) fn new(edge: Edge, generation: u64, tx: Sender<CompletionSignal>) -> Self {
        Self {
            signal: CompletionSignal { edge, generation },
            tx,
            completed: false,
        }
    }

    /// Which gesture this token finishes.
    pub fn edge(&self) -> Edge {
        self.signal.edge
    }

    /// Signal that the action has finished, successfully or not.
    pub fn complete(mut self) {
        self.completed = true;
        if self.tx.send(self.signal).is_err() {
            debug!(
                "{} completion arrived after the refresh machine was dropped",
                self.signal.edge
            );
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.completed {
            warn!(
                "{} completion dropped without being invoked; indicator stays loading",
                self.signal.edge
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_complete_sends_signal() {
        let (tx, rx) = mpsc::channel();
        let token = Completion::new(Edge::Top, 7, tx);
        assert_eq!(token.edge(), Edge::Top);

        token.complete();
        assert_eq!(
            rx.try_recv().unwrap(),
            CompletionSignal {
                edge: Edge::Top,
                generation: 7
            }
        );
    }

    #[test]
    fn test_dropped_token_sends_nothing() {
        let (tx, rx) = mpsc::channel();
        drop(Completion::new(Edge::Bottom, 1, tx));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_complete_from_other_thread() {
        let (tx, rx) = mpsc::channel();
        let token = Completion::new(Edge::Bottom, 3, tx);
        std::thread::spawn(move || token.complete()).join().unwrap();
        assert_eq!(rx.recv().unwrap().edge, Edge::Bottom);
    }

    #[test]
    fn test_complete_after_receiver_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        // Must not panic
        Completion::new(Edge::Top, 1, tx).complete();
    }
}
