//! Refresh/load-more state machine.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info};

use super::completion::{Completion, CompletionSignal};
use super::offset::{AnchorReport, OffsetTracker};
use super::presentation::{Presentation, present};

/// Which end of the list a gesture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Pull down past the top: refresh.
    Top,
    /// Pull up past the bottom: load more.
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => f.write_str("top"),
            Edge::Bottom => f.write_str("bottom"),
        }
    }
}

/// Current gesture state. Top and bottom share one variable, so at most one
/// gesture is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    /// Pulled past the top threshold, not yet released.
    TopPrimed,
    /// Refresh action in flight.
    TopLoading,
    /// Pulled past the bottom threshold, not yet released.
    BottomPrimed,
    /// Load-more action in flight.
    BottomLoading,
}

impl RefreshState {
    /// The edge this state belongs to, if any.
    pub fn edge(self) -> Option<Edge> {
        match self {
            RefreshState::Idle => None,
            RefreshState::TopPrimed | RefreshState::TopLoading => Some(Edge::Top),
            RefreshState::BottomPrimed | RefreshState::BottomLoading => Some(Edge::Bottom),
        }
    }

    pub fn is_loading(self) -> bool {
        matches!(self, RefreshState::TopLoading | RefreshState::BottomLoading)
    }

    /// The loading state for `edge`.
    pub fn loading(edge: Edge) -> Self {
        match edge {
            Edge::Top => RefreshState::TopLoading,
            Edge::Bottom => RefreshState::BottomLoading,
        }
    }
}

/// Pull distances (points) that prime each gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub top: f64,
    pub bottom: f64,
}

impl Thresholds {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
        }
    }
}

/// Animation hint attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    None,
    /// The indicator should ease back rather than snap.
    Smooth,
}

/// A state change produced by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RefreshState,
    pub to: RefreshState,
    pub animation: Animation,
}

/// Pure transition on an offset update.
///
/// Loading states never change here; only a completion leaves them. When both
/// priming conditions hold at once, the top one wins.
pub fn transition(state: RefreshState, offset: f64, thresholds: Thresholds) -> RefreshState {
    match state {
        RefreshState::Idle if offset > thresholds.top => RefreshState::TopPrimed,
        RefreshState::Idle if offset < -thresholds.bottom => RefreshState::BottomPrimed,
        RefreshState::TopPrimed if offset < thresholds.top => RefreshState::TopLoading,
        RefreshState::BottomPrimed if offset > -thresholds.bottom => RefreshState::BottomLoading,
        other => other,
    }
}

/// Read-only view of the machine for rendering code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshSnapshot {
    pub state: RefreshState,
    pub offset: f64,
    pub thresholds: Thresholds,
}

impl RefreshSnapshot {
    pub fn presentation(&self) -> Presentation {
        present(self.state, self.offset, self.thresholds)
    }
}

type Action = Box<dyn FnMut(Completion)>;
type Feedback = Box<dyn FnMut()>;

/// Owns the gesture state and dispatches actions.
///
/// Lives on the UI loop. Actions are invoked synchronously on entering a
/// loading state and may hand their [`Completion`] to another thread; the
/// completion takes effect on the next [`RefreshMachine::pump`].
pub struct RefreshMachine {
    state: RefreshState,
    offset: f64,
    thresholds: Thresholds,
    tracker: OffsetTracker,
    top_action: Action,
    bottom_action: Action,
    feedback: Feedback,
    /// Generation of the in-flight action, if any.
    in_flight: Option<u64>,
    generation: u64,
    completion_tx: Sender<CompletionSignal>,
    completion_rx: Receiver<CompletionSignal>,
}

impl RefreshMachine {
    /// Create a machine in the `Idle` state.
    pub fn new<T, B>(thresholds: Thresholds, top_action: T, bottom_action: B) -> Self
    where
        T: FnMut(Completion) + 'static,
        B: FnMut(Completion) + 'static,
    {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            state: RefreshState::Idle,
            offset: 0.0,
            thresholds,
            tracker: OffsetTracker::new(),
            top_action: Box::new(top_action),
            bottom_action: Box::new(bottom_action),
            feedback: Box::new(|| {}),
            in_flight: None,
            generation: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Hook fired when a pull is released into a loading state.
    pub fn with_feedback<F>(mut self, feedback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        RefreshSnapshot {
            state: self.state,
            offset: self.offset,
            thresholds: self.thresholds,
        }
    }

    /// Merge a batch of anchor reports and evaluate the resulting offset.
    pub fn observe<I>(&mut self, reports: I) -> Option<Transition>
    where
        I: IntoIterator<Item = AnchorReport>,
    {
        let offset = self.tracker.merge(reports);
        self.update_offset(offset)
    }

    /// Evaluate one offset update.
    pub fn update_offset(&mut self, offset: f64) -> Option<Transition> {
        self.offset = offset;
        let next = transition(self.state, offset, self.thresholds);
        if next == self.state {
            return None;
        }

        let change = self.enter(next, Animation::None);
        if next.is_loading()
            && let Some(edge) = next.edge()
        {
            self.dispatch(edge);
        }
        Some(change)
    }

    /// Apply completions that arrived since the last call.
    ///
    /// Completions for a cycle that is no longer in flight are ignored.
    pub fn pump(&mut self) -> Vec<Transition> {
        let mut changes = Vec::new();
        while let Ok(signal) = self.completion_rx.try_recv() {
            let current = self.state == RefreshState::loading(signal.edge)
                && self.in_flight == Some(signal.generation);
            if !current {
                debug!(
                    "ignoring stale {} completion (generation {}) in state {:?}",
                    signal.edge, signal.generation, self.state
                );
                continue;
            }
            self.in_flight = None;
            changes.push(self.enter(RefreshState::Idle, Animation::Smooth));
        }
        changes
    }

    fn enter(&mut self, to: RefreshState, animation: Animation) -> Transition {
        let change = Transition {
            from: self.state,
            to,
            animation,
        };
        debug!(
            "refresh state {:?} -> {:?} at offset {:.1}",
            change.from, change.to, self.offset
        );
        self.state = to;
        change
    }

    fn dispatch(&mut self, edge: Edge) {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        (self.feedback)();

        info!("dispatching {edge} action (generation {})", self.generation);
        let token = Completion::new(edge, self.generation, self.completion_tx.clone());
        match edge {
            Edge::Top => (self.top_action)(token),
            Edge::Bottom => (self.bottom_action)(token),
        }
    }

    #[cfg(test)]
    pub(crate) fn inject_completion(&self, edge: Edge, generation: u64) {
        let _ = self.completion_tx.send(CompletionSignal { edge, generation });
    }
}

impl fmt::Debug for RefreshMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshMachine")
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("thresholds", &self.thresholds)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
