//! Readiness state machine and pending-action queue.
//!
//! Host-issued operations (content loads, script evaluations) are queued
//! in submission order and only run once the currently loaded document has
//! signalled readiness through the bootstrap sentinel. Loading new content
//! discards everything queued against the previous document.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::ScriptCallback;

/// Whether the active document has finished bootstrapping.
///
/// `NotReady -> Ready` happens only via the bootstrap sentinel; every new
/// content load (including reload) flips the state back to `NotReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessState {
    NotReady,
    Ready,
}

/// What a content-load action carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// Navigate to a URL directly.
    Url(String),
    /// Generated HTML, transported through the content store and a
    /// synthetic page-data URL (too large for direct injection).
    Html(String),
}

/// A host-issued operation gated by readiness. Consumed exactly once, in
/// submission order, or dropped unexecuted when superseded by a new load.
pub enum PendingAction {
    LoadContent(LoadTarget),
    EvalScript {
        js: String,
        callback: Option<ScriptCallback>,
    },
}

impl fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadContent(target) => f.debug_tuple("LoadContent").field(target).finish(),
            Self::EvalScript { js, callback } => f
                .debug_struct("EvalScript")
                .field("js", js)
                .field("has_callback", &callback.is_some())
                .finish(),
        }
    }
}

/// FIFO of pending actions plus the surface's readiness state.
///
/// Pure data: the surface owns execution and calls [`pop_runnable`] in a
/// loop, so an executed `LoadContent` (which flips state to `NotReady` via
/// [`begin_load`]) naturally stops the drain with later actions left
/// queued for the next document.
///
/// [`pop_runnable`]: ActionQueue::pop_runnable
/// [`begin_load`]: ActionQueue::begin_load
pub struct ActionQueue {
    state: ReadinessState,
    actions: VecDeque<PendingAction>,
}

impl ActionQueue {
    /// A fresh surface holds the engine's initial blank document, which
    /// needs no bootstrap, so the queue starts ready.
    pub fn new() -> Self {
        Self {
            state: ReadinessState::Ready,
            actions: VecDeque::new(),
        }
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ReadinessState::Ready
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Append an action at the tail.
    pub fn enqueue(&mut self, action: PendingAction) {
        self.actions.push_back(action);
    }

    /// Discard all queued actions and require a fresh bootstrap signal.
    ///
    /// Called at the start of every content-load operation, before the new
    /// load is issued. Dropped actions' callbacks are never invoked.
    pub fn reset_for_new_content(&mut self) {
        self.actions.clear();
        self.state = ReadinessState::NotReady;
    }

    /// The bootstrap sentinel arrived; scripts may run again.
    ///
    /// Idempotent: marking an already-ready queue changes nothing.
    pub fn mark_ready(&mut self) {
        self.state = ReadinessState::Ready;
    }

    /// A content load is being issued; the next document must signal
    /// readiness before any further script executes.
    pub fn begin_load(&mut self) {
        self.state = ReadinessState::NotReady;
    }

    /// Pop the head action if it may run now.
    ///
    /// A head `LoadContent` is always runnable (it is what produces the
    /// next readiness cycle); a head `EvalScript` only runs while ready.
    pub fn pop_runnable(&mut self) -> Option<PendingAction> {
        let runnable = match self.actions.front() {
            None => false,
            Some(PendingAction::LoadContent(_)) => true,
            Some(PendingAction::EvalScript { .. }) => self.is_ready(),
        };
        if runnable {
            self.actions.pop_front()
        } else {
            None
        }
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn eval(js: &str) -> PendingAction {
        PendingAction::EvalScript {
            js: js.into(),
            callback: None,
        }
    }

    fn load(url: &str) -> PendingAction {
        PendingAction::LoadContent(LoadTarget::Url(url.into()))
    }

    #[test]
    fn starts_ready_and_empty() {
        let q = ActionQueue::new();
        assert_eq!(q.state(), ReadinessState::Ready);
        assert!(q.is_empty());
    }

    #[test]
    fn scripts_blocked_while_not_ready() {
        let mut q = ActionQueue::new();
        q.begin_load();
        q.enqueue(eval("a()"));
        q.enqueue(eval("b()"));
        assert!(q.pop_runnable().is_none());
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn scripts_run_in_submission_order_once_ready() {
        let mut q = ActionQueue::new();
        q.begin_load();
        q.enqueue(eval("a()"));
        q.enqueue(eval("b()"));
        q.mark_ready();

        let first = q.pop_runnable().unwrap();
        let second = q.pop_runnable().unwrap();
        assert!(matches!(first, PendingAction::EvalScript { js, .. } if js == "a()"));
        assert!(matches!(second, PendingAction::EvalScript { js, .. } if js == "b()"));
        assert!(q.pop_runnable().is_none());
    }

    #[test]
    fn load_at_head_runs_even_when_not_ready() {
        let mut q = ActionQueue::new();
        q.begin_load();
        q.enqueue(load("http://127.0.0.1:40000/_aerie/pages/deck.html"));
        assert!(q.pop_runnable().is_some());
    }

    #[test]
    fn script_behind_load_waits_for_next_document() {
        let mut q = ActionQueue::new();
        q.enqueue(load("http://127.0.0.1:40000/a"));
        q.enqueue(eval("afterLoad()"));

        assert!(matches!(
            q.pop_runnable(),
            Some(PendingAction::LoadContent(_))
        ));
        // executing the load flips state before the next pop
        q.begin_load();
        assert!(q.pop_runnable().is_none(), "script must wait for bootstrap");
        q.mark_ready();
        assert!(q.pop_runnable().is_some());
    }

    #[test]
    fn reset_clears_queue_and_readiness() {
        let mut q = ActionQueue::new();
        q.enqueue(eval("a()"));
        q.enqueue(eval("b()"));
        q.reset_for_new_content();
        assert!(q.is_empty());
        assert_eq!(q.state(), ReadinessState::NotReady);
        assert!(q.pop_runnable().is_none());
    }

    #[test]
    fn reset_drops_callbacks_without_invoking_them() {
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let mut q = ActionQueue::new();
        q.begin_load();
        q.enqueue(PendingAction::EvalScript {
            js: "x()".into(),
            callback: Some(Box::new(move |_| flag.set(true))),
        });
        q.reset_for_new_content();
        assert!(!fired.get(), "dropped action's callback must never fire");
    }

    #[test]
    fn mark_ready_is_idempotent() {
        let mut q = ActionQueue::new();
        q.mark_ready();
        q.mark_ready();
        assert!(q.is_ready());
        assert!(q.pop_runnable().is_none());
    }

    #[test]
    fn pending_action_debug_hides_callback_body() {
        let action = PendingAction::EvalScript {
            js: "x()".into(),
            callback: Some(Box::new(|_| {})),
        };
        let dbg = format!("{action:?}");
        assert!(dbg.contains("has_callback: true"));
    }
}
