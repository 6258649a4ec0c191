//! Single-producer action queue between the engine and the sinks.
//!
//! The engine side only ever enqueues, so frame processing never waits on
//! OS injection. The dispatcher drains the queue on its own task until
//! every sender is dropped.

use tokio::sync::mpsc;

use handpilot_common::error::{HandpilotError, HandpilotResult};
use handpilot_hand_model::Action;

use crate::writer::ActionLog;
use crate::{dispatch, KeyboardSink, PointerSink};

/// Engine-side handle of the queue.
#[derive(Debug, Clone)]
pub struct ActionSender {
    tx: mpsc::UnboundedSender<Action>,
}

impl ActionSender {
    /// Enqueue one action. Fails only when the dispatcher has gone away.
    pub fn send(&self, action: Action) -> HandpilotResult<()> {
        self.tx
            .send(action)
            .map_err(|_| HandpilotError::sink("action dispatcher has stopped"))
    }

    pub fn send_all(&self, actions: impl IntoIterator<Item = Action>) -> HandpilotResult<()> {
        actions.into_iter().try_for_each(|action| self.send(action))
    }
}

/// Counters reported when the dispatcher stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchSummary {
    pub dispatched: u64,
    pub failed: u64,
}

/// Sink-side end of the queue.
pub struct ActionDispatcher {
    rx: mpsc::UnboundedReceiver<Action>,
    pointer: Box<dyn PointerSink>,
    keyboard: Box<dyn KeyboardSink>,
    log: Option<ActionLog>,
    summary: DispatchSummary,
}

/// Create a connected sender and dispatcher.
pub fn action_queue(
    pointer: Box<dyn PointerSink>,
    keyboard: Box<dyn KeyboardSink>,
) -> (ActionSender, ActionDispatcher) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ActionSender { tx },
        ActionDispatcher {
            rx,
            pointer,
            keyboard,
            log: None,
            summary: DispatchSummary::default(),
        },
    )
}

impl ActionDispatcher {
    /// Also append every dispatched action to `log`.
    pub fn with_log(mut self, log: ActionLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Drain the queue until every sender is dropped.
    ///
    /// Each action is attempted once. A sink failure is logged and counted,
    /// then the next action is processed. Log write failures abort.
    pub async fn run(mut self) -> HandpilotResult<DispatchSummary> {
        tracing::info!(
            pointer = self.pointer.name(),
            keyboard = self.keyboard.name(),
            "Action dispatcher started"
        );

        while let Some(action) = self.rx.recv().await {
            self.handle(&action)?;
        }

        if let Some(log) = self.log.as_mut() {
            log.flush()?;
        }
        tracing::info!(
            dispatched = self.summary.dispatched,
            failed = self.summary.failed,
            "Action dispatcher stopped"
        );
        Ok(self.summary)
    }

    fn handle(&mut self, action: &Action) -> HandpilotResult<()> {
        match dispatch(action, self.pointer.as_mut(), self.keyboard.as_mut()) {
            Ok(()) => self.summary.dispatched += 1,
            Err(e) => {
                self.summary.failed += 1;
                tracing::warn!(error = %e, kind = ?action.kind, "Sink rejected action");
            }
        }
        if let Some(log) = self.log.as_mut() {
            log.write_action(action)?;
        }
        Ok(())
    }
}
