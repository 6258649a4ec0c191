//! Sink implementations that do not touch the operating system.

use std::sync::{Arc, Mutex};

use handpilot_common::error::{HandpilotError, HandpilotResult};
use handpilot_hand_model::{KeyCode, Modifier};

use crate::{KeyboardSink, PointerSink};

/// One call made on a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    MoveTo { x: f64, y: f64 },
    Click,
    DoubleClick,
    RightClick,
    MouseDown,
    MouseUp,
    Tap(KeyCode),
    Hotkey(Modifier, char),
}

/// Records every call. Clones share the same record, so one clone can be
/// handed to a dispatcher and another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: SinkCall) -> HandpilotResult<()> {
        self.calls
            .lock()
            .map_err(|_| HandpilotError::sink("memory sink lock poisoned"))?
            .push(call);
        Ok(())
    }
}

impl PointerSink for MemorySink {
    fn move_to(&mut self, x: f64, y: f64) -> HandpilotResult<()> {
        self.record(SinkCall::MoveTo { x, y })
    }

    fn click(&mut self) -> HandpilotResult<()> {
        self.record(SinkCall::Click)
    }

    fn double_click(&mut self) -> HandpilotResult<()> {
        self.record(SinkCall::DoubleClick)
    }

    fn right_click(&mut self) -> HandpilotResult<()> {
        self.record(SinkCall::RightClick)
    }

    fn mouse_down(&mut self) -> HandpilotResult<()> {
        self.record(SinkCall::MouseDown)
    }

    fn mouse_up(&mut self) -> HandpilotResult<()> {
        self.record(SinkCall::MouseUp)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl KeyboardSink for MemorySink {
    fn tap(&mut self, key: KeyCode) -> HandpilotResult<()> {
        self.record(SinkCall::Tap(key))
    }

    fn hotkey(&mut self, modifier: Modifier, key: char) -> HandpilotResult<()> {
        self.record(SinkCall::Hotkey(modifier, key))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Accepts every action and drops it. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PointerSink for NullSink {
    fn move_to(&mut self, _x: f64, _y: f64) -> HandpilotResult<()> {
        Ok(())
    }

    fn click(&mut self) -> HandpilotResult<()> {
        Ok(())
    }

    fn double_click(&mut self) -> HandpilotResult<()> {
        Ok(())
    }

    fn right_click(&mut self) -> HandpilotResult<()> {
        Ok(())
    }

    fn mouse_down(&mut self) -> HandpilotResult<()> {
        Ok(())
    }

    fn mouse_up(&mut self) -> HandpilotResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

impl KeyboardSink for NullSink {
    fn tap(&mut self, _key: KeyCode) -> HandpilotResult<()> {
        Ok(())
    }

    fn hotkey(&mut self, _modifier: Modifier, _key: char) -> HandpilotResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Pick the sinks for this platform.
///
/// OS injection backends are not part of this crate, so this always
/// returns [`NullSink`]s.
pub fn detect_sinks() -> (Box<dyn PointerSink>, Box<dyn KeyboardSink>) {
    tracing::warn!("OS input injection is not available; actions will be dropped");
    (Box::new(NullSink), Box::new(NullSink))
}
