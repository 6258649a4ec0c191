//! Replay recorded frames through the engine.

use std::path::PathBuf;

use anyhow::Context;

use handpilot_common::clock::{ns_to_secs, FrameClock};
use handpilot_common::config::AppConfig;
use handpilot_gesture_core::GestureEngine;
use handpilot_hand_model::{Action, ActionKind};
use handpilot_input_sink::queue::action_queue;
use handpilot_input_sink::sinks::detect_sinks;
use handpilot_input_sink::writer::{ActionLog, ActionLogHeader};

pub async fn run(
    config: &AppConfig,
    frames_path: PathBuf,
    output: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    let frames = super::load_frames(&frames_path)?;
    let mut engine = GestureEngine::new(config).context("Failed to start gesture engine")?;

    let clock = FrameClock::start();
    let (pointer, keyboard) = detect_sinks();
    let (tx, mut dispatcher) = action_queue(pointer, keyboard);
    if let Some(path) = &output {
        let header = ActionLogHeader::new(
            clock.epoch_wall(),
            config.surface,
            config.keyboard.surface,
            engine.classifier_name(),
        );
        let log = ActionLog::new(path.clone(), &header)
            .with_context(|| format!("Failed to create action log {}", path.display()))?;
        dispatcher = dispatcher.with_log(log);
    }
    let dispatch = tokio::spawn(dispatcher.run());

    println!(
        "Replaying {} frames from {}",
        frames.len(),
        frames_path.display()
    );

    let mut counts = ActionCounts::default();
    let mut last_t = 0;
    for frame in &frames {
        let out = engine.process_frame(frame);
        for action in &out.actions {
            counts.add(action);
            if !quiet && !matches!(action.kind, ActionKind::Move { .. }) {
                print_action(action, out.layout_mode.name());
            }
        }
        tx.send_all(out.actions)?;
        last_t = frame.timestamp_ns;
    }

    let released = engine.shutdown(last_t);
    for action in &released {
        counts.add(action);
        if !quiet {
            print_action(action, "shutdown");
        }
    }
    tx.send_all(released)?;
    drop(tx);

    let summary = dispatch.await.context("Action dispatcher panicked")??;

    println!();
    println!("Summary:");
    println!(
        "  Frames: {} in {:.3}s",
        engine.frame_count(),
        ns_to_secs(clock.now_ns())
    );
    println!("  Pointer moves: {}", counts.moves);
    println!("  Clicks: {}", counts.clicks);
    println!("  Button presses: {}", counts.buttons);
    println!("  Keys: {}", counts.keys);
    println!(
        "  Dispatched: {} ({} failed)",
        summary.dispatched, summary.failed
    );
    if let Some(path) = output {
        println!("  Action log: {}", path.display());
    }
    Ok(())
}

#[derive(Default)]
struct ActionCounts {
    moves: u64,
    clicks: u64,
    buttons: u64,
    keys: u64,
}

impl ActionCounts {
    fn add(&mut self, action: &Action) {
        match action.kind {
            ActionKind::Move { .. } => self.moves += 1,
            ActionKind::Click | ActionKind::DoubleClick | ActionKind::RightClick => {
                self.clicks += 1
            }
            ActionKind::MouseDown | ActionKind::MouseUp => self.buttons += 1,
            ActionKind::Key { .. } | ActionKind::Combo { .. } => self.keys += 1,
        }
    }
}

fn print_action(action: &Action, context: &str) {
    let secs = ns_to_secs(action.timestamp_ns);
    match serde_json::to_string(&action.kind) {
        Ok(json) => println!("  {secs:>8.3}s [{context}] {json}"),
        Err(_) => println!("  {secs:>8.3}s [{context}] {:?}", action.kind),
    }
}
