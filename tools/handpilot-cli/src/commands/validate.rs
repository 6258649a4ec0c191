//! Check a frames file without running the engine.

use std::path::PathBuf;

use handpilot_common::clock::ns_to_secs;
use handpilot_common::config::AppConfig;

pub fn run(config: &AppConfig, path: PathBuf) -> anyhow::Result<()> {
    let frames = super::load_frames(&path)?;

    let mut pointer = 0usize;
    let mut keyboard = 0usize;
    let mut empty = 0usize;
    let mut out_of_order = 0usize;
    let mut previous = None;

    for frame in &frames {
        if frame.hands.is_empty() {
            empty += 1;
        }
        if frame.hand(config.roles.pointer).is_some() {
            pointer += 1;
        }
        if frame.hand(config.roles.keyboard).is_some() {
            keyboard += 1;
        }
        if previous.is_some_and(|t| frame.timestamp_ns < t) {
            out_of_order += 1;
        }
        previous = Some(frame.timestamp_ns);
    }

    let duration = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => ns_to_secs(last.timestamp_ns.saturating_sub(first.timestamp_ns)),
        _ => 0.0,
    };

    println!("Frames: {}", frames.len());
    println!("  Duration: {duration:.2}s");
    println!("  Pointer hand ({}): {pointer}", config.roles.pointer);
    println!("  Keyboard hand ({}): {keyboard}", config.roles.keyboard);
    println!("  No hands: {empty}");

    if out_of_order > 0 {
        println!("[WARN] {out_of_order} frames go back in time");
        anyhow::bail!("frames are not in timestamp order");
    }
    println!("[OK] {}", path.display());
    Ok(())
}
