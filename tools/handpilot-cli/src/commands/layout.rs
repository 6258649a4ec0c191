//! Print the key boxes of one layout table.

use handpilot_common::config::AppConfig;
use handpilot_gesture_core::{KeyPressGate, LayoutMode};

pub fn run(config: &AppConfig, mode: LayoutMode) -> anyhow::Result<()> {
    let gate = KeyPressGate::from_config(config)?;
    let layout = gate.layout();
    let g = layout.geometry();

    println!(
        "Layout: {} on {} (keys {}x{}, margin {})",
        mode.name(),
        config.keyboard.surface,
        g.key_width,
        g.key_height,
        g.margin
    );
    println!("{}", "=".repeat(50));

    let surface = config.keyboard.surface;
    for key_box in layout.key_boxes(mode) {
        let r = key_box.rect;
        let clipped = r.right() > surface.width_f64() || r.bottom() > surface.height_f64();
        println!(
            "  {:<10} x {:>6.1}..{:<6.1} y {:>6.1}..{:<6.1}{}",
            key_box.key.label,
            r.x,
            r.right(),
            r.y,
            r.bottom(),
            if clipped { "  (off surface)" } else { "" }
        );
    }
    Ok(())
}
