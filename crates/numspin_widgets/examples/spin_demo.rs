//! Spin Demo
//!
//! Drives a numeric spinner headlessly:
//! - clicks the spin buttons
//! - holds the increment button so it auto-repeats
//! - types into the entry
//! - renders the result into a recording draw context
//!
//! Run with: RUST_LOG=numspin_widgets=debug cargo run -p numspin_widgets --example spin_demo

use std::thread;
use std::time::Duration;

use numspin_core::draw::RecordingContext;
use numspin_core::{Result, Size};
use numspin_widgets::prelude::*;

const SPINNER_TOML: &str = r#"
minimum = -20
maximum = 20
initial = 0

[entry]
step = 2

[button.repeat]
initial_delay_ms = 300
interval_ms = 50
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut ctx = WidgetContext::new();
    let config = SpinnerConfig::from_toml_str(SPINNER_TOML)?;
    let mut spinner = NumericSpinner::with_config(&mut ctx, config);
    let entry = spinner.entry().clone();
    entry.set_on_changed(|value| tracing::info!(value, "value changed"));

    let bounds = spinner.bounds();
    let entry_width = entry.config().width;
    let up = (entry_width + 9.0, bounds.height() / 4.0);
    let down = (entry_width + 9.0, bounds.height() * 3.0 / 4.0);

    let pointer = |event_type, at: (f32, f32)| {
        Event::pointer(event_type, at.0, at.1, MouseButton::PRIMARY)
    };

    // Two clicks up, one down
    for at in [up, up, down] {
        spinner.handle_event(&mut ctx, &pointer(event_types::POINTER_DOWN, at));
        spinner.handle_event(&mut ctx, &pointer(event_types::POINTER_UP, at));
    }
    ctx.run_pending();
    tracing::info!(text = %entry.text(), "after clicks");

    // Hold the increment button
    spinner.handle_event(&mut ctx, &pointer(event_types::POINTER_DOWN, up));
    thread::sleep(Duration::from_millis(600));
    spinner.handle_event(&mut ctx, &pointer(event_types::POINTER_UP, up));
    ctx.run_pending();
    tracing::info!(text = %entry.text(), "after hold");

    // Focus the entry and type a negative number
    let inside = (entry_width / 2.0, bounds.height() / 2.0);
    spinner.handle_event(&mut ctx, &pointer(event_types::POINTER_DOWN, inside));
    spinner.handle_event(&mut ctx, &pointer(event_types::POINTER_UP, inside));
    spinner.handle_event(&mut ctx, &Event::key(KeyCode::BACKSPACE, Modifiers::NONE));
    spinner.handle_event(&mut ctx, &Event::text("-7x"));
    tracing::info!(value = entry.value(), text = %entry.text(), "after typing");

    let mut draw = RecordingContext::new(Size::new(200.0, 60.0));
    spinner.render(&ctx, &mut draw);
    tracing::info!(
        commands = draw.commands().len(),
        texts = ?draw.texts(),
        "rendered"
    );

    Ok(())
}
