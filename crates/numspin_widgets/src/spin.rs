//! Numeric entry with spin buttons
//!
//! Lays a [`NumericEntry`] beside a column of two [`SmallButton`]s. The
//! upper button increments, the lower one decrements, and both auto-repeat
//! while held. Repeat ticks run on the buttons' worker threads; the entry
//! marshals its text update back onto the UI thread, so the displayed text
//! catches up on the next [`WidgetContext::run_pending`].

use numspin_core::draw::DrawContext;
use numspin_core::events::Event;
use numspin_core::{Rect, Size};

use crate::config::SpinnerConfig;
use crate::container::{hbox, vbox, Stack};
use crate::context::WidgetContext;
use crate::numeric_entry::{numeric_entry, NumericEntry};
use crate::small_button::{small_button, SmallButton, SmallButtonConfig};
use crate::widget::{Widget, WidgetBase};

/// Composite of an entry and its increment/decrement buttons
pub struct NumericSpinner {
    row: Stack,
    entry: NumericEntry,
}

/// Build an entry for `[minimum, maximum]` with "▲"/"▼" spin buttons
///
/// Returns the composite widget and a handle to the entry.
pub fn numeric_entry_with_buttons(
    ctx: &mut WidgetContext,
    minimum: i64,
    maximum: i64,
    initial: i64,
) -> (NumericSpinner, NumericEntry) {
    let config = SpinnerConfig {
        minimum,
        maximum,
        initial,
        ..Default::default()
    };
    let spinner = NumericSpinner::with_config(ctx, config);
    let entry = spinner.entry().clone();
    (spinner, entry)
}

impl NumericSpinner {
    /// Build a spinner from a full configuration
    pub fn with_config(ctx: &mut WidgetContext, config: SpinnerConfig) -> Self {
        let SpinnerConfig {
            minimum,
            maximum,
            initial,
            entry: entry_config,
            button,
            up_label,
            down_label,
        } = config;

        let entry = numeric_entry()
            .range(minimum, maximum)
            .value(initial)
            .config(entry_config)
            .build(ctx);

        let up = Self::spin_button(ctx, &up_label, button.clone(), {
            let entry = entry.clone();
            move || entry.increment()
        });
        let down = Self::spin_button(ctx, &down_label, button, {
            let entry = entry.clone();
            move || entry.decrement()
        });

        let buttons = vbox(ctx).child(up).child(down);
        let mut row = hbox(ctx).child(entry.clone()).child(buttons);
        let size = row.min_size();
        row.layout(Rect::new(0.0, 0.0, size.width, size.height));

        tracing::debug!(
            minimum = entry.minimum(),
            maximum = entry.maximum(),
            value = entry.value(),
            "NumericSpinner created"
        );
        Self { row, entry }
    }

    fn spin_button<F>(
        ctx: &mut WidgetContext,
        label: &str,
        config: SmallButtonConfig,
        on_tapped: F,
    ) -> SmallButton
    where
        F: Fn() + Send + Sync + 'static,
    {
        small_button(label)
            .config(config)
            .on_tapped(on_tapped)
            .build(ctx)
    }

    /// The wrapped entry
    pub fn entry(&self) -> &NumericEntry {
        &self.entry
    }

    pub fn value(&self) -> i64 {
        self.entry.value()
    }
}

impl Widget for NumericSpinner {
    fn base(&self) -> &WidgetBase {
        self.row.base()
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        self.row.base_mut()
    }

    fn min_size(&self) -> Size {
        self.row.min_size()
    }

    fn layout(&mut self, bounds: Rect) {
        self.row.layout(bounds);
    }

    fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        self.row.handle_event(ctx, event);
    }

    fn render(&self, ctx: &WidgetContext, draw: &mut dyn DrawContext) {
        self.row.render(ctx, draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repeat::RepeatConfig;
    use numspin_core::draw::RecordingContext;
    use numspin_core::events::{event_types, KeyCode, Modifiers, MouseButton};
    use numspin_core::draw::DrawCommand;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    // Default layout: entry 80x28 at the origin, buttons 18x14 stacked to its right
    const UP: (f32, f32) = (89.0, 7.0);
    const DOWN: (f32, f32) = (89.0, 21.0);
    const ENTRY: (f32, f32) = (40.0, 14.0);

    fn press(spinner: &mut NumericSpinner, ctx: &mut WidgetContext, at: (f32, f32)) {
        let down = Event::pointer(event_types::POINTER_DOWN, at.0, at.1, MouseButton::PRIMARY);
        spinner.handle_event(ctx, &down);
    }

    fn release(spinner: &mut NumericSpinner, ctx: &mut WidgetContext, at: (f32, f32)) {
        let up = Event::pointer(event_types::POINTER_UP, at.0, at.1, MouseButton::PRIMARY);
        spinner.handle_event(ctx, &up);
    }

    fn click(spinner: &mut NumericSpinner, ctx: &mut WidgetContext, at: (f32, f32)) {
        press(spinner, ctx, at);
        release(spinner, ctx, at);
    }

    #[test]
    fn test_layout() {
        let mut ctx = WidgetContext::new();
        let (spinner, entry) = numeric_entry_with_buttons(&mut ctx, 0, 10, 3);
        assert_eq!(spinner.min_size(), Size::new(98.0, 28.0));
        assert_eq!(entry.value(), 3);
        assert_eq!(spinner.value(), 3);

        let mut draw = RecordingContext::new(Size::new(200.0, 100.0));
        spinner.render(&ctx, &mut draw);
        assert_eq!(draw.texts(), vec!["3", "▲", "▼"]);
    }

    #[test]
    fn test_clicks_step_value() {
        let mut ctx = WidgetContext::new();
        let (mut spinner, entry) = numeric_entry_with_buttons(&mut ctx, 0, 10, 9);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        entry.set_on_changed(move |v| c.lock().push(v));

        click(&mut spinner, &mut ctx, UP);
        click(&mut spinner, &mut ctx, UP);
        assert_eq!(entry.value(), 10);

        click(&mut spinner, &mut ctx, DOWN);
        assert_eq!(entry.value(), 9);
        assert_eq!(*calls.lock(), vec![10, 10, 9]);

        ctx.run_pending();
        assert_eq!(entry.text(), "9");
    }

    #[test]
    fn test_hold_auto_repeats() {
        let mut ctx = WidgetContext::new();
        let mut spinner = NumericSpinner::with_config(&mut ctx, SpinnerConfig::new(0, 1000, 0));
        assert_eq!(spinner.entry().config().width, 80.0);
        assert_eq!(
            SpinnerConfig::default().button.repeat,
            RepeatConfig::new(400, 70)
        );
        let entry = spinner.entry().clone();

        press(&mut spinner, &mut ctx, UP);
        thread::sleep(Duration::from_millis(500));
        release(&mut spinner, &mut ctx, UP);

        let held = entry.value();
        assert!(held >= 2, "expected at least 2 repeats, got {}", held);

        // Text catches up once the UI thread drains
        ctx.run_pending();
        assert_eq!(entry.text(), held.to_string());

        thread::sleep(Duration::from_millis(100));
        assert_eq!(entry.value(), held);
    }

    #[test]
    fn test_keyboard_after_focusing_entry() {
        let mut ctx = WidgetContext::new();
        let (mut spinner, entry) = numeric_entry_with_buttons(&mut ctx, -5, 5, 0);

        click(&mut spinner, &mut ctx, ENTRY);
        assert!(entry.is_focused(&ctx));

        // Focus selected everything, so one backspace clears it
        spinner.handle_event(&mut ctx, &Event::key(KeyCode::BACKSPACE, Modifiers::NONE));
        spinner.handle_event(&mut ctx, &Event::text("-3"));
        assert_eq!(entry.value(), -3);

        spinner.handle_event(&mut ctx, &Event::key(KeyCode::UP, Modifiers::NONE));
        assert_eq!(entry.value(), -2);

        // Pressing a spin button moves focus away from the entry
        click(&mut spinner, &mut ctx, DOWN);
        assert!(!entry.is_focused(&ctx));
        assert_eq!(entry.value(), -3);
    }

    #[test]
    fn test_custom_config_labels_and_step() {
        let mut ctx = WidgetContext::new();
        let config = SpinnerConfig::from_toml_str(
            "minimum = -4\nmaximum = 4\ninitial = 1\nup_label = \"+\"\ndown_label = \"-\"\n[entry]\nstep = 3",
        )
        .unwrap();
        let mut spinner = NumericSpinner::with_config(&mut ctx, config);

        let mut draw = RecordingContext::new(Size::new(200.0, 100.0));
        spinner.render(&ctx, &mut draw);
        assert_eq!(draw.texts(), vec!["1", "+", "-"]);

        click(&mut spinner, &mut ctx, UP);
        assert_eq!(spinner.value(), 4);
        click(&mut spinner, &mut ctx, DOWN);
        click(&mut spinner, &mut ctx, DOWN);
        click(&mut spinner, &mut ctx, DOWN);
        assert_eq!(spinner.value(), -4);
    }

    #[test]
    fn test_returned_entry_sees_layout() {
        let mut ctx = WidgetContext::new();
        let (mut spinner, entry) = numeric_entry_with_buttons(&mut ctx, 0, 10, 3);
        assert_eq!(entry.bounds(), Rect::new(0.0, 0.0, 80.0, 28.0));

        spinner.layout(Rect::new(10.0, 5.0, 98.0, 28.0));
        assert_eq!(entry.bounds(), Rect::new(10.0, 5.0, 80.0, 28.0));
        assert_eq!(spinner.entry().bounds(), entry.bounds());

        // A standalone render of the handle draws where the row placed it
        let mut draw = RecordingContext::new(Size::new(200.0, 100.0));
        entry.render(&ctx, &mut draw);
        assert!(matches!(
            draw.commands().first(),
            Some(DrawCommand::FillRect { rect, .. }) if *rect == Rect::new(10.0, 5.0, 80.0, 28.0)
        ));
    }

    #[test]
    fn test_wake_set_after_build_reaches_entry() {
        let mut ctx = WidgetContext::new();
        let (_spinner, entry) = numeric_entry_with_buttons(&mut ctx, 0, 10, 0);

        let wakes = Arc::new(AtomicUsize::new(0));
        let w = wakes.clone();
        ctx.set_wake_callback(move || {
            w.fetch_add(1, Ordering::SeqCst);
        });

        let worker = entry.clone();
        thread::spawn(move || worker.increment()).join().unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert_eq!(entry.value(), 1);

        ctx.run_pending();
        assert_eq!(entry.text(), "1");
    }
}
