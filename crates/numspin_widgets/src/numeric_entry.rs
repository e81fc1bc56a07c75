//! NumericEntry widget - a single-line text entry constrained to integers
//!
//! The NumericEntry provides:
//! - Keystroke filtering: digits always, '-' only as the first character
//!   of an empty buffer and only when negative values are allowed
//! - A committed value that is always clamped into `[minimum, maximum]`
//! - Canonical display text (leading zeros and overflow are normalized)
//! - A change callback, plus `increment`/`decrement` by a step
//! - Visual states: idle, hovered, focused (FSM-driven)
//!
//! `NumericEntry` is a handle: clones share the same value, text buffer
//! and callback, so an entry can sit in a widget tree while another clone
//! is used to query or drive it, including from other threads.

use std::sync::Arc;

use numspin_core::dispatch::UiHandle;
use numspin_core::draw::{DrawContext, TextStyle};
use numspin_core::error::Result;
use numspin_core::events::{event_types, Event, EventData, KeyCode, Modifiers};
use numspin_core::fsm::StateMachine;
use numspin_core::{Color, CornerRadius, Point, Rect, Size};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::context::{DirtyHandle, WidgetContext};
use crate::widget::{Widget, WidgetBase};

/// Value-changed callback; may run on the UI thread or a repeat worker
pub type ChangeCallback = Arc<dyn Fn(i64) + Send + Sync>;

/// NumericEntry FSM states
pub mod states {
    /// Idle state (unfocused, not hovered)
    pub const IDLE: u32 = 0;
    /// Hovered state (unfocused, pointer over the entry)
    pub const HOVERED: u32 = 1;
    /// Focused state (accepting input)
    pub const FOCUSED: u32 = 2;
    /// Focused and hovered
    pub const FOCUSED_HOVERED: u32 = 3;
}

/// NumericEntry configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericEntryConfig {
    /// Amount added/subtracted by increment/decrement
    pub step: i64,
    /// Minimum width of the entry
    pub width: f32,
    /// Minimum height of the entry
    pub height: f32,
    /// Font size
    pub font_size: f32,
    /// Text color
    pub text_color: Color,
    /// Background color
    pub bg_color: Color,
    /// Focused background color
    pub focused_bg_color: Color,
    /// Border color
    pub border_color: Color,
    /// Focused border color
    pub focused_border_color: Color,
    /// Border width
    pub border_width: f32,
    /// Corner radius
    pub corner_radius: f32,
    /// Horizontal padding
    pub padding_x: f32,
    /// Cursor color
    pub cursor_color: Color,
    /// Selection color
    pub selection_color: Color,
}

impl Default for NumericEntryConfig {
    fn default() -> Self {
        Self {
            step: 1,
            width: 80.0,
            height: 28.0,
            font_size: 14.0,
            text_color: Color::BLACK,
            bg_color: Color::WHITE,
            focused_bg_color: Color::WHITE,
            border_color: Color::rgb8(180, 180, 180),
            focused_border_color: Color::rgba(0.4, 0.6, 1.0, 1.0),
            border_width: 1.0,
            corner_radius: 4.0,
            padding_x: 6.0,
            cursor_color: Color::rgba(0.4, 0.6, 1.0, 1.0),
            selection_color: Color::rgba(0.4, 0.6, 1.0, 0.3),
        }
    }
}

impl NumericEntryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a config from TOML; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Set the increment/decrement step
    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Set the width
    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the height
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the font size
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }
}

// =============================================================================
// Text buffer
// =============================================================================

/// Editable text with a character cursor and optional selection
#[derive(Clone, Debug, Default)]
pub struct EntryBuffer {
    /// Current text
    pub text: String,
    /// Cursor position (character index)
    pub cursor_pos: usize,
    /// Selection anchor (if selecting)
    pub selection_start: Option<usize>,
}

impl EntryBuffer {
    pub fn new(text: String) -> Self {
        let cursor_pos = text.chars().count();
        Self {
            text,
            cursor_pos,
            selection_start: None,
        }
    }

    /// Replace the text and move the cursor to the end
    pub fn set_text(&mut self, text: String) {
        self.cursor_pos = text.chars().count();
        self.text = text;
        self.selection_start = None;
    }

    /// Insert a character at the cursor, replacing any selection
    pub fn insert(&mut self, ch: char) {
        self.delete_selection();
        let byte_pos = self.char_to_byte_pos(self.cursor_pos);
        self.text.insert(byte_pos, ch);
        self.cursor_pos += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn delete_backward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor_pos > 0 {
            let byte_start = self.char_to_byte_pos(self.cursor_pos - 1);
            let byte_end = self.char_to_byte_pos(self.cursor_pos);
            self.text.replace_range(byte_start..byte_end, "");
            self.cursor_pos -= 1;
        }
    }

    /// Delete character after cursor (delete key)
    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor_pos < self.text.chars().count() {
            let byte_start = self.char_to_byte_pos(self.cursor_pos);
            let byte_end = self.char_to_byte_pos(self.cursor_pos + 1);
            self.text.replace_range(byte_start..byte_end, "");
        }
    }

    /// Delete selected text, returns true if there was a selection
    fn delete_selection(&mut self) -> bool {
        let Some((from, to)) = self.selection_range() else {
            self.selection_start = None;
            return false;
        };
        let byte_start = self.char_to_byte_pos(from);
        let byte_end = self.char_to_byte_pos(to);
        self.text.replace_range(byte_start..byte_end, "");
        self.cursor_pos = from;
        self.selection_start = None;
        true
    }

    /// Selected character range, if non-empty
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let start = self.selection_start?;
        let (from, to) = if start < self.cursor_pos {
            (start, self.cursor_pos)
        } else {
            (self.cursor_pos, start)
        };
        (from != to).then_some((from, to))
    }

    /// Move cursor left
    pub fn move_left(&mut self, select: bool) {
        if !select {
            if let Some((from, _)) = self.selection_range() {
                self.cursor_pos = from;
                self.selection_start = None;
                return;
            }
            self.selection_start = None;
        } else if self.selection_start.is_none() {
            self.selection_start = Some(self.cursor_pos);
        }
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor right
    pub fn move_right(&mut self, select: bool) {
        if !select {
            if let Some((_, to)) = self.selection_range() {
                self.cursor_pos = to;
                self.selection_start = None;
                return;
            }
            self.selection_start = None;
        } else if self.selection_start.is_none() {
            self.selection_start = Some(self.cursor_pos);
        }
        if self.cursor_pos < self.text.chars().count() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to start
    pub fn move_to_start(&mut self, select: bool) {
        if select && self.selection_start.is_none() {
            self.selection_start = Some(self.cursor_pos);
        } else if !select {
            self.selection_start = None;
        }
        self.cursor_pos = 0;
    }

    /// Move cursor to end
    pub fn move_to_end(&mut self, select: bool) {
        if select && self.selection_start.is_none() {
            self.selection_start = Some(self.cursor_pos);
        } else if !select {
            self.selection_start = None;
        }
        self.cursor_pos = self.text.chars().count();
    }

    /// Select all text
    pub fn select_all(&mut self) {
        self.selection_start = Some(0);
        self.cursor_pos = self.text.chars().count();
    }

    /// Apply an editing key
    pub fn apply_key(&mut self, key: KeyCode, modifiers: Modifiers) {
        let select = modifiers.shift();
        let command = modifiers.command();

        match key {
            KeyCode::BACKSPACE if command => {
                // Delete to start of line
                self.move_to_start(true);
                self.delete_selection();
            }
            KeyCode::BACKSPACE => self.delete_backward(),
            KeyCode::DELETE if command => {
                // Delete to end of line
                self.move_to_end(true);
                self.delete_selection();
            }
            KeyCode::DELETE => self.delete_forward(),
            KeyCode::LEFT if command => self.move_to_start(select),
            KeyCode::LEFT => self.move_left(select),
            KeyCode::RIGHT if command => self.move_to_end(select),
            KeyCode::RIGHT => self.move_right(select),
            KeyCode::HOME => self.move_to_start(select),
            KeyCode::END => self.move_to_end(select),
            KeyCode::A if command => self.select_all(),
            _ => {}
        }
    }

    /// Convert character index to byte index
    fn char_to_byte_pos(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Text before the given character index
    fn prefix(&self, char_pos: usize) -> &str {
        &self.text[..self.char_to_byte_pos(char_pos)]
    }
}

// =============================================================================
// Shared entry state
// =============================================================================

struct EntryShared {
    minimum: i64,
    maximum: i64,
    step: i64,
    value: i64,
    buffer: EntryBuffer,
    on_changed: Option<ChangeCallback>,
    /// Laid-out bounds, shared by every clone of the handle
    bounds: Rect,
}

/// A pending change notification, fired after the lock is released
type Notify = Option<(ChangeCallback, i64)>;

impl EntryShared {
    fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.minimum, self.maximum)
    }

    /// Whether a typed character may enter the buffer
    fn accepts(&self, ch: char) -> bool {
        match ch {
            '0'..='9' => true,
            '-' => self.minimum < 0 && self.buffer.text.is_empty(),
            _ => false,
        }
    }

    /// Re-derive the committed value from the buffer text
    fn commit_text(&mut self) -> Notify {
        let trimmed = self.buffer.text.trim().to_string();
        if trimmed.is_empty() || trimmed == "-" {
            // Edit in progress; keep the last committed value
            return None;
        }
        let Ok(parsed) = trimmed.parse::<i64>() else {
            return None;
        };

        let clamped = self.clamp(parsed);
        let notify = if clamped != self.value {
            self.value = clamped;
            self.on_changed.clone().map(|cb| (cb, clamped))
        } else {
            None
        };

        let canonical = self.value.to_string();
        if canonical != trimmed {
            self.buffer.set_text(canonical);
        }
        notify
    }
}

fn fire(notify: Notify) {
    if let Some((callback, value)) = notify {
        callback(value);
    }
}

// =============================================================================
// Widget
// =============================================================================

/// NumericEntry widget
#[derive(Clone)]
pub struct NumericEntry {
    base: WidgetBase,
    config: NumericEntryConfig,
    shared: Arc<Mutex<EntryShared>>,
    ui: UiHandle,
    dirty: DirtyHandle,
}

impl NumericEntry {
    /// Create an entry for `[minimum, maximum]` starting at `initial` (clamped)
    pub fn new(ctx: &mut WidgetContext, minimum: i64, maximum: i64, initial: i64) -> Self {
        numeric_entry()
            .range(minimum, maximum)
            .value(initial)
            .build(ctx)
    }

    /// Create an entry with custom config
    pub fn with_config(
        ctx: &mut WidgetContext,
        minimum: i64,
        maximum: i64,
        initial: i64,
        config: NumericEntryConfig,
    ) -> Self {
        let (minimum, maximum) = if minimum > maximum {
            tracing::warn!(minimum, maximum, "NumericEntry: bounds reversed, swapping");
            (maximum, minimum)
        } else {
            (minimum, maximum)
        };
        let step = if config.step > 0 {
            config.step
        } else {
            tracing::warn!(step = config.step, "NumericEntry: non-positive step, using 1");
            1
        };

        let value = initial.clamp(minimum, maximum);
        let base = WidgetBase::with_fsm(ctx, Self::create_fsm());
        tracing::debug!(minimum, maximum, value, "NumericEntry created");

        Self {
            base,
            config,
            shared: Arc::new(Mutex::new(EntryShared {
                minimum,
                maximum,
                step,
                value,
                buffer: EntryBuffer::new(value.to_string()),
                on_changed: None,
                bounds: Rect::ZERO,
            })),
            ui: ctx.ui_handle(),
            dirty: ctx.dirty_handle(),
        }
    }

    /// Create the entry FSM
    fn create_fsm() -> StateMachine {
        StateMachine::builder(states::IDLE)
            // Idle transitions
            .on(states::IDLE, event_types::POINTER_ENTER, states::HOVERED)
            .on(states::IDLE, event_types::POINTER_DOWN, states::FOCUSED)
            .on(states::IDLE, event_types::FOCUS, states::FOCUSED)
            // Hovered transitions
            .on(states::HOVERED, event_types::POINTER_LEAVE, states::IDLE)
            .on(
                states::HOVERED,
                event_types::POINTER_DOWN,
                states::FOCUSED_HOVERED,
            )
            .on(states::HOVERED, event_types::FOCUS, states::FOCUSED_HOVERED)
            // Focused transitions
            .on(states::FOCUSED, event_types::BLUR, states::IDLE)
            .on(
                states::FOCUSED,
                event_types::POINTER_ENTER,
                states::FOCUSED_HOVERED,
            )
            // Focused+Hovered transitions
            .on(
                states::FOCUSED_HOVERED,
                event_types::POINTER_LEAVE,
                states::FOCUSED,
            )
            .on(states::FOCUSED_HOVERED, event_types::BLUR, states::HOVERED)
            .build()
    }

    // =========================================================================
    // Value access
    // =========================================================================

    /// The committed value
    pub fn value(&self) -> i64 {
        self.shared.lock().value
    }

    /// Set the value programmatically
    ///
    /// Clamps, updates the committed value, schedules the display text update
    /// on the UI thread and always fires the change callback, even if the
    /// clamped value equals the previous one.
    pub fn set_value(&self, value: i64) {
        self.update_value(|_| value);
    }

    /// Add one step, stopping at the maximum
    pub fn increment(&self) {
        self.update_value(|shared| shared.value.saturating_add(shared.step));
    }

    /// Subtract one step, stopping at the minimum
    pub fn decrement(&self) {
        self.update_value(|shared| shared.value.saturating_sub(shared.step));
    }

    /// Compute, clamp and commit a new value under one lock, then schedule
    /// the text update and notify
    fn update_value<F: FnOnce(&EntryShared) -> i64>(&self, next: F) {
        let notify = {
            let mut shared = self.shared.lock();
            let value = shared.clamp(next(&*shared));
            shared.value = value;
            shared.on_changed.clone().map(|cb| (cb, value))
        };

        let shared = Arc::clone(&self.shared);
        let dirty = self.dirty.clone();
        let id = self.base.id();
        self.ui.post(move || {
            let mut shared = shared.lock();
            let canonical = shared.value.to_string();
            if shared.buffer.text != canonical {
                shared.buffer.set_text(canonical);
            }
            dirty.mark(id);
        });

        fire(notify);
    }

    pub fn minimum(&self) -> i64 {
        self.shared.lock().minimum
    }

    pub fn maximum(&self) -> i64 {
        self.shared.lock().maximum
    }

    pub fn step(&self) -> i64 {
        self.shared.lock().step
    }

    /// Set the increment/decrement step; non-positive steps are ignored
    pub fn set_step(&self, step: i64) {
        if step > 0 {
            self.shared.lock().step = step;
        }
    }

    /// The displayed text
    pub fn text(&self) -> String {
        self.shared.lock().buffer.text.clone()
    }

    /// Set the change callback
    pub fn set_on_changed<F: Fn(i64) + Send + Sync + 'static>(&self, callback: F) {
        self.shared.lock().on_changed = Some(Arc::new(callback));
    }

    /// Set the change callback (builder style)
    pub fn on_changed<F: Fn(i64) + Send + Sync + 'static>(self, callback: F) -> Self {
        self.set_on_changed(callback);
        self
    }

    pub fn config(&self) -> &NumericEntryConfig {
        &self.config
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feed one typed character through the filter
    pub fn typed_rune(&self, ch: char) {
        let notify = {
            let mut shared = self.shared.lock();
            if !shared.accepts(ch) {
                tracing::trace!(?ch, "NumericEntry: rejected character");
                return;
            }
            shared.buffer.insert(ch);
            shared.commit_text()
        };
        fire(notify);
    }

    /// Feed committed text (typing or paste), one character at a time
    pub fn typed_text(&self, text: &str) {
        for ch in text.chars() {
            self.typed_rune(ch);
        }
    }

    /// Feed an editing key
    ///
    /// Up/Down step the value; every other key goes to the text buffer
    /// and the value is re-derived afterwards.
    pub fn typed_key(&self, key: KeyCode, modifiers: Modifiers) {
        match key {
            KeyCode::UP => return self.increment(),
            KeyCode::DOWN => return self.decrement(),
            _ => {}
        }

        let notify = {
            let mut shared = self.shared.lock();
            shared.buffer.apply_key(key, modifiers);
            shared.commit_text()
        };
        fire(notify);
    }

    /// Check if the entry is focused
    pub fn is_focused(&self, ctx: &WidgetContext) -> bool {
        matches!(
            ctx.get_fsm_state(self.base.id()),
            Some(states::FOCUSED) | Some(states::FOCUSED_HOVERED)
        )
    }

    /// Give the entry keyboard focus
    pub fn focus(&mut self, ctx: &mut WidgetContext) {
        self.handle_event(ctx, &Event::new(event_types::FOCUS, EventData::None));
    }

    /// Take keyboard focus away from the entry
    pub fn blur(&mut self, ctx: &mut WidgetContext) {
        self.handle_event(ctx, &Event::new(event_types::BLUR, EventData::None));
    }
}

impl Widget for NumericEntry {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn min_size(&self) -> Size {
        Size::new(self.config.width, self.config.height)
    }

    fn layout(&mut self, bounds: Rect) {
        self.base.set_bounds(bounds);
        self.shared.lock().bounds = bounds;
    }

    fn bounds(&self) -> Rect {
        self.shared.lock().bounds
    }

    fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        let id = self.base.id();
        let was_focused = self.is_focused(ctx);
        ctx.dispatch_event(id, event);
        let is_focused = self.is_focused(ctx);

        if !was_focused && is_focused {
            // Just gained focus - select all text
            self.shared.lock().buffer.select_all();
            ctx.mark_dirty(id);
        }
        if !is_focused {
            return;
        }

        match (event.event_type, &event.data) {
            (event_types::TEXT_INPUT, EventData::TextInput { text }) => self.typed_text(text),
            (event_types::KEY_DOWN, EventData::Key { key, modifiers, .. }) => {
                self.typed_key(*key, *modifiers)
            }
            _ => return,
        }
        ctx.mark_dirty(id);
    }

    fn render(&self, ctx: &WidgetContext, draw: &mut dyn DrawContext) {
        let bounds = self.bounds();
        let focused = self.is_focused(ctx);
        let config = &self.config;

        let (text, cursor_x, selection) = {
            let shared = self.shared.lock();
            let style = TextStyle::new(config.font_size);
            let buffer = &shared.buffer;
            let cursor_x = style.approx_width(buffer.prefix(buffer.cursor_pos));
            let selection = buffer.selection_range().map(|(from, to)| {
                (
                    style.approx_width(buffer.prefix(from)),
                    style.approx_width(buffer.prefix(to)),
                )
            });
            (buffer.text.clone(), cursor_x, selection)
        };

        let (border, bg) = if focused {
            (config.focused_border_color, config.focused_bg_color)
        } else {
            (config.border_color, config.bg_color)
        };

        // Border, then inner background
        draw.fill_rect(
            bounds,
            CornerRadius::uniform(config.corner_radius),
            border.into(),
        );
        let inner = bounds.inset(config.border_width, config.border_width);
        draw.fill_rect(
            inner,
            CornerRadius::uniform((config.corner_radius - config.border_width).max(0.0)),
            bg.into(),
        );

        draw.push_clip(inner);
        let text_x = inner.x() + config.padding_x;
        let center_y = inner.center().y;
        let line_height = config.font_size + 4.0;

        if focused {
            if let Some((from_x, to_x)) = selection {
                draw.fill_rect(
                    Rect::new(
                        text_x + from_x,
                        center_y - line_height / 2.0,
                        to_x - from_x,
                        line_height,
                    ),
                    CornerRadius::ZERO,
                    config.selection_color.into(),
                );
            }
        }

        draw.draw_text(
            &text,
            Point::new(text_x, center_y),
            &TextStyle::new(config.font_size).with_color(config.text_color),
        );

        if focused {
            draw.fill_rect(
                Rect::new(
                    text_x + cursor_x,
                    center_y - line_height / 2.0,
                    2.0,
                    line_height,
                ),
                CornerRadius::ZERO,
                config.cursor_color.into(),
            );
        }
        draw.pop_clip();
    }
}

/// Create a numeric entry
pub fn numeric_entry() -> NumericEntryBuilder {
    NumericEntryBuilder {
        minimum: i64::MIN,
        maximum: i64::MAX,
        initial: 0,
        config: NumericEntryConfig::default(),
        on_changed: None,
    }
}

/// Builder for creating numeric entries
pub struct NumericEntryBuilder {
    minimum: i64,
    maximum: i64,
    initial: i64,
    config: NumericEntryConfig,
    on_changed: Option<ChangeCallback>,
}

impl NumericEntryBuilder {
    /// Set both bounds
    pub fn range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Set the minimum value
    pub fn min(mut self, minimum: i64) -> Self {
        self.minimum = minimum;
        self
    }

    /// Set the maximum value
    pub fn max(mut self, maximum: i64) -> Self {
        self.maximum = maximum;
        self
    }

    /// Set the initial value (clamped on build)
    pub fn value(mut self, initial: i64) -> Self {
        self.initial = initial;
        self
    }

    /// Set the increment/decrement step
    pub fn step(mut self, step: i64) -> Self {
        self.config.step = step;
        self
    }

    /// Replace the whole config
    pub fn config(mut self, config: NumericEntryConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the width
    pub fn width(mut self, width: f32) -> Self {
        self.config.width = width;
        self
    }

    /// Set the change callback
    pub fn on_changed<F: Fn(i64) + Send + Sync + 'static>(mut self, callback: F) -> Self {
        self.on_changed = Some(Arc::new(callback));
        self
    }

    /// Build the entry widget
    pub fn build(self, ctx: &mut WidgetContext) -> NumericEntry {
        let entry = NumericEntry::with_config(
            ctx,
            self.minimum,
            self.maximum,
            self.initial,
            self.config,
        );
        entry.shared.lock().on_changed = self.on_changed;
        entry
    }
}
