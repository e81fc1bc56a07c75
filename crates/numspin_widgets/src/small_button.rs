//! SmallButton widget - a compact pressable control with hover shading and
//! press-and-hold auto-repeat
//!
//! The SmallButton provides:
//! - Visual states: idle, hovered, pressed (FSM-driven)
//! - A tap callback fired on click (release after press)
//! - Auto-repeat of the tap callback while the primary button is held
//! - Two fixed background shades selected by hover state

use std::sync::Arc;

use numspin_core::draw::{DrawContext, TextAlign, TextStyle};
use numspin_core::error::Result;
use numspin_core::events::{event_types, Event, MouseButton};
use numspin_core::fsm::StateMachine;
use numspin_core::{Color, CornerRadius, Size};
use serde::{Deserialize, Serialize};

use crate::context::WidgetContext;
use crate::repeat::{AutoRepeat, RepeatCallback, RepeatConfig};
use crate::widget::{Widget, WidgetBase};

/// Tap callback; may run on the UI thread (click) or a repeat worker (hold)
pub type TapCallback = RepeatCallback;

/// SmallButton FSM states
pub mod states {
    /// Pointer outside the button
    pub const IDLE: u32 = 0;
    /// Pointer over the button
    pub const HOVERED: u32 = 1;
    /// Primary button held down on the button
    pub const PRESSED: u32 = 2;
}

/// SmallButton configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmallButtonConfig {
    /// Minimum size of the button
    pub min_size: Size,
    /// Background when not hovered
    pub bg_color: Color,
    /// Background while hovered
    pub hover_bg_color: Color,
    /// Label color
    pub text_color: Color,
    /// Label font size
    pub font_size: f32,
    /// Auto-repeat timing
    pub repeat: RepeatConfig,
}

impl Default for SmallButtonConfig {
    fn default() -> Self {
        Self {
            min_size: Size::new(18.0, 14.0),
            bg_color: Color::rgb8(230, 230, 230),
            hover_bg_color: Color::rgb8(200, 200, 200),
            text_color: Color::BLACK,
            font_size: 9.0,
            repeat: RepeatConfig::default(),
        }
    }
}

impl SmallButtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a config from TOML; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn min_size(mut self, width: f32, height: f32) -> Self {
        self.min_size = Size::new(width, height);
        self
    }

    pub fn bg_color(mut self, color: Color) -> Self {
        self.bg_color = color;
        self
    }

    pub fn hover_bg_color(mut self, color: Color) -> Self {
        self.hover_bg_color = color;
        self
    }

    pub fn repeat(mut self, repeat: RepeatConfig) -> Self {
        self.repeat = repeat;
        self
    }
}

/// SmallButton widget
pub struct SmallButton {
    base: WidgetBase,
    label: String,
    config: SmallButtonConfig,
    on_tapped: Option<TapCallback>,
    repeat: AutoRepeat,
}

impl SmallButton {
    /// Create a button with a label and tap callback
    pub fn new<F>(ctx: &mut WidgetContext, label: impl Into<String>, on_tapped: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        small_button(label).on_tapped(on_tapped).build(ctx)
    }

    /// Create a button with custom config and no callback
    pub fn with_config(
        ctx: &mut WidgetContext,
        label: impl Into<String>,
        config: SmallButtonConfig,
    ) -> Self {
        let base = WidgetBase::with_fsm(ctx, Self::create_fsm());
        let repeat = AutoRepeat::new(config.repeat);
        Self {
            base,
            label: label.into(),
            config,
            on_tapped: None,
            repeat,
        }
    }

    fn create_fsm() -> StateMachine {
        StateMachine::builder(states::IDLE)
            .on(states::IDLE, event_types::POINTER_ENTER, states::HOVERED)
            .on(states::IDLE, event_types::POINTER_DOWN, states::PRESSED)
            .on(states::HOVERED, event_types::POINTER_LEAVE, states::IDLE)
            .on(states::HOVERED, event_types::POINTER_DOWN, states::PRESSED)
            // Release over the button is the click
            .on(states::PRESSED, event_types::POINTER_UP, states::HOVERED)
            .on(states::PRESSED, event_types::POINTER_LEAVE, states::IDLE)
            .build()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &SmallButtonConfig {
        &self.config
    }

    /// Set the tap callback
    pub fn set_on_tapped<F: Fn() + Send + Sync + 'static>(&mut self, callback: F) {
        self.on_tapped = Some(Arc::new(callback));
    }

    /// Whether the pointer is over the button
    pub fn is_hovered(&self, ctx: &WidgetContext) -> bool {
        matches!(
            ctx.get_fsm_state(self.base.id()),
            Some(states::HOVERED) | Some(states::PRESSED)
        )
    }

    /// Whether a press-and-hold repeat is armed
    pub fn is_repeating(&self) -> bool {
        self.repeat.is_active()
    }

    /// Invoke the tap callback; no-op without one
    pub fn tap(&self) {
        if let Some(ref callback) = self.on_tapped {
            callback();
        }
    }

    fn start_repeat(&mut self) {
        if self.repeat.is_active() {
            return;
        }
        let callback: TapCallback = match self.on_tapped {
            Some(ref callback) => Arc::clone(callback),
            None => Arc::new(|| {}),
        };
        self.repeat.start(callback);
    }

    /// Cancel the repeat worker; returns the ticks it fired if one was armed
    fn stop_repeat(&mut self) -> Option<usize> {
        self.repeat.stop()
    }
}

impl Widget for SmallButton {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn min_size(&self) -> Size {
        self.config.min_size
    }

    fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        let id = self.base.id();

        // Only the primary button presses and clicks
        if matches!(
            event.event_type,
            event_types::POINTER_DOWN | event_types::POINTER_UP
        ) && event.button() != Some(MouseButton::PRIMARY)
        {
            return;
        }

        let old_state = ctx.get_fsm_state(id).unwrap_or(states::IDLE);
        ctx.dispatch_event(id, event);
        let new_state = ctx.get_fsm_state(id).unwrap_or(states::IDLE);

        match event.event_type {
            event_types::POINTER_DOWN => self.start_repeat(),
            event_types::POINTER_UP => {
                let ticks = self.stop_repeat().unwrap_or(0);
                let clicked = old_state == states::PRESSED && new_state == states::HOVERED;
                // A hold that already repeated does not add a click on release
                if clicked && ticks == 0 {
                    tracing::trace!(label = %self.label, "small button tapped");
                    self.tap();
                }
            }
            event_types::POINTER_LEAVE => {
                self.stop_repeat();
            }
            _ => {}
        }
    }

    fn render(&self, ctx: &WidgetContext, draw: &mut dyn DrawContext) {
        let bounds = self.base.bounds();
        let bg = if self.is_hovered(ctx) {
            self.config.hover_bg_color
        } else {
            self.config.bg_color
        };

        draw.fill_rect(bounds, CornerRadius::ZERO, bg.into());
        draw.draw_text(
            &self.label,
            bounds.center(),
            &TextStyle::new(self.config.font_size)
                .with_color(self.config.text_color)
                .with_align(TextAlign::Center),
        );
    }
}

/// Create a small button
pub fn small_button(label: impl Into<String>) -> SmallButtonBuilder {
    SmallButtonBuilder {
        label: label.into(),
        config: SmallButtonConfig::default(),
        on_tapped: None,
    }
}

/// Builder for creating small buttons
pub struct SmallButtonBuilder {
    label: String,
    config: SmallButtonConfig,
    on_tapped: Option<TapCallback>,
}

impl SmallButtonBuilder {
    /// Replace the whole config
    pub fn config(mut self, config: SmallButtonConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the auto-repeat timing
    pub fn repeat(mut self, repeat: RepeatConfig) -> Self {
        self.config.repeat = repeat;
        self
    }

    /// Set the tap callback
    pub fn on_tapped<F: Fn() + Send + Sync + 'static>(mut self, callback: F) -> Self {
        self.on_tapped = Some(Arc::new(callback));
        self
    }

    /// Build the button widget
    pub fn build(self, ctx: &mut WidgetContext) -> SmallButton {
        let mut button = SmallButton::with_config(ctx, self.label, self.config);
        button.on_tapped = self.on_tapped;
        button
    }
}
