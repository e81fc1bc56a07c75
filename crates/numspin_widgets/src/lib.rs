//! numspin Widget Library
//!
//! An integer entry with increment/decrement spin buttons.
//!
//! # Architecture
//!
//! 1. **FSM-Driven Interactions**: Each widget registers a state machine
//!    with the [`WidgetContext`] for its interaction states (idle, hovered,
//!    pressed, focused). Transitions mark the widget dirty.
//!
//! 2. **Auto-Repeat Workers**: A [`SmallButton`] held down arms one worker
//!    thread that re-fires its tap callback after an initial delay, until
//!    release or pointer-leave cancels it.
//!
//! 3. **UI-Thread Marshaling**: Work started off the UI thread (repeat
//!    ticks) posts display updates to the context's queue, drained by
//!    [`WidgetContext::run_pending`].
//!
//! # Example
//!
//! ```rust
//! use numspin_widgets::prelude::*;
//!
//! let mut ctx = WidgetContext::new();
//! let (mut spinner, entry) = numeric_entry_with_buttons(&mut ctx, 0, 10, 15);
//! assert_eq!(entry.value(), 10);
//!
//! entry.set_on_changed(|value| println!("value: {}", value));
//!
//! // Click the decrement button (below the increment button, right of the entry)
//! for event_type in [event_types::POINTER_DOWN, event_types::POINTER_UP] {
//!     spinner.handle_event(
//!         &mut ctx,
//!         &Event::pointer(event_type, 89.0, 21.0, MouseButton::PRIMARY),
//!     );
//! }
//! assert_eq!(entry.value(), 9);
//!
//! // Once per frame on the UI thread
//! ctx.run_pending();
//! assert_eq!(entry.text(), "9");
//! ```

pub mod config;
pub mod container;
pub mod context;
pub mod numeric_entry;
pub mod repeat;
pub mod small_button;
pub mod spin;
pub mod widget;

pub use config::SpinnerConfig;
pub use container::{hbox, vbox, Axis, Stack};
pub use context::{DirtyHandle, DirtyTracker, WidgetContext};
pub use numeric_entry::{
    numeric_entry, ChangeCallback, EntryBuffer, NumericEntry, NumericEntryBuilder,
    NumericEntryConfig,
};
pub use repeat::{AutoRepeat, CancelToken, RepeatCallback, RepeatConfig};
pub use small_button::{
    small_button, SmallButton, SmallButtonBuilder, SmallButtonConfig, TapCallback,
};
pub use spin::{numeric_entry_with_buttons, NumericSpinner};
pub use widget::{Widget, WidgetBase, WidgetId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SpinnerConfig;
    pub use crate::container::{hbox, vbox, Stack};
    pub use crate::context::WidgetContext;
    pub use crate::numeric_entry::{numeric_entry, NumericEntry, NumericEntryConfig};
    pub use crate::repeat::RepeatConfig;
    pub use crate::small_button::{small_button, SmallButton, SmallButtonConfig};
    pub use crate::spin::{numeric_entry_with_buttons, NumericSpinner};
    pub use crate::widget::{Widget, WidgetId};
    pub use numspin_core::events::{event_types, Event, KeyCode, Modifiers, MouseButton};
}
