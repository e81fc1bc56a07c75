//! numspin Core
//!
//! Foundational primitives the numspin widgets are written against:
//!
//! - **Geometry & Color**: points, sizes, rects, colors and brushes
//! - **Draw Context**: a minimal rendering API plus a recording implementation
//! - **Events**: a platform-neutral pointer/keyboard/text event model
//! - **State Machines**: small transition tables for widget interaction states
//! - **Dispatch**: an explicit queue for marshaling work onto the UI thread
//!
//! # Example
//!
//! ```rust
//! use numspin_core::fsm::StateMachine;
//! use numspin_core::events::event_types;
//!
//! const IDLE: u32 = 0;
//! const HOVERED: u32 = 1;
//!
//! let mut fsm = StateMachine::builder(IDLE)
//!     .on(IDLE, event_types::POINTER_ENTER, HOVERED)
//!     .on(HOVERED, event_types::POINTER_LEAVE, IDLE)
//!     .build();
//!
//! fsm.send(event_types::POINTER_ENTER);
//! assert_eq!(fsm.current_state(), HOVERED);
//! ```

pub mod dispatch;
pub mod draw;
pub mod error;
pub mod events;
pub mod fsm;
pub mod layer;

pub use dispatch::{ui_queue, UiHandle, UiQueue, UiTask, WakeCallback};
pub use draw::{DrawCommand, DrawContext, RecordingContext, TextAlign, TextStyle};
pub use error::{NumspinError, Result};
pub use events::{event_types, Event, EventData, EventType, KeyCode, Modifiers, MouseButton};
pub use fsm::{EventId, StateId, StateMachine, Transition};
pub use layer::{Brush, Color, CornerRadius, Point, Rect, Size};
