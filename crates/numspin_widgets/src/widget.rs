//! Widget trait and shared base
//!
//! Widgets are concrete types that *hold* a [`WidgetBase`] (identity and
//! laid-out bounds) and expose measure/layout/event/render through the
//! [`Widget`] trait.

use numspin_core::draw::DrawContext;
use numspin_core::events::Event;
use numspin_core::fsm::StateMachine;
use numspin_core::{Rect, Size};
use slotmap::new_key_type;

use crate::context::WidgetContext;

new_key_type! {
    /// Unique identifier for a widget registered with a [`WidgetContext`]
    pub struct WidgetId;
}

/// Identity and geometry shared by every widget
#[derive(Clone, Debug)]
pub struct WidgetBase {
    id: WidgetId,
    bounds: Rect,
}

impl WidgetBase {
    /// Register a plain widget
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self {
            id: ctx.register_widget(),
            bounds: Rect::ZERO,
        }
    }

    /// Register a widget driven by an interaction state machine
    pub fn with_fsm(ctx: &mut WidgetContext, fsm: StateMachine) -> Self {
        Self {
            id: ctx.register_widget_with_fsm(fsm),
            bounds: Rect::ZERO,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}

/// The contract every widget implements
pub trait Widget {
    /// Shared identity and geometry
    fn base(&self) -> &WidgetBase;

    /// Mutable access to the shared base
    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Smallest size the widget can be laid out at
    fn min_size(&self) -> Size;

    /// Handle an event routed to this widget
    fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event);

    /// Paint the widget into its current bounds
    fn render(&self, ctx: &WidgetContext, draw: &mut dyn DrawContext);

    /// Assign the widget's bounds
    fn layout(&mut self, bounds: Rect) {
        self.base_mut().set_bounds(bounds);
    }

    fn id(&self) -> WidgetId {
        self.base().id()
    }

    fn bounds(&self) -> Rect {
        self.base().bounds()
    }
}
