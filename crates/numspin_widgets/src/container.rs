//! Row and column containers
//!
//! A [`Stack`] lays its children out along one axis at their minimum
//! size, stretched across the other axis. Pointer events go to the child
//! under the pointer, with enter/leave synthesized as the hovered child
//! changes; a pressed child keeps receiving the matching release.
//! Keyboard, text and focus events are forwarded to every child.

use numspin_core::draw::DrawContext;
use numspin_core::events::{event_types, Event, EventData, MouseButton};
use numspin_core::{Point, Rect, Size};

use crate::context::WidgetContext;
use crate::widget::{Widget, WidgetBase};

/// Main axis of a [`Stack`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    fn size(self, main: f32, cross: f32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }
}

/// Horizontal or vertical run of child widgets
pub struct Stack {
    base: WidgetBase,
    axis: Axis,
    gap: f32,
    children: Vec<Box<dyn Widget>>,
    /// Child currently under the pointer
    hovered: Option<usize>,
    /// Child that received the last pointer-down
    captured: Option<usize>,
}

/// Create a horizontal stack
pub fn hbox(ctx: &mut WidgetContext) -> Stack {
    Stack::new(ctx, Axis::Horizontal)
}

/// Create a vertical stack
pub fn vbox(ctx: &mut WidgetContext) -> Stack {
    Stack::new(ctx, Axis::Vertical)
}

impl Stack {
    pub fn new(ctx: &mut WidgetContext, axis: Axis) -> Self {
        Self {
            base: WidgetBase::new(ctx),
            axis,
            gap: 0.0,
            children: Vec::new(),
            hovered: None,
            captured: None,
        }
    }

    /// Add a child (builder style)
    pub fn child(mut self, child: impl Widget + 'static) -> Self {
        self.push(child);
        self
    }

    /// Set the spacing between children (builder style)
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    /// Add a child
    pub fn push(&mut self, child: impl Widget + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Widget> {
        self.children.get(index).map(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.children.get_mut(index).map(|c| c.as_mut())
    }

    /// Index of the child whose bounds contain `point`
    fn hit_test(&self, point: Point) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.bounds().contains(point))
    }

    /// Move hover to `target`, sending leave/enter as needed
    fn update_hover(&mut self, ctx: &mut WidgetContext, target: Option<usize>, at: Point) {
        if target == self.hovered {
            return;
        }
        if let Some(old) = self.hovered.take() {
            let leave = Event::pointer(event_types::POINTER_LEAVE, at.x, at.y, MouseButton::PRIMARY);
            self.children[old].handle_event(ctx, &leave);
        }
        if let Some(new) = target {
            let enter = Event::pointer(event_types::POINTER_ENTER, at.x, at.y, MouseButton::PRIMARY);
            self.children[new].handle_event(ctx, &enter);
        }
        self.hovered = target;
    }

    fn handle_pointer(&mut self, ctx: &mut WidgetContext, event: &Event) {
        let Some(at) = event.position() else {
            return;
        };

        if event.event_type == event_types::POINTER_LEAVE {
            self.update_hover(ctx, None, at);
            return;
        }

        let hit = self.hit_test(at);
        self.update_hover(ctx, hit, at);

        match event.event_type {
            event_types::POINTER_DOWN => {
                if let Some(index) = hit {
                    self.children[index].handle_event(ctx, event);
                    if event.button() == Some(MouseButton::PRIMARY) {
                        self.captured = Some(index);
                    }
                }
                // Focus follows the press
                let blur = Event::new(event_types::BLUR, EventData::None);
                for (i, child) in self.children.iter_mut().enumerate() {
                    if Some(i) != hit {
                        child.handle_event(ctx, &blur);
                    }
                }
            }
            event_types::POINTER_UP => {
                let target = if event.button() == Some(MouseButton::PRIMARY) {
                    self.captured.take().or(hit)
                } else {
                    hit
                };
                if let Some(index) = target {
                    self.children[index].handle_event(ctx, event);
                }
            }
            event_types::POINTER_MOVE => {
                if let Some(index) = hit {
                    self.children[index].handle_event(ctx, event);
                }
            }
            _ => {}
        }
    }
}

impl Widget for Stack {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn min_size(&self) -> Size {
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        for child in &self.children {
            let size = child.min_size();
            main += self.axis.main(size);
            cross = cross.max(self.axis.cross(size));
        }
        if self.children.len() > 1 {
            main += self.gap * (self.children.len() - 1) as f32;
        }
        self.axis.size(main, cross)
    }

    fn layout(&mut self, bounds: Rect) {
        self.base.set_bounds(bounds);

        let axis = self.axis;
        let cross = axis.cross(bounds.size);
        let mut offset = 0.0;
        for child in &mut self.children {
            let main = axis.main(child.min_size());
            let origin = match axis {
                Axis::Horizontal => Point::new(bounds.x() + offset, bounds.y()),
                Axis::Vertical => Point::new(bounds.x(), bounds.y() + offset),
            };
            child.layout(Rect::from_origin_size(origin, axis.size(main, cross)));
            offset += main + self.gap;
        }
    }

    fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        if event.is_pointer() {
            self.handle_pointer(ctx, event);
            return;
        }
        for child in &mut self.children {
            child.handle_event(ctx, event);
        }
    }

    fn render(&self, ctx: &WidgetContext, draw: &mut dyn DrawContext) {
        for child in &self.children {
            child.render(ctx, draw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::small_button::{small_button, SmallButton};
    use numspin_core::draw::RecordingContext;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted(ctx: &mut WidgetContext, label: &str) -> (SmallButton, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let button = small_button(label)
            .on_tapped(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .build(ctx);
        (button, count)
    }

    fn click(stack: &mut Stack, ctx: &mut WidgetContext, x: f32, y: f32) {
        for event_type in [event_types::POINTER_DOWN, event_types::POINTER_UP] {
            stack.handle_event(ctx, &Event::pointer(event_type, x, y, MouseButton::PRIMARY));
        }
    }

    #[test]
    fn test_measure_and_layout() {
        let mut ctx = WidgetContext::new();
        let (a, _) = counted(&mut ctx, "a");
        let (b, _) = counted(&mut ctx, "b");
        let mut column = vbox(&mut ctx).child(a).child(b);
        assert_eq!(column.min_size(), Size::new(18.0, 28.0));

        column.layout(Rect::new(10.0, 0.0, 30.0, 28.0));
        assert_eq!(column.get(0).unwrap().bounds(), Rect::new(10.0, 0.0, 30.0, 14.0));
        assert_eq!(column.get(1).unwrap().bounds(), Rect::new(10.0, 14.0, 30.0, 14.0));

        let (c, _) = counted(&mut ctx, "c");
        let (d, _) = counted(&mut ctx, "d");
        let row = hbox(&mut ctx).gap(4.0).child(c).child(d);
        assert_eq!(row.min_size(), Size::new(40.0, 14.0));
        assert!(hbox(&mut ctx).is_empty());
    }

    #[test]
    fn test_pointer_routing() {
        let mut ctx = WidgetContext::new();
        let (left, left_count) = counted(&mut ctx, "l");
        let (right, right_count) = counted(&mut ctx, "r");
        let mut row = hbox(&mut ctx).child(left).child(right);
        let size = row.min_size();
        row.layout(Rect::new(0.0, 0.0, size.width, size.height));

        click(&mut row, &mut ctx, 5.0, 5.0);
        click(&mut row, &mut ctx, 25.0, 5.0);
        click(&mut row, &mut ctx, 25.0, 5.0);

        assert_eq!(left_count.load(Ordering::SeqCst), 1);
        assert_eq!(right_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hover_follows_pointer() {
        let mut ctx = WidgetContext::new();
        let (left, _) = counted(&mut ctx, "l");
        let (right, _) = counted(&mut ctx, "r");
        let mut row = hbox(&mut ctx).child(left).child(right);
        row.layout(Rect::new(0.0, 0.0, 36.0, 14.0));
        let left_id = row.get(0).unwrap().id();
        let right_id = row.get(1).unwrap().id();

        let moved = |x| Event::pointer(event_types::POINTER_MOVE, x, 5.0, MouseButton::PRIMARY);
        row.handle_event(&mut ctx, &moved(5.0));
        assert_eq!(ctx.get_fsm_state(left_id), Some(1));

        row.handle_event(&mut ctx, &moved(30.0));
        assert_eq!(ctx.get_fsm_state(left_id), Some(0));
        assert_eq!(ctx.get_fsm_state(right_id), Some(1));

        let leave = Event::pointer(event_types::POINTER_LEAVE, 50.0, 5.0, MouseButton::PRIMARY);
        row.handle_event(&mut ctx, &leave);
        assert_eq!(ctx.get_fsm_state(right_id), Some(0));
    }

    #[test]
    fn test_drag_off_cancels_click() {
        let mut ctx = WidgetContext::new();
        let (left, left_count) = counted(&mut ctx, "l");
        let (right, _) = counted(&mut ctx, "r");
        let mut row = hbox(&mut ctx).child(left).child(right);
        row.layout(Rect::new(0.0, 0.0, 36.0, 14.0));

        row.handle_event(
            &mut ctx,
            &Event::pointer(event_types::POINTER_DOWN, 5.0, 5.0, MouseButton::PRIMARY),
        );
        // Release over the other child: the pressed child saw a leave
        row.handle_event(
            &mut ctx,
            &Event::pointer(event_types::POINTER_UP, 30.0, 5.0, MouseButton::PRIMARY),
        );
        assert_eq!(left_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_render_in_order() {
        let mut ctx = WidgetContext::new();
        let (a, _) = counted(&mut ctx, "a");
        let (b, _) = counted(&mut ctx, "b");
        let mut row = hbox(&mut ctx).child(a).child(b);
        row.layout(Rect::new(0.0, 0.0, 36.0, 14.0));

        let mut draw = RecordingContext::new(Size::new(100.0, 100.0));
        row.render(&ctx, &mut draw);
        assert_eq!(draw.texts(), vec!["a", "b"]);
    }
}
