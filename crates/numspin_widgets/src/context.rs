//! Widget Context - widget registry, interaction FSMs, dirty tracking and
//! the UI-thread task queue
//!
//! The WidgetContext is owned by the UI thread. It provides:
//! - Registration of widgets and their interaction state machines
//! - Event dispatch into those state machines
//! - Dirty tracking so only changed widgets are repainted
//! - A [`UiQueue`] that background work posts into, drained by
//!   [`WidgetContext::run_pending`]

use std::sync::Arc;

use numspin_core::dispatch::{ui_queue, UiHandle, UiQueue};
use numspin_core::events::Event;
use numspin_core::fsm::{EventId, StateMachine};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::widget::WidgetId;

/// Per-widget data stored in the context
#[derive(Default)]
struct WidgetData {
    /// Optional FSM for interaction states
    fsm: Option<StateMachine>,
}

/// Dirty tracking for incremental re-renders
#[derive(Default)]
pub struct DirtyTracker {
    dirty: FxHashSet<WidgetId>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, id: WidgetId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: WidgetId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take all dirty widget IDs (clears the set)
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.drain().collect()
    }

    pub fn clear_all(&mut self) {
        self.dirty.clear();
    }
}

/// Shared mutable state accessible from other threads
#[derive(Default)]
struct SharedContext {
    /// Widgets to mark dirty on the next drain
    pending_dirty: Vec<WidgetId>,
}

/// Thread-safe handle for marking widgets dirty from outside the UI thread
///
/// Marks are buffered and applied by [`WidgetContext::run_pending`].
#[derive(Clone)]
pub struct DirtyHandle {
    shared: Arc<Mutex<SharedContext>>,
}

impl DirtyHandle {
    pub fn mark(&self, id: WidgetId) {
        self.shared.lock().pending_dirty.push(id);
    }
}

/// The main widget context that manages all widget state
pub struct WidgetContext {
    widgets: SlotMap<WidgetId, WidgetData>,
    dirty: DirtyTracker,
    shared: Arc<Mutex<SharedContext>>,
    queue: UiQueue,
    ui: UiHandle,
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetContext {
    /// Create a new widget context; the calling thread becomes the UI thread
    pub fn new() -> Self {
        let (ui, queue) = ui_queue();
        Self {
            widgets: SlotMap::with_key(),
            dirty: DirtyTracker::new(),
            shared: Arc::new(Mutex::new(SharedContext::default())),
            queue,
            ui,
        }
    }

    /// Set a callback that wakes the event loop whenever work is posted
    ///
    /// Takes effect for widgets built before the call as well.
    pub fn set_wake_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.queue.set_wake_callback(callback);
    }

    // =========================================================================
    // Widget Registration
    // =========================================================================

    /// Register a new widget and get its ID
    pub fn register_widget(&mut self) -> WidgetId {
        let id = self.widgets.insert(WidgetData::default());
        self.dirty.mark(id);
        id
    }

    /// Register a widget with a state machine
    pub fn register_widget_with_fsm(&mut self, fsm: StateMachine) -> WidgetId {
        let id = self.widgets.insert(WidgetData { fsm: Some(fsm) });
        self.dirty.mark(id);
        id
    }

    /// Unregister a widget
    pub fn unregister_widget(&mut self, id: WidgetId) {
        self.widgets.remove(id);
    }

    /// Check if a widget is registered
    pub fn is_registered(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    // =========================================================================
    // State Machine Integration
    // =========================================================================

    /// Send an event to a widget's FSM
    ///
    /// Returns true (and marks the widget dirty) if the state changed.
    pub fn send_fsm_event(&mut self, widget_id: WidgetId, event: EventId) -> bool {
        let Some(fsm) = self
            .widgets
            .get_mut(widget_id)
            .and_then(|data| data.fsm.as_mut())
        else {
            return false;
        };

        if fsm.send(event) {
            self.dirty.mark(widget_id);
            true
        } else {
            false
        }
    }

    /// Get a widget's current FSM state
    pub fn get_fsm_state(&self, widget_id: WidgetId) -> Option<u32> {
        self.widgets
            .get(widget_id)
            .and_then(|data| data.fsm.as_ref())
            .map(|fsm| fsm.current_state())
    }

    /// Dispatch an event to a widget's FSM
    pub fn dispatch_event(&mut self, widget_id: WidgetId, event: &Event) -> bool {
        self.send_fsm_event(widget_id, event.event_type)
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    /// Mark a widget as needing re-render
    pub fn mark_dirty(&mut self, widget_id: WidgetId) {
        if self.is_registered(widget_id) {
            self.dirty.mark(widget_id);
        }
    }

    /// Check if any widgets need re-rendering
    pub fn has_dirty(&self) -> bool {
        self.dirty.has_dirty()
    }

    /// Check if a specific widget needs re-rendering
    pub fn is_dirty(&self, widget_id: WidgetId) -> bool {
        self.dirty.is_dirty(widget_id)
    }

    /// Take the set of dirty widgets (clears it)
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.take_dirty()
    }

    /// Clear all dirty flags (call after rendering)
    pub fn clear_dirty(&mut self) {
        self.dirty.clear_all();
    }

    /// Handle for marking widgets dirty from any thread
    pub fn dirty_handle(&self) -> DirtyHandle {
        DirtyHandle {
            shared: self.shared.clone(),
        }
    }

    // =========================================================================
    // UI-thread dispatch
    // =========================================================================

    /// Handle for posting work onto this context's UI thread
    pub fn ui_handle(&self) -> UiHandle {
        self.ui.clone()
    }

    /// Run posted UI tasks and apply buffered dirty marks
    ///
    /// Call once per frame from the UI thread. Returns the number of tasks run.
    pub fn run_pending(&mut self) -> usize {
        let ran = self.queue.run_pending();
        self.process_pending();
        ran
    }

    /// Apply dirty markers buffered by [`DirtyHandle`]s
    fn process_pending(&mut self) {
        let pending: Vec<WidgetId> = self.shared.lock().pending_dirty.drain(..).collect();
        for widget_id in pending {
            self.mark_dirty(widget_id);
        }
    }
}
