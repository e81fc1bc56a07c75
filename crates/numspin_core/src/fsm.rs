//! Finite state machines for widget interaction states
//!
//! A state machine is a flat transition table: `(from, event) -> to`.
//! Events that have no transition from the current state are ignored.

use smallvec::SmallVec;

/// State identifier
pub type StateId = u32;

/// Event identifier (shares the numbering of `events::event_types`)
pub type EventId = u32;

/// A single transition in the table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub event: EventId,
    pub to: StateId,
}

/// A finite state machine
#[derive(Clone, Debug)]
pub struct StateMachine {
    current: StateId,
    transitions: SmallVec<[Transition; 8]>,
}

impl StateMachine {
    /// Start building a state machine in `initial`
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder {
            initial,
            transitions: SmallVec::new(),
        }
    }

    /// The current state
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Feed an event; returns true if the state changed
    pub fn send(&mut self, event: EventId) -> bool {
        let next = self
            .transitions
            .iter()
            .find(|t| t.from == self.current && t.event == event)
            .map(|t| t.to);

        match next {
            Some(to) if to != self.current => {
                tracing::trace!(from = self.current, to, event, "fsm transition");
                self.current = to;
                true
            }
            _ => false,
        }
    }

}

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder {
    initial: StateId,
    transitions: SmallVec<[Transition; 8]>,
}

impl StateMachineBuilder {
    /// Add a transition `from --event--> to`
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition { from, event, to });
        self
    }

    pub fn build(self) -> StateMachine {
        StateMachine {
            current: self.initial,
            transitions: self.transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: u32 = 0;
    const ACTIVE: u32 = 1;
    const CLICK: u32 = 1;
    const OTHER: u32 = 2;

    #[test]
    fn test_transitions() {
        let mut fsm = StateMachine::builder(IDLE)
            .on(IDLE, CLICK, ACTIVE)
            .on(ACTIVE, CLICK, IDLE)
            .build();

        assert_eq!(fsm.current_state(), IDLE);
        assert!(fsm.send(CLICK));
        assert_eq!(fsm.current_state(), ACTIVE);

        // Unknown events are ignored
        assert!(!fsm.send(OTHER));
        assert_eq!(fsm.current_state(), ACTIVE);

        assert!(fsm.send(CLICK));
        assert_eq!(fsm.current_state(), IDLE);
    }
}
