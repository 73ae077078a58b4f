//! Event dispatch
//!
//! One handler per (node, event type) slot. Re-registering replaces the
//! previous handler, so re-renders that reapply callbacks can never stack
//! duplicates. Handlers are `Rc` closures: the host model is single-threaded
//! and handlers must be callable after being cloned out of the table, since
//! a handler routinely triggers a rebuild that re-registers handlers.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::tree::NodeId;

/// Event type identifier
pub type EventType = u32;

/// Event types the widget layer recognizes
pub mod event_types {
    use super::EventType;

    /// Pointer click on an element
    pub const CLICK: EventType = 1;
    /// Value edit in an input element (fires per edit)
    pub const INPUT: EventType = 2;
    /// Committed value change in an input element
    pub const CHANGE: EventType = 3;
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug, Default)]
pub enum EventData {
    #[default]
    None,
    /// Current value of the target input element
    Value(String),
}

impl Event {
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
        }
    }

    pub fn with_value(event_type: EventType, target: NodeId, value: impl Into<String>) -> Self {
        Self {
            event_type,
            target,
            data: EventData::Value(value.into()),
        }
    }

    /// The value payload, if any
    pub fn value(&self) -> Option<&str> {
        match self.data {
            EventData::Value(ref v) => Some(v),
            EventData::None => None,
        }
    }
}

/// Event handler function type
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Routes events to the handler registered for the target slot
#[derive(Default)]
pub struct EventDispatcher {
    handlers: FxHashMap<(NodeId, EventType), EventHandler>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for this slot
    pub fn set_handler(&mut self, node: NodeId, event_type: EventType, handler: EventHandler) {
        self.handlers.insert((node, event_type), handler);
    }

    /// Remove the handler for a slot
    pub fn remove_handler(&mut self, node: NodeId, event_type: EventType) {
        self.handlers.remove(&(node, event_type));
    }

    /// Drop every handler registered for a node
    pub fn remove_node(&mut self, node: NodeId) {
        self.handlers.retain(|&(n, _), _| n != node);
    }

    pub fn has_handler(&self, node: NodeId, event_type: EventType) -> bool {
        self.handlers.contains_key(&(node, event_type))
    }

    /// Clone the handler for a slot, if any
    ///
    /// Callers invoke the clone after releasing their borrow of the
    /// dispatcher, so the handler can re-register handlers mid-dispatch.
    pub fn handler(&self, node: NodeId, event_type: EventType) -> Option<EventHandler> {
        self.handlers.get(&(node, event_type)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::tree::ElementTree;
    use std::cell::Cell;

    #[test]
    fn set_handler_replaces_not_stacks() {
        let mut tree = ElementTree::new();
        let node = tree.create(NodeKind::Button);
        let mut dispatcher = EventDispatcher::new();

        let first = Rc::new(Cell::new(0u32));
        let second = Rc::new(Cell::new(0u32));

        let f = first.clone();
        dispatcher.set_handler(node, event_types::CLICK, Rc::new(move |_| f.set(f.get() + 1)));
        let s = second.clone();
        dispatcher.set_handler(node, event_types::CLICK, Rc::new(move |_| s.set(s.get() + 1)));

        let event = Event::new(event_types::CLICK, node);
        if let Some(handler) = dispatcher.handler(node, event_types::CLICK) {
            handler(&event);
        }

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn remove_node_drops_all_slots() {
        let mut tree = ElementTree::new();
        let node = tree.create(NodeKind::Input);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.set_handler(node, event_types::INPUT, Rc::new(|_| {}));
        dispatcher.set_handler(node, event_types::CHANGE, Rc::new(|_| {}));

        dispatcher.remove_node(node);
        assert!(!dispatcher.has_handler(node, event_types::INPUT));
        assert!(!dispatcher.has_handler(node, event_types::CHANGE));
    }

    #[test]
    fn event_value_payload() {
        let mut tree = ElementTree::new();
        let node = tree.create(NodeKind::Input);
        let event = Event::with_value(event_types::INPUT, node, "hello");
        assert_eq!(event.value(), Some("hello"));
        assert_eq!(Event::new(event_types::CLICK, node).value(), None);
    }
}
