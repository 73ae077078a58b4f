//! Widget context
//!
//! A cheap-to-clone handle every factory takes: the shared element tree,
//! the event dispatcher, and a deferred-work queue the host drains after
//! the current callback returns.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;
use weft_core::events::{event_types, Event, EventDispatcher};
use weft_core::{ElementTree, NodeId, NodeKind};

type DeferredFn = Box<dyn FnOnce(&WidgetContext)>;

/// Shared handle to the host tree and dispatcher
#[derive(Clone, Default)]
pub struct WidgetContext {
    tree: Rc<RefCell<ElementTree>>,
    events: Rc<RefCell<EventDispatcher>>,
    deferred: Rc<RefCell<VecDeque<DeferredFn>>>,
}

impl WidgetContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node in the shared tree
    pub fn create(&self, kind: NodeKind) -> NodeId {
        self.tree.borrow_mut().create(kind)
    }

    pub fn tree(&self) -> Ref<'_, ElementTree> {
        self.tree.borrow()
    }

    pub fn tree_mut(&self) -> RefMut<'_, ElementTree> {
        self.tree.borrow_mut()
    }

    pub fn events(&self) -> Ref<'_, EventDispatcher> {
        self.events.borrow()
    }

    pub fn events_mut(&self) -> RefMut<'_, EventDispatcher> {
        self.events.borrow_mut()
    }

    /// Dispatch a click on `node`; returns whether a handler ran
    ///
    /// The handler is cloned out of the dispatcher before being invoked, so
    /// it may rebuild widgets (and thereby re-register handlers) freely.
    pub fn emit_click(&self, node: NodeId) -> bool {
        self.dispatch(Event::new(event_types::CLICK, node))
    }

    /// Simulate an edit of an input element: store the value, then dispatch
    pub fn emit_input(&self, node: NodeId, text: &str) -> bool {
        self.store_value(node, text);
        self.dispatch(Event::with_value(event_types::INPUT, node, text))
    }

    /// Simulate a committed change of an input element
    pub fn emit_change(&self, node: NodeId, text: &str) -> bool {
        self.store_value(node, text);
        self.dispatch(Event::with_value(event_types::CHANGE, node, text))
    }

    fn store_value(&self, node: NodeId, text: &str) {
        if let Ok(elem) = self.tree.borrow_mut().get_mut(node) {
            elem.value = Some(text.to_string());
        }
    }

    fn dispatch(&self, event: Event) -> bool {
        let handler = self.events.borrow().handler(event.target, event.event_type);
        match handler {
            Some(handler) => {
                trace!(?event.target, event_type = event.event_type, "dispatch");
                handler(&event);
                true
            }
            None => false,
        }
    }

    /// Queue work to run after the current callback returns
    ///
    /// Stands in for the host's zero-delay deferral: newly built children
    /// are attached before the work runs. The host (or test) calls
    /// [`run_deferred`](Self::run_deferred) to drain the queue.
    pub fn defer(&self, f: impl FnOnce(&WidgetContext) + 'static) {
        self.deferred.borrow_mut().push_back(Box::new(f));
    }

    /// Drain the deferred queue, running entries in submission order
    ///
    /// Entries queued while draining run in the same pass.
    pub fn run_deferred(&self) {
        loop {
            let next = self.deferred.borrow_mut().pop_front();
            match next {
                Some(f) => f(self),
                None => break,
            }
        }
    }

    /// Number of queued deferred entries
    pub fn deferred_len(&self) -> usize {
        self.deferred.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_click_without_handler_is_false() {
        let ctx = WidgetContext::new();
        let node = ctx.create(NodeKind::Button);
        assert!(!ctx.emit_click(node));
    }

    #[test]
    fn emit_input_stores_value_before_dispatch() {
        let ctx = WidgetContext::new();
        let node = ctx.create(NodeKind::Input);

        let seen = Rc::new(RefCell::new(String::new()));
        let seen_in_handler = seen.clone();
        let ctx_in_handler = ctx.clone();
        ctx.events_mut().set_handler(
            node,
            event_types::INPUT,
            Rc::new(move |event| {
                // Value must already be visible on the node itself
                let stored = ctx_in_handler
                    .tree()
                    .get(event.target)
                    .ok()
                    .and_then(|n| n.value.clone())
                    .unwrap_or_default();
                *seen_in_handler.borrow_mut() = stored;
            }),
        );

        assert!(ctx.emit_input(node, "abc"));
        assert_eq!(*seen.borrow(), "abc");
    }

    #[test]
    fn deferred_runs_in_order_including_nested() {
        let ctx = WidgetContext::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        ctx.defer(move |ctx| {
            o.borrow_mut().push(1);
            let o2 = o.clone();
            ctx.defer(move |_| o2.borrow_mut().push(3));
        });
        let o = order.clone();
        ctx.defer(move |_| o.borrow_mut().push(2));

        ctx.run_deferred();
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
        assert_eq!(ctx.deferred_len(), 0);
    }

    #[test]
    fn handler_may_reregister_during_dispatch() {
        let ctx = WidgetContext::new();
        let node = ctx.create(NodeKind::Button);
        let fired = Rc::new(Cell::new(0u32));

        let ctx2 = ctx.clone();
        let fired2 = fired.clone();
        ctx.events_mut().set_handler(
            node,
            event_types::CLICK,
            Rc::new(move |event| {
                fired2.set(fired2.get() + 1);
                // Re-register mid-dispatch, as a rebuild would
                ctx2.events_mut()
                    .set_handler(event.target, event_types::CLICK, Rc::new(|_| {}));
            }),
        );

        assert!(ctx.emit_click(node));
        assert_eq!(fired.get(), 1);
    }
}
