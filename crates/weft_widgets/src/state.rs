//! Reactive state cells
//!
//! An explicit state container standing in for ad hoc shared globals: a
//! builder closure reads the cell, event callbacks write it, and the write
//! is the update-and-notify call that rebuilds every subscribed widget.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::rebuild::{Rebuildable, WeakRebuildable};

/// A shared mutable value that rebuilds its subscribers on change
pub struct State<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<WeakRebuildable>>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T: Clone> State<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(initial)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate the value in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
        self.notify();
    }

    /// Subscribe a widget: every `set`/`update` rebuilds it
    ///
    /// Subscription is weak; a dropped or destroyed widget is pruned on the
    /// next notification.
    pub fn bind(&self, widget: &Rebuildable) {
        self.subscribers.borrow_mut().push(widget.downgrade());
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|w| w.upgrade().is_some())
            .count()
    }

    /// Rebuild every live subscriber
    ///
    /// Rebuild failures (the widget's node was destroyed by an ancestor)
    /// are logged and the subscriber pruned; the state cell outlives any
    /// single widget.
    fn notify(&self) {
        // Snapshot first: a rebuilt builder may bind new subscribers.
        let snapshot: Vec<WeakRebuildable> = self.subscribers.borrow().clone();
        for weak in snapshot {
            if let Some(widget) = weak.upgrade() {
                if let Err(err) = widget.rebuild() {
                    warn!(%err, "dropping state subscriber after failed rebuild");
                }
            }
        }
        self.subscribers.borrow_mut().retain(|w| {
            w.upgrade()
                .is_some_and(|r| r.context().tree().contains(r.node()))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::{BuildOutput, Children};
    use crate::context::WidgetContext;
    use crate::rebuild::make_rebuildable;
    use std::rc::Rc;
    use weft_core::NodeKind;

    #[test]
    fn update_rebuilds_subscribers() {
        let ctx = WidgetContext::new();
        let count = State::new(0i32);
        let node = ctx.create(NodeKind::Block);

        let ctx2 = ctx.clone();
        let count2 = count.clone();
        let widget = make_rebuildable(
            &ctx,
            node,
            Rc::new(move || {
                let label = ctx2.create(NodeKind::Inline);
                if let Ok(elem) = ctx2.tree_mut().get_mut(label) {
                    elem.text = Some(format!("count: {}", count2.get()));
                }
                BuildOutput::One(label)
            }),
            Config::new(),
        );
        count.bind(&widget);

        count.update(|c| *c += 1);
        let child = ctx.tree().children(node)[0];
        assert_eq!(
            ctx.tree().get(child).unwrap().text.as_deref(),
            Some("count: 1")
        );

        count.set(10);
        let child = ctx.tree().children(node)[0];
        assert_eq!(
            ctx.tree().get(child).unwrap().text.as_deref(),
            Some("count: 10")
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let ctx = WidgetContext::new();
        let state = State::new(0i32);
        {
            let node = ctx.create(NodeKind::Block);
            let widget = make_rebuildable(&ctx, node, Children::None.into_builder(), Config::new());
            state.bind(&widget);
            assert_eq!(state.subscriber_count(), 1);
        }
        // Widget handle dropped; notification prunes it
        state.set(1);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn destroyed_widget_does_not_poison_the_cell() {
        let ctx = WidgetContext::new();
        let state = State::new(0i32);
        let node = ctx.create(NodeKind::Block);
        let widget = make_rebuildable(&ctx, node, Children::None.into_builder(), Config::new());
        state.bind(&widget);

        ctx.tree_mut().remove_subtree(node);
        // Must not panic or propagate; the dead subscriber is pruned
        state.set(5);
        assert_eq!(state.get(), 5);
        assert_eq!(state.subscriber_count(), 0);
        let _ = widget;
    }

    #[test]
    fn shared_clones_see_one_value() {
        let a = State::new(String::from("x"));
        let b = a.clone();
        b.set("y".into());
        assert_eq!(a.get(), "y");
    }
}
