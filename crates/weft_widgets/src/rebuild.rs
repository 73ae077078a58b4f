//! The composition/rebuild mechanism
//!
//! [`make_rebuildable`] turns a plain element node into a rebuildable unit:
//! it owns a builder closure and a [`Config`], and exposes a re-render
//! operation that tears the node's children down and repopulates them from
//! the builder's current output, reapplying identity and click handling.
//!
//! There is no diffing. Every rebuild is a full replace: after it returns,
//! exactly the children produced by the latest builder invocation are
//! attached.

use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::trace;
use weft_core::events::event_types;
use weft_core::{NodeId, TreeError};

use crate::config::Config;
use crate::content::{Builder, Children};
use crate::context::WidgetContext;

struct RebuildableInner {
    ctx: WidgetContext,
    node: NodeId,
    builder: Builder,
    config: Config,
}

/// A visual node augmented with a re-render operation
///
/// Cheap to clone; clones share the same node, builder, and config.
#[derive(Clone)]
pub struct Rebuildable {
    inner: Rc<RebuildableInner>,
}

/// Weak handle used by state cells to subscribe without keeping widgets alive
#[derive(Clone)]
pub struct WeakRebuildable {
    inner: Weak<RebuildableInner>,
}

impl WeakRebuildable {
    pub fn upgrade(&self) -> Option<Rebuildable> {
        self.inner.upgrade().map(|inner| Rebuildable { inner })
    }
}

/// Attach a builder and config to `node` and perform the initial render
pub fn make_rebuildable(
    ctx: &WidgetContext,
    node: NodeId,
    builder: Builder,
    config: Config,
) -> Rebuildable {
    let rebuildable = Rebuildable {
        inner: Rc::new(RebuildableInner {
            ctx: ctx.clone(),
            node,
            builder,
            config,
        }),
    };
    // Initial render. The node was just created by the calling factory, so
    // the only rebuild error (NodeMissing) cannot occur here.
    let _ = rebuildable.rebuild();
    rebuildable
}

impl Rebuildable {
    /// The underlying element node
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    pub fn context(&self) -> &WidgetContext {
        &self.inner.ctx
    }

    pub fn downgrade(&self) -> WeakRebuildable {
        WeakRebuildable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Re-render: tear down children and repopulate from the builder
    ///
    /// Fails with [`TreeError::NodeMissing`] if this node was destroyed,
    /// typically by an ancestor's own rebuild.
    pub fn rebuild(&self) -> Result<(), TreeError> {
        let inner = &self.inner;
        if !inner.ctx.tree().contains(inner.node) {
            return Err(TreeError::NodeMissing(inner.node));
        }
        trace!(node = ?inner.node, "rebuild");

        // Tear down: detach, don't destroy. Statically held children get
        // re-appended by the builder below; the rest are reaped afterwards.
        let previous = inner.ctx.tree_mut().detach_children(inner.node);

        if let Some(ref elem_id) = inner.config.elem_id {
            if let Ok(elem) = inner.ctx.tree_mut().get_mut(inner.node) {
                elem.elem_id = Some(elem_id.clone());
            }
        }

        // Replacement, never stacking: re-registering across rebuilds leaves
        // a single live handler.
        if let Some(ref handler) = inner.config.on_click {
            inner
                .ctx
                .events_mut()
                .set_handler(inner.node, event_types::CLICK, handler.clone());
        }

        // No tree or dispatcher borrow is held here: the builder creates
        // nodes and may read state freely.
        let output = (inner.builder)();

        {
            let mut tree = inner.ctx.tree_mut();
            for id in output.nodes() {
                tree.append_child(inner.node, id);
            }
        }

        self.reap_orphans(previous);
        Ok(())
    }

    /// Destroy previous children the builder did not re-attach anywhere
    fn reap_orphans(&self, previous: Vec<NodeId>) {
        let ctx = &self.inner.ctx;
        for id in previous {
            let orphaned = {
                let tree = ctx.tree();
                tree.contains(id) && tree.parent(id).is_none()
            };
            if !orphaned {
                continue;
            }
            let subtree = collect_subtree(ctx, id);
            ctx.tree_mut().remove_subtree(id);
            let mut events = ctx.events_mut();
            for node in subtree {
                events.remove_node(node);
            }
        }
    }
}

fn collect_subtree(ctx: &WidgetContext, root: NodeId) -> Vec<NodeId> {
    let tree = ctx.tree();
    let mut out = Vec::new();
    let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();
    stack.push(root);
    while let Some(id) = stack.pop() {
        if tree.contains(id) {
            out.push(id);
            stack.extend(tree.children(id));
        }
    }
    out
}

impl From<&Rebuildable> for Children {
    fn from(r: &Rebuildable) -> Self {
        Children::Node(r.node())
    }
}

impl From<Rebuildable> for Children {
    fn from(r: Rebuildable) -> Self {
        Children::Node(r.node())
    }
}
