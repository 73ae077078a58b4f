//! Drag-reorder integration
//!
//! A reorderable container is a capability with a narrow contract: a
//! [`ReorderBackend`] attaches to a container node and yields a
//! [`ReorderInstance`] that owns the drag lifecycle (choose → start →
//! end/unchoose) until destroyed. The [`drag_list`] factory is the adapter
//! around it: it translates multi-word state-class lists into single safe
//! tokens for the backend, applies the full class lists itself at the
//! matching lifecycle hooks, forwards the user's callbacks after that
//! bookkeeping, and destroys/re-attaches the backend on every rebuild.
//!
//! All glue here is best-effort: a vanished node or a failing backend is
//! logged and skipped, never allowed to abort a rebuild.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, warn};
use weft_core::{NodeId, NodeKind};

use crate::config::Config;
use crate::content::BuildOutput;
use crate::context::WidgetContext;
use crate::rebuild::{make_rebuildable, Rebuildable};

/// Lifecycle callback type
pub type ReorderHook = Rc<dyn Fn(&ReorderEvent)>;

/// What a lifecycle hook observes
#[derive(Clone, Debug)]
pub struct ReorderEvent {
    /// The reorderable container
    pub container: NodeId,
    /// The item being dragged, when one is active
    pub item: Option<NodeId>,
    /// The drop-placeholder ghost, once dragging has started
    pub ghost: Option<NodeId>,
    /// Index of the item when it was chosen
    pub old_index: Option<usize>,
    /// Index of the item after the drop
    pub new_index: Option<usize>,
}

/// User-facing lifecycle hook set
#[derive(Clone, Default)]
pub struct ReorderHooks {
    pub on_clone: Option<ReorderHook>,
    pub on_choose: Option<ReorderHook>,
    pub on_unchoose: Option<ReorderHook>,
    pub on_start: Option<ReorderHook>,
    pub on_end: Option<ReorderHook>,
    pub on_sort: Option<ReorderHook>,
}

impl ReorderHooks {
    fn fire(hook: &Option<ReorderHook>, event: &ReorderEvent) {
        if let Some(hook) = hook {
            hook(event);
        }
    }
}

/// Drag-specific configuration carried on [`Config`]
#[derive(Clone, Default)]
pub struct ReorderConfig {
    /// Classes for the chosen item; may be several, space-separated
    pub chosen_class: Option<String>,
    /// Classes for the drop-placeholder ghost
    pub ghost_class: Option<String>,
    /// Classes for the item while dragging
    pub drag_class: Option<String>,
    /// Reorder animation duration in milliseconds
    pub animation_ms: u64,
    pub hooks: ReorderHooks,
    /// The backend to attach; without one, drag_list renders but stays inert
    pub backend: Option<Rc<dyn ReorderBackend>>,
}

#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("reorder container {0:?} is no longer in the tree")]
    ContainerMissing(NodeId),
    #[error("reorder backend failed to attach: {0}")]
    Attach(String),
}

/// Options handed to a backend: single-token classes only
///
/// Multi-word class lists from [`ReorderConfig`] never reach the backend;
/// the adapter swaps them for a generated token and handles the full lists
/// in its own wrapped hooks.
#[derive(Clone, Default)]
pub struct ReorderOptions {
    pub animation_ms: u64,
    pub chosen_token: Option<String>,
    pub ghost_token: Option<String>,
    pub drag_token: Option<String>,
    pub hooks: ReorderHooks,
}

/// Factory for reorder instances on container nodes
pub trait ReorderBackend {
    fn create(
        &self,
        ctx: &WidgetContext,
        container: NodeId,
        options: ReorderOptions,
    ) -> Result<Box<dyn ReorderInstance>, ReorderError>;
}

/// An attached reorder lifecycle, driven by the host
///
/// State machine per instance: uninitialized → initialized → destroyed;
/// a rebuild destroys the instance and attaches a fresh one.
pub trait ReorderInstance {
    /// Tear down; further calls are no-ops
    fn destroy(&mut self);
    /// An item was picked (pointer down): chosen state begins
    fn choose(&mut self, index: usize);
    /// The pick was released without a drag: chosen state ends
    fn unchoose(&mut self);
    /// Dragging began: ghost is created, drag state begins
    fn start_drag(&mut self);
    /// The item was dropped at `to`: children reorder, all states end
    fn end_drag(&mut self, to: usize);
}

static NEXT_REORDER_ID: AtomicU64 = AtomicU64::new(0);

/// Split a configured class value into (backend token, extra class list)
///
/// A single word passes straight through. A multi-word list gets a
/// generated safe token for the backend while the full list becomes the
/// adapter's responsibility.
fn class_tokens(kind: &str, configured: Option<&str>, uid: u64) -> (Option<String>, Option<String>) {
    match configured.map(str::trim) {
        None | Some("") => (None, None),
        Some(value) if value.split_whitespace().nth(1).is_none() => {
            (Some(value.to_string()), None)
        }
        Some(value) => (Some(format!("{kind}_{uid}")), Some(value.to_string())),
    }
}

fn add_classes(ctx: &WidgetContext, node: NodeId, classes: &str) {
    match ctx.tree_mut().get_mut(node) {
        Ok(elem) => elem.classes.add_many(classes),
        Err(err) => warn!(%err, "skipping class-list add on vanished node"),
    }
}

fn remove_classes(ctx: &WidgetContext, node: NodeId, classes: &str) {
    match ctx.tree_mut().get_mut(node) {
        Ok(elem) => elem.classes.remove_many(classes),
        Err(err) => warn!(%err, "skipping class-list remove on vanished node"),
    }
}

/// Build backend options from a [`ReorderConfig`]: token translation plus
/// wrapped hooks that apply/remove the multi-word class lists before
/// forwarding the user's callbacks
pub fn build_options(ctx: &WidgetContext, config: &ReorderConfig) -> ReorderOptions {
    let uid = NEXT_REORDER_ID.fetch_add(1, Ordering::Relaxed);
    let (chosen_token, chosen_extra) = class_tokens("chosen", config.chosen_class.as_deref(), uid);
    let (ghost_token, ghost_extra) = class_tokens("ghost", config.ghost_class.as_deref(), uid);
    let (drag_token, drag_extra) = class_tokens("drag", config.drag_class.as_deref(), uid);

    let user = config.hooks.clone();
    let mut hooks = ReorderHooks::default();

    {
        let ctx = ctx.clone();
        let ghost_extra = ghost_extra.clone();
        let user_clone = user.on_clone.clone();
        hooks.on_clone = Some(Rc::new(move |event| {
            if let (Some(extra), Some(ghost)) = (ghost_extra.as_deref(), event.ghost) {
                add_classes(&ctx, ghost, extra);
            }
            ReorderHooks::fire(&user_clone, event);
        }));
    }
    {
        let ctx = ctx.clone();
        let chosen_extra = chosen_extra.clone();
        let user_choose = user.on_choose.clone();
        hooks.on_choose = Some(Rc::new(move |event| {
            if let (Some(extra), Some(item)) = (chosen_extra.as_deref(), event.item) {
                add_classes(&ctx, item, extra);
            }
            ReorderHooks::fire(&user_choose, event);
        }));
    }
    {
        let ctx = ctx.clone();
        let chosen_extra = chosen_extra.clone();
        let user_unchoose = user.on_unchoose.clone();
        hooks.on_unchoose = Some(Rc::new(move |event| {
            if let (Some(extra), Some(item)) = (chosen_extra.as_deref(), event.item) {
                remove_classes(&ctx, item, extra);
            }
            ReorderHooks::fire(&user_unchoose, event);
        }));
    }
    {
        let ctx = ctx.clone();
        let drag_extra = drag_extra.clone();
        let user_start = user.on_start.clone();
        hooks.on_start = Some(Rc::new(move |event| {
            if let (Some(extra), Some(item)) = (drag_extra.as_deref(), event.item) {
                add_classes(&ctx, item, extra);
            }
            ReorderHooks::fire(&user_start, event);
        }));
    }
    {
        let ctx = ctx.clone();
        let user_end = user.on_end.clone();
        hooks.on_end = Some(Rc::new(move |event| {
            if let Some(item) = event.item {
                if let Some(extra) = drag_extra.as_deref() {
                    remove_classes(&ctx, item, extra);
                }
                if let Some(extra) = chosen_extra.as_deref() {
                    remove_classes(&ctx, item, extra);
                }
            }
            if let (Some(extra), Some(ghost)) = (ghost_extra.as_deref(), event.ghost) {
                remove_classes(&ctx, ghost, extra);
            }
            ReorderHooks::fire(&user_end, event);
        }));
    }
    hooks.on_sort = user.on_sort;

    ReorderOptions {
        animation_ms: config.animation_ms,
        chosen_token,
        ghost_token,
        drag_token,
        hooks,
    }
}

/// Handle to the currently attached reorder instance
///
/// The instance is replaced on every rebuild; the handle always drives the
/// latest one. Calls before initialization (the deferred attach has not run
/// yet) are logged and ignored.
#[derive(Clone, Default)]
pub struct ReorderHandle {
    instance: Rc<RefCell<Option<Box<dyn ReorderInstance>>>>,
}

impl ReorderHandle {
    pub fn is_initialized(&self) -> bool {
        self.instance.borrow().is_some()
    }

    fn with_instance(&self, f: impl FnOnce(&mut dyn ReorderInstance)) {
        let mut slot = self.instance.borrow_mut();
        match slot.as_mut() {
            Some(instance) => f(instance.as_mut()),
            None => warn!("reorder instance not initialized; call ignored"),
        }
    }

    pub fn choose(&self, index: usize) {
        self.with_instance(|i| i.choose(index));
    }

    pub fn unchoose(&self) {
        self.with_instance(|i| i.unchoose());
    }

    pub fn start_drag(&self) {
        self.with_instance(|i| i.start_drag());
    }

    pub fn end_drag(&self, to: usize) {
        self.with_instance(|i| i.end_drag(to));
    }
}

/// A reorderable column of items
///
/// Items are rebuilt from `data` on every rebuild and marked
/// `cursor-move select-none`. Any previously attached backend instance is
/// destroyed and a fresh one attached through the deferred queue, after the
/// new children are in place.
pub fn drag_list<T: Clone + 'static>(
    ctx: &WidgetContext,
    data: Vec<T>,
    item_builder: impl Fn(&T, usize) -> NodeId + 'static,
    config: Config,
) -> (Rebuildable, ReorderHandle) {
    let node = ctx.create(NodeKind::Block);
    let handle = ReorderHandle::default();

    let builder_ctx = ctx.clone();
    let builder_handle = handle.clone();
    let class_name = config.class_name.clone();
    let reorder = config.reorder.clone();
    let builder = Rc::new(move || {
        if let Ok(elem) = builder_ctx.tree_mut().get_mut(node) {
            elem.classes.set_from_str("flex flex-col gap-2");
            if let Some(ref extra) = class_name {
                elem.classes.add_many(extra);
            }
        }

        let items: Vec<NodeId> = data
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let id = item_builder(item, index);
                add_classes(&builder_ctx, id, "cursor-move select-none");
                id
            })
            .collect();

        // Attach after the new children are in place, as the host would on
        // its next tick.
        let slot = builder_handle.instance.clone();
        let reorder = reorder.clone();
        builder_ctx.defer(move |ctx| {
            if let Some(mut previous) = slot.borrow_mut().take() {
                previous.destroy();
            }
            let Some(ref backend) = reorder.backend else {
                return;
            };
            let options = build_options(ctx, &reorder);
            match backend.create(ctx, node, options) {
                Ok(instance) => {
                    debug!(container = ?node, "reorder backend attached");
                    *slot.borrow_mut() = Some(instance);
                }
                Err(err) => warn!(%err, "reorder backend failed to attach; list stays inert"),
            }
        });

        BuildOutput::Many(items)
    });

    let widget = make_rebuildable(ctx, node, builder, config);
    (widget, handle)
}

// =========================================================================
// In-process backend
// =========================================================================

/// Reference backend: drives the lifecycle programmatically
///
/// A host embedding a real pointer-driven reorder library replaces this
/// with its own [`ReorderBackend`]; tests and the demo drive this one
/// through [`ReorderHandle`].
#[derive(Default)]
pub struct InProcessBackend;

impl ReorderBackend for InProcessBackend {
    fn create(
        &self,
        ctx: &WidgetContext,
        container: NodeId,
        options: ReorderOptions,
    ) -> Result<Box<dyn ReorderInstance>, ReorderError> {
        if !ctx.tree().contains(container) {
            return Err(ReorderError::ContainerMissing(container));
        }
        Ok(Box::new(InProcessInstance {
            ctx: ctx.clone(),
            container,
            options,
            chosen: None,
            ghost: None,
            destroyed: false,
        }))
    }
}

struct InProcessInstance {
    ctx: WidgetContext,
    container: NodeId,
    options: ReorderOptions,
    /// (item node, index at choose time)
    chosen: Option<(NodeId, usize)>,
    ghost: Option<NodeId>,
    destroyed: bool,
}

impl InProcessInstance {
    fn event(&self) -> ReorderEvent {
        ReorderEvent {
            container: self.container,
            item: self.chosen.map(|(item, _)| item),
            ghost: self.ghost,
            old_index: self.chosen.map(|(_, index)| index),
            new_index: None,
        }
    }

    fn drop_ghost(&mut self) {
        if let Some(ghost) = self.ghost.take() {
            self.ctx.tree_mut().remove_subtree(ghost);
        }
    }
}

impl ReorderInstance for InProcessInstance {
    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.drop_ghost();
        self.chosen = None;
        self.destroyed = true;
        debug!(container = ?self.container, "reorder backend destroyed");
    }

    fn choose(&mut self, index: usize) {
        if self.destroyed || self.chosen.is_some() {
            return;
        }
        let children = self.ctx.tree().children(self.container);
        let Some(&item) = children.get(index) else {
            warn!(index, "choose index out of range");
            return;
        };
        self.chosen = Some((item, index));
        if let Some(token) = self.options.chosen_token.clone() {
            add_classes(&self.ctx, item, &token);
        }
        ReorderHooks::fire(&self.options.hooks.on_choose, &self.event());
    }

    fn unchoose(&mut self) {
        if self.destroyed {
            return;
        }
        let Some((item, _)) = self.chosen else {
            return;
        };
        if let Some(token) = self.options.chosen_token.clone() {
            remove_classes(&self.ctx, item, &token);
        }
        ReorderHooks::fire(&self.options.hooks.on_unchoose, &self.event());
        self.drop_ghost();
        self.chosen = None;
    }

    fn start_drag(&mut self) {
        if self.destroyed || self.ghost.is_some() {
            return;
        }
        let Some((item, _)) = self.chosen else {
            return;
        };
        // The ghost mirrors the item's classes plus the ghost token, like a
        // cloned placeholder would.
        let ghost = {
            let classes = self
                .ctx
                .tree()
                .get(item)
                .map(|n| n.classes.to_string())
                .unwrap_or_default();
            let ghost = self.ctx.create(NodeKind::Block);
            add_classes(&self.ctx, ghost, &classes);
            ghost
        };
        if let Some(token) = self.options.ghost_token.clone() {
            add_classes(&self.ctx, ghost, &token);
        }
        self.ghost = Some(ghost);
        ReorderHooks::fire(&self.options.hooks.on_clone, &self.event());

        if let Some(token) = self.options.drag_token.clone() {
            add_classes(&self.ctx, item, &token);
        }
        ReorderHooks::fire(&self.options.hooks.on_start, &self.event());
    }

    fn end_drag(&mut self, to: usize) {
        if self.destroyed {
            return;
        }
        let Some((item, from)) = self.chosen else {
            return;
        };
        self.ctx.tree_mut().move_child(self.container, from, to);
        let new_index = self
            .ctx
            .tree()
            .children(self.container)
            .iter()
            .position(|&c| c == item);

        let mut event = self.event();
        event.new_index = new_index;

        if new_index != Some(from) {
            ReorderHooks::fire(&self.options.hooks.on_sort, &event);
        }
        if let Some(token) = self.options.drag_token.clone() {
            remove_classes(&self.ctx, item, &token);
        }
        if let Some(token) = self.options.chosen_token.clone() {
            remove_classes(&self.ctx, item, &token);
        }
        ReorderHooks::fire(&self.options.hooks.on_end, &event);
        ReorderHooks::fire(&self.options.hooks.on_unchoose, &event);
        self.drop_ghost();
        self.chosen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::text;
    use std::cell::RefCell;

    fn item_text(ctx: &WidgetContext, label: &str) -> NodeId {
        text(ctx, label, Config::new()).node()
    }

    fn driven_list(
        ctx: &WidgetContext,
        config: Config,
    ) -> (Rebuildable, ReorderHandle) {
        let ctx2 = ctx.clone();
        let (list, handle) = drag_list(
            ctx,
            vec!["a", "b", "c"],
            move |label, _| item_text(&ctx2, label),
            config.reorder_backend(Rc::new(InProcessBackend)),
        );
        ctx.run_deferred();
        (list, handle)
    }

    #[test]
    fn token_translation_splits_multiword() {
        let (token, extra) = class_tokens("chosen", Some("ring-2 ring-blue-400"), 7);
        assert_eq!(token.as_deref(), Some("chosen_7"));
        assert_eq!(extra.as_deref(), Some("ring-2 ring-blue-400"));

        let (token, extra) = class_tokens("ghost", Some("opacity-50"), 7);
        assert_eq!(token.as_deref(), Some("opacity-50"));
        assert!(extra.is_none());

        assert_eq!(class_tokens("drag", None, 7), (None, None));
    }

    #[test]
    fn backend_attaches_through_deferred_queue() {
        let ctx = WidgetContext::new();
        let ctx2 = ctx.clone();
        let (_list, handle) = drag_list(
            &ctx,
            vec![1, 2],
            move |n, _| item_text(&ctx2, &n.to_string()),
            Config::new().reorder_backend(Rc::new(InProcessBackend)),
        );
        // Not yet: attach runs on the host's next tick
        assert!(!handle.is_initialized());
        ctx.run_deferred();
        assert!(handle.is_initialized());
    }

    #[test]
    fn rebuild_reattaches_backend() {
        let ctx = WidgetContext::new();
        let (list, handle) = driven_list(&ctx, Config::new());
        assert!(handle.is_initialized());

        list.rebuild().unwrap();
        ctx.run_deferred();
        assert!(handle.is_initialized());
        assert_eq!(ctx.tree().children(list.node()).len(), 3);
    }

    #[test]
    fn items_marked_draggable() {
        let ctx = WidgetContext::new();
        let (list, _) = driven_list(&ctx, Config::new());
        for child in ctx.tree().children(list.node()) {
            let node = ctx.tree().get(child).unwrap().clone();
            assert!(node.classes.contains("cursor-move"));
            assert!(node.classes.contains("select-none"));
        }
    }

    #[test]
    fn multiword_chosen_classes_present_during_state_absent_after() {
        let ctx = WidgetContext::new();
        let (list, handle) = driven_list(&ctx, Config::new().chosen_class("ring-2 ring-blue-400"));
        let item = ctx.tree().children(list.node())[1];

        handle.choose(1);
        {
            let tree = ctx.tree();
            let classes = &tree.get(item).unwrap().classes;
            assert!(classes.contains("ring-2"));
            assert!(classes.contains("ring-blue-400"));
        }

        handle.unchoose();
        {
            let tree = ctx.tree();
            let classes = &tree.get(item).unwrap().classes;
            assert!(!classes.contains("ring-2"));
            assert!(!classes.contains("ring-blue-400"));
        }
    }

    #[test]
    fn drag_classes_span_start_to_end() {
        let ctx = WidgetContext::new();
        let (list, handle) =
            driven_list(&ctx, Config::new().drag_class("shadow-xl rotate-2 scale-105"));
        let item = ctx.tree().children(list.node())[0];

        handle.choose(0);
        handle.start_drag();
        assert!(ctx.tree().get(item).unwrap().classes.contains("shadow-xl"));
        assert!(ctx.tree().get(item).unwrap().classes.contains("rotate-2"));

        handle.end_drag(2);
        let classes = ctx.tree().get(item).unwrap().classes.clone();
        assert!(!classes.contains("shadow-xl"));
        assert!(!classes.contains("rotate-2"));
        assert!(!classes.contains("scale-105"));
    }

    #[test]
    fn ghost_gets_classes_and_is_destroyed_on_end() {
        let ctx = WidgetContext::new();
        let seen_ghost = Rc::new(RefCell::new(None));
        let s = seen_ghost.clone();
        let (_, handle) = driven_list(
            &ctx,
            Config::new()
                .ghost_class("opacity-50 bg-slate-200")
                .on_clone(Rc::new(move |event| *s.borrow_mut() = event.ghost)),
        );

        handle.choose(0);
        handle.start_drag();
        let ghost = seen_ghost.borrow().expect("on_clone saw the ghost");
        assert!(ctx.tree().get(ghost).unwrap().classes.contains("opacity-50"));
        assert!(ctx.tree().get(ghost).unwrap().classes.contains("bg-slate-200"));

        handle.end_drag(1);
        assert!(!ctx.tree().contains(ghost));
    }

    #[test]
    fn end_drag_reorders_children_and_reports_indices() {
        let ctx = WidgetContext::new();
        let sorted = Rc::new(RefCell::new(None));
        let s = sorted.clone();
        let (list, handle) = driven_list(
            &ctx,
            Config::new()
                .on_sort(Rc::new(move |event| {
                    *s.borrow_mut() = Some((event.old_index, event.new_index));
                })),
        );
        let before = ctx.tree().children(list.node());

        handle.choose(0);
        handle.start_drag();
        handle.end_drag(2);

        let after = ctx.tree().children(list.node());
        assert_eq!(after, vec![before[1], before[2], before[0]]);
        assert_eq!(*sorted.borrow(), Some((Some(0), Some(2))));
    }

    #[test]
    fn drop_in_place_skips_on_sort_but_fires_on_end() {
        let ctx = WidgetContext::new();
        let sorts = Rc::new(RefCell::new(0u32));
        let ends = Rc::new(RefCell::new(0u32));
        let (s, e) = (sorts.clone(), ends.clone());
        let (_, handle) = driven_list(
            &ctx,
            Config::new()
                .on_sort(Rc::new(move |_| *s.borrow_mut() += 1))
                .on_end(Rc::new(move |_| *e.borrow_mut() += 1)),
        );

        handle.choose(1);
        handle.start_drag();
        handle.end_drag(1);
        assert_eq!(*sorts.borrow(), 0);
        assert_eq!(*ends.borrow(), 1);
    }

    #[test]
    fn user_callbacks_fire_after_bookkeeping() {
        let ctx = WidgetContext::new();
        let chosen_seen = Rc::new(RefCell::new(false));
        let ctx2 = ctx.clone();
        let seen = chosen_seen.clone();
        let (_, handle) = driven_list(
            &ctx,
            Config::new()
                .chosen_class("ring-2 ring-amber-300")
                .on_choose(Rc::new(move |event| {
                    // By the time the user callback runs, the full class
                    // list is already on the item.
                    if let Some(item) = event.item {
                        let present = ctx2
                            .tree()
                            .get(item)
                            .map(|n| n.classes.contains("ring-amber-300"))
                            .unwrap_or(false);
                        *seen.borrow_mut() = present;
                    }
                })),
        );

        handle.choose(0);
        assert!(*chosen_seen.borrow());
    }

    #[test]
    fn calls_before_attach_are_ignored() {
        let ctx = WidgetContext::new();
        let ctx2 = ctx.clone();
        let (_, handle) = drag_list(
            &ctx,
            vec!["x"],
            move |label, _| item_text(&ctx2, label),
            Config::new().reorder_backend(Rc::new(InProcessBackend)),
        );
        // Deferred attach has not run; nothing to drive, nothing panics
        handle.choose(0);
        handle.end_drag(0);
        assert!(!handle.is_initialized());
    }
}
