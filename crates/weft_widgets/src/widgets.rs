//! Widget factories
//!
//! One free function per visual primitive. Every factory creates a node,
//! wraps the caller's content in a builder closure, and hands both to
//! [`make_rebuildable`]; they differ only in node kind, default style
//! classes, and which [`Config`] keys they read.
//!
//! Default classes and style overrides are applied inside the builder
//! closure, so a rebuild refreshes them along with the children.

use std::rc::Rc;

use weft_core::events::{event_types, EventHandler};
use weft_core::{NodeId, NodeKind};

use crate::config::{Config, ValueHandler};
use crate::content::{Builder, BuildOutput, Children, Content};
use crate::context::WidgetContext;
use crate::rebuild::{make_rebuildable, Rebuildable};

fn apply_base(
    ctx: &WidgetContext,
    node: NodeId,
    defaults: &str,
    class_name: Option<&str>,
    style: &[(String, String)],
) {
    if let Ok(elem) = ctx.tree_mut().get_mut(node) {
        elem.classes.set_from_str(defaults);
        if let Some(extra) = class_name {
            elem.classes.add_many(extra);
        }
        for (property, value) in style {
            elem.style.insert(property.clone(), value.clone());
        }
    }
}

/// Container widget over a fixed set of defaults plus the caller's children
fn block_widget(
    ctx: &WidgetContext,
    defaults: &'static str,
    children: impl Into<Children>,
    config: Config,
) -> Rebuildable {
    let node = ctx.create(NodeKind::Block);
    let child_builder = children.into().into_builder();
    let builder_ctx = ctx.clone();
    let class_name = config.class_name.clone();
    let style = config.style.clone();
    let builder: Builder = Rc::new(move || {
        apply_base(&builder_ctx, node, defaults, class_name.as_deref(), &style);
        child_builder()
    });
    make_rebuildable(ctx, node, builder, config)
}

/// Text span showing a value or a builder's current value
pub fn text(ctx: &WidgetContext, content: impl Into<Content>, config: Config) -> Rebuildable {
    let node = ctx.create(NodeKind::Inline);
    let content = content.into();
    let builder_ctx = ctx.clone();
    let class_name = config.class_name.clone();
    let style = config.style.clone();
    let builder: Builder = Rc::new(move || {
        apply_base(&builder_ctx, node, "block", class_name.as_deref(), &style);
        if let Ok(elem) = builder_ctx.tree_mut().get_mut(node) {
            elem.text = Some(content.resolve());
        }
        BuildOutput::Empty
    });
    make_rebuildable(ctx, node, builder, config)
}

/// Plain container with no default classes
pub fn container(
    ctx: &WidgetContext,
    children: impl Into<Children>,
    config: Config,
) -> Rebuildable {
    block_widget(ctx, "", children, config)
}

/// Horizontal flex container
pub fn row(ctx: &WidgetContext, children: impl Into<Children>, config: Config) -> Rebuildable {
    block_widget(ctx, "flex flex-row", children, config)
}

/// Vertical flex container
pub fn column(ctx: &WidgetContext, children: impl Into<Children>, config: Config) -> Rebuildable {
    block_widget(ctx, "flex flex-col", children, config)
}

/// Image element with a fixed or builder-produced source
///
/// Configured classes replace the default sizing classes rather than
/// extending them.
pub fn image(ctx: &WidgetContext, src: impl Into<Content>, config: Config) -> Rebuildable {
    let node = ctx.create(NodeKind::Image);
    let src = src.into();
    let builder_ctx = ctx.clone();
    let class_name = config.class_name.clone();
    let style = config.style.clone();
    let builder: Builder = Rc::new(move || {
        let classes = class_name.as_deref().unwrap_or("w-full h-auto");
        apply_base(&builder_ctx, node, classes, None, &style);
        if let Ok(elem) = builder_ctx.tree_mut().get_mut(node) {
            elem.src = Some(src.resolve());
        }
        BuildOutput::Empty
    });
    make_rebuildable(ctx, node, builder, config)
}

/// Clickable button with a fixed or builder-produced label
pub fn button(ctx: &WidgetContext, label: impl Into<Content>, config: Config) -> Rebuildable {
    let node = ctx.create(NodeKind::Button);
    let label = label.into();
    let builder_ctx = ctx.clone();
    let class_name = config.class_name.clone();
    let style = config.style.clone();
    let builder: Builder = Rc::new(move || {
        apply_base(
            &builder_ctx,
            node,
            "bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700 transition",
            class_name.as_deref(),
            &style,
        );
        if let Ok(elem) = builder_ctx.tree_mut().get_mut(node) {
            elem.text = Some(label.resolve());
        }
        BuildOutput::Empty
    });
    make_rebuildable(ctx, node, builder, config)
}

/// Fixed-size gap; `size` is a spacing scale token, e.g. "4"
pub fn spacer(ctx: &WidgetContext, size: &str, config: Config) -> Rebuildable {
    let node = ctx.create(NodeKind::Block);
    let classes = format!("h-{size} w-{size}");
    let builder_ctx = ctx.clone();
    let builder: Builder = Rc::new(move || {
        apply_base(&builder_ctx, node, &classes, None, &[]);
        BuildOutput::Empty
    });
    make_rebuildable(ctx, node, builder, config)
}

/// Flexible box filling leftover space
pub fn expanded(ctx: &WidgetContext, children: impl Into<Children>, config: Config) -> Rebuildable {
    block_widget(ctx, "flex-1", children, config)
}

/// Vertical list built from `data` through a per-item builder
pub fn list_view<T: Clone + 'static>(
    ctx: &WidgetContext,
    data: Vec<T>,
    item_builder: impl Fn(&T, usize) -> NodeId + 'static,
    config: Config,
) -> Rebuildable {
    let node = ctx.create(NodeKind::Block);
    let builder_ctx = ctx.clone();
    let class_name = config.class_name.clone();
    let style = config.style.clone();
    let builder: Builder = Rc::new(move || {
        apply_base(
            &builder_ctx,
            node,
            "flex flex-col",
            class_name.as_deref(),
            &style,
        );
        let items: Vec<NodeId> = data
            .iter()
            .enumerate()
            .map(|(index, item)| item_builder(item, index))
            .collect();
        BuildOutput::Many(items)
    });
    make_rebuildable(ctx, node, builder, config)
}

fn value_handler(f: &ValueHandler) -> EventHandler {
    let f = f.clone();
    Rc::new(move |event| f(event.value().unwrap_or_default(), event))
}

/// Editable input field
///
/// Reads `placeholder`, `value`, `input_type`, `on_input`, and `on_change`
/// from the config; handlers are re-registered with replacement semantics
/// on every rebuild.
pub fn input(ctx: &WidgetContext, config: Config) -> Rebuildable {
    let node = ctx.create(NodeKind::Input);
    let builder_ctx = ctx.clone();
    let class_name = config.class_name.clone();
    let style = config.style.clone();
    let placeholder = config.placeholder.clone();
    let value = config.value.clone();
    let input_type = config.input_type.clone();
    let on_input = config.on_input.clone();
    let on_change = config.on_change.clone();
    let builder: Builder = Rc::new(move || {
        apply_base(
            &builder_ctx,
            node,
            "border px-3 py-2 rounded outline-none focus:ring-2 focus:ring-blue-500",
            class_name.as_deref(),
            &style,
        );
        if let Ok(elem) = builder_ctx.tree_mut().get_mut(node) {
            elem.input_type = Some(input_type.clone().unwrap_or_else(|| "text".to_string()));
            if let Some(ref placeholder) = placeholder {
                elem.placeholder = Some(placeholder.clone());
            }
            if let Some(ref value) = value {
                elem.value = Some(value.clone());
            }
        }
        if let Some(ref f) = on_input {
            builder_ctx
                .events_mut()
                .set_handler(node, event_types::INPUT, value_handler(f));
        }
        if let Some(ref f) = on_change {
            builder_ctx
                .events_mut()
                .set_handler(node, event_types::CHANGE, value_handler(f));
        }
        BuildOutput::Empty
    });
    make_rebuildable(ctx, node, builder, config)
}

/// Relative-positioned container for layered children
pub fn stack(ctx: &WidgetContext, children: impl Into<Children>, config: Config) -> Rebuildable {
    block_widget(ctx, "relative", children, config)
}

/// Absolutely-positioned overlay inside a [`stack`]
pub fn positioned(
    ctx: &WidgetContext,
    children: impl Into<Children>,
    config: Config,
) -> Rebuildable {
    block_widget(ctx, "absolute", children, config)
}
