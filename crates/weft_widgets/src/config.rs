//! Widget configuration
//!
//! The recognized-options object every factory accepts. Each factory reads
//! only the keys meaningful to it and ignores the rest.

use std::rc::Rc;

use weft_core::Event;

use crate::reorder::{ReorderBackend, ReorderConfig, ReorderHook};

/// Zero/one-argument click callback
pub type ClickHandler = Rc<dyn Fn(&Event)>;

/// Value callback for editable widgets
pub type ValueHandler = Rc<dyn Fn(&str, &Event)>;

/// Recognized options controlling identity, styling, and callbacks
#[derive(Clone, Default)]
pub struct Config {
    /// Element identity, reapplied on every rebuild
    pub elem_id: Option<String>,
    /// Extra style classes, appended after the factory's defaults
    pub class_name: Option<String>,
    /// Inline style overrides, applied in insertion order
    pub style: Vec<(String, String)>,
    /// Placeholder text (input)
    pub placeholder: Option<String>,
    /// Initial value (input)
    pub value: Option<String>,
    /// Input type token (input), defaults to "text"
    pub input_type: Option<String>,
    /// Click callback, reapplied with replacement semantics on rebuild
    pub on_click: Option<ClickHandler>,
    /// Per-edit value callback (input)
    pub on_input: Option<ValueHandler>,
    /// Committed-change value callback (input)
    pub on_change: Option<ValueHandler>,
    /// Drag-reorder passthrough (drag_list)
    pub reorder: ReorderConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.elem_id = Some(id.into());
        self
    }

    /// Set extra style classes
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Add an inline style override
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    /// Set the placeholder text
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Set the initial value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the input type token
    pub fn input_type(mut self, ty: impl Into<String>) -> Self {
        self.input_type = Some(ty.into());
        self
    }

    /// Set the click callback
    pub fn on_click(mut self, f: impl Fn(&Event) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    /// Set the per-edit value callback
    pub fn on_input(mut self, f: impl Fn(&str, &Event) + 'static) -> Self {
        self.on_input = Some(Rc::new(f));
        self
    }

    /// Set the committed-change value callback
    pub fn on_change(mut self, f: impl Fn(&str, &Event) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    // ---------------------------------------------------------------------
    // Drag-reorder passthrough
    // ---------------------------------------------------------------------

    /// Classes applied to the chosen item (may be several, space-separated)
    pub fn chosen_class(mut self, classes: impl Into<String>) -> Self {
        self.reorder.chosen_class = Some(classes.into());
        self
    }

    /// Classes applied to the drop-placeholder ghost
    pub fn ghost_class(mut self, classes: impl Into<String>) -> Self {
        self.reorder.ghost_class = Some(classes.into());
        self
    }

    /// Classes applied to the item while dragging
    pub fn drag_class(mut self, classes: impl Into<String>) -> Self {
        self.reorder.drag_class = Some(classes.into());
        self
    }

    /// Reorder animation duration in milliseconds
    pub fn animation_ms(mut self, ms: u64) -> Self {
        self.reorder.animation_ms = ms;
        self
    }

    /// Reorder backend to attach on rebuild
    pub fn reorder_backend(mut self, backend: Rc<dyn ReorderBackend>) -> Self {
        self.reorder.backend = Some(backend);
        self
    }

    pub fn on_choose(mut self, f: ReorderHook) -> Self {
        self.reorder.hooks.on_choose = Some(f);
        self
    }

    pub fn on_unchoose(mut self, f: ReorderHook) -> Self {
        self.reorder.hooks.on_unchoose = Some(f);
        self
    }

    pub fn on_clone(mut self, f: ReorderHook) -> Self {
        self.reorder.hooks.on_clone = Some(f);
        self
    }

    pub fn on_start(mut self, f: ReorderHook) -> Self {
        self.reorder.hooks.on_start = Some(f);
        self
    }

    pub fn on_end(mut self, f: ReorderHook) -> Self {
        self.reorder.hooks.on_end = Some(f);
        self
    }

    pub fn on_sort(mut self, f: ReorderHook) -> Self {
        self.reorder.hooks.on_sort = Some(f);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_identity_or_handlers() {
        let config = Config::new();
        assert!(config.elem_id.is_none());
        assert!(config.class_name.is_none());
        assert!(config.on_click.is_none());
        assert!(config.on_input.is_none());
        assert!(config.style.is_empty());
    }

    #[test]
    fn fluent_setters_accumulate() {
        let config = Config::new()
            .id("root")
            .class("gap-4 p-2")
            .style("width", "72px")
            .placeholder("type here")
            .on_click(|_| {});

        assert_eq!(config.elem_id.as_deref(), Some("root"));
        assert_eq!(config.class_name.as_deref(), Some("gap-4 p-2"));
        assert_eq!(config.style, vec![("width".to_string(), "72px".to_string())]);
        assert_eq!(config.placeholder.as_deref(), Some("type here"));
        assert!(config.on_click.is_some());
    }
}
