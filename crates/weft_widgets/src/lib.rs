//! Weft Widget Layer
//!
//! Declarative widget factories over the [`weft_core`] element tree.
//!
//! Widgets are plain functions: each creates an element, records how to
//! produce its content, and returns a [`Rebuildable`] handle. Calling
//! [`Rebuildable::rebuild`] tears the element's children down and runs the
//! recorded builder again, so dynamic regions stay in sync with program
//! state without any diffing.
//!
//! # Example
//!
//! ```
//! use weft_widgets::prelude::*;
//!
//! let ctx = WidgetContext::new();
//! let count = State::new(0i32);
//!
//! let c = count.clone();
//! let label = text(
//!     &ctx,
//!     Content::dynamic(move || format!("Count: {}", c.get())),
//!     Config::new(),
//! );
//! count.bind(&label);
//!
//! let c = count.clone();
//! let inc = button(&ctx, "+1", Config::new().on_click(move |_| c.update(|n| *n += 1)));
//!
//! let app = column(&ctx, vec![label.node(), inc.node()], Config::new().id("app"));
//!
//! ctx.emit_click(inc.node());
//! assert_eq!(count.get(), 1);
//! # let _ = app;
//! ```

pub mod config;
pub mod content;
pub mod context;
pub mod rebuild;
pub mod reorder;
pub mod state;
pub mod widgets;

pub use config::Config;
pub use content::{BuildOutput, Builder, Children, Content};
pub use context::WidgetContext;
pub use rebuild::{make_rebuildable, Rebuildable, WeakRebuildable};
pub use reorder::{
    drag_list, InProcessBackend, ReorderBackend, ReorderConfig, ReorderError, ReorderEvent,
    ReorderHandle, ReorderInstance, ReorderOptions,
};
pub use state::State;
pub use widgets::{
    button, column, container, expanded, image, input, list_view, positioned, row, spacer, stack,
    text,
};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::content::{BuildOutput, Builder, Children, Content};
    pub use crate::context::WidgetContext;
    pub use crate::rebuild::Rebuildable;
    pub use crate::reorder::{drag_list, InProcessBackend, ReorderHandle};
    pub use crate::state::State;
    pub use crate::widgets::{
        button, column, container, expanded, image, input, list_view, positioned, row, spacer,
        stack, text,
    };

    pub use weft_core::events::{event_types, Event};
    pub use weft_core::{ElementTree, NodeId, NodeKind, TreeError};
}
