//! Weft host element tree
//!
//! This crate plays the host-platform role for the widget layer above it:
//!
//! - **Element tree**: an arena of element nodes with DOM-like attach,
//!   detach, and destroy semantics
//! - **Class lists**: ordered, duplicate-free style-class tokens
//! - **Event dispatch**: per-(node, event type) handler slots with
//!   replacement registration
//!
//! # Example
//!
//! ```rust
//! use weft_core::{ElementTree, NodeKind};
//!
//! let mut tree = ElementTree::new();
//! let root = tree.create(NodeKind::Block);
//! let label = tree.create(NodeKind::Inline);
//! tree.get_mut(label).unwrap().text = Some("hello".into());
//! tree.append_child(root, label);
//! assert_eq!(tree.children(root), vec![label]);
//! ```

pub mod events;
pub mod node;
pub mod tree;

pub use events::{Event, EventData, EventDispatcher, EventHandler, EventType};
pub use node::{ClassList, ElementNode, NodeKind};
pub use tree::{ElementTree, NodeId, TreeError};
