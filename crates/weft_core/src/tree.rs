//! Element tree arena
//!
//! Owns every element node behind a slotmap key. Widgets hold `NodeId`s and
//! go through the tree for all structural mutation. Structural ops on ids
//! that are no longer alive are tolerated as no-ops; accessors that must
//! observe a node return [`TreeError::NodeMissing`] instead.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

use crate::node::{ElementNode, NodeKind};

new_key_type! {
    /// Key of an element node in the tree arena
    pub struct NodeId;
}

/// Errors surfaced by tree accessors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The node was removed from the tree (e.g. by an ancestor rebuild)
    #[error("element node {0:?} is no longer in the tree")]
    NodeMissing(NodeId),
}

/// Arena of element nodes
#[derive(Default)]
pub struct ElementTree {
    nodes: SlotMap<NodeId, ElementNode>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new detached node of the given kind
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(ElementNode::new(kind))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Result<&ElementNode, TreeError> {
        self.nodes.get(id).ok_or(TreeError::NodeMissing(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut ElementNode, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::NodeMissing(id))
    }

    /// Append `child` as the last child of `parent`
    ///
    /// Detaches `child` from any previous parent first; a node has at most
    /// one parent. Missing ids are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Detach a node from its parent, keeping it alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    /// Detach all children of `parent`, keeping them alive
    ///
    /// Returns the detached ids in their former visual order. Detached
    /// nodes survive so a rebuild can re-append statically held children.
    pub fn detach_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get_mut(parent) else {
            return Vec::new();
        };
        let children: Vec<NodeId> = node.children.drain(..).collect();
        for &child in &children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }
        children
    }

    /// Destroy a node and its whole subtree
    pub fn remove_subtree(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();
        stack.push(id);
        let mut removed = 0usize;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        if removed > 0 {
            trace!(root = ?id, removed, "removed subtree");
        }
    }

    /// Child ids of a node (empty for missing nodes)
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move a child from one position to another within the same parent
    ///
    /// Indices are clamped to the child list; missing parents are ignored.
    pub fn move_child(&mut self, parent: NodeId, from: usize, to: usize) {
        let Some(node) = self.nodes.get_mut(parent) else {
            return;
        };
        if node.children.is_empty() || from >= node.children.len() {
            return;
        }
        let child = node.children.remove(from);
        let to = to.min(node.children.len());
        node.children.insert(to, child);
    }

    /// Indented textual dump of a subtree, for tests and demos
    pub fn debug_string(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.debug_into(root, 0, &mut out);
        out
    }

    fn debug_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&format!("{:?}", node.kind));
        if let Some(ref elem_id) = node.elem_id {
            out.push_str(&format!(" #{elem_id}"));
        }
        if !node.classes.is_empty() {
            out.push_str(&format!(" .[{}]", node.classes));
        }
        if let Some(ref text) = node.text {
            out.push_str(&format!(" {text:?}"));
        }
        if let Some(ref src) = node.src {
            out.push_str(&format!(" src={src}"));
        }
        out.push('\n');
        for &child in self.children(id).iter() {
            self.debug_into(child, depth + 1, out);
        }
    }
}
