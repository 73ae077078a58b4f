//! Element node types
//!
//! The vocabulary of the host tree: node kinds, style-class token lists,
//! and the per-node attribute set widgets read and write.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::tree::NodeId;

/// Kind of visual element a node represents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Generic block-level container
    #[default]
    Block,
    /// Inline text span
    Inline,
    /// Image element with a source
    Image,
    /// Clickable button
    Button,
    /// Editable input field
    Input,
}

/// Ordered, duplicate-free list of style-class tokens
///
/// Tokens never contain whitespace. Inputs that carry several
/// space-separated classes are split before insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single token (no-op if already present or empty)
    pub fn add(&mut self, token: &str) {
        let token = token.trim();
        if token.is_empty() || self.contains(token) {
            return;
        }
        self.tokens.push(token.to_string());
    }

    /// Add every whitespace-separated token in `classes`
    pub fn add_many(&mut self, classes: &str) {
        for token in classes.split_whitespace() {
            self.add(token);
        }
    }

    /// Remove a single token
    pub fn remove(&mut self, token: &str) {
        self.tokens.retain(|t| t != token);
    }

    /// Remove every whitespace-separated token in `classes`
    pub fn remove_many(&mut self, classes: &str) {
        for token in classes.split_whitespace() {
            self.remove(token);
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Replace the whole list from a space-separated string
    pub fn set_from_str(&mut self, classes: &str) {
        self.tokens.clear();
        self.add_many(classes);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// A single element node in the host tree
#[derive(Clone, Debug, Default)]
pub struct ElementNode {
    /// What kind of element this is
    pub kind: NodeKind,
    /// Element identity (the `id` option)
    pub elem_id: Option<String>,
    /// Style classes
    pub classes: ClassList,
    /// Text content (text spans, button labels)
    pub text: Option<String>,
    /// Image source
    pub src: Option<String>,
    /// Current value (input elements)
    pub value: Option<String>,
    /// Placeholder text (input elements)
    pub placeholder: Option<String>,
    /// Input type token, e.g. "text" (input elements)
    pub input_type: Option<String>,
    /// Inline style overrides, insertion order preserved
    pub style: IndexMap<String, String>,
    /// Child node ids in visual order
    pub children: SmallVec<[NodeId; 4]>,
    /// Parent link (None for roots and detached nodes)
    pub parent: Option<NodeId>,
}

impl ElementNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_list_deduplicates() {
        let mut classes = ClassList::new();
        classes.add("flex");
        classes.add("flex");
        classes.add("flex-row");
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.to_string(), "flex flex-row");
    }

    #[test]
    fn class_list_splits_whitespace() {
        let mut classes = ClassList::new();
        classes.add_many("flex  flex-col\tgap-2");
        assert!(classes.contains("flex"));
        assert!(classes.contains("flex-col"));
        assert!(classes.contains("gap-2"));
        assert_eq!(classes.len(), 3);
    }

    #[test]
    fn class_list_remove_many() {
        let mut classes = ClassList::new();
        classes.add_many("ring-2 ring-blue-400 shadow-lg");
        classes.remove_many("ring-2 ring-blue-400");
        assert_eq!(classes.to_string(), "shadow-lg");
    }

    #[test]
    fn set_from_str_replaces() {
        let mut classes = ClassList::new();
        classes.add_many("a b c");
        classes.set_from_str("d e");
        assert_eq!(classes.to_string(), "d e");
    }

    #[test]
    fn empty_tokens_ignored() {
        let mut classes = ClassList::new();
        classes.add("");
        classes.add("   ");
        assert!(classes.is_empty());
    }
}
