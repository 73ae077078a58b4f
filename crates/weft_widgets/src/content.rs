//! Content and builder normalization
//!
//! Factories accept either a plain value or a closure for their content.
//! Closures are re-invoked on every rebuild and never memoized, which is
//! what makes a counter label reactive without any diffing machinery.

use std::rc::Rc;

use weft_core::NodeId;

/// Scalar content: a fixed value or a closure producing the current value
#[derive(Clone)]
pub enum Content {
    Static(String),
    Dynamic(Rc<dyn Fn() -> String>),
}

impl Content {
    /// Build dynamic content from a closure
    pub fn dynamic(f: impl Fn() -> String + 'static) -> Self {
        Content::Dynamic(Rc::new(f))
    }

    /// Current value; dynamic content is re-invoked every call
    pub fn resolve(&self) -> String {
        match self {
            Content::Static(v) => v.clone(),
            Content::Dynamic(f) => f(),
        }
    }
}

impl From<&str> for Content {
    fn from(v: &str) -> Self {
        Content::Static(v.to_string())
    }
}

impl From<String> for Content {
    fn from(v: String) -> Self {
        Content::Static(v)
    }
}

impl From<&String> for Content {
    fn from(v: &String) -> Self {
        Content::Static(v.clone())
    }
}

/// What a builder invocation produced: nothing, one child, or a sequence
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BuildOutput {
    #[default]
    Empty,
    One(NodeId),
    Many(Vec<NodeId>),
}

impl BuildOutput {
    /// The produced node ids in order
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            BuildOutput::Empty => Vec::new(),
            BuildOutput::One(id) => vec![*id],
            BuildOutput::Many(ids) => ids.clone(),
        }
    }
}

impl From<()> for BuildOutput {
    fn from(_: ()) -> Self {
        BuildOutput::Empty
    }
}

impl From<NodeId> for BuildOutput {
    fn from(id: NodeId) -> Self {
        BuildOutput::One(id)
    }
}

impl From<Option<NodeId>> for BuildOutput {
    fn from(id: Option<NodeId>) -> Self {
        match id {
            Some(id) => BuildOutput::One(id),
            None => BuildOutput::Empty,
        }
    }
}

impl From<Vec<NodeId>> for BuildOutput {
    fn from(ids: Vec<NodeId>) -> Self {
        BuildOutput::Many(ids)
    }
}

/// Zero-argument child builder, re-invoked on every rebuild
pub type Builder = Rc<dyn Fn() -> BuildOutput>;

/// Child content a factory accepts: nothing, fixed children, or a builder
#[derive(Clone, Default)]
pub enum Children {
    #[default]
    None,
    Node(NodeId),
    Nodes(Vec<NodeId>),
    Builder(Builder),
}

impl Children {
    /// Build dynamic children from a closure
    pub fn dynamic<F, O>(f: F) -> Self
    where
        F: Fn() -> O + 'static,
        O: Into<BuildOutput>,
    {
        Children::Builder(Rc::new(move || f().into()))
    }

    /// Normalize into a builder: fixed children become a builder returning
    /// that same sequence on every invocation
    pub fn into_builder(self) -> Builder {
        match self {
            Children::None => Rc::new(|| BuildOutput::Empty),
            Children::Node(id) => Rc::new(move || BuildOutput::Many(vec![id])),
            Children::Nodes(ids) => Rc::new(move || BuildOutput::Many(ids.clone())),
            Children::Builder(builder) => builder,
        }
    }
}

impl From<NodeId> for Children {
    fn from(id: NodeId) -> Self {
        Children::Node(id)
    }
}

impl From<Vec<NodeId>> for Children {
    fn from(ids: Vec<NodeId>) -> Self {
        Children::Nodes(ids)
    }
}

impl From<Builder> for Children {
    fn from(builder: Builder) -> Self {
        Children::Builder(builder)
    }
}
