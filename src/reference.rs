use std::fmt::{Display, Formatter};

use crate::types::State;

/// Identifier of a row in a rule tree.
///
/// Ids are assigned sequentially from 0 across the whole table, not per level.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the raw id as written in the table format.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the row index of the node.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Result of building a subtree: either a leaf state (level 0) or a node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Ref {
    Leaf(State),
    Node(NodeId),
}

impl Ref {
    /// Return the raw value stored in the parent row.
    ///
    /// Leaf states and node ids share the same number space; only the
    /// parent's level tells them apart.
    pub const fn raw(self) -> u32 {
        match self {
            Ref::Leaf(state) => state,
            Ref::Node(id) => id.get(),
        }
    }

    pub const fn is_leaf(self) -> bool {
        matches!(self, Ref::Leaf(_))
    }

    pub const fn as_node(self) -> Option<NodeId> {
        match self {
            Ref::Node(id) => Some(id),
            Ref::Leaf(_) => None,
        }
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Ref::Leaf(state) => write!(f, "{}", state),
            Ref::Node(id) => write!(f, "{}", id),
        }
    }
}

impl From<NodeId> for Ref {
    fn from(id: NodeId) -> Self {
        Ref::Node(id)
    }
}
