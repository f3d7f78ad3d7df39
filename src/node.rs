use crate::reference::NodeId;
use crate::types::{Level, State};

/// A row of the rule tree: a level tag followed by one child per state.
///
/// Children are stored raw. Whether a child is a leaf state or a node id is
/// decided by the row's own level, never by the value: see [`Node::child`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub level: Level,
    pub children: Box<[u32]>,
}

/// A child of a row, interpreted according to the row's level.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Child {
    Leaf(State),
    Node(NodeId),
}

impl Node {
    pub fn new(level: Level, children: impl Into<Box<[u32]>>) -> Self {
        Self {
            level,
            children: children.into(),
        }
    }

    /// Number of children (equal to the number of states).
    pub fn arity(&self) -> usize {
        self.children.len()
    }

    /// Child reached when the variable bound at this row takes value `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not below the arity of the row.
    pub fn child(&self, state: State) -> Child {
        let raw = self.children[state as usize];
        if self.level.has_leaf_children() {
            Child::Leaf(raw)
        } else {
            Child::Node(NodeId::new(raw))
        }
    }

    /// Iterate over all children in state order.
    pub fn iter(&self) -> impl Iterator<Item = Child> + '_ {
        (0..self.arity() as State).map(move |i| self.child(i))
    }
}
