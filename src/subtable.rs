//! Per-level unique table for rule tree nodes.
//!
//! The builders keep nodes in a plain `Vec<Node>` indexed by id, plus one
//! subtable per level for hash-consing:
//!
//! ```text
//! subtables[0] → level 1 (children are leaf states)
//! subtables[1] → level 2 (children are level-1 ids)
//! ...
//! ```
//!
//! Each subtable maps a children slice to the id of the node holding it.
//! Since all nodes in a subtable share the level, the level is not part of
//! the key, and nodes at different levels are never merged.
//!
//! Keys are owned boxed slices, but lookups borrow a plain `&[u32]`, so a
//! hit costs no allocation.

use std::collections::HashMap;

use crate::reference::NodeId;
use crate::types::Level;

/// A subtable storing the nodes of a single level.
#[derive(Debug, Clone)]
pub struct Subtable {
    /// The level of all nodes in this subtable.
    pub level: Level,

    /// Map from children to node id.
    nodes: HashMap<Box<[u32]>, NodeId>,
}

impl Subtable {
    /// Create a new empty subtable for the given level.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its children.
    pub fn find(&self, children: &[u32]) -> Option<NodeId> {
        self.nodes.get(children).copied()
    }

    /// Insert a node into the subtable.
    ///
    /// The caller must have checked with [`find`][Subtable::find] first:
    /// a second insert of the same children would break canonicity.
    pub fn insert(&mut self, children: Box<[u32]>, id: NodeId) {
        let previous = self.nodes.insert(children, id);
        debug_assert!(previous.is_none(), "duplicate node at {}", self.level);
    }

    /// Get the number of nodes in this subtable.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the subtable is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear all nodes from the subtable.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtable_basic() {
        let mut st = Subtable::new(Level::new(1));

        assert!(st.find(&[0, 1]).is_none());

        st.insert(vec![0, 1].into(), NodeId::new(42));
        assert_eq!(st.find(&[0, 1]), Some(NodeId::new(42)));
        assert_eq!(st.find(&[1, 0]), None);
        assert_eq!(st.len(), 1);

        st.clear();
        assert!(st.find(&[0, 1]).is_none());
        assert!(st.is_empty());
    }

    #[test]
    fn test_subtable_multiple_nodes() {
        let mut st = Subtable::new(Level::new(2));

        st.insert(vec![0, 0, 1].into(), NodeId::new(10));
        st.insert(vec![1, 2, 3].into(), NodeId::new(20));
        st.insert(vec![0, 1, 0].into(), NodeId::new(30));

        assert_eq!(st.len(), 3);
        assert_eq!(st.find(&[0, 0, 1]), Some(NodeId::new(10)));
        assert_eq!(st.find(&[1, 2, 3]), Some(NodeId::new(20)));
        assert_eq!(st.find(&[0, 1, 0]), Some(NodeId::new(30)));
    }
}
