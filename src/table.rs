use crate::node::Node;
use crate::reference::NodeId;
use crate::subtable::Subtable;
use crate::types::Level;

/// Node storage plus one unique subtable per level.
///
/// Ids are handed out sequentially on insertion and never reused, so the
/// storage order is the id order.
#[derive(Debug, Clone)]
pub struct Table {
    storage: Vec<Node>,
    subtables: Vec<Subtable>,
}

impl Table {
    /// Create an empty table for levels `1..=num_levels`.
    pub fn new(num_levels: u32) -> Self {
        Self {
            storage: Vec::new(),
            subtables: (1..=num_levels).map(|k| Subtable::new(Level::new(k))).collect(),
        }
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.storage[id.index()]
    }

    /// Look up a node by level and children.
    pub fn find(&self, level: Level, children: &[u32]) -> Option<NodeId> {
        self.subtables[level.index() - 1].find(children)
    }

    /// Append a node that is known to be absent, assigning it the next id.
    pub fn insert(&mut self, level: Level, children: Box<[u32]>) -> NodeId {
        let id = NodeId::new(self.storage.len() as u32);
        self.subtables[level.index() - 1].insert(children.clone(), id);
        self.storage.push(Node::new(level, children));
        id
    }

    /// Return the existing node with these children, or insert a new one.
    pub fn put(&mut self, level: Level, children: Vec<u32>) -> NodeId {
        match self.find(level, &children) {
            Some(id) => id,
            None => self.insert(level, children.into_boxed_slice()),
        }
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.storage.clear();
        for subtable in &mut self.subtables {
            subtable.clear();
        }
    }

    /// Take the nodes out in id order, leaving the table empty.
    pub fn take_nodes(&mut self) -> Vec<Node> {
        for subtable in &mut self.subtables {
            subtable.clear();
        }
        std::mem::take(&mut self.storage)
    }
}
