//! The compiled rule tree.
//!
//! A [`RuleTree`] is a leveled, shared decision diagram stored as a list of
//! rows in id order. Every row refers only to rows created before it, so the
//! root is always the last row.
//!
//! ```text
//! root (level n) ── binds input 0
//!   └─ level n-1 ── binds input 1
//!        └─ ...
//!             └─ level 1 ── binds input n-1, children are leaf states
//! ```
//!
//! Evaluating an assignment takes exactly `n` lookups: start at the root and
//! follow the child for each input in order until a leaf state comes out.

use log::debug;

use crate::error::{Error, Result};
use crate::node::{Child, Node};
use crate::reference::NodeId;
use crate::types::{Level, State};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RuleTree {
    num_states: u32,
    num_neighbors: u32,
    nodes: Vec<Node>,
}

impl RuleTree {
    /// Assemble a tree from rows the builders already know to be well formed.
    pub(crate) fn from_trusted(num_states: u32, num_neighbors: u32, nodes: Vec<Node>) -> Self {
        let tree = Self {
            num_states,
            num_neighbors,
            nodes,
        };
        debug_assert!(tree.validate().is_ok(), "builder produced a malformed tree");
        tree
    }

    /// Assemble a tree from arbitrary rows, checking every structural invariant.
    pub fn from_nodes(num_states: u32, num_neighbors: u32, nodes: Vec<Node>) -> Result<Self> {
        let tree = Self {
            num_states,
            num_neighbors,
            nodes,
        };
        tree.validate()?;
        Ok(tree)
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    pub fn num_neighbors(&self) -> u32 {
        self.num_neighbors
    }

    /// Number of input variables (neighbors plus center).
    pub fn num_vars(&self) -> usize {
        self.num_neighbors as usize + 1
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Iterate over all rows with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), node))
    }

    /// The root is the last row produced.
    pub fn root(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u32 - 1)
    }

    pub fn root_level(&self) -> Level {
        Level::new(self.num_vars() as u32)
    }

    /// Child of the given row for the given state, interpreted by the row's level.
    pub fn child(&self, id: NodeId, state: State) -> Child {
        self.node(id).child(state)
    }

    /// Number of rows at each level, indexed from level 1.
    pub fn nodes_per_level(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_vars()];
        for node in &self.nodes {
            counts[node.level.index() - 1] += 1;
        }
        counts
    }

    /// Evaluate the transition for one input assignment by descending from the root.
    pub fn evaluate(&self, inputs: &[State]) -> Result<State> {
        if inputs.len() != self.num_vars() {
            return Err(Error::config(format!(
                "expected {} inputs, got {}",
                self.num_vars(),
                inputs.len()
            )));
        }
        if let Some(&bad) = inputs.iter().find(|&&v| v >= self.num_states) {
            return Err(Error::config(format!(
                "input state {} is out of range 0..{}",
                bad, self.num_states
            )));
        }

        let mut current = self.root();
        for (i, &value) in inputs.iter().enumerate() {
            match self.child(current, value) {
                Child::Node(id) => current = id,
                Child::Leaf(state) if i + 1 == inputs.len() => return Ok(state),
                Child::Leaf(_) => break,
            }
        }
        // Unreachable for a validated tree: levels decrease by one per step.
        Err(Error::format(0, "descent did not end in a leaf after all inputs"))
    }

    /// Check every structural invariant of the table.
    pub fn validate(&self) -> Result<()> {
        if self.num_states < 1 {
            return Err(Error::format(0, "num_states must be at least 1"));
        }
        if self.nodes.is_empty() {
            return Err(Error::format(0, "table has no nodes"));
        }
        for (k, node) in self.nodes.iter().enumerate() {
            check_row(k, node, &self.nodes[..k], self.num_states, self.num_vars())
                .map_err(|msg| Error::format(0, format!("row {}: {}", k, msg)))?;
        }
        let root_level = self.nodes[self.nodes.len() - 1].level;
        if root_level != self.root_level() {
            return Err(Error::format(
                0,
                format!("last node is at {}, expected {}", root_level, self.root_level()),
            ));
        }
        debug!("validated tree with {} nodes", self.nodes.len());
        Ok(())
    }
}

/// Check row `k` against the rows preceding it.
///
/// Leaves must be states below `num_states`; node children must be earlier
/// rows exactly one level down.
pub(crate) fn check_row(
    k: usize,
    node: &Node,
    previous: &[Node],
    num_states: u32,
    num_vars: usize,
) -> std::result::Result<(), String> {
    let level = node.level;
    if level.get() < 1 || level.index() > num_vars {
        return Err(format!("level {} is out of range 1..={}", level.get(), num_vars));
    }
    if node.arity() != num_states as usize {
        return Err(format!(
            "expected {} values, found {}",
            num_states,
            node.arity()
        ));
    }
    for child in node.iter() {
        match child {
            Child::Leaf(state) if state >= num_states => {
                return Err(format!("state value {} is out of range 0..{}", state, num_states));
            }
            Child::Leaf(_) => {}
            Child::Node(id) => {
                if id.index() >= k {
                    return Err(format!("node {} is not defined before row {}", id.get(), k));
                }
                let child_level = previous[id.index()].level;
                if level.below() != Some(child_level) {
                    return Err(format!(
                        "node {} at {} is not one level below {}",
                        id.get(),
                        child_level,
                        level
                    ));
                }
            }
        }
    }
    Ok(())
}
