//! Incremental rule tree construction from explicit transitions.
//!
//! Enumerating `S^num_vars` assignments is out of reach for rules with many
//! states on the Moore neighborhood. Rules written as transition tables
//! instead list a handful of transitions, each constraining every input to a
//! set of states. [`TransitionTreeBuilder`] applies such transitions
//! directly to a shared tree, touching only the nodes a transition covers.
//!
//! # Semantics
//!
//! - Transitions are applied in insertion order. An assignment covered by
//!   several transitions takes the output of the first one.
//! - An assignment covered by no transition keeps the state of the cell bound
//!   last (the center cell in the standard neighborhoods), i.e. nothing
//!   changes.
//!
//! ```
//! use ruletree_rs::transitions::TransitionTreeBuilder;
//!
//! // 3 states, von Neumann neighborhood: inputs are N, W, E, S, C.
//! let mut builder = TransitionTreeBuilder::new(3, 4).unwrap();
//! // A dead cell with a live north neighbor becomes 2.
//! builder.add(&[vec![1], vec![0, 1, 2], vec![0, 1, 2], vec![0, 1, 2], vec![0]], 2).unwrap();
//! let tree = builder.build();
//!
//! assert_eq!(tree.evaluate(&[1, 0, 2, 0, 0]).unwrap(), 2);
//! assert_eq!(tree.evaluate(&[0, 0, 2, 0, 1]).unwrap(), 1);
//! ```
//!
//! # Working table
//!
//! Each transition rebuilds the path of nodes it covers, leaving the old
//! versions behind. Once the table has grown past twice its size after the
//! last collection, it is rebuilt from the root and the unreachable nodes are
//! dropped.

use std::collections::HashMap;

use log::debug;

use crate::error::{Error, Result};
use crate::reference::NodeId;
use crate::table::Table;
use crate::tree::RuleTree;
use crate::types::{Level, State, MAX_VARS};

/// Marker for a leaf no transition has covered yet.
const UNSET: u32 = u32::MAX;

/// Table size that triggers the first collection.
const INITIAL_COLLECT_THRESHOLD: usize = 100;

pub struct TransitionTreeBuilder {
    num_states: u32,
    num_neighbors: u32,
    table: Table,
    root: NodeId,
    collect_threshold: usize,
    num_transitions: usize,
}

impl TransitionTreeBuilder {
    /// Create a builder with no transitions, i.e. the identity on the center cell.
    pub fn new(num_states: u32, num_neighbors: u32) -> Result<Self> {
        if num_states < 1 || num_states == UNSET {
            return Err(Error::config(format!("unsupported number of states: {}", num_states)));
        }
        if num_neighbors as usize >= MAX_VARS {
            return Err(Error::ResourceExhausted {
                what: "variables",
                limit: MAX_VARS.to_string(),
            });
        }

        let num_vars = num_neighbors + 1;
        let mut table = Table::new(num_vars);
        let mut current = UNSET;
        for k in 1..=num_vars {
            current = table.put(Level::new(k), vec![current; num_states as usize]).get();
        }

        Ok(Self {
            num_states,
            num_neighbors,
            table,
            root: NodeId::new(current),
            collect_threshold: INITIAL_COLLECT_THRESHOLD,
            num_transitions: 0,
        })
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    pub fn num_neighbors(&self) -> u32 {
        self.num_neighbors
    }

    pub fn num_vars(&self) -> usize {
        self.num_neighbors as usize + 1
    }

    /// Number of transitions added so far.
    pub fn num_transitions(&self) -> usize {
        self.num_transitions
    }

    /// Size of the working table, garbage included.
    pub fn num_nodes(&self) -> usize {
        self.table.len()
    }

    /// Add a transition: every assignment with `inputs[p]` containing the
    /// state at position `p`, for all positions, maps to `output` unless an
    /// earlier transition already covers it.
    pub fn add<I: AsRef<[State]>>(&mut self, inputs: &[I], output: State) -> Result<()> {
        if inputs.len() != self.num_vars() {
            return Err(Error::config(format!(
                "expected {} input sets, got {}",
                self.num_vars(),
                inputs.len()
            )));
        }
        if output >= self.num_states {
            return Err(Error::config(format!(
                "output state {} is out of range 0..{}",
                output, self.num_states
            )));
        }

        let mut allowed = vec![vec![false; self.num_states as usize]; inputs.len()];
        for (p, set) in inputs.iter().enumerate() {
            for &state in set.as_ref() {
                if state >= self.num_states {
                    return Err(Error::config(format!(
                        "input state {} at position {} is out of range 0..{}",
                        state, p, self.num_states
                    )));
                }
                allowed[p][state as usize] = true;
            }
        }

        let mut cache = HashMap::new();
        let root_level = Level::new(self.num_vars() as u32);
        let root = self.apply(self.root.get(), root_level, &allowed, output, &mut cache);
        self.root = NodeId::new(root);
        self.num_transitions += 1;

        if self.table.len() > self.collect_threshold {
            self.collect_garbage();
        }
        Ok(())
    }

    /// Rebuild `node` at level `at` with every unset leaf the transition covers set to `output`.
    fn apply(
        &mut self,
        node: u32,
        at: Level,
        allowed: &[Vec<bool>],
        output: State,
        cache: &mut HashMap<u32, u32>,
    ) -> u32 {
        let Some(below) = at.below() else {
            return if node == UNSET { output } else { node };
        };
        if let Some(&done) = cache.get(&node) {
            return done;
        }

        let position = at.position(self.num_vars());
        let mut children = self.table.node(NodeId::new(node)).children.to_vec();
        for (i, child) in children.iter_mut().enumerate() {
            if allowed[position][i] {
                *child = self.apply(*child, below, allowed, output, cache);
            }
        }

        let result = self.table.put(at, children).get();
        cache.insert(node, result);
        result
    }

    /// Rebuild the working table from the root, dropping unreachable nodes.
    pub fn collect_garbage(&mut self) {
        let before = self.table.len();
        let mut fresh = Table::new(self.num_vars() as u32);
        let mut cache = HashMap::new();
        let root_level = Level::new(self.num_vars() as u32);
        let root = copy_reachable(&self.table, &mut fresh, self.root.get(), root_level, None, &mut cache);
        self.table = fresh;
        self.root = NodeId::new(root);
        self.collect_threshold = self.table.len() * 2;
        debug!("collected garbage: {} -> {} nodes", before, self.table.len());
    }

    /// Produce the final rule tree, filling uncovered assignments with the last-bound state.
    ///
    /// Ids are numbered in the same post-order as [`compile`][crate::compiler::compile],
    /// so a builder and a compiler describing the same function give identical tables.
    pub fn build(&self) -> RuleTree {
        let mut fresh = Table::new(self.num_vars() as u32);
        let mut cache = HashMap::new();
        let root_level = Level::new(self.num_vars() as u32);
        copy_reachable(&self.table, &mut fresh, self.root.get(), root_level, Some(0), &mut cache);
        debug!(
            "built rule tree from {} transitions: {} nodes",
            self.num_transitions,
            fresh.len()
        );
        RuleTree::from_trusted(self.num_states, self.num_neighbors, fresh.take_nodes())
    }
}

/// Copy the subtree of `node` into `to`, depth-first in child order.
///
/// With `fill = Some(_)`, unset leaves are replaced by the value of the
/// variable bound at level 1 (passed down as `fill`); with `None` they stay unset.
fn copy_reachable(
    from: &Table,
    to: &mut Table,
    node: u32,
    at: Level,
    fill: Option<State>,
    cache: &mut HashMap<u32, u32>,
) -> u32 {
    let Some(below) = at.below() else {
        return match fill {
            Some(state) if node == UNSET => state,
            _ => node,
        };
    };
    if let Some(&done) = cache.get(&node) {
        return done;
    }

    let old = from.node(NodeId::new(node));
    let children = old
        .children
        .iter()
        .enumerate()
        .map(|(i, &child)| copy_reachable(from, to, child, below, fill.map(|_| i as State), cache))
        .collect();

    let result = to.put(at, children).get();
    cache.insert(node, result);
    result
}
