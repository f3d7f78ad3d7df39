//! Canonicalizing rule tree compiler.
//!
//! The [`Compiler`] turns a black-box [`TransitionFunction`] into a
//! [`RuleTree`] by enumerating every input assignment depth-first and
//! hash-consing the nodes on the way back up.
//!
//! # Algorithm
//!
//! `build(at)` binds the variable at input position `num_vars - at` to each
//! state `0..S` in turn, recursing one level down for each value:
//!
//! ```text
//! build(0)  = f(assignment)                                  -- a leaf state
//! build(at) = mk(at, [build(at - 1) with x_pos = i  for i in 0..S])
//! ```
//!
//! `mk` looks the children up in the subtable for level `at` and returns the
//! existing id on a hit; on a miss the node is appended to storage and gets
//! the next id. Children are always finished before their parent, so every
//! id a row mentions is smaller than the row's own id, and the root comes
//! out last.
//!
//! Two nodes share an id exactly when they sit at the same level and have
//! the same children. By induction from the leaves this means they compute
//! the same function of the remaining variables, so the table is canonical
//! for the given variable ordering.
//!
//! # Cost
//!
//! The enumeration itself is not pruned: `f` is called `S^num_vars` times.
//! Only the resulting table is small. Use [`Limits`] to put a ceiling on the
//! work before handing the compiler an unknown configuration.

use log::{debug, info, warn};
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::reference::{NodeId, Ref};
use crate::table::Table;
use crate::transition::TransitionFunction;
use crate::tree::RuleTree;
use crate::types::{Level, State, MAX_VARS};

/// Ceilings on the work a single compilation may do.
///
/// All limits are off by default.
///
/// ```
/// use ruletree_rs::compiler::Limits;
///
/// let limits = Limits {
///     max_nodes: Some(1_000),
///     ..Limits::default()
/// };
/// assert!(limits.max_evaluations.is_none());
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Limits {
    /// Maximum number of distinct nodes in the table.
    pub max_nodes: Option<usize>,
    /// Maximum number of transition function calls.
    pub max_evaluations: Option<u64>,
    /// Maximum number of input assignments (`S^num_vars`), checked before starting.
    pub max_domain: Option<BigUint>,
}

/// Counters collected during the last compilation.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Stats {
    /// Calls to `build`, leaves included.
    pub calls: u64,
    /// Calls to the transition function.
    pub evaluations: u64,
    /// Subtable lookups that found an existing node.
    pub hits: u64,
}

pub struct Compiler {
    num_states: u32,
    num_vars: usize,
    limits: Limits,
    table: Table,
    /// Scratch assignment, overwritten position by position during the descent.
    assignment: Vec<State>,
    stats: Stats,
}

impl Compiler {
    /// Create a compiler for `num_states` states and `num_vars` input variables.
    pub fn new(num_states: u32, num_vars: usize) -> Result<Self> {
        Self::with_limits(num_states, num_vars, Limits::default())
    }

    pub fn with_limits(num_states: u32, num_vars: usize, limits: Limits) -> Result<Self> {
        if num_states < 1 {
            return Err(Error::config("number of states must be at least 1"));
        }
        if num_vars < 1 {
            return Err(Error::config("number of variables must be at least 1"));
        }
        if num_vars > MAX_VARS {
            warn!("{} variables exceed the limit of {}", num_vars, MAX_VARS);
            return Err(Error::ResourceExhausted {
                what: "variables",
                limit: MAX_VARS.to_string(),
            });
        }

        Ok(Self {
            num_states,
            num_vars,
            limits,
            table: Table::new(num_vars as u32),
            assignment: vec![0; num_vars],
            stats: Stats::default(),
        })
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Counters of the last compilation.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Number of distinct input assignments, `S^num_vars`.
    pub fn domain_size(&self) -> BigUint {
        BigUint::from(self.num_states).pow(self.num_vars as u32)
    }

    fn reset(&mut self) {
        self.table.clear();
        self.assignment.fill(0);
        self.stats = Stats::default();
    }

    /// Compile the transition function into a rule tree.
    ///
    /// Every call starts from an empty table, so compiling the same function
    /// twice gives identical trees.
    pub fn compile<F>(&mut self, f: &F) -> Result<RuleTree>
    where
        F: TransitionFunction + ?Sized,
    {
        self.reset();

        if let Some(max) = &self.limits.max_domain {
            let domain = self.domain_size();
            if &domain > max {
                warn!("domain of {} assignments exceeds the limit of {}", domain, max);
                return Err(Error::ResourceExhausted {
                    what: "assignments",
                    limit: max.to_string(),
                });
            }
        }

        debug!(
            "compile(num_states = {}, num_vars = {})",
            self.num_states, self.num_vars
        );

        let root = self.build(Level::new(self.num_vars as u32), f)?;
        debug_assert_eq!(root, Ref::Node(NodeId::new(self.table.len() as u32 - 1)));

        info!(
            "compiled rule tree: {} nodes, {} evaluations, {} hits",
            self.table.len(),
            self.stats.evaluations,
            self.stats.hits
        );

        let nodes = self.table.take_nodes();
        Ok(RuleTree::from_trusted(self.num_states, self.num_vars as u32 - 1, nodes))
    }

    fn build<F>(&mut self, at: Level, f: &F) -> Result<Ref>
    where
        F: TransitionFunction + ?Sized,
    {
        self.stats.calls += 1;

        let Some(below) = at.below() else {
            return self.evaluate(f).map(Ref::Leaf);
        };

        let position = at.position(self.num_vars);
        let mut children = Vec::with_capacity(self.num_states as usize);
        for i in 0..self.num_states {
            self.assignment[position] = i;
            children.push(self.build(below, f)?.raw());
        }

        self.mk_node(at, children).map(Ref::Node)
    }

    fn evaluate<F>(&mut self, f: &F) -> Result<State>
    where
        F: TransitionFunction + ?Sized,
    {
        if let Some(max) = self.limits.max_evaluations {
            if self.stats.evaluations >= max {
                warn!("evaluation limit of {} reached", max);
                return Err(Error::ResourceExhausted {
                    what: "evaluations",
                    limit: max.to_string(),
                });
            }
        }
        self.stats.evaluations += 1;

        let state = f.evaluate(&self.assignment).map_err(|reason| Error::Function {
            inputs: self.assignment.clone(),
            reason,
        })?;
        if state >= self.num_states {
            return Err(Error::Function {
                inputs: self.assignment.clone(),
                reason: format!("returned state {} out of range 0..{}", state, self.num_states),
            });
        }
        Ok(state)
    }

    fn mk_node(&mut self, level: Level, children: Vec<u32>) -> Result<NodeId> {
        if let Some(id) = self.table.find(level, &children) {
            self.stats.hits += 1;
            return Ok(id);
        }

        let count = self.table.len();
        if self.limits.max_nodes.is_some_and(|max| count >= max) || count >= u32::MAX as usize {
            let limit = self.limits.max_nodes.unwrap_or(u32::MAX as usize);
            warn!("node limit of {} reached at {}", limit, level);
            return Err(Error::ResourceExhausted {
                what: "nodes",
                limit: limit.to_string(),
            });
        }

        let children = children.into_boxed_slice();
        let id = self.table.insert(level, children);
        debug!("mk_node({}, {:?}) -> {}", level, self.table.node(id).children, id);
        Ok(id)
    }
}

/// Compile `f` over `num_states` states and `num_vars` variables with no limits.
///
/// ```
/// use ruletree_rs::compiler::compile;
/// use ruletree_rs::types::State;
///
/// let tree = compile(2, 2, &|a: &[State]| a[0] & a[1]).unwrap();
/// assert_eq!(tree.num_nodes(), 3);
/// assert_eq!(tree.evaluate(&[1, 1]).unwrap(), 1);
/// ```
pub fn compile<F>(num_states: u32, num_vars: usize, f: &F) -> Result<RuleTree>
where
    F: TransitionFunction + ?Sized,
{
    Compiler::new(num_states, num_vars)?.compile(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::node::Child;
    use crate::transition::Fallible;

    fn life(a: &[State]) -> State {
        let n: State = a[..8].iter().sum();
        if n == 3 || (n == 2 && a[8] != 0) {
            1
        } else {
            0
        }
    }

    /// All assignments of `num_vars` variables over `num_states` states, in lexicographic order.
    fn assignments(num_states: u32, num_vars: usize) -> Vec<Vec<State>> {
        let mut all = vec![vec![]];
        for _ in 0..num_vars {
            all = all
                .into_iter()
                .flat_map(|prefix| {
                    (0..num_states).map(move |i| {
                        let mut v = prefix.clone();
                        v.push(i);
                        v
                    })
                })
                .collect();
        }
        all
    }

    #[test]
    fn test_life_matches_reference_table() {
        let tree = compile(2, 9, &life).unwrap();
        let rows: Vec<String> = tree
            .nodes()
            .iter()
            .map(|node| {
                let mut s = node.level.get().to_string();
                for c in node.children.iter() {
                    s.push_str(&format!(" {}", c));
                }
                s
            })
            .collect();
        let expected = [
            "1 0 0", "2 0 0", "1 0 1", "2 0 2", "3 1 3", "1 1 1", "2 2 5", "3 3 6", "4 4 7", "2 5 0", "3 6 9",
            "4 7 10", "5 8 11", "3 9 1", "4 10 13", "5 11 14", "6 12 15", "3 1 1", "4 13 17", "5 14 18", "6 15 19",
            "7 16 20", "4 17 17", "5 18 22", "6 19 23", "7 20 24", "8 21 25", "5 22 22", "6 23 27", "7 24 28",
            "8 25 29", "9 26 30",
        ];
        assert_eq!(rows, expected);
        assert_eq!(tree.num_neighbors(), 8);
        assert_eq!(tree.num_states(), 2);
    }

    #[test]
    fn test_life_scenarios() {
        let tree = compile(2, 9, &life).unwrap();
        assert_eq!(tree.evaluate(&[0; 9]).unwrap(), 0);
        assert_eq!(tree.evaluate(&[1, 0, 1, 0, 0, 0, 1, 0, 0]).unwrap(), 1);
        assert_eq!(tree.evaluate(&[0, 0, 0, 0, 0, 1, 1, 1, 0]).unwrap(), 1);
        assert_eq!(tree.evaluate(&[1, 1, 0, 0, 0, 0, 0, 0, 1]).unwrap(), 1);
        assert_eq!(tree.evaluate(&[1, 1, 0, 0, 0, 0, 0, 0, 0]).unwrap(), 0);
        assert_eq!(tree.evaluate(&[1, 1, 1, 1, 0, 0, 0, 0, 1]).unwrap(), 0);
    }

    #[test]
    fn test_round_trip_exhaustive() {
        let f = |a: &[State]| (a[0] * 2 + a[1] + a[2] * a[3]) % 3;
        let tree = compile(3, 4, &f).unwrap();
        for v in assignments(3, 4) {
            assert_eq!(tree.evaluate(&v).unwrap(), f(v.as_slice()), "mismatch on {:?}", v);
        }
    }

    #[test]
    fn test_determinism() {
        let f = |a: &[State]| (a[0] + 2 * a[1] + a[2]) % 3;
        let mut compiler = Compiler::new(3, 3).unwrap();
        let first = compiler.compile(&f).unwrap();
        let stats = compiler.stats();
        let second = compiler.compile(&f).unwrap();
        assert_eq!(first, second);
        assert_eq!(compiler.stats(), stats);
        assert_eq!(compile(3, 3, &f).unwrap(), first);
    }

    #[test]
    fn test_single_state_is_fully_shared() {
        let tree = compile(1, 6, &|_: &[State]| 0u32).unwrap();
        assert_eq!(tree.num_nodes(), 6);
        assert_eq!(tree.nodes_per_level(), vec![1; 6]);
        for (id, node) in tree.iter() {
            assert_eq!(node.level.index(), id.index() + 1);
        }
    }

    #[test]
    fn test_constant_function() {
        let tree = compile(4, 3, &|_: &[State]| 2u32).unwrap();
        assert_eq!(tree.nodes_per_level(), vec![1, 1, 1]);
        assert_eq!(&*tree.node(NodeId::new(0)).children, &[2, 2, 2, 2]);
        for v in assignments(4, 3) {
            assert_eq!(tree.evaluate(&v).unwrap(), 2);
        }
    }

    #[test]
    fn test_symmetric_function_shares_subtrees() {
        // Symmetric under swapping inputs 0 and 1.
        let f = |a: &[State]| (a[0] + a[1]) % 2 ^ a[2];
        let tree = compile(2, 3, &f).unwrap();
        let root = tree.node(tree.root());
        // Any full binary tree over 3 variables would have 7 nodes.
        assert!(tree.num_nodes() < 7);
        // x0 = 0, x1 = 1 and x0 = 1, x1 = 0 lead to the same level-1 node.
        let via = |first: State, second: State| match tree.child(tree.root(), first) {
            Child::Node(id) => tree.child(id, second),
            Child::Leaf(_) => unreachable!(),
        };
        assert_eq!(via(0, 1), via(1, 0));
        assert_eq!(root.level, Level::new(3));
    }

    #[test]
    fn test_children_precede_parents() {
        let tree = compile(3, 4, &|a: &[State]| a.iter().max().copied().unwrap_or(0)).unwrap();
        for (id, node) in tree.iter() {
            for child in node.iter() {
                if let Child::Node(c) = child {
                    assert!(c < id);
                    assert_eq!(tree.node(c).level.above(), node.level);
                }
            }
        }
    }

    #[test]
    fn test_no_duplicate_rows() {
        let tree = compile(2, 9, &life).unwrap();
        let mut seen = std::collections::HashSet::new();
        for node in tree.nodes() {
            assert!(seen.insert(node.clone()), "duplicate row {:?}", node);
        }
    }

    #[test]
    fn test_configuration_errors() {
        assert!(matches!(Compiler::new(0, 3), Err(Error::Configuration(_))));
        assert!(matches!(Compiler::new(2, 0), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_function_out_of_range() {
        let err = compile(2, 2, &|a: &[State]| a[0] + a[1]).unwrap_err();
        match err {
            Error::Function { inputs, .. } => assert_eq!(inputs, vec![1, 1]),
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_function_failure_aborts() {
        let f = Fallible(|a: &[State]| if a[1] == 1 { Err("unsupported") } else { Ok(0u32) });
        let err = compile(2, 2, &f).unwrap_err();
        match err {
            Error::Function { inputs, reason } => {
                assert_eq!(inputs, vec![0, 1]);
                assert_eq!(reason, "unsupported");
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_node_limit() {
        let limits = Limits {
            max_nodes: Some(5),
            ..Limits::default()
        };
        let mut compiler = Compiler::with_limits(2, 9, limits).unwrap();
        let err = compiler.compile(&life).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted { what: "nodes", .. }));
    }

    #[test]
    fn test_evaluation_limit() {
        let limits = Limits {
            max_evaluations: Some(100),
            ..Limits::default()
        };
        let mut compiler = Compiler::with_limits(2, 9, limits).unwrap();
        let err = compiler.compile(&life).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted { what: "evaluations", .. }));
        assert_eq!(compiler.stats().evaluations, 100);
    }

    #[test]
    fn test_domain_limit() {
        let limits = Limits {
            max_domain: Some(BigUint::from(511u32)),
            ..Limits::default()
        };
        let mut compiler = Compiler::with_limits(2, 9, limits).unwrap();
        assert_eq!(compiler.domain_size(), BigUint::from(512u32));
        let err = compiler.compile(&life).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted { what: "assignments", .. }));
        assert_eq!(compiler.stats().calls, 0);
    }

    #[test]
    fn test_too_many_variables() {
        let limits = Limits {
            max_nodes: Some(10),
            ..Limits::default()
        };
        let err = Compiler::with_limits(1, 1_000_000, limits).err().unwrap();
        assert!(matches!(err, Error::ResourceExhausted { what: "variables", .. }));
        assert!(matches!(
            compile(1, MAX_VARS + 1, &|_: &[State]| 0u32),
            Err(Error::ResourceExhausted { .. })
        ));
    }

    #[test]
    fn test_single_state_at_max_depth() {
        let tree = compile(1, MAX_VARS, &|_: &[State]| 0u32).unwrap();
        assert_eq!(tree.num_nodes(), MAX_VARS);
        assert_eq!(tree.evaluate(&vec![0; MAX_VARS]).unwrap(), 0);
    }

    #[test]
    fn test_stats() {
        let mut compiler = Compiler::new(2, 9).unwrap();
        let tree = compiler.compile(&life).unwrap();
        let stats = compiler.stats();
        assert_eq!(stats.evaluations, 512);
        // Full binary tree of depth 9: 2^10 - 1 calls.
        assert_eq!(stats.calls, 1023);
        assert_eq!(stats.hits + tree.num_nodes() as u64, 511);
    }
}
