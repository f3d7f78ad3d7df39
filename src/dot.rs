//! Rule tree to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **Leaf states** are rendered as squares at the bottom (sink rank)
//! - **Nodes** are rendered as circles labeled with the input position they
//!   bind, grouped by level
//! - **Edges** are labeled with the states that lead to the child; states
//!   sharing a child are merged into a single edge
//! - **The root** gets an extra marker at the top (source rank)
//!
//! # Examples
//!
//! ```
//! use ruletree_rs::compiler::compile;
//! use ruletree_rs::types::State;
//!
//! let tree = compile(2, 2, &|a: &[State]| a[0] ^ a[1]).unwrap();
//! let dot = tree.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("graph {"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::node::Child;
use crate::tree::RuleTree;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for tree nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for leaf states (default: "square")
    pub leaf_shape: &'static str,
    /// Shape for the root marker (default: "rect")
    pub root_shape: &'static str,
    /// Whether to use HTML labels for subscripts (default: true)
    pub use_html_labels: bool,
    /// Whether to label edges with their states (default: true)
    pub edge_labels: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            leaf_shape: "square",
            root_shape: "rect",
            use_html_labels: true,
            edge_labels: true,
        }
    }
}

impl RuleTree {
    /// Converts the rule tree to DOT format with the default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the rule tree to DOT format.
    ///
    /// ```
    /// use ruletree_rs::compiler::compile;
    /// use ruletree_rs::dot::DotConfig;
    /// use ruletree_rs::types::State;
    ///
    /// let tree = compile(3, 2, &|a: &[State]| a[0].max(a[1])).unwrap();
    /// let config = DotConfig {
    ///     edge_labels: false,
    ///     ..DotConfig::default()
    /// };
    /// let dot = tree.to_dot_with_config(&config).unwrap();
    /// assert!(!dot.contains("label=\"0,"));
    /// ```
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}, fixedsize=true];", config.node_shape)?;

        // Leaf states actually reachable from level-1 rows
        let mut leaves: Vec<u32> = self
            .nodes()
            .iter()
            .filter(|node| node.level.has_leaf_children())
            .flat_map(|node| node.children.iter().copied())
            .collect();
        leaves.sort_unstable();
        leaves.dedup();

        writeln!(dot, "{{ rank=sink")?;
        for state in &leaves {
            writeln!(dot, "s{} [shape={}, label=\"{}\"];", state, config.leaf_shape, state)?;
        }
        writeln!(dot, "}}")?;

        // Group rows by level so each level gets its own rank
        let mut levels = BTreeMap::<u32, Vec<usize>>::new();
        for (id, node) in self.iter() {
            levels.entry(node.level.get()).or_default().push(id.index());
        }

        for (&level, ids) in levels.iter().rev() {
            let position = self.num_vars() - level as usize;
            writeln!(dot, "{{ rank=same")?;
            for id in ids {
                let label = if config.use_html_labels {
                    format!("<x<SUB>{}</SUB>>", position)
                } else {
                    format!("\"x{}\"", position)
                };
                writeln!(dot, "n{} [label={}];", id, label)?;
            }
            writeln!(dot, "}}")?;
        }

        // One edge per distinct child, labeled with all the states leading to it
        for (id, node) in self.iter() {
            let mut targets = BTreeMap::<String, Vec<usize>>::new();
            for (state, child) in node.iter().enumerate() {
                let target = match child {
                    Child::Leaf(s) => format!("s{}", s),
                    Child::Node(c) => format!("n{}", c.index()),
                };
                targets.entry(target).or_default().push(state);
            }
            for (target, states) in targets {
                if config.edge_labels {
                    let label = states.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(",");
                    writeln!(dot, "n{} -- {} [label=\"{}\"];", id.index(), target, label)?;
                } else {
                    writeln!(dot, "n{} -- {};", id.index(), target)?;
                }
            }
        }

        writeln!(dot, "{{ rank=source")?;
        writeln!(dot, "r [shape={}, label=\"{}\"];", config.root_shape, self.root())?;
        writeln!(dot, "}}")?;
        writeln!(dot, "r -- n{};", self.root().index())?;

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::compiler::compile;
    use crate::types::State;

    #[test]
    fn test_to_dot_basic() {
        let tree = compile(2, 2, &|a: &[State]| a[0] & a[1]).unwrap();
        let dot = tree.to_dot().unwrap();

        assert!(dot.starts_with("graph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("s0 [shape=square"));
        assert!(dot.contains("s1 [shape=square"));
        assert!(dot.contains("r -- n2;"));
        // Row 0 is "1 0 0": both states merge into one edge.
        assert!(dot.contains("n0 -- s0 [label=\"0,1\"];"));
    }

    #[test]
    fn test_to_dot_constant() {
        let tree = compile(3, 2, &|_: &[State]| 1u32).unwrap();
        let dot = tree.to_dot().unwrap();
        assert!(dot.contains("s1 [shape=square"));
        assert!(!dot.contains("s0 ["));
        assert!(dot.contains("n1 -- n0 [label=\"0,1,2\"];"));
    }

    #[test]
    fn test_to_dot_with_config() {
        let tree = compile(2, 1, &|a: &[State]| 1 - a[0]).unwrap();
        let config = DotConfig {
            use_html_labels: false,
            edge_labels: false,
            ..DotConfig::default()
        };
        let dot = tree.to_dot_with_config(&config).unwrap();
        assert!(dot.contains("n0 [label=\"x0\"];"));
        assert!(dot.contains("n0 -- s1;"));
    }
}
