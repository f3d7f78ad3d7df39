//! # ruletree-rs: compiled rule trees for cellular automata
//!
//! **`ruletree-rs`** compiles the transition function of a cellular automaton
//! into a **rule tree**: a leveled, shared decision diagram that a simulator
//! can evaluate for any cell with one table lookup per input variable.
//!
//! ## What is a rule tree?
//!
//! A transition function maps the states of `N` neighbors and the center cell
//! to the next state of the center. The rule tree binds these `N + 1` inputs
//! one at a time, in a fixed order, and stores every decision point as a row
//! with one child per state. Identical rows at the same level are stored
//! once (hash consing), so rules with symmetry or "don't care" structure
//! compile to tiny tables. For a fixed variable ordering the table is
//! **canonical**: equal functions give byte-identical tables.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ruletree_rs::compiler::compile;
//! use ruletree_rs::types::State;
//!
//! // Conway's Game of Life over the Moore order NW, NE, SW, SE, N, W, E, S, C.
//! let life = |a: &[State]| {
//!     let n: State = a[..8].iter().sum();
//!     (n == 3 || (n == 2 && a[8] == 1)) as State
//! };
//!
//! let tree = compile(2, 9, &life).unwrap();
//! assert_eq!(tree.num_nodes(), 32);
//!
//! // Three live neighbors bring a dead cell to life.
//! assert_eq!(tree.evaluate(&[1, 0, 0, 1, 0, 0, 0, 1, 0]).unwrap(), 1);
//!
//! // The text format understood by rule tree engines.
//! let text = tree.to_tree_string();
//! assert!(text.starts_with("num_states=2\nnum_neighbors=8\nnum_nodes=32\n"));
//! ```
//!
//! ## Core Components
//!
//! - **[`compiler`]**: The [`Compiler`][crate::compiler::Compiler] that turns a
//!   [`TransitionFunction`][crate::transition::TransitionFunction] into a tree.
//! - **[`tree`]**: The compiled [`RuleTree`][crate::tree::RuleTree] and its evaluation.
//! - **[`io`]**: Reading and writing the `.tree` text format.
//! - **[`transitions`]**: Building trees incrementally from transition tables.
//! - **[`rules`]**: Ready-made transition functions.

pub mod compiler;
pub mod count;
pub mod dot;
pub mod error;
pub mod io;
pub mod node;
pub mod reference;
pub mod rules;
pub mod subtable;
pub mod table;
pub mod transition;
pub mod transitions;
pub mod tree;
pub mod types;
