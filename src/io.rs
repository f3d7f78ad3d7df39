//! Text format for rule trees.
//!
//! # Tree File Format (.tree)
//!
//! ```text
//! num_states=<S>
//! num_neighbors=<N>
//! num_nodes=<count>
//! <level> <child_0> ... <child_(S-1)>     # row 0
//! ...
//! <level> <child_0> ... <child_(S-1)>     # row count-1, the root
//! ```
//!
//! Rows appear bottom-up (children before parents), so the root is the last
//! row and has level `N + 1`. The children of a level-1 row are leaf
//! states; the children of any other row are ids of level-`(k-1)` rows.
//! Leaf states and ids both start at 0, so only the level tag tells them
//! apart.
//!
//! The writer emits exactly the layout above. The reader also accepts blank
//! lines, `#` comment lines, and spaces around `=` in the header.

use std::fmt::{self, Display};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::tree::{check_row, RuleTree};
use crate::types::Level;

impl RuleTree {
    /// Saves the rule tree to a file.
    ///
    /// ```no_run
    /// use ruletree_rs::compiler::compile;
    /// use ruletree_rs::rules::LifeLike;
    ///
    /// let tree = compile(2, 9, &LifeLike::conway()).unwrap();
    /// tree.save("Life.tree").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = fs::File::create(path.as_ref())?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out)?;
        out.flush()?;
        info!("saved rule tree with {} nodes to {}", self.num_nodes(), path.as_ref().display());
        Ok(())
    }

    /// Writes the rule tree in text format.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    /// Converts the rule tree to its text format.
    pub fn to_tree_string(&self) -> String {
        self.to_string()
    }

    /// Reads a rule tree from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_tree_string(&content)
    }

    /// Parses a rule tree from its text format, rejecting anything malformed.
    pub fn from_tree_string(content: &str) -> Result<Self> {
        let mut num_states: Option<u32> = None;
        let mut num_neighbors: Option<u32> = None;
        let mut num_nodes: Option<usize> = None;
        let mut nodes: Vec<Node> = Vec::new();
        let mut last_line = 0;

        for (i, line) in content.lines().enumerate() {
            let lineno = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            last_line = lineno;

            if let Some((key, value)) = line.split_once('=') {
                if !nodes.is_empty() {
                    return Err(Error::format(lineno, "header line after tree data"));
                }
                let key = key.trim();
                let value = value.trim();
                match key {
                    "num_states" => num_states = Some(parse_number(value, lineno, key)?),
                    "num_neighbors" => num_neighbors = Some(parse_number(value, lineno, key)?),
                    "num_nodes" => num_nodes = Some(parse_number(value, lineno, key)?),
                    _ => return Err(Error::format(lineno, format!("unknown header key '{}'", key))),
                }
                continue;
            }

            let (Some(s), Some(n), Some(count)) = (num_states, num_neighbors, num_nodes) else {
                return Err(Error::format(lineno, "tree data before complete header"));
            };
            if s < 1 {
                return Err(Error::format(lineno, "num_states must be at least 1"));
            }
            if nodes.len() == count {
                return Err(Error::format(
                    lineno,
                    format!("more rows than the declared num_nodes={}", count),
                ));
            }

            let mut tokens = line.split_whitespace();
            let level: u32 = tokens
                .next()
                .ok_or_else(|| Error::format(lineno, "empty row"))
                .and_then(|token| parse_number(token, lineno, "level"))?;
            let children = tokens
                .map(|token| parse_number::<u32>(token, lineno, "value"))
                .collect::<Result<Vec<_>>>()?;
            let node = Node::new(Level::new(level), children);

            check_row(nodes.len(), &node, &nodes, s, n as usize + 1).map_err(|msg| Error::format(lineno, msg))?;
            nodes.push(node);
        }

        let (Some(s), Some(n), Some(count)) = (num_states, num_neighbors, num_nodes) else {
            return Err(Error::format(0, "missing num_states, num_neighbors or num_nodes"));
        };
        if nodes.len() != count {
            return Err(Error::format(
                last_line,
                format!("num_nodes={} but found {} rows", count, nodes.len()),
            ));
        }

        let tree = RuleTree::from_nodes(s, n, nodes)?;
        debug!(
            "parsed rule tree: {} states, {} neighbors, {} nodes",
            tree.num_states(),
            tree.num_neighbors(),
            tree.num_nodes()
        );
        Ok(tree)
    }
}

fn parse_number<T: std::str::FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| Error::format(line, format!("invalid {} '{}'", what, token)))
}

impl Display for RuleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "num_states={}", self.num_states())?;
        writeln!(f, "num_neighbors={}", self.num_neighbors())?;
        writeln!(f, "num_nodes={}", self.num_nodes())?;
        for node in self.nodes() {
            write!(f, "{}", node.level.get())?;
            for child in node.children.iter() {
                write!(f, " {}", child)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
