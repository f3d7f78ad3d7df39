use num_bigint::BigUint;

use crate::node::Child;
use crate::tree::RuleTree;
use crate::types::State;

impl RuleTree {
    /// Number of distinct input assignments, `num_states ^ num_vars`.
    pub fn domain_size(&self) -> BigUint {
        BigUint::from(self.num_states()).pow(self.num_vars() as u32)
    }

    /// Number of input assignments that map to each output state.
    ///
    /// Rows are visited in id order, which is already bottom-up, so every
    /// node is counted once no matter how often it is shared.
    pub fn output_histogram(&self) -> Vec<BigUint> {
        let num_states = self.num_states() as usize;
        let mut counts: Vec<Vec<BigUint>> = Vec::with_capacity(self.num_nodes());

        for (_, node) in self.iter() {
            let mut histogram = vec![BigUint::ZERO; num_states];
            for child in node.iter() {
                match child {
                    Child::Leaf(state) => histogram[state as usize] += 1u32,
                    Child::Node(id) => {
                        for (total, count) in histogram.iter_mut().zip(&counts[id.index()]) {
                            *total += count;
                        }
                    }
                }
            }
            counts.push(histogram);
        }

        counts.pop().unwrap_or_default()
    }

    /// Number of input assignments that map to `state`.
    ///
    /// ```
    /// use num_bigint::BigUint;
    /// use ruletree_rs::compiler::compile;
    /// use ruletree_rs::rules::LifeLike;
    ///
    /// let tree = compile(2, 9, &LifeLike::conway()).unwrap();
    /// // 8C3 births plus 8C2 + 8C3 survivals.
    /// assert_eq!(tree.count_assignments(1), BigUint::from(56u32 + 28 + 56));
    /// ```
    pub fn count_assignments(&self, state: State) -> BigUint {
        self.output_histogram()
            .into_iter()
            .nth(state as usize)
            .unwrap_or_default()
    }
}
