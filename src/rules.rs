//! Ready-made transition functions.
//!
//! These cover the families the rule tree format is most often used for.
//! Each one implements [`TransitionFunction`] over the input ordering of its
//! [`Neighborhood`], center last.

use crate::transition::TransitionFunction;
use crate::types::{Neighborhood, State};

/// Outer totalistic two-state rule given by birth and survival neighbor counts.
///
/// A dead cell with a live neighbor count in `birth` is born; a live cell
/// with a count in `survival` stays alive; every other cell dies.
///
/// ```
/// use ruletree_rs::compiler::compile;
/// use ruletree_rs::rules::LifeLike;
///
/// let life = LifeLike::conway();
/// let tree = compile(2, 9, &life).unwrap();
/// assert_eq!(tree.num_nodes(), 32);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LifeLike {
    pub neighborhood: Neighborhood,
    /// `birth[n]` is true if a dead cell with `n` live neighbors is born.
    birth: Vec<bool>,
    /// `survival[n]` is true if a live cell with `n` live neighbors survives.
    survival: Vec<bool>,
}

impl LifeLike {
    /// Create a rule from the given neighbor counts.
    ///
    /// Counts above the neighbor count of the neighborhood are ignored.
    pub fn new(neighborhood: Neighborhood, birth: &[usize], survival: &[usize]) -> Self {
        let size = neighborhood.num_neighbors() + 1;
        let mut b = vec![false; size];
        let mut s = vec![false; size];
        for &n in birth.iter().filter(|&&n| n < size) {
            b[n] = true;
        }
        for &n in survival.iter().filter(|&&n| n < size) {
            s[n] = true;
        }
        Self {
            neighborhood,
            birth: b,
            survival: s,
        }
    }

    /// Conway's Game of Life, B3/S23 on the Moore neighborhood.
    pub fn conway() -> Self {
        Self::new(Neighborhood::Moore, &[3], &[2, 3])
    }

    pub fn births(&self) -> impl Iterator<Item = usize> + '_ {
        self.birth.iter().enumerate().filter(|(_, &b)| b).map(|(n, _)| n)
    }

    pub fn survivals(&self) -> impl Iterator<Item = usize> + '_ {
        self.survival.iter().enumerate().filter(|(_, &s)| s).map(|(n, _)| n)
    }

    pub fn num_vars(&self) -> usize {
        self.neighborhood.num_vars()
    }
}

impl TransitionFunction for LifeLike {
    fn evaluate(&self, inputs: &[State]) -> Result<State, String> {
        if inputs.len() != self.num_vars() {
            return Err(format!("expected {} inputs, got {}", self.num_vars(), inputs.len()));
        }
        let (&center, neighbors) = inputs.split_last().ok_or("no inputs")?;
        if let Some(bad) = inputs.iter().find(|&&v| v > 1) {
            return Err(format!("state {} is not a two-state value", bad));
        }
        let n = neighbors.iter().filter(|&&v| v != 0).count();
        let alive = if center == 0 { self.birth[n] } else { self.survival[n] };
        Ok(alive as State)
    }
}

/// Sum of the selected inputs modulo the number of states.
///
/// ```
/// use ruletree_rs::compiler::compile;
/// use ruletree_rs::rules::Parity;
///
/// let parity = Parity::new(2, vec![0, 1, 2]);
/// let tree = compile(2, 5, &parity).unwrap();
/// assert_eq!(tree.evaluate(&[1, 1, 1, 0, 0]).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Parity {
    num_states: u32,
    positions: Vec<usize>,
}

impl Parity {
    pub fn new(num_states: u32, positions: Vec<usize>) -> Self {
        Self { num_states, positions }
    }
}

impl TransitionFunction for Parity {
    fn evaluate(&self, inputs: &[State]) -> Result<State, String> {
        if self.num_states == 0 {
            return Err("parity over zero states".to_string());
        }
        let mut sum: u64 = 0;
        for &p in &self.positions {
            let value = inputs
                .get(p)
                .ok_or_else(|| format!("position {} is outside of {} inputs", p, inputs.len()))?;
            sum += *value as u64;
        }
        Ok((sum % self.num_states as u64) as State)
    }
}

/// Ignores its inputs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Constant(pub State);

impl TransitionFunction for Constant {
    fn evaluate(&self, _inputs: &[State]) -> Result<State, String> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_conway() {
        let life = LifeLike::conway();
        assert_eq!(life.births().collect::<Vec<_>>(), vec![3]);
        assert_eq!(life.survivals().collect::<Vec<_>>(), vec![2, 3]);

        assert_eq!(life.evaluate(&[0; 9]), Ok(0));
        assert_eq!(life.evaluate(&[1, 1, 1, 0, 0, 0, 0, 0, 0]), Ok(1));
        assert_eq!(life.evaluate(&[1, 1, 0, 0, 0, 0, 0, 0, 1]), Ok(1));
        assert_eq!(life.evaluate(&[1, 1, 0, 0, 0, 0, 0, 0, 0]), Ok(0));
        assert_eq!(life.evaluate(&[1, 1, 1, 1, 0, 0, 0, 0, 1]), Ok(0));
    }

    #[test]
    fn test_life_like_von_neumann() {
        // B1/S: a dead cell with exactly one neighbor is born.
        let rule = LifeLike::new(Neighborhood::VonNeumann, &[1], &[]);
        assert_eq!(rule.evaluate(&[0, 1, 0, 0, 0]), Ok(1));
        assert_eq!(rule.evaluate(&[0, 1, 0, 0, 1]), Ok(0));
        assert_eq!(rule.evaluate(&[1, 1, 0, 0, 0]), Ok(0));
    }

    #[test]
    fn test_life_like_ignores_large_counts() {
        let rule = LifeLike::new(Neighborhood::VonNeumann, &[3, 7], &[9]);
        assert_eq!(rule.births().collect::<Vec<_>>(), vec![3]);
        assert_eq!(rule.survivals().count(), 0);
    }

    #[test]
    fn test_life_like_rejects_bad_inputs() {
        let life = LifeLike::conway();
        assert!(life.evaluate(&[0; 5]).is_err());
        assert!(life.evaluate(&[2, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_parity() {
        let parity = Parity::new(3, vec![0, 2]);
        assert_eq!(parity.evaluate(&[1, 2, 1]), Ok(2));
        assert_eq!(parity.evaluate(&[2, 0, 2]), Ok(1));
        assert!(parity.evaluate(&[1, 1]).is_err());
    }

    #[test]
    fn test_parity_zero_states() {
        let parity = Parity::new(0, vec![0]);
        assert!(parity.evaluate(&[1, 0]).is_err());
    }

    #[test]
    fn test_constant() {
        assert_eq!(Constant(3).evaluate(&[0, 1, 2]), Ok(3));
    }
}
