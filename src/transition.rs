//! The transition function seam.
//!
//! A rule tree is compiled from a black-box function mapping the states of
//! all input variables (in the neighborhood order, center last) to the next
//! state of the center cell. Anything implementing [`TransitionFunction`]
//! can be compiled; plain closures work directly:
//!
//! ```
//! use ruletree_rs::compiler::compile;
//! use ruletree_rs::types::State;
//!
//! // 3-input parity.
//! let f = |a: &[State]| (a[0] + a[1] + a[2]) % 2;
//! let tree = compile(2, 3, &f).unwrap();
//! assert_eq!(tree.evaluate(&[1, 1, 1]).unwrap(), 1);
//! ```

use std::fmt::Display;

use crate::types::State;

/// A pure, total function from an input assignment to the next state.
///
/// The compiler calls it once per full assignment it visits, up to
/// `num_states ^ num_vars` times, and expects the same answer for the same
/// input every time.
pub trait TransitionFunction {
    /// Compute the next state for the given inputs.
    ///
    /// Returning `Err` aborts the compilation.
    fn evaluate(&self, inputs: &[State]) -> Result<State, String>;
}

impl<F> TransitionFunction for F
where
    F: Fn(&[State]) -> State,
{
    fn evaluate(&self, inputs: &[State]) -> Result<State, String> {
        Ok(self(inputs))
    }
}

/// Adapter for closures that can fail.
///
/// ```
/// use ruletree_rs::compiler::compile;
/// use ruletree_rs::transition::Fallible;
/// use ruletree_rs::types::State;
///
/// let f = Fallible(|a: &[State]| {
///     if a[0] == 2 { Err("state 2 is not supported") } else { Ok(a[0]) }
/// });
/// assert!(compile(3, 1, &f).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> TransitionFunction for Fallible<F>
where
    F: Fn(&[State]) -> Result<State, E>,
    E: Display,
{
    fn evaluate(&self, inputs: &[State]) -> Result<State, String> {
        (self.0)(inputs).map_err(|e| e.to_string())
    }
}
