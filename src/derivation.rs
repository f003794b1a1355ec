//! The surface a beam-search driver consumes: a scorer seam, successor expansion over a
//! fixed candidate set, gold-sequence replay and a reproducible ranking order.
//!
//! None of this searches. A driver decides which states to keep; these helpers only make
//! the per-state work uniform.

use std::cmp::Ordering;

use crate::constraint::ParserConstraint;
use crate::diagnostics::{ParserError, Result};
use crate::state::ParseState;
use crate::transition::{Side, Transition};

// ============================================================================
// SCORER
// ============================================================================

/// Assigns a score delta to a candidate transition. The core never looks inside it.
pub trait Scorer {
    fn score(&self, state: &ParseState, transition: &Transition) -> f64;
}

impl<F> Scorer for F
where
    F: Fn(&ParseState, &Transition) -> f64,
{
    fn score(&self, state: &ParseState, transition: &Transition) -> f64 {
        self(state, transition)
    }
}

// ============================================================================
// EXPANSION AND REPLAY
// ============================================================================

/// Every legal successor of `state`, in candidate order.
///
/// Fails with `ResourceExhausted` when the state has used up its transition budget, which
/// is the driver's cue to stop working on the sentence.
pub fn successors<S: Scorer + ?Sized>(
    state: &ParseState,
    candidates: &[Transition],
    constraints: &[ParserConstraint],
    scorer: &S,
) -> Result<Vec<ParseState>> {
    state.check_budget()?;
    candidates
        .iter()
        .filter(|t| t.is_legal(state, constraints))
        .map(|t| t.apply(state, scorer.score(state, t)))
        .collect()
}

/// Applies a gold transition sequence with zero score deltas.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::derivation::replay;
/// use shiftreduce::state::ParseState;
/// use shiftreduce::transition::Transition;
/// use shiftreduce::tree::tagged_sentence;
///
/// let gold: Vec<Transition> = ["Shift", "LeftUnary(NP)", "Shift", "LeftUnary(VP)", "RightBinary*(S)", "Finalize"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let initial = ParseState::new(tagged_sentence(&[("Alice", "NNP"), ("sleeps", "VBZ")]));
/// let done = replay(&initial, &gold, &[]).unwrap();
/// assert_eq!(done.tree().unwrap().to_string(), "(S (NP (NNP Alice)) (VP (VBZ sleeps)))");
/// ```
pub fn replay(
    state: &ParseState,
    transitions: &[Transition],
    constraints: &[ParserConstraint],
) -> Result<ParseState> {
    let mut current = state.clone();
    for (step, transition) in transitions.iter().enumerate() {
        if !transition.is_legal(&current, constraints) {
            tracing::debug!(step, %transition, state = %current, "replay hit an illegal transition");
            return Err(ParserError::IllegalTransition {
                transition: transition.to_string(),
                step,
            });
        }
        current = transition.apply(&current, 0.0)?;
    }
    Ok(current)
}

// ============================================================================
// CANDIDATES AND RANKING
// ============================================================================

/// The fixed candidate set for a label inventory: Shift, Finalize, and every side and root
/// flag of Unary, Binary and BinaryRemoveUnary over each label.
pub fn candidate_set(labels: &[&str]) -> Vec<Transition> {
    let mut candidates = vec![Transition::Shift, Transition::Finalize];
    for label in labels {
        for side in [Side::Left, Side::Right] {
            for is_root in [false, true] {
                candidates.push(Transition::unary(side, *label, is_root));
                candidates.push(Transition::binary(side, *label, is_root));
                candidates.push(Transition::binary_remove_unary(side, *label, is_root));
            }
        }
    }
    candidates
}

/// Orders `(state, insertion_index)` pairs by score, best first, then by insertion index.
/// The order does not depend on which thread produced which state.
pub fn compare_hypotheses(a: (&ParseState, usize), b: (&ParseState, usize)) -> Ordering {
    b.0.score()
        .total_cmp(&a.0.score())
        .then_with(|| a.1.cmp(&b.1))
}
