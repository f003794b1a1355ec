use crate::constraint::{tree_satisfies, ParserConstraint};
use crate::state::ParseState;
use crate::transition::Transition;

/// One tree left, covering the whole sentence, with every constraint met inside it.
pub(super) fn is_legal(state: &ParseState, constraints: &[ParserConstraint]) -> bool {
    if state.stack().len() != 1 || !state.end_of_queue() {
        return false;
    }
    let Ok(tree) = state.stack().peek() else {
        return false;
    };
    tree.span() == state.sentence_span() && constraints.iter().all(|c| tree_satisfies(tree, c))
}

pub(super) fn apply(state: &ParseState, transition: &Transition, score_delta: f64) -> ParseState {
    state.advance(
        state.stack().clone(),
        state.token_position(),
        transition.clone(),
        score_delta,
        true,
    )
}
