use crate::diagnostics::Result;
use crate::state::ParseState;
use crate::transition::Transition;
use crate::tree::Tree;

pub(super) fn is_legal(state: &ParseState, label: &str, is_root: bool) -> bool {
    let Ok(top) = state.stack().peek() else {
        return false;
    };
    if top.is_leaf() {
        return false;
    }
    if is_root && (!state.end_of_queue() || state.stack().len() != 1) {
        return false;
    }
    // X over X adds nothing and would let the search loop.
    if top.label() == label {
        return false;
    }
    top.unary_chain_len() < state.config().max_unary_chain
}

/// The head of a unary node is always its only child, whatever the side.
pub(super) fn apply(
    state: &ParseState,
    transition: &Transition,
    label: &str,
    score_delta: f64,
) -> Result<ParseState> {
    let top = state.stack().peek()?.clone();
    let stack = state.stack().pop()?.push(Tree::unary(label, top));
    Ok(state.advance(
        stack,
        state.token_position(),
        transition.clone(),
        score_delta,
        false,
    ))
}
