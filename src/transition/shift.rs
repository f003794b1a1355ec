use crate::constraint::{tree_satisfies, ParserConstraint};
use crate::diagnostics::Result;
use crate::state::ParseState;
use crate::transition::Transition;

/// Tokens remain, the stack has room, and no constraint that closes at the current
/// position is left unsatisfied. Once another token is shifted, the trees below the new
/// top can only be combined together with it, so such a constraint would be lost for good.
pub(super) fn is_legal(state: &ParseState, constraints: &[ParserConstraint]) -> bool {
    if state.end_of_queue() {
        return false;
    }
    if let Some(max) = state.config().max_stack_depth {
        if state.stack().len() >= max {
            return false;
        }
    }
    let position = state.token_position();
    let top = state.stack().peek().ok();
    constraints
        .iter()
        .filter(|c| c.end == position && c.start < position)
        .all(|c| top.is_some_and(|tree| tree_satisfies(tree, c)))
}

pub(super) fn apply(
    state: &ParseState,
    transition: &Transition,
    score_delta: f64,
) -> Result<ParseState> {
    let position = state.token_position();
    let token = state.sentence().get(position).cloned().ok_or_else(|| {
        crate::err_msg!(Internal, "no token left to shift at position {}", position)
    })?;
    Ok(state.advance(
        state.stack().push(token),
        position + 1,
        transition.clone(),
        score_delta,
        false,
    ))
}
