//! Binary combination, and its variant that first erases the unary chain over the left
//! operand.
//!
//! BinaryRemoveUnary lets the search take back Unary steps at combination time instead of
//! never having taken them. There is no right-operand version: a Unary on the right
//! operand immediately followed by a combination that erases it could never have been
//! useful in the first place.

use crate::constraint::{allows_new_node, unwrap_unary_chain, ParserConstraint};
use crate::diagnostics::{ParserError, Result};
use crate::state::ParseState;
use crate::transition::{Side, Transition};
use crate::tree::{Span, Tree};

/// `(left, right)`: the second tree from the top and the top tree.
fn operands(state: &ParseState) -> Option<(&Tree, &Tree)> {
    let mut trees = state.stack().iter();
    let right = trees.next()?;
    let left = trees.next()?;
    Some((left, right))
}

/// Shared by Binary and BinaryRemoveUnary:
/// - at least two trees on the stack;
/// - a root combination consumes the last token and leaves exactly one tree;
/// - the new span crosses no constraint, and a constraint on exactly that span accepts
///   `label`.
pub(super) fn is_legal(
    state: &ParseState,
    constraints: &[ParserConstraint],
    label: &str,
    is_root: bool,
) -> bool {
    let Some((left, right)) = operands(state) else {
        return false;
    };
    if is_root && (!state.end_of_queue() || state.stack().len() != 2) {
        return false;
    }
    let span = Span::new(left.span().start, right.span().end);
    allows_new_node(span, label, constraints)
}

/// Binary legality, plus: the left operand is a real unary node (one child, not a leaf,
/// not a preterminal) whose chain has at least one link to erase, and erasing it does not
/// break a constraint on its span.
pub(super) fn is_legal_remove_unary(
    state: &ParseState,
    constraints: &[ParserConstraint],
    label: &str,
    is_root: bool,
) -> bool {
    if !is_legal(state, constraints, label, is_root) {
        return false;
    }
    let Some((left, _)) = operands(state) else {
        return false;
    };
    if left.children().len() != 1 || left.is_leaf() || left.is_preterminal() {
        return false;
    }
    let limit = state.config().max_unary_chain;
    let Some(bottom) = unwrap_unary_chain(left, limit) else {
        tracing::trace!(limit, tree = %left, "unary chain exceeds the configured bound");
        return false;
    };
    // A single link over a preterminal leaves nothing to remove.
    if bottom.ptr_eq(left) {
        return false;
    }
    // A constraint the top label satisfies must still be satisfied by what remains.
    constraints
        .iter()
        .filter(|c| c.span() == left.span())
        .all(|c| !c.matches_label(left.label()) || c.matches_label(bottom.label()))
}

pub(super) fn apply(
    state: &ParseState,
    transition: &Transition,
    side: Side,
    label: &str,
    score_delta: f64,
) -> Result<ParseState> {
    let right = state.stack().peek()?.clone();
    let rest = state.stack().pop()?;
    let left = rest.peek()?.clone();
    let rest = rest.pop()?;
    let combined = Tree::binary(label, left, right, side.head_index());
    Ok(state.advance(
        rest.push(combined),
        state.token_position(),
        transition.clone(),
        score_delta,
        false,
    ))
}

/// Rewrites the stack as if the left operand's unary chain had never been built, then
/// combines. History and score only change through the combination itself, which records
/// `transition`, so the entry is tagged BinaryRemoveUnary.
pub(super) fn apply_remove_unary(
    state: &ParseState,
    transition: &Transition,
    side: Side,
    label: &str,
    score_delta: f64,
) -> Result<ParseState> {
    let right = state.stack().peek()?.clone();
    let rest = state.stack().pop()?;
    let left = rest.peek()?;
    let limit = state.config().max_unary_chain;
    let Some(bottom) = unwrap_unary_chain(left, limit) else {
        tracing::warn!(limit, tree = %left, "unary chain exceeds the configured bound");
        return Err(ParserError::UnaryChainTooLong { limit });
    };
    let bottom = bottom.clone();
    let rewritten = state.with_stack(rest.pop()?.push(bottom).push(right));
    apply(&rewritten, transition, side, label, score_delta)
}
