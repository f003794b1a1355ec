//! Shared builders for the integration tests.

#![allow(dead_code)]

#[path = "../../src/test_utils.rs"]
mod test_utils;

pub use test_utils::init_test_logging;

use shiftreduce::derivation::replay;
use shiftreduce::tree::tagged_sentence;
use shiftreduce::{ParseState, ParserConstraint, Transition, Tree};

/// `Alice/NNP sleeps/VBZ`
pub fn alice_sleeps() -> Vec<Tree> {
    tagged_sentence(&[("Alice", "NNP"), ("sleeps", "VBZ")])
}

/// `the/DT old/JJ dog/NN barks/VBZ`
pub fn old_dog() -> Vec<Tree> {
    tagged_sentence(&[("the", "DT"), ("old", "JJ"), ("dog", "NN"), ("barks", "VBZ")])
}

pub fn transitions(names: &[&str]) -> Vec<Transition> {
    names
        .iter()
        .map(|name| name.parse().unwrap_or_else(|e| panic!("{name}: {e}")))
        .collect()
}

/// Replays `names` from the initial state of `sentence` without constraints.
pub fn state_after(sentence: Vec<Tree>, names: &[&str]) -> ParseState {
    replay(&ParseState::new(sentence), &transitions(names), &[])
        .unwrap_or_else(|e| panic!("replay failed: {e}"))
}

pub fn constraint(start: usize, end: usize, pattern: &str) -> ParserConstraint {
    ParserConstraint::new(start, end, pattern).unwrap()
}

/// Second tree from the top of the stack.
pub fn left_operand(state: &ParseState) -> &Tree {
    state.stack().iter().nth(1).expect("stack has two trees")
}

pub fn history(state: &ParseState) -> Vec<String> {
    state.transitions().iter().map(|t| t.to_string()).collect()
}
