//! Transition core of a shift-reduce constituency parser.
//!
//! A sentence is parsed by a sequence of transitions over an immutable [`ParseState`]:
//! `Shift` pushes the next token, `Unary` wraps the top tree, `Binary` combines the top two,
//! `BinaryRemoveUnary` combines after erasing the unary chain over the left operand, and
//! `Finalize` ends the derivation. States share structure, so a beam search can keep and
//! expand many of them, across threads, without copying.
//!
//! Scoring, search and treebank I/O live outside this crate; see [`derivation`] for the
//! seams a driver uses.

pub use crate::constraint::ParserConstraint;
pub use crate::diagnostics::{ErrorType, ParserError, Result};
pub use crate::state::ParseState;
pub use crate::transition::{Side, Transition, TransitionKind};
pub use crate::tree::{Span, Tree};

pub mod config;
pub mod constraint;
pub mod derivation;
pub mod diagnostics;
pub mod stack;
pub mod state;
pub mod transition;
pub mod tree;

#[cfg(test)]
pub mod test_utils;
