//! Caller-supplied bracket constraints and the span/label predicates shared by every
//! legality check.

use std::fmt;

use regex::Regex;

use crate::diagnostics::{ParserError, Result};
use crate::tree::{Span, Tree};

/// Requires that the finished tree contain a node spanning exactly `[start, end)` whose
/// label matches `pattern`.
///
/// The pattern must match the whole label: `NP` accepts `NP` but not `NP-SBJ`, while
/// `NP.*` accepts both.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::constraint::ParserConstraint;
/// let c = ParserConstraint::new(0, 2, "NP|NX").unwrap();
/// assert!(c.matches_label("NP"));
/// assert!(!c.matches_label("NP-SBJ"));
/// ```
#[derive(Debug, Clone)]
pub struct ParserConstraint {
    pub start: usize,
    pub end: usize,
    pattern: String,
    regex: Regex,
}

impl ParserConstraint {
    pub fn new(start: usize, end: usize, pattern: &str) -> Result<Self> {
        if end <= start {
            return Err(crate::err_msg!(
                InvalidArgument,
                "constraint span [{}, {}) is empty",
                start,
                end
            ));
        }
        let regex =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ParserError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            start,
            end,
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches_label(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }
}

impl fmt::Display for ParserConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.span(), self.pattern)
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

pub fn span_of(tree: &Tree) -> Span {
    tree.span()
}

/// The tree covers exactly the constraint's span and its top label matches.
pub fn constraint_matches_top(tree: &Tree, constraint: &ParserConstraint) -> bool {
    tree.span() == constraint.span() && constraint.matches_label(tree.label())
}

/// A node over `span` could never coexist with the constraint's bracket.
pub fn crosses(span: Span, constraint: &ParserConstraint) -> bool {
    span.crosses(&constraint.span())
}

/// Some node inside `tree` already satisfies the constraint.
pub fn tree_satisfies(tree: &Tree, constraint: &ParserConstraint) -> bool {
    tree.span().contains(&constraint.span())
        && tree
            .nodes()
            .filter(|node| !node.is_leaf())
            .any(|node| constraint_matches_top(node, constraint))
}

/// Whether a new node labeled `label` over `span` is compatible with every constraint.
pub fn allows_new_node(span: Span, label: &str, constraints: &[ParserConstraint]) -> bool {
    constraints.iter().all(|constraint| {
        if crosses(span, constraint) {
            return false;
        }
        span != constraint.span() || constraint.matches_label(label)
    })
}

/// Walks down single-child links until a node branches, or its only child is a
/// preterminal or a leaf. Returns `None` when the walk takes more than `bound` steps.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::constraint::unwrap_unary_chain;
/// use shiftreduce::tree::Tree;
/// let np = Tree::unary("NP", Tree::unary("N", Tree::preterminal("NNP", "Alice", 0)));
/// assert_eq!(unwrap_unary_chain(&np, 8).unwrap().to_string(), "(N (NNP Alice))");
/// assert!(unwrap_unary_chain(&np, 0).is_none());
/// ```
pub fn unwrap_unary_chain(tree: &Tree, bound: usize) -> Option<&Tree> {
    let mut current = tree;
    let mut steps = 0;
    while let [only] = current.children() {
        if only.is_leaf() || only.is_preterminal() {
            break;
        }
        if steps == bound {
            return None;
        }
        steps += 1;
        current = only;
    }
    Some(current)
}
