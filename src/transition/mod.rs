//! The closed set of shift-reduce transitions.
//!
//! Each variant has a legality predicate and an apply function. Both are pure: `is_legal`
//! only reads the state and the constraints, and `apply` builds a new state. Callers must
//! gate every `apply` on `is_legal`; on an illegal state `apply` may return an error or an
//! arbitrary state.
//!
//! Identity is `(kind, side, label)`. The root flag is not part of it, so `LeftBinary(S)`
//! and `LeftBinary*(S)` deduplicate to one transition even though their legality differs.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constraint::ParserConstraint;
use crate::diagnostics::{ParserError, Result};
use crate::state::ParseState;

mod binary;
mod finalize;
mod shift;
mod unary;

// ============================================================================
// SIDE
// ============================================================================

/// Which child of a new node is its head. Shape is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }

    /// Index of the head child in a binary node.
    pub fn head_index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(crate::err_msg!(InvalidArgument, "unknown side '{}'", s)),
        }
    }
}

// ============================================================================
// TRANSITION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Shift,
    Unary,
    Binary,
    BinaryRemoveUnary,
    Finalize,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Shift => "Shift",
            TransitionKind::Unary => "Unary",
            TransitionKind::Binary => "Binary",
            TransitionKind::BinaryRemoveUnary => "BinaryRemoveUnary",
            TransitionKind::Finalize => "Finalize",
        }
    }
}

/// One shift-reduce operation.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::transition::{Side, Transition};
/// let t = Transition::binary_remove_unary(Side::Left, "S", true);
/// assert_eq!(t.to_string(), "LeftBinaryRemoveUnary*(S)");
/// assert_eq!(t, Transition::binary_remove_unary(Side::Left, "S", false));
/// assert_eq!("LeftBinaryRemoveUnary*(S)".parse::<Transition>().unwrap(), t);
/// ```
#[derive(Debug, Clone)]
pub enum Transition {
    /// Push the next token's preterminal.
    Shift,
    /// Wrap the top tree in a new single-child node.
    Unary {
        side: Side,
        label: String,
        is_root: bool,
    },
    /// Combine the top two trees under a new node.
    Binary {
        side: Side,
        label: String,
        is_root: bool,
    },
    /// Binary, after stripping the unary chain above the left operand.
    BinaryRemoveUnary {
        side: Side,
        label: String,
        is_root: bool,
    },
    /// Mark the derivation finished.
    Finalize,
}

impl Transition {
    pub fn unary(side: Side, label: impl Into<String>, is_root: bool) -> Self {
        Transition::Unary {
            side,
            label: label.into(),
            is_root,
        }
    }

    pub fn binary(side: Side, label: impl Into<String>, is_root: bool) -> Self {
        Transition::Binary {
            side,
            label: label.into(),
            is_root,
        }
    }

    pub fn binary_remove_unary(side: Side, label: impl Into<String>, is_root: bool) -> Self {
        Transition::BinaryRemoveUnary {
            side,
            label: label.into(),
            is_root,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        match self {
            Transition::Shift => TransitionKind::Shift,
            Transition::Unary { .. } => TransitionKind::Unary,
            Transition::Binary { .. } => TransitionKind::Binary,
            Transition::BinaryRemoveUnary { .. } => TransitionKind::BinaryRemoveUnary,
            Transition::Finalize => TransitionKind::Finalize,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Transition::Unary { side, .. }
            | Transition::Binary { side, .. }
            | Transition::BinaryRemoveUnary { side, .. } => Some(*side),
            Transition::Shift | Transition::Finalize => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Transition::Unary { label, .. }
            | Transition::Binary { label, .. }
            | Transition::BinaryRemoveUnary { label, .. } => Some(label),
            Transition::Shift | Transition::Finalize => None,
        }
    }

    pub fn is_root(&self) -> bool {
        match self {
            Transition::Unary { is_root, .. }
            | Transition::Binary { is_root, .. }
            | Transition::BinaryRemoveUnary { is_root, .. } => *is_root,
            Transition::Shift | Transition::Finalize => false,
        }
    }

    /// Whether this transition may be applied to `state` under `constraints`.
    pub fn is_legal(&self, state: &ParseState, constraints: &[ParserConstraint]) -> bool {
        if state.is_finished() {
            return false;
        }
        // A new node needs a label.
        if self.label().is_some_and(str::is_empty) {
            return false;
        }
        match self {
            Transition::Shift => shift::is_legal(state, constraints),
            Transition::Unary { label, is_root, .. } => unary::is_legal(state, label, *is_root),
            Transition::Binary { label, is_root, .. } => {
                binary::is_legal(state, constraints, label, *is_root)
            }
            Transition::BinaryRemoveUnary { label, is_root, .. } => {
                binary::is_legal_remove_unary(state, constraints, label, *is_root)
            }
            Transition::Finalize => finalize::is_legal(state, constraints),
        }
    }

    /// Builds the successor of `state`, adding `score_delta` to its score.
    pub fn apply(&self, state: &ParseState, score_delta: f64) -> Result<ParseState> {
        let next = match self {
            Transition::Shift => shift::apply(state, self, score_delta)?,
            Transition::Unary { label, .. } => unary::apply(state, self, label, score_delta)?,
            Transition::Binary { side, label, .. } => {
                binary::apply(state, self, *side, label, score_delta)?
            }
            Transition::BinaryRemoveUnary { side, label, .. } => {
                binary::apply_remove_unary(state, self, *side, label, score_delta)?
            }
            Transition::Finalize => finalize::apply(state, self, score_delta),
        };
        tracing::trace!(
            transition = %self,
            position = next.token_position(),
            depth = next.stack().len(),
            score = next.score(),
            "applied transition"
        );
        Ok(next)
    }

    // Per-kind, per-side salts; no two arms share one.
    fn salt(&self) -> u32 {
        match (self.kind(), self.side()) {
            (TransitionKind::Shift, _) => 71_234_567,
            (TransitionKind::Finalize, _) => 38_472_911,
            (TransitionKind::Unary, Some(Side::Left)) => 29_837_465,
            (TransitionKind::Unary, _) => 44_719_283,
            (TransitionKind::Binary, Some(Side::Left)) => 97_354_823,
            (TransitionKind::Binary, _) => 85_734_211,
            (TransitionKind::BinaryRemoveUnary, Some(Side::Left)) => 59_874_523,
            (TransitionKind::BinaryRemoveUnary, _) => 13_543_213,
        }
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.side() == other.side() && self.label() == other.label()
    }
}

impl Eq for Transition {}

impl Hash for Transition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.salt());
        if let Some(label) = self.label() {
            label.hash(state);
        }
    }
}

// ============================================================================
// STRING FORM
// ============================================================================

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.side(), self.label()) {
            (Some(side), Some(label)) => write!(
                f,
                "{}{}{}({})",
                side,
                self.kind().as_str(),
                if self.is_root() { "*" } else { "" },
                label
            ),
            _ => write!(f, "{}", self.kind().as_str()),
        }
    }
}

static LABELED_TRANSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Left|Right)(BinaryRemoveUnary|Binary|Unary)(\*?)\((.*)\)$")
        .expect("transition pattern is valid")
});

impl FromStr for Transition {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "Shift" => return Ok(Transition::Shift),
            "Finalize" => return Ok(Transition::Finalize),
            _ => {}
        }
        let invalid = || ParserError::InvalidTransition {
            input: s.to_string(),
        };
        let caps = LABELED_TRANSITION.captures(s).ok_or_else(invalid)?;
        let side: Side = caps[1].parse()?;
        let is_root = !caps[3].is_empty();
        let label = caps[4].to_string();
        match &caps[2] {
            "Unary" => Ok(Transition::unary(side, label, is_root)),
            "Binary" => Ok(Transition::binary(side, label, is_root)),
            "BinaryRemoveUnary" => Ok(Transition::binary_remove_unary(side, label, is_root)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Transition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Transition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
