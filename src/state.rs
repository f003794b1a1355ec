use std::fmt;
use std::sync::Arc;

use im::Vector;

use crate::config::ParserConfig;
use crate::diagnostics::{ParserError, Result};
use crate::stack::PersistentStack;
use crate::transition::Transition;
use crate::tree::{Span, Tree};

// ============================================================================
// PARSE STATE: one derivation in progress
// ============================================================================

/// The full state of a derivation: the tree stack, the unconsumed input, the transition
/// history and the running score.
///
/// States are values. Transitions never modify a state; they build a successor that shares
/// the stack tail, the sentence, the history prefix and the config with its predecessor,
/// so any number of hypotheses can be held and expanded from different threads.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::state::ParseState;
/// use shiftreduce::transition::Transition;
/// use shiftreduce::tree::tagged_sentence;
///
/// let initial = ParseState::new(tagged_sentence(&[("Alice", "NNP"), ("sleeps", "VBZ")]));
/// let shifted = Transition::Shift.apply(&initial, 0.5).unwrap();
/// assert_eq!(initial.token_position(), 0);
/// assert_eq!(shifted.token_position(), 1);
/// assert_eq!(shifted.score(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct ParseState {
    stack: PersistentStack<Tree>,
    sentence: Arc<[Tree]>,
    token_position: usize,
    transitions: Vector<Transition>,
    score: f64,
    finished: bool,
    config: Arc<ParserConfig>,
}

impl ParseState {
    /// Initial state for a sentence of preterminal trees, with default limits.
    pub fn new(sentence: Vec<Tree>) -> Self {
        Self::with_config(sentence, ParserConfig::default())
    }

    pub fn with_config(sentence: Vec<Tree>, config: ParserConfig) -> Self {
        Self::with_shared_config(sentence.into(), Arc::new(config))
    }

    /// Initial state reusing an already shared sentence and config.
    pub fn with_shared_config(sentence: Arc<[Tree]>, config: Arc<ParserConfig>) -> Self {
        Self {
            stack: PersistentStack::new(),
            sentence,
            token_position: 0,
            transitions: Vector::new(),
            score: 0.0,
            finished: false,
            config,
        }
    }

    pub fn stack(&self) -> &PersistentStack<Tree> {
        &self.stack
    }

    pub fn sentence(&self) -> &[Tree] {
        &self.sentence
    }

    pub fn token_position(&self) -> usize {
        self.token_position
    }

    pub fn transitions(&self) -> &Vector<Transition> {
        &self.transitions
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.transitions.last()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// True once every token has been shifted.
    pub fn end_of_queue(&self) -> bool {
        self.token_position >= self.sentence.len()
    }

    /// The span a complete parse must cover.
    pub fn sentence_span(&self) -> Span {
        Span::new(0, self.sentence.len())
    }

    /// The finished tree, once Finalize has been applied.
    pub fn tree(&self) -> Option<&Tree> {
        if self.finished {
            self.stack.peek().ok()
        } else {
            None
        }
    }

    /// Fails with `ResourceExhausted` once the history has reached the configured budget.
    pub fn check_budget(&self) -> Result<()> {
        match self.config.max_transitions {
            Some(limit) if self.transitions.len() >= limit => {
                tracing::debug!(limit, "derivation exhausted its transition budget");
                Err(ParserError::ResourceExhausted { limit })
            }
            _ => Ok(()),
        }
    }

    /// Verifies the structural invariants: stack spans are contiguous from token zero,
    /// increase bottom to top, and end exactly at `token_position`.
    pub fn check_invariants(&self) -> Result<()> {
        let mut expected_start = 0;
        let mut leaves = 0;
        let bottom_up: Vec<&Tree> = self.stack.iter().collect();
        for tree in bottom_up.into_iter().rev() {
            let span = tree.span();
            if span.start != expected_start || span.end <= span.start {
                return Err(crate::err_msg!(
                    Internal,
                    "stack tree {} has span {} but should start at {}",
                    tree,
                    span,
                    expected_start
                ));
            }
            expected_start = span.end;
            leaves += tree.leaf_count();
        }
        if leaves != self.token_position || expected_start != self.token_position {
            return Err(crate::err_msg!(
                Internal,
                "stack holds {} leaves but {} tokens were consumed",
                leaves,
                self.token_position
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Successor construction (used by transitions only)
    // ------------------------------------------------------------------------

    /// Successor with one more history entry and an updated score.
    pub(crate) fn advance(
        &self,
        stack: PersistentStack<Tree>,
        token_position: usize,
        transition: Transition,
        score_delta: f64,
        finished: bool,
    ) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push_back(transition);
        Self {
            stack,
            token_position,
            transitions,
            score: self.score + score_delta,
            finished,
            ..self.clone()
        }
    }

    /// Same derivation over a rewritten stack; history and score are untouched.
    pub(crate) fn with_stack(&self, stack: PersistentStack<Tree>) -> Self {
        Self {
            stack,
            ..self.clone()
        }
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bottom_up: Vec<String> = self.stack.iter().map(Tree::to_string).collect();
        write!(
            f,
            "State(position {}/{}, score {:.4}{}, stack [{}])",
            self.token_position,
            self.sentence.len(),
            self.score,
            if self.finished { ", finished" } else { "" },
            bottom_up.into_iter().rev().collect::<Vec<_>>().join(", ")
        )
    }
}
