//! Immutable constituency trees.
//!
//! Trees are shared between parse states, so every node lives behind an `Arc` and is never
//! modified after construction. A node caches its span when it is built.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::diagnostics::Result;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A half-open range `[start, end)` of token indices.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::tree::Span;
/// let span = Span::new(1, 3);
/// assert_eq!(span.len(), 2);
/// assert!(span.contains(&Span::new(2, 3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other` lies entirely inside this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if the spans overlap without either containing the other.
    pub fn crosses(&self, other: &Span) -> bool {
        let overlaps = self.start < other.end && other.start < self.end;
        overlaps && !self.contains(other) && !other.contains(self)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct TreeNode {
    label: String,
    children: Vec<Tree>,
    span: Span,
    head: Option<usize>,
}

/// A constituent: a label over an ordered list of children.
///
/// Leaves carry the index of their token; every other node derives its span from its
/// first and last child. Cloning a `Tree` clones a pointer.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::tree::{Span, Tree};
/// let alice = Tree::preterminal("NNP", "Alice", 0);
/// let np = Tree::unary("NP", alice.clone());
/// assert!(alice.is_preterminal());
/// assert!(!np.is_preterminal());
/// assert_eq!(np.span(), Span::new(0, 1));
/// assert_eq!(np.to_string(), "(NP (NNP Alice))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tree(Arc<TreeNode>);

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Tree {
    /// A token leaf at sentence position `index`.
    pub fn leaf(word: impl Into<String>, index: usize) -> Self {
        Tree(Arc::new(TreeNode {
            label: word.into(),
            children: Vec::new(),
            span: Span::new(index, index + 1),
            head: None,
        }))
    }

    /// A tag over a single token leaf, e.g. `(NNP Alice)`.
    pub fn preterminal(tag: impl Into<String>, word: impl Into<String>, index: usize) -> Self {
        Self::branch(tag, vec![Tree::leaf(word, index)], Some(0))
    }

    /// A single-child node headed on its child.
    pub fn unary(label: impl Into<String>, child: Tree) -> Self {
        Self::branch(label, vec![child], Some(0))
    }

    /// A two-child node; `head` is the index (0 or 1) of the head child.
    pub fn binary(label: impl Into<String>, left: Tree, right: Tree, head: usize) -> Self {
        Self::branch(label, vec![left, right], Some(head.min(1)))
    }

    /// A node over any number of children. Leaves only come from [`Tree::leaf`], since
    /// they need a token index, so an empty `children` is rejected.
    pub fn node(
        label: impl Into<String>,
        children: Vec<Tree>,
        head: Option<usize>,
    ) -> Result<Self> {
        let label: String = label.into();
        if children.is_empty() {
            return Err(crate::err_msg!(
                InvalidArgument,
                "node '{}' needs at least one child; use Tree::leaf for tokens",
                label
            ));
        }
        Ok(Self::branch(label, children, head))
    }

    // `children` is non-empty.
    fn branch(label: impl Into<String>, children: Vec<Tree>, head: Option<usize>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::default(),
        };
        let head = head.filter(|h| *h < children.len());
        Tree(Arc::new(TreeNode {
            label: label.into(),
            children,
            span,
            head,
        }))
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn children(&self) -> &[Tree] {
        &self.0.children
    }

    pub fn span(&self) -> Span {
        self.0.span
    }

    /// Index of the head child, if any.
    pub fn head(&self) -> Option<usize> {
        self.0.head
    }

    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// Exactly one child, and that child is a leaf.
    pub fn is_preterminal(&self) -> bool {
        matches!(self.children(), [only] if only.is_leaf())
    }

    /// Number of token leaves under this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children().iter().map(Tree::leaf_count).sum()
        }
    }

    /// Follows head children down to the lexical head leaf.
    pub fn head_leaf(&self) -> &Tree {
        let mut current = self;
        while let Some(child) = current.head().and_then(|h| current.children().get(h)) {
            current = child;
        }
        current
    }

    /// Number of single-child links above the first node that is a preterminal, a leaf,
    /// or branches. `(NP (N (NNP Alice)))` has a chain of two.
    pub fn unary_chain_len(&self) -> usize {
        let mut len = 0;
        let mut current = self;
        while let [only] = current.children() {
            if current.is_preterminal() {
                break;
            }
            len += 1;
            current = only;
        }
        len
    }

    /// Pre-order walk over every node of the tree, this node first.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { pending: vec![self] }
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Tree) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Iterator returned by [`Tree::nodes`].
pub struct Nodes<'a> {
    pending: Vec<&'a Tree>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Tree;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.pending.pop()?;
        self.pending.extend(next.children().iter().rev());
        Some(next)
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Tree {
    /// Penn-treebank bracketing: `(S (NP (NNP Alice)) (VP (VBZ sleeps)))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            return write!(f, "{}", self.label());
        }
        write!(f, "({}", self.label())?;
        for child in self.children() {
            write!(f, " {}", child)?;
        }
        write!(f, ")")
    }
}

/// Builds the preterminal sentence for `(word, tag)` pairs, indexing tokens from zero.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::tree::tagged_sentence;
/// let sentence = tagged_sentence(&[("Alice", "NNP"), ("sleeps", "VBZ")]);
/// assert_eq!(sentence[1].to_string(), "(VBZ sleeps)");
/// ```
pub fn tagged_sentence(tokens: &[(&str, &str)]) -> Vec<Tree> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, (word, tag))| Tree::preterminal(*tag, *word, index))
        .collect()
}
