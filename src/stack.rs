//! Persistent stack with shared tails.
//!
//! Every `push` allocates one node pointing at the previous head, so two parse states that
//! diverge after a common prefix share that prefix. Nodes are never mutated once built.

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::{ParserError, Result};

struct StackNode<T> {
    value: T,
    prev: Option<Arc<StackNode<T>>>,
    depth: usize,
}

/// Immutable cons-stack.
///
/// # Examples
///
/// ```rust
/// use shiftreduce::stack::PersistentStack;
/// let base = PersistentStack::new().push(1).push(2);
/// let left = base.push(3);
/// let right = base.pop().unwrap().push(4);
/// assert_eq!(left.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// assert_eq!(right.iter().copied().collect::<Vec<_>>(), vec![4, 1]);
/// assert_eq!(base.len(), 2);
/// ```
pub struct PersistentStack<T> {
    head: Option<Arc<StackNode<T>>>,
}

impl<T> PersistentStack<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Returns a new stack with `value` on top; `self` is unchanged.
    #[must_use]
    pub fn push(&self, value: T) -> Self {
        let depth = self.len() + 1;
        Self {
            head: Some(Arc::new(StackNode {
                value,
                prev: self.head.clone(),
                depth,
            })),
        }
    }

    /// Returns the stack below the top element.
    pub fn pop(&self) -> Result<Self> {
        match &self.head {
            Some(node) => Ok(Self {
                head: node.prev.clone(),
            }),
            None => Err(ParserError::EmptyStructure { operation: "pop" }),
        }
    }

    pub fn peek(&self) -> Result<&T> {
        self.head
            .as_deref()
            .map(|node| &node.value)
            .ok_or(ParserError::EmptyStructure { operation: "peek" })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.depth)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates from the top of the stack down.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// True if both stacks are the same version (same head node, or both empty).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// True if the stacks below the top elements are physically the same nodes.
    pub fn shares_tail_with(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => match (&a.prev, &b.prev) {
                (None, None) => true,
                (Some(x), Some(y)) => Arc::ptr_eq(x, y),
                _ => false,
            },
            _ => false,
        }
    }
}

impl<T> Clone for PersistentStack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for PersistentStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlink uniquely owned nodes one at a time so a long stack does not recurse on drop.
impl<T> Drop for PersistentStack<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => next = owned.prev.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for PersistentStack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && (self.ptr_eq(other) || self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for PersistentStack<T> {}

/// Iterator returned by [`PersistentStack::iter`].
pub struct Iter<'a, T> {
    next: Option<&'a StackNode<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.prev.as_deref();
        Some(&node.value)
    }
}
