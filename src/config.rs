//! Resource limits for a derivation.
//!
//! A `ParserConfig` is shared by every state of a sentence's search. The limits are what
//! lets the core refuse to loop: transitions that would exceed them are illegal, and a
//! derivation that uses up its budget reports `ResourceExhausted`.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{ParserError, Result};

pub const DEFAULT_MAX_UNARY_CHAIN: usize = 8;

/// # Examples
///
/// ```rust
/// use shiftreduce::config::ParserConfig;
/// let config = ParserConfig::from_yaml_str("max_unary_chain: 3\nmax_transitions: 40\n").unwrap();
/// assert_eq!(config.max_unary_chain, 3);
/// assert_eq!(config.max_transitions, Some(40));
/// assert_eq!(config.max_stack_depth, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Shift is illegal once the stack holds this many trees.
    pub max_stack_depth: Option<usize>,
    /// Longest chain of single-child links a Unary may build, and the bound on the
    /// chain walk of BinaryRemoveUnary.
    pub max_unary_chain: usize,
    /// Transition budget per derivation.
    pub max_transitions: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: None,
            max_unary_chain: DEFAULT_MAX_UNARY_CHAIN,
            max_transitions: None,
        }
    }
}

impl ParserConfig {
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source).map_err(|e| ParserError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source).map_err(|e| ParserError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_unary_chain == 0 {
            return Err(crate::err_msg!(Config, "max_unary_chain must be at least 1"));
        }
        if self.max_stack_depth == Some(0) {
            return Err(crate::err_msg!(Config, "max_stack_depth must be at least 1"));
        }
        Ok(())
    }

    pub fn with_max_stack_depth(self, depth: usize) -> Self {
        Self {
            max_stack_depth: Some(depth),
            ..self
        }
    }

    pub fn with_max_unary_chain(self, links: usize) -> Self {
        Self {
            max_unary_chain: links,
            ..self
        }
    }

    pub fn with_max_transitions(self, budget: usize) -> Self {
        Self {
            max_transitions: Some(budget),
            ..self
        }
    }
}
