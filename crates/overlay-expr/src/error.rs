//! Error types surfaced across the engine's call boundary.
//!
//! `Display` output is the contract here: the surrounding application shows
//! these messages verbatim in the channel editor.

use crate::ast::Op;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A numeric literal in the formula text did not lex as a finite number,
/// e.g. `1.1.` with its second decimal point.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("'{token}' is not a number")]
pub struct LexError {
    /// The offending literal text.
    pub token: String,
}

/// Failure while evaluating a parsed tree against a binding set.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EvalError {
    /// An identifier had no binding at evaluation time.
    #[error("Unknown identifier: '{0}'")]
    UnknownIdentifier(String),
    /// The tree reduced to "no value": an empty formula or empty grouping.
    #[error("expression has no value")]
    EmptyExpression,
}

/// Pre-evaluation diagnostic from the validator, produced while the user is
/// still typing a formula.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ExpressionError {
    #[error("Couldn't parse token: '{0}' is not a number")]
    BadNumber(String),
    #[error("Operator '{0}' has no left operand")]
    MissingLeftOperand(Op),
    #[error("Operator '{0}' has no right operand")]
    MissingRightOperand(Op),
    #[error("Unknown identifier: '{0}'")]
    UnknownIdentifier(String),
}
