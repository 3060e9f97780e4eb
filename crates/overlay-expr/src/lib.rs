#![forbid(unsafe_code)]

//! Expression engine for user-defined computed telemetry channels.
//!
//! Users overlay computed values onto rendered video frames by typing
//! arithmetic formulas over the named fields of a telemetry log, e.g.
//! `(a^2+b^2)^(1/2)`. A formula is parsed once into a binary tree packed
//! into a flat, level-order-indexed slot array (no pointer nodes), then
//! evaluated against one set of field bindings per frame.
//!
//! ```rust
//! use overlay_expr::{evaluate, parse};
//! use std::collections::HashMap;
//!
//! let tree = parse("(a^2+b^2)^(1/2)").unwrap();
//! let bindings = HashMap::from([("a".to_string(), 3.0), ("b".to_string(), 4.0)]);
//! let speed = evaluate(&tree, &bindings).unwrap();
//! assert!((speed - 5.0).abs() < 1e-12);
//! ```
//!
//! For editor feedback while a formula is being typed, [`assert_valid`]
//! checks the same grammar without building a tree and reports the first
//! problem as a human-readable [`ExpressionError`]:
//!
//! ```rust
//! use overlay_expr::assert_valid;
//! use std::collections::HashMap;
//!
//! let err = assert_valid("1*", &HashMap::new()).unwrap_err();
//! assert_eq!(err.to_string(), "Operator '*' has no right operand");
//! ```
//!
//! Everything here is synchronous and purely functional over its inputs:
//! parsing returns a fresh tree, evaluation never mutates one, and calls on
//! different formulas need no coordination across threads.

mod ast;
mod error;
mod eval;
mod parser;
mod tree;
mod validate;

pub use ast::{Group, Node, Op};
pub use error::{EvalError, ExpressionError, LexError};
pub use eval::evaluate;
pub use parser::{lex, parse, parse_tokens, Token};
pub use tree::{left_child_index, parent_index, right_child_index, Tree};
pub use validate::assert_valid;
