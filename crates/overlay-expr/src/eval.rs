//! Recursive evaluation of parsed formula trees against field bindings.

use crate::ast::{Node, Op};
use crate::error::EvalError;
use crate::tree::Tree;
use std::collections::HashMap;

/// Evaluate a parsed tree against one frame's field bindings.
///
/// Pure function of its inputs; called once per rendered video frame per
/// channel. Arithmetic follows IEEE double semantics, so division by zero
/// and friends produce infinities or NaN rather than errors.
pub fn evaluate(tree: &Tree, bindings: &HashMap<String, f64>) -> Result<f64, EvalError> {
    match eval_subtree(tree, bindings)? {
        Some(value) => Ok(value),
        None => Err(EvalError::EmptyExpression),
    }
}

/// `None` is the "no value" signal carried by an absent slot or a `Noop`
/// placeholder. It is what lets `-` and `(` detect an elided left operand
/// structurally.
fn eval_subtree(tree: &Tree, bindings: &HashMap<String, f64>) -> Result<Option<f64>, EvalError> {
    let Some(node) = tree.root() else {
        return Ok(None);
    };
    match node {
        Node::Number(value) => Ok(Some(*value)),
        Node::Ident(name) => match bindings.get(name) {
            Some(value) => Ok(Some(*value)),
            None => Err(EvalError::UnknownIdentifier(name.clone())),
        },
        Node::Noop => Ok(None),
        Node::Op(op) => {
            let left = eval_subtree(&tree.left_subtree(), bindings)?;
            let right = eval_subtree(&tree.right_subtree(), bindings)?;
            Ok(Some(apply(*op, left, right)))
        }
        Node::Group(_) => {
            let left = eval_subtree(&tree.left_subtree(), bindings)?;
            let right = eval_subtree(&tree.right_subtree(), bindings)?;
            match left {
                // Nothing precedes the group: pure parenthetical grouping.
                None => Ok(right),
                // Something does: implicit multiplication, `5(2+3)` = 25.
                Some(left) => Ok(Some(left * right.unwrap_or(f64::NAN))),
            }
        }
    }
}

fn apply(op: Op, left: Option<f64>, right: Option<f64>) -> f64 {
    // An elided left operand is unary negation for `-`; any other
    // structurally missing operand behaves as NaN and propagates.
    if op == Op::Sub && left.is_none() {
        return -right.unwrap_or(f64::NAN);
    }
    let left = left.unwrap_or(f64::NAN);
    let right = right.unwrap_or(f64::NAN);
    match op {
        Op::Add => left + right,
        Op::Sub => left - right,
        Op::Mul => left * right,
        Op::Div => left / right,
        Op::Pow => left.powf(right),
    }
}
