//! Pre-evaluation validation of formula text against a binding set.
//!
//! Runs while the user is still typing: re-lexes the formula and proves the
//! token sequence is well-formed without building a tree, so the channel
//! editor can show a readable message before any frame is rendered. A
//! representative binding set (e.g. all zeros) is enough to check identifier
//! coverage without real telemetry data.

use crate::ast::{Group, Op};
use crate::error::ExpressionError;
use crate::parser::{lex, Token};
use std::collections::HashMap;

/// Check that `formula` lexes, that every operator has the operands the
/// parser would give it, and that every identifier is bound.
pub fn assert_valid(formula: &str, bindings: &HashMap<String, f64>) -> Result<(), ExpressionError> {
    let tokens = lex(formula).map_err(|err| ExpressionError::BadNumber(err.token))?;
    check_operator_arity(&tokens)?;
    check_identifiers(&tokens, bindings)
}

/// Scan state for one grouping scope.
#[derive(Default)]
struct Scope {
    /// Operator still waiting for its right operand.
    pending: Option<Op>,
    /// Whether a completed operand sits to the left of the scan cursor.
    have_operand: bool,
}

fn check_operator_arity(tokens: &[Token]) -> Result<(), ExpressionError> {
    let mut outer: Vec<Scope> = Vec::new();
    let mut scope = Scope::default();
    for token in tokens {
        match token {
            Token::Number(_) | Token::Ident(_) => {
                scope.have_operand = true;
                scope.pending = None;
            }
            Token::Group(Group::Open) => {
                outer.push(scope);
                scope = Scope::default();
            }
            Token::Group(Group::Close) => close_scope(&mut outer, &mut scope)?,
            Token::Op(op) => {
                if let Some(pending) = scope.pending {
                    // Two operators in a row resolve the way the parser
                    // would: a tighter-binding newcomer drops into the
                    // pending operator's empty right slot, so it is the one
                    // with no left operand; anything else hoists above the
                    // pending operator and steals the right operand it was
                    // still waiting for.
                    if op.precedence() < pending.precedence() {
                        return Err(ExpressionError::MissingLeftOperand(*op));
                    }
                    return Err(ExpressionError::MissingRightOperand(pending));
                }
                if !scope.have_operand && *op != Op::Sub {
                    // Only `-` may open an operand position (unary minus).
                    return Err(ExpressionError::MissingLeftOperand(*op));
                }
                scope.pending = Some(*op);
                scope.have_operand = false;
            }
        }
    }
    // The parser tolerates unmatched opening groups, so close them
    // implicitly before deciding anything is missing.
    loop {
        if let Some(pending) = scope.pending {
            return Err(ExpressionError::MissingRightOperand(pending));
        }
        if outer.is_empty() {
            return Ok(());
        }
        close_scope(&mut outer, &mut scope)?;
    }
}

fn close_scope(outer: &mut Vec<Scope>, scope: &mut Scope) -> Result<(), ExpressionError> {
    if let Some(pending) = scope.pending {
        return Err(ExpressionError::MissingRightOperand(pending));
    }
    // A stray `)` past the outermost scope keeps the current one, mirroring
    // the parser's tolerance.
    if let Some(enclosing) = outer.pop() {
        *scope = enclosing;
    }
    // The closed group is an operand for the enclosing scope and satisfies
    // any operator that was waiting on it.
    scope.have_operand = true;
    scope.pending = None;
    Ok(())
}

fn check_identifiers(
    tokens: &[Token],
    bindings: &HashMap<String, f64>,
) -> Result<(), ExpressionError> {
    for token in tokens {
        if let Token::Ident(name) = token {
            if !bindings.contains_key(name) {
                return Err(ExpressionError::UnknownIdentifier(name.clone()));
            }
        }
    }
    Ok(())
}
