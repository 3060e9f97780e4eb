use serde::{Deserialize, Serialize};

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Pow => '^',
        }
    }

    /// Binding strength; lower binds tighter.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            Op::Pow => 1,
            Op::Mul | Op::Div => 2,
            Op::Add | Op::Sub => 3,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Grouping symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    Open,
    Close,
}

/// A node slot in the level-order expression tree.
///
/// `Noop` marks an intentionally elided operand: the absent left operand of
/// a unary `-`, or the empty slot in front of an opening group that denotes
/// pure parenthetical grouping rather than implicit multiplication.
///
/// Only `Group::Open` ever lands in a tree; closing symbols are consumed by
/// the parser while it walks back up to the matching group boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Number(f64),
    Ident(String),
    Op(Op),
    Group(Group),
    Noop,
}

impl Node {
    /// Binding strength used by the infix parser; `None` for operand nodes.
    ///
    /// Grouping symbols sit at 0, below every operator, so an incoming `(`
    /// never hoists the parse index out of the current subtree.
    pub(crate) fn precedence(&self) -> Option<u8> {
        match self {
            Node::Op(op) => Some(op.precedence()),
            Node::Group(_) => Some(0),
            Node::Number(_) | Node::Ident(_) | Node::Noop => None,
        }
    }

    pub(crate) fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }
}
