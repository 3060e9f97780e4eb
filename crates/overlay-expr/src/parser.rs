//! Formula lexer and infix-to-tree parser.

use crate::ast::{Group, Node, Op};
use crate::error::LexError;
use crate::tree::{parent_index, right_child_index, Tree};
use serde::{Deserialize, Serialize};

/// A lexed formula token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Number(f64),
    Ident(String),
    Op(Op),
    Group(Group),
}

/// Tokenize a formula string.
///
/// Only malformed numeric literals fail; characters outside the accepted
/// alphabet terminate the current token and are skipped.
pub fn lex(formula: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(formula).lex()
}

/// Parse a formula string into an expression tree.
pub fn parse(formula: &str) -> Result<Tree, LexError> {
    Ok(parse_tokens(&lex(formula)?))
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            tokens: Vec::new(),
        }
    }

    fn lex(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(&ch) = self.chars.peek() {
            match ch {
                ' ' | '\t' => {
                    self.chars.next();
                }
                '0'..='9' | '.' => self.number()?,
                c if c.is_ascii_alphabetic() => self.ident(),
                '+' => self.op(Op::Add),
                '-' => self.op(Op::Sub),
                '*' => self.op(Op::Mul),
                '/' => self.op(Op::Div),
                '^' => self.op(Op::Pow),
                '(' => self.group(Group::Open),
                ')' => self.group(Group::Close),
                _ => {
                    // Outside the accepted alphabet: ends whatever token was
                    // forming and is never revisited.
                    self.chars.next();
                }
            }
        }
        Ok(self.tokens)
    }

    /// A maximal run of digits and decimal points is one literal; a second
    /// decimal point makes the whole run a lex error, not two tokens.
    fn number(&mut self) -> Result<(), LexError> {
        let raw = self.take_while(|c| c.is_ascii_digit() || c == '.');
        let value: f64 = raw.parse().unwrap_or(f64::NAN);
        if !value.is_finite() {
            return Err(LexError { token: raw });
        }
        self.tokens.push(Token::Number(value));
        Ok(())
    }

    fn ident(&mut self) {
        // Leading character is alphabetic; digits may follow, so `var0` is
        // one identifier while `5var` lexes as a number then an identifier.
        let name = self.take_while(|c| c.is_ascii_alphanumeric());
        self.tokens.push(Token::Ident(name));
    }

    fn op(&mut self, op: Op) {
        self.chars.next();
        self.tokens.push(Token::Op(op));
    }

    fn group(&mut self, group: Group) {
        self.chars.next();
        self.tokens.push(Token::Group(group));
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        text
    }
}

/// Convert an infix token sequence into a level-order expression tree.
///
/// The parser keeps a current tree and a current slot index. Operands fill
/// the current slot; operators and opening groups splice themselves in as a
/// new parent of the current slot (hoisting one level first when the parent
/// binds at least as tightly) and descend to their right child; closing
/// groups walk the index back up to the matching group boundary. Unmatched
/// groupings are tolerated: `a(b+c` parses the same as `a(b+c)`.
#[must_use]
pub fn parse_tokens(tokens: &[Token]) -> Tree {
    let mut tree = Tree::new();
    let mut index = 0;
    for token in tokens {
        match token {
            Token::Number(value) => tree.set(index, Node::Number(*value)),
            Token::Ident(name) => tree.set(index, Node::Ident(name.clone())),
            Token::Group(Group::Close) => {
                while let Some(p) = parent_index(index) {
                    match tree.get(p) {
                        Some(node) if !node.is_group() => index = p,
                        _ => break,
                    }
                }
            }
            Token::Op(op) => index = splice_parent(&mut tree, index, Node::Op(*op)),
            Token::Group(Group::Open) => {
                index = splice_parent(&mut tree, index, Node::Group(Group::Open));
            }
        }
    }
    tree
}

/// Insert `node` as the new parent of the current slot and return the index
/// of its right child, where parsing continues.
fn splice_parent(tree: &mut Tree, mut index: usize, node: Node) -> usize {
    if let Some(p) = parent_index(index) {
        // Equal precedence hoists too, which is what makes `2+3-4` group as
        // `(2+3)-4`. Grouping parents are a hard boundary.
        let hoist = match tree.get(p) {
            Some(parent) if !parent.is_group() => match (node.precedence(), parent.precedence()) {
                (Some(new), Some(existing)) => new >= existing,
                _ => false,
            },
            _ => false,
        };
        if hoist {
            index = p;
        }
    }
    if tree.get(index).is_none() {
        // Elided left operand: unary minus, or nothing before an opening
        // group.
        tree.set(index, Node::Noop);
    }
    *tree = tree.insert_parent(index);
    tree.set(index, node);
    right_child_index(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbers(values: &[f64]) -> Vec<Token> {
        values.iter().map(|v| Token::Number(*v)).collect()
    }

    #[test]
    fn lexes_single_and_multi_digit_numbers() {
        assert_eq!(lex("0").unwrap(), numbers(&[0.0]));
        assert_eq!(lex("5").unwrap(), numbers(&[5.0]));
        assert_eq!(lex("9").unwrap(), numbers(&[9.0]));
        assert_eq!(lex("10").unwrap(), numbers(&[10.0]));
        assert_eq!(lex("90").unwrap(), numbers(&[90.0]));
        assert_eq!(lex("100").unwrap(), numbers(&[100.0]));
        assert_eq!(lex("1050").unwrap(), numbers(&[1050.0]));
    }

    #[test]
    fn lexes_decimal_numbers() {
        assert_eq!(lex("1.1").unwrap(), numbers(&[1.1]));
        assert_eq!(lex(".1").unwrap(), numbers(&[0.1]));
        assert_eq!(lex(".0").unwrap(), numbers(&[0.0]));
    }

    #[test]
    fn rejects_multiple_decimal_points_as_one_bad_literal() {
        for bad in ["1.1.", ".1.", "..1", "..", "."] {
            let err = lex(bad).unwrap_err();
            assert_eq!(err.token, bad);
            assert_eq!(err.to_string(), format!("'{bad}' is not a number"));
        }
    }

    #[test]
    fn whitespace_separates_tokens() {
        assert_eq!(lex(" .0").unwrap(), numbers(&[0.0]));
        assert_eq!(lex(".0 ").unwrap(), numbers(&[0.0]));
        assert_eq!(lex("  .0   ").unwrap(), numbers(&[0.0]));
        assert_eq!(lex("0 1").unwrap(), numbers(&[0.0, 1.0]));
        assert_eq!(lex("10.01 5.55").unwrap(), numbers(&[10.01, 5.55]));
        assert_eq!(lex("  0\t1 232 3.14  ").unwrap(), numbers(&[0.0, 1.0, 232.0, 3.14]));
    }

    #[test]
    fn empty_input_lexes_to_no_tokens() {
        assert_eq!(lex("").unwrap(), Vec::new());
        assert_eq!(lex("   ").unwrap(), Vec::new());
    }

    #[test]
    fn digits_bind_to_a_preceding_identifier() {
        assert_eq!(lex("var0").unwrap(), vec![Token::Ident("var0".to_string())]);
        assert_eq!(
            lex("5var").unwrap(),
            vec![Token::Number(5.0), Token::Ident("var".to_string())]
        );
        assert_eq!(
            lex("var200.5").unwrap(),
            vec![Token::Ident("var200".to_string()), Token::Number(0.5)]
        );
    }

    #[test]
    fn operators_are_single_character_tokens() {
        assert_eq!(
            lex("**").unwrap(),
            vec![Token::Op(Op::Mul), Token::Op(Op::Mul)]
        );
        assert_eq!(
            lex("1+2^3").unwrap(),
            vec![
                Token::Number(1.0),
                Token::Op(Op::Add),
                Token::Number(2.0),
                Token::Op(Op::Pow),
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn unrecognized_characters_are_skipped() {
        assert_eq!(
            lex("a$b").unwrap(),
            vec![Token::Ident("a".to_string()), Token::Ident("b".to_string())]
        );
        assert_eq!(lex("1#2").unwrap(), numbers(&[1.0, 2.0]));
    }

    #[test]
    fn parses_precedence_into_tree_shape() {
        let tree = parse("2+3*4").unwrap();
        assert_eq!(
            tree.slots(),
            vec![
                Some(Node::Op(Op::Add)),
                Some(Node::Number(2.0)),
                Some(Node::Op(Op::Mul)),
                None,
                None,
                Some(Node::Number(3.0)),
                Some(Node::Number(4.0)),
            ]
        );
    }

    #[test]
    fn equal_precedence_hoists_for_left_associativity() {
        let tree = parse("2+3-4").unwrap();
        assert_eq!(
            tree.slots(),
            vec![
                Some(Node::Op(Op::Sub)),
                Some(Node::Op(Op::Add)),
                Some(Node::Number(4.0)),
                Some(Node::Number(2.0)),
                Some(Node::Number(3.0)),
            ]
        );
    }

    #[test]
    fn pure_grouping_gets_a_noop_left_operand() {
        let tree = parse("(2)").unwrap();
        assert_eq!(
            tree.slots(),
            vec![
                Some(Node::Group(Group::Open)),
                Some(Node::Noop),
                Some(Node::Number(2.0)),
            ]
        );
    }

    #[test]
    fn unary_minus_gets_a_noop_left_operand() {
        let tree = parse("-a").unwrap();
        assert_eq!(
            tree.slots(),
            vec![
                Some(Node::Op(Op::Sub)),
                Some(Node::Noop),
                Some(Node::Ident("a".to_string())),
            ]
        );
    }

    #[test]
    fn unmatched_groupings_are_tolerated() {
        assert_eq!(parse("a(b+c").unwrap(), parse("a(b+c)").unwrap());
        // A stray closing group neither moves the slot nor lands in the tree.
        assert_eq!(parse("5)").unwrap(), parse("5").unwrap());
    }

    #[test]
    fn empty_token_sequence_parses_to_empty_tree() {
        assert!(parse_tokens(&[]).is_empty());
    }
}
