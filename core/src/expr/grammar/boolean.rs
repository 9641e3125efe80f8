use super::Grammar;
use crate::expr::{
    ast,
    eval::error,
    parse::Precedence,
    token::{self, Token},
};

/// Boolean logic.
///
/// `OR` binds loosest, then `AND`, then prefix `NOT`.
/// Constants are `TRUE` and `FALSE`.
/// Words are matched case insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boolean;

impl Grammar for Boolean {
    type Value = bool;

    const NAME: &'static str = "boolean";

    const PREFIX_TOKENS: &'static [token::Kind] = &[
        token::Kind::Keyword(token::Keyword::True),
        token::Kind::Keyword(token::Keyword::False),
        token::Kind::Identifier,
        token::Kind::ParenLeft,
        token::Kind::Operator(token::Operator::Not),
    ];

    fn operator(fragment: &str) -> Option<token::Operator> {
        token::Operator::from_word(fragment)
    }

    fn keyword(fragment: &str) -> Option<token::Keyword> {
        token::Keyword::from_str(fragment)
    }

    fn literal(token: &Token) -> Option<Self::Value> {
        match token {
            Token::Keyword(token::Keyword::True) => Some(true),
            Token::Keyword(token::Keyword::False) => Some(false),
            _ => None,
        }
    }

    fn infix(op: token::Operator) -> Option<(ast::OpBinary, Precedence)> {
        match op {
            token::Operator::Or => Some((ast::OpBinary::Or, Precedence::Or)),
            token::Operator::And => Some((ast::OpBinary::And, Precedence::And)),
            _ => None,
        }
    }

    fn prefix(op: token::Operator) -> Option<ast::OpUnary> {
        match op {
            token::Operator::Not => Some(ast::OpUnary::Not),
            _ => None,
        }
    }

    fn apply_unary(op: ast::OpUnary, value: Self::Value) -> Result<Self::Value, error::Kind> {
        match op {
            ast::OpUnary::Not => Ok(!value),
            ast::OpUnary::Minus => Err(error::Kind::InvalidOperation(
                "can not negate boolean values".to_string(),
            )),
        }
    }

    /// Both operands are always evaluated, there is no short circuit.
    fn apply_binary(
        op: ast::OpBinary,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, error::Kind> {
        match op {
            ast::OpBinary::And => Ok(left && right),
            ast::OpBinary::Or => Ok(left || right),
            ast::OpBinary::Add
            | ast::OpBinary::Subtract
            | ast::OpBinary::Multiply
            | ast::OpBinary::Divide
            | ast::OpBinary::Remainder => Err(error::Kind::InvalidOperation(
                "can not perform arithmetic on boolean values".to_string(),
            )),
        }
    }
}
