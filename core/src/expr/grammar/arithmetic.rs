use super::Grammar;
use crate::expr::{
    ast,
    eval::error,
    parse::Precedence,
    token::{self, Token},
};

/// Integer arithmetic.
///
/// `+ - * / %` with the usual precedence and unary `-`.
/// All operations are checked, overflow is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arithmetic;

impl Grammar for Arithmetic {
    type Value = i64;

    const NAME: &'static str = "arithmetic";

    const PREFIX_TOKENS: &'static [token::Kind] = &[
        token::Kind::Number,
        token::Kind::Identifier,
        token::Kind::ParenLeft,
        token::Kind::Operator(token::Operator::Minus),
    ];

    fn operator(fragment: &str) -> Option<token::Operator> {
        token::Operator::from_symbol(fragment)
    }

    fn literal(token: &Token) -> Option<Self::Value> {
        let Token::Number(value) = token else {
            return None;
        };
        value.parse::<i64>().ok()
    }

    fn infix(op: token::Operator) -> Option<(ast::OpBinary, Precedence)> {
        match op {
            token::Operator::Plus => Some((ast::OpBinary::Add, Precedence::Sum)),
            token::Operator::Minus => Some((ast::OpBinary::Subtract, Precedence::Sum)),
            token::Operator::Star => Some((ast::OpBinary::Multiply, Precedence::Product)),
            token::Operator::SlashForward => Some((ast::OpBinary::Divide, Precedence::Product)),
            token::Operator::Percent => Some((ast::OpBinary::Remainder, Precedence::Product)),
            token::Operator::And | token::Operator::Or | token::Operator::Not => None,
        }
    }

    fn prefix(op: token::Operator) -> Option<ast::OpUnary> {
        match op {
            token::Operator::Minus => Some(ast::OpUnary::Minus),
            _ => None,
        }
    }

    fn apply_unary(op: ast::OpUnary, value: Self::Value) -> Result<Self::Value, error::Kind> {
        match op {
            ast::OpUnary::Minus => value.checked_neg().ok_or(error::Kind::Overflow),
            ast::OpUnary::Not => Err(error::Kind::InvalidOperation(
                "can not perform logical operations on numbers".to_string(),
            )),
        }
    }

    fn apply_binary(
        op: ast::OpBinary,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, error::Kind> {
        match op {
            ast::OpBinary::Add => left.checked_add(right).ok_or(error::Kind::Overflow),
            ast::OpBinary::Subtract => left.checked_sub(right).ok_or(error::Kind::Overflow),
            ast::OpBinary::Multiply => left.checked_mul(right).ok_or(error::Kind::Overflow),
            ast::OpBinary::Divide => {
                if right == 0 {
                    return Err(error::Kind::DivideByZero);
                }
                left.checked_div(right).ok_or(error::Kind::Overflow)
            }
            ast::OpBinary::Remainder => {
                if right == 0 {
                    return Err(error::Kind::DivideByZero);
                }
                left.checked_rem(right).ok_or(error::Kind::Overflow)
            }
            ast::OpBinary::And | ast::OpBinary::Or => Err(error::Kind::InvalidOperation(
                "can not perform logical operations on numbers".to_string(),
            )),
        }
    }
}
