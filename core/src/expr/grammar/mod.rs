//! Grammar flavors.
//!
//! The tokenizer, parser and evaluator are shared.
//! A [`Grammar`] decides which operator words exist, how they bind,
//! which literals are valid and what the operators compute.
use super::{
    ast, eval,
    parse::Precedence,
    token::{self, Token},
};
use std::fmt;

mod arithmetic;
mod boolean;

pub use arithmetic::Arithmetic;
pub use boolean::Boolean;

pub trait Grammar {
    /// Type expressions evaluate to.
    /// [`Default`] is the value used for unbound variables
    /// when [`eval::Missing::Default`] is selected.
    type Value: Clone + Default + PartialEq + fmt::Debug;

    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Token kinds that may begin an operand.
    const PREFIX_TOKENS: &'static [token::Kind];

    /// Operator spelled by the fragment, if any.
    fn operator(fragment: &str) -> Option<token::Operator>;

    /// Reserved constant spelled by the fragment, if any.
    fn keyword(_fragment: &str) -> Option<token::Keyword> {
        None
    }

    /// Value of a literal token.
    /// Only called for token kinds listed in [`Self::PREFIX_TOKENS`].
    /// `None` if the literal can not be represented.
    fn literal(token: &Token) -> Option<Self::Value>;

    /// Binary operation and binding strength of an infix operator.
    /// `None` if the operator is not infix in this grammar.
    fn infix(op: token::Operator) -> Option<(ast::OpBinary, Precedence)>;

    /// Unary operation of a prefix operator.
    /// `None` if the operator is not prefix in this grammar.
    fn prefix(op: token::Operator) -> Option<ast::OpUnary>;

    fn apply_unary(op: ast::OpUnary, value: Self::Value) -> Result<Self::Value, eval::error::Kind>;

    fn apply_binary(
        op: ast::OpBinary,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, eval::error::Kind>;
}
