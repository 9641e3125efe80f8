//! Expression compiler and evaluator.
//!
//! `source -> tokens -> tree -> value`
//!
//! # Inspiration
//! + [Crafting Interpreters](https://craftinginterpreters.com)
//! + [Lox in Rust](https://github.com/Darksecond/lox)
pub mod ast;
pub mod eval;
pub mod grammar;
pub mod lex;
pub mod options;
pub mod parse;
pub mod position;
pub mod token;

pub use eval::{Error, Missing};
pub use grammar::{Arithmetic, Boolean, Grammar};
pub use options::Options;

use crate::context::Context;
use std::marker::PhantomData;

/// Compile the source into an expression tree using the default options.
pub fn compile<G: Grammar>(input: impl AsRef<str>) -> Result<ast::Expr<G::Value>, Error> {
    Interpreter::<G>::new().compile(input)
}

/// Compile and evaluate the source using the default options.
pub fn eval<G, C>(input: impl AsRef<str>, ctx: &C) -> Result<G::Value, Error>
where
    G: Grammar,
    C: Context<G::Value> + ?Sized,
{
    Interpreter::<G>::new().eval(input, ctx)
}

/// A grammar with its options.
///
/// Holds no state between calls.
/// Compiled trees can be evaluated any number of times, against any context.
#[derive(Debug, Clone)]
pub struct Interpreter<G> {
    options: Options,
    grammar: PhantomData<fn() -> G>,
}

impl<G: Grammar> Interpreter<G> {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            grammar: PhantomData,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn compile(&self, input: impl AsRef<str>) -> Result<ast::Expr<G::Value>, Error> {
        let tokens = lex::tokenize::<G>(input).into_tokens()?;
        let expr = parse::parse_with_depth::<G>(&tokens, self.options.max_depth)?;
        Ok(expr)
    }

    pub fn evaluate<C>(&self, expr: &ast::Expr<G::Value>, ctx: &C) -> Result<G::Value, Error>
    where
        C: Context<G::Value> + ?Sized,
    {
        let value = eval::eval_with::<G, C>(expr, ctx, self.options.missing)?;
        Ok(value)
    }

    pub fn eval<C>(&self, input: impl AsRef<str>, ctx: &C) -> Result<G::Value, Error>
    where
        C: Context<G::Value> + ?Sized,
    {
        let expr = self.compile(input)?;
        self.evaluate(&expr, ctx)
    }
}

impl<G: Grammar> Default for Interpreter<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn eval_pipeline() {
        assert_eq!(eval::<Arithmetic, _>("2 + 3 * 4", &context::Empty), Ok(14));
        assert_eq!(
            eval::<Boolean, _>(
                "A AND B OR NOT C",
                &[("A", true), ("B", false), ("C", false)]
            ),
            Ok(true)
        );

        #[cfg(feature = "tracing")]
        assert!(logs_contain("grammar"));
    }

    #[test]
    fn errors_by_stage() {
        let err = eval::<Arithmetic, _>("3 $ 5", &context::Empty)
            .expect_err("input should be invalid");
        let Error::Tokenize(err) = err else {
            panic!("expected tokenize error, found {err:?}");
        };
        assert_eq!(err.value, lex::error::Kind::UnrecognizedToken);
        assert_eq!(err.span, position::Span::new(2, 3));

        let err = eval::<Arithmetic, _>("( 3 + 5", &context::Empty)
            .expect_err("input should be invalid");
        assert!(matches!(
            err,
            Error::Parse(position::WithSpan {
                value: parse::error::Kind::UnclosedGroup { .. },
                ..
            })
        ));

        let err =
            eval::<Arithmetic, _>("", &context::Empty).expect_err("input should be invalid");
        assert!(matches!(
            err,
            Error::Parse(position::WithSpan {
                value: parse::error::Kind::UnexpectedEndOfInput,
                ..
            })
        ));

        let err = eval::<Arithmetic, _>("x / 0", &[("x", 1)]).expect_err("division by zero");
        assert!(matches!(
            err,
            Error::Eval(position::WithSpan {
                value: eval::error::Kind::DivideByZero,
                ..
            })
        ));
        assert_eq!(err.span(), position::Span::new(2, 3));
    }

    #[test]
    fn interpreter_options() {
        let strict = Interpreter::<Arithmetic>::new();
        let lenient =
            Interpreter::<Arithmetic>::with_options(Options::new().missing(Missing::Default));
        let expr = strict.compile("x + 2").expect("input to be valid");

        assert!(matches!(
            strict.evaluate(&expr, &context::Empty),
            Err(Error::Eval(_))
        ));
        assert_eq!(lenient.evaluate(&expr, &context::Empty), Ok(2));

        let shallow = Interpreter::<Arithmetic>::with_options(Options::new().max_depth(2));
        assert_eq!(shallow.eval("( ( 1 ) )", &context::Empty), Ok(1));
        let err = shallow.eval("( ( ( 1 ) ) )", &context::Empty).expect_err("too deep");
        assert!(matches!(
            err,
            Error::Parse(position::WithSpan {
                value: parse::error::Kind::MaxDepth { limit: 2 },
                ..
            })
        ));
        assert_eq!(err.span(), position::Span::new(4, 5));
    }

    #[test]
    fn error_messages() {
        let err = compile::<Arithmetic>("( 3 + 5").expect_err("input should be invalid");
        assert_eq!(
            err.to_string(),
            "invalid expression at 7..7: group opened at 0 is not closed"
        );

        let err = compile::<Boolean>("A OR").expect_err("input should be invalid");
        assert_eq!(
            err.to_string(),
            "invalid expression at 4..4: unexpected end of input"
        );

        let err = compile::<Boolean>("A OR )").expect_err("input should be invalid");
        assert_eq!(
            err.to_string(),
            "invalid expression at 5..6: expected `TRUE`, `FALSE`, identifier, `(` or `NOT`, found `)`"
        );
    }
}
