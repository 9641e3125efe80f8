use super::{
    ast,
    grammar::Grammar,
    lex, parse,
    position::{Span, WithSpan},
};
use crate::context::Context;

/// How a variable missing from the context is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Missing {
    /// Fail with [`error::Kind::UndefinedVariable`].
    #[default]
    Error,

    /// Use the default of the grammar's value type, `0` or `false`.
    Default,
}

/// Error value.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// Invalid syntax.
    #[error("invalid syntax at {}: {}", .0.span, .0.value)]
    Tokenize(WithSpan<lex::error::Kind>),

    /// Invalid expression.
    #[error("invalid expression at {}: {}", .0.span, .0.value)]
    Parse(WithSpan<parse::error::Kind>),

    /// Could not evaluate an operation.
    #[error("could not evaluate expression at {}: {}", .0.span, .0.value)]
    Eval(WithSpan<error::Kind>),
}

impl Error {
    /// Where in the source the error occurred.
    pub fn span(&self) -> Span {
        match self {
            Self::Tokenize(err) => err.span,
            Self::Parse(err) => err.span,
            Self::Eval(err) => err.span,
        }
    }
}

/// Evaluate an expression.
/// Variables missing from the context are an error.
pub fn eval<G, C>(expr: &ast::Expr<G::Value>, ctx: &C) -> Result<G::Value, WithSpan<error::Kind>>
where
    G: Grammar,
    C: Context<G::Value> + ?Sized,
{
    eval_with::<G, C>(expr, ctx, Missing::Error)
}

/// Pending work of the evaluator.
enum Task<'a, V> {
    /// Evaluate the expression, pushing its value.
    Visit(&'a ast::Expr<V>),
    /// Pop one value and apply the operator.
    Unary(ast::OpUnary, Span),
    /// Pop the right then left value and apply the operator.
    Binary(ast::OpBinary, Span),
}

/// Evaluate an expression.
///
/// The tree is walked with explicit stacks rather than recursion,
/// so the depth of the tree is not limited by the call stack.
/// Left operands are evaluated before right operands,
/// and both are always evaluated.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip(expr, ctx), fields(grammar = G::NAME))
)]
pub fn eval_with<G, C>(
    expr: &ast::Expr<G::Value>,
    ctx: &C,
    missing: Missing,
) -> Result<G::Value, WithSpan<error::Kind>>
where
    G: Grammar,
    C: Context<G::Value> + ?Sized,
{
    let mut tasks = vec![Task::Visit(expr)];
    let mut values = Vec::<G::Value>::new();
    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(expr) => match expr {
                ast::Expr::Literal(literal) => values.push(literal.value.clone()),
                ast::Expr::Variable(variable) => {
                    values.push(eval_variable::<G::Value, C>(variable, ctx, missing)?);
                }
                ast::Expr::Unary(unary) => {
                    tasks.push(Task::Unary(unary.op, unary.span));
                    tasks.push(Task::Visit(unary.expr.as_ref()));
                }
                ast::Expr::Binary(binary) => {
                    tasks.push(Task::Binary(binary.op, binary.span));
                    tasks.push(Task::Visit(binary.right.as_ref()));
                    tasks.push(Task::Visit(binary.left.as_ref()));
                }
            },

            Task::Unary(op, span) => {
                let value = values.pop().expect("operand to be evaluated");
                let value =
                    G::apply_unary(op, value).map_err(|err| WithSpan::with_span(err, span))?;
                #[cfg(feature = "tracing")]
                tracing::trace!(?op, ?value);

                values.push(value);
            }

            Task::Binary(op, span) => {
                let right = values.pop().expect("right operand to be evaluated");
                let left = values.pop().expect("left operand to be evaluated");
                let value = G::apply_binary(op, left, right)
                    .map_err(|err| WithSpan::with_span(err, span))?;
                #[cfg(feature = "tracing")]
                tracing::trace!(?op, ?value);

                values.push(value);
            }
        }
    }

    let value = values.pop().expect("expression to produce a value");
    assert!(values.is_empty(), "all operands to be consumed");
    Ok(value)
}

fn eval_variable<V, C>(
    variable: &ast::ExprVariable,
    ctx: &C,
    missing: Missing,
) -> Result<V, WithSpan<error::Kind>>
where
    V: Default,
    C: Context<V> + ?Sized,
{
    if let Some(value) = ctx.value(&variable.name) {
        return Ok(value);
    }

    match missing {
        Missing::Error => Err(WithSpan::with_span(
            error::Kind::UndefinedVariable(variable.name.clone()),
            variable.span,
        )),
        Missing::Default => {
            #[cfg(feature = "tracing")]
            tracing::debug!(name = %variable.name, "variable not bound, using default");

            Ok(V::default())
        }
    }
}

pub mod error {
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// The variable is not bound in the context.
        #[error("undefined variable `{0}`")]
        UndefinedVariable(String),

        /// Divide by 0.
        #[error("division by zero")]
        DivideByZero,

        /// Number overflow.
        #[error("number overflow")]
        Overflow,

        /// Could not evaluate operation due to invalid arguments.
        #[error("{0}")]
        InvalidOperation(String),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        context,
        expr::grammar::{Arithmetic, Boolean},
    };
    use std::collections::HashMap;

    fn compile<G: Grammar>(src: &str) -> ast::Expr<G::Value> {
        let tokens = lex::tokenize::<G>(src)
            .into_tokens()
            .expect("input to tokenize");
        parse::parse::<G>(&tokens).expect("input to be valid")
    }

    #[test]
    fn eval_literal_test() {
        let ctx = context::Empty;

        let ast = compile::<Arithmetic>("5");
        let Ok(res) = eval::<Arithmetic, _>(&ast, &ctx) else {
            panic!("invalid input");
        };
        assert_eq!(res, 5);

        let ast = compile::<Boolean>("true");
        let Ok(res) = eval::<Boolean, _>(&ast, &ctx) else {
            panic!("invalid input");
        };
        assert!(res);

        let ast = compile::<Boolean>("false");
        let Ok(res) = eval::<Boolean, _>(&ast, &ctx) else {
            panic!("invalid input");
        };
        assert!(!res);
    }

    #[test]
    fn eval_arithmatic() {
        let ctx = context::Empty;
        let cases = [
            ("4 + 3", 7),
            ("4 - 5", -1),
            ("-4 * 3", -12),
            ("- 4 * 3", -12),
            ("7 / 2", 3),
            ("7 % 4", 3),
            ("2 + 3 * 4", 14),
            ("8 - 3 - 2", 3),
            ("16 / 4 / 2", 2),
            ("( 3 + 5 ) * 2", 16),
            ("- ( 2 - 5 )", 3),
            ("- - 4", 4),
        ];
        for (src, expected) in cases {
            let ast = compile::<Arithmetic>(src);
            let res = eval::<Arithmetic, _>(&ast, &ctx).expect("input to evaluate");
            assert_eq!(res, expected, "{src}");
        }
    }

    #[test]
    fn eval_logic() {
        let ctx = HashMap::from([
            ("A".to_string(), true),
            ("B".to_string(), false),
            ("C".to_string(), false),
        ]);
        let cases = [
            ("A AND B OR NOT C", true),
            ("A AND ( B OR NOT C )", true),
            ("NOT A OR B", false),
            ("NOT ( A OR B )", false),
            ("A OR B AND C", true),
            ("TRUE AND NOT FALSE", true),
        ];
        for (src, expected) in cases {
            let ast = compile::<Boolean>(src);
            let res = eval::<Boolean, _>(&ast, &ctx).expect("input to evaluate");
            assert_eq!(res, expected, "{src}");
        }
    }

    #[test]
    fn eval_variables() {
        let ctx = HashMap::from([("x".to_string(), 10), ("y".to_string(), 5)]);
        let ast = compile::<Arithmetic>("x + y");
        assert_eq!(eval::<Arithmetic, _>(&ast, &ctx), Ok(15));

        let ast = compile::<Arithmetic>("x * ( y - z )");
        let err = eval::<Arithmetic, _>(&ast, &ctx).expect_err("`z` is not bound");
        assert_eq!(err.value, error::Kind::UndefinedVariable("z".to_string()));
        assert_eq!(err.span, Span::new(10, 11));

        assert_eq!(
            eval_with::<Arithmetic, _>(&ast, &ctx, Missing::Default),
            Ok(50)
        );
    }

    #[test]
    fn eval_missing_boolean_default() {
        let ctx = [("a", true)];
        let ast = compile::<Boolean>("a AND b");
        assert!(eval::<Boolean, _>(&ast, &ctx).is_err());
        assert_eq!(
            eval_with::<Boolean, _>(&ast, &ctx, Missing::Default),
            Ok(false)
        );
    }

    #[test]
    fn eval_no_short_circuit() {
        // right hand side is evaluated even though the left decides the result
        let ctx = context::Empty;
        let ast = compile::<Boolean>("TRUE OR missing");
        let err = eval::<Boolean, _>(&ast, &ctx).expect_err("`missing` is not bound");
        assert_eq!(
            err.value,
            error::Kind::UndefinedVariable("missing".to_string())
        );
    }

    #[test]
    fn eval_errors_report_operator() {
        let ctx = context::Empty;

        let ast = compile::<Arithmetic>("1 + 4 / ( 2 - 2 )");
        let err = eval::<Arithmetic, _>(&ast, &ctx).expect_err("division by zero");
        assert_eq!(err.value, error::Kind::DivideByZero);
        assert_eq!(err.span, Span::new(6, 7));

        let ast = compile::<Arithmetic>("9223372036854775807 + 1");
        let err = eval::<Arithmetic, _>(&ast, &ctx).expect_err("overflow");
        assert_eq!(err.value, error::Kind::Overflow);
        assert_eq!(err.span, Span::new(20, 21));
    }

    #[test]
    fn eval_left_before_right() {
        let ctx = context::Empty;
        let ast = compile::<Arithmetic>("a + b");
        let err = eval::<Arithmetic, _>(&ast, &ctx).expect_err("neither is bound");
        assert_eq!(err.value, error::Kind::UndefinedVariable("a".to_string()));
    }

    #[test]
    fn eval_deep_tree() {
        let ctx = context::Empty;
        let ast = compile::<Arithmetic>(&vec!["1"; 2_000].join(" + "));
        assert_eq!(eval::<Arithmetic, _>(&ast, &ctx), Ok(2_000));
    }

    #[test]
    fn error_span() {
        let err = Error::from(WithSpan::new(error::Kind::Overflow, 3, 4));
        assert_eq!(err.span(), Span::new(3, 4));
        assert_eq!(
            err.to_string(),
            "could not evaluate expression at 3..4: number overflow"
        );
    }
}
