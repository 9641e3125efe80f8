use super::{
    ast,
    grammar::Grammar,
    options::Options,
    position::{Span, WithSpan},
    token::{self, Token},
};

/// Binding strength of operators, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    /// OR
    Or,
    /// AND
    And,
    /// + -
    Sum,
    /// * / %
    Product,
    /// - NOT
    Prefix,
}

struct Parser<'a> {
    tokens: &'a [WithSpan<Token>],
    cursor: usize,

    /// Current nesting of groups and prefix operators.
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [WithSpan<Token>], max_depth: usize) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
            max_depth,
        }
    }
}

impl<'a> Parser<'a> {
    /// Kind of the token under the cursor.
    /// A token list missing its end sentinel reads as if it were there.
    pub fn peek(&self) -> token::Kind {
        self.tokens
            .get(self.cursor)
            .map(|token| token::Kind::from_token(&token.value))
            .unwrap_or(token::Kind::End)
    }

    /// Span of the token under the cursor.
    pub fn span(&self) -> Span {
        if let Some(token) = self.tokens.get(self.cursor) {
            token.span
        } else if let Some(last) = self.tokens.last() {
            Span::empty(last.span.end)
        } else {
            Span::empty(0)
        }
    }

    /// Move past the token under the cursor.
    pub fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    /// Enter a nested rule.
    pub fn descend(&mut self) -> Result<(), WithSpan<error::Kind>> {
        if self.depth >= self.max_depth {
            return Err(WithSpan::with_span(
                error::Kind::MaxDepth {
                    limit: self.max_depth,
                },
                self.span(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth -= 1;
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = &'a WithSpan<Token>;
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(next)
    }
}

/// Parse tokens with the default depth limit.
pub fn parse<G: Grammar>(
    tokens: &[WithSpan<Token>],
) -> Result<ast::Expr<G::Value>, WithSpan<error::Kind>> {
    parse_with_depth::<G>(tokens, Options::DEFAULT_MAX_DEPTH)
}

/// Parse tokens into a single expression.
/// The whole token list must be consumed.
///
/// # Arguments
/// + `max_depth`: Maximum nesting of groups and prefix operators.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip(tokens), fields(grammar = G::NAME))
)]
pub fn parse_with_depth<G: Grammar>(
    tokens: &[WithSpan<Token>],
    max_depth: usize,
) -> Result<ast::Expr<G::Value>, WithSpan<error::Kind>> {
    let mut parser = Parser::new(tokens, max_depth);
    if parser.peek() == token::Kind::End {
        return Err(WithSpan::with_span(
            error::Kind::UnexpectedEndOfInput,
            parser.span(),
        ));
    }

    let expr = parse_expr::<G>(&mut parser, Precedence::None)?;
    match parser.peek() {
        token::Kind::End => Ok(expr),
        found => Err(WithSpan::with_span(
            error::Kind::TrailingTokens { found },
            parser.span(),
        )),
    }
}

/// Parse an operand followed by any infix operators binding tighter than `precedence`.
/// Operators of equal strength fold to the left.
fn parse_expr<G: Grammar>(
    parser: &mut Parser<'_>,
    precedence: Precedence,
) -> Result<ast::Expr<G::Value>, WithSpan<error::Kind>> {
    let mut expr = parse_prefix::<G>(parser)?;
    loop {
        let token::Kind::Operator(op) = parser.peek() else {
            break;
        };
        let Some((op, binding)) = G::infix(op) else {
            break;
        };
        if precedence >= binding {
            break;
        }

        expr = parse_binary::<G>(parser, expr, op, binding)?.into();
    }
    Ok(expr)
}

fn parse_prefix<G: Grammar>(
    parser: &mut Parser<'_>,
) -> Result<ast::Expr<G::Value>, WithSpan<error::Kind>> {
    let next = parser.peek();
    #[cfg(feature = "tracing")]
    tracing::debug!(?next);

    match next {
        token::Kind::ParenLeft => parse_group::<G>(parser),
        token::Kind::Identifier => Ok(parse_variable(parser)?.into()),
        token::Kind::Operator(op) => match G::prefix(op) {
            Some(op) => Ok(parse_unary::<G>(parser, op)?.into()),
            None => Err(WithSpan::with_span(
                error::Kind::InvalidPrefix { found: op },
                parser.span(),
            )),
        },
        token::Kind::End => Err(WithSpan::with_span(
            error::Kind::UnexpectedEndOfInput,
            parser.span(),
        )),
        kind @ (token::Kind::Number | token::Kind::Keyword(_))
            if G::PREFIX_TOKENS.contains(&kind) =>
        {
            Ok(parse_literal::<G>(parser)?.into())
        }
        found => Err(WithSpan::with_span(
            error::Kind::UnexpectedToken {
                expected: G::PREFIX_TOKENS.to_vec(),
                found,
            },
            parser.span(),
        )),
    }
}

/// Parenthesized expression.
/// The group itself leaves no node in the tree.
fn parse_group<G: Grammar>(
    parser: &mut Parser<'_>,
) -> Result<ast::Expr<G::Value>, WithSpan<error::Kind>> {
    let open = parser.span();
    parser.descend()?;
    #[cfg(feature = "tracing")]
    tracing::trace!(depth = parser.depth, "group");

    parser.advance();
    let expr = parse_expr::<G>(parser, Precedence::None)?;
    parser.ascend();

    match parser.peek() {
        token::Kind::ParenRight => {
            parser.advance();
            Ok(expr)
        }
        token::Kind::End => Err(WithSpan::with_span(
            error::Kind::UnclosedGroup { open: open.start },
            parser.span(),
        )),
        found => Err(WithSpan::with_span(
            error::Kind::UnexpectedToken {
                expected: vec![token::Kind::ParenRight],
                found,
            },
            parser.span(),
        )),
    }
}

fn parse_binary<G: Grammar>(
    parser: &mut Parser<'_>,
    lhs: ast::Expr<G::Value>,
    op: ast::OpBinary,
    binding: Precedence,
) -> Result<ast::ExprBinary<G::Value>, WithSpan<error::Kind>> {
    let span = parser.span();
    #[cfg(feature = "tracing")]
    tracing::trace!(?op, %span);

    parser.advance();
    let rhs = parse_expr::<G>(parser, binding)?;
    Ok(ast::ExprBinary {
        op,
        left: Box::new(lhs),
        right: Box::new(rhs),
        span,
    })
}

fn parse_unary<G: Grammar>(
    parser: &mut Parser<'_>,
    op: ast::OpUnary,
) -> Result<ast::ExprUnary<G::Value>, WithSpan<error::Kind>> {
    let span = parser.span();
    parser.descend()?;
    #[cfg(feature = "tracing")]
    tracing::trace!(?op, %span, depth = parser.depth);

    parser.advance();
    let expr = parse_expr::<G>(parser, Precedence::Prefix)?;
    parser.ascend();

    Ok(ast::ExprUnary {
        op,
        expr: Box::new(expr),
        span,
    })
}

fn parse_variable(parser: &mut Parser<'_>) -> Result<ast::ExprVariable, WithSpan<error::Kind>> {
    let next = parser.next().expect("non-empty token stream");
    #[cfg(feature = "tracing")]
    tracing::debug!(?next);

    let Token::Identifier(name) = &next.value else {
        unreachable!("invalid identifier token");
    };

    Ok(ast::ExprVariable {
        name: name.clone(),
        span: next.span,
    })
}

fn parse_literal<G: Grammar>(
    parser: &mut Parser<'_>,
) -> Result<ast::ExprLiteral<G::Value>, WithSpan<error::Kind>> {
    let next = parser.next().expect("non-empty token stream");
    #[cfg(feature = "tracing")]
    tracing::debug!(?next);

    match G::literal(&next.value) {
        Some(value) => Ok(ast::ExprLiteral { value }),
        None => Err(WithSpan::with_span(error::Kind::InvalidLiteral, next.span)),
    }
}

pub mod error {
    use super::token::{self, KindList};
    use crate::expr::position::BytePos;

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// The input ended before the expression was complete.
        /// Includes empty input.
        #[error("unexpected end of input")]
        UnexpectedEndOfInput,

        /// An unexpected kind of token was found.
        #[error("expected {}, found {found}", KindList(.expected))]
        UnexpectedToken {
            expected: Vec<token::Kind>,
            found: token::Kind,
        },

        /// The operator can not begin an operand.
        #[error("`{found}` is not a prefix operator")]
        InvalidPrefix { found: token::Operator },

        /// A group wasn't closed before the end of input.
        #[error("group opened at {open} is not closed")]
        UnclosedGroup { open: BytePos },

        /// Tokens remain after a complete expression.
        #[error("unexpected {found} after expression")]
        TrailingTokens { found: token::Kind },

        /// Literal can not be represented as a value,
        /// e.g. a number that does not fit.
        #[error("invalid literal")]
        InvalidLiteral,

        /// Groups or prefix operators are nested too deeply.
        #[error("expression nested deeper than {limit}")]
        MaxDepth { limit: usize },
    }
}
