use super::{
    grammar::Grammar,
    position::{Span, WithSpan},
    token::Token,
};
use std::{iter, marker::PhantomData};

/// Split the source into tokens for grammar `G`.
/// The token list always ends with [`Token::End`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "trace", skip(src), fields(src = %src.as_ref(), grammar = G::NAME))
)]
pub fn tokenize<G: Grammar>(src: impl AsRef<str>) -> Lex {
    let mut lexer = Lexer::<G>::new(src.as_ref());
    lexer.tokenize();
    lexer.into()
}

#[derive(Debug)]
pub struct Lex {
    pub tokens: Vec<WithSpan<Token>>,
    pub errors: Vec<WithSpan<error::Kind>>,
}

impl Lex {
    /// # Returns
    /// The tokens, or the first error encountered.
    pub fn into_tokens(self) -> Result<Vec<WithSpan<Token>>, WithSpan<error::Kind>> {
        let Lex { tokens, errors } = self;
        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(tokens),
        }
    }
}

struct Scanner<'a> {
    src: &'a str,

    /// Iterator over src characters and their byte offsets.
    iter: iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            iter: src.char_indices().peekable(),
        }
    }

    /// Peek at the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        self.iter.peek().map(|(_, ch)| *ch)
    }

    /// Byte offset of the next character.
    /// Length of the source once the iterator is exhausted.
    pub fn offset(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.src.len())
    }
}

impl<'a> iter::Iterator for Scanner<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        let (_, ch) = self.iter.next()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(?ch);

        Some(ch)
    }
}

struct Lexer<'a, G> {
    /// Source code input.
    it: Scanner<'a>,
    tokens: Vec<WithSpan<Token>>,
    errors: Vec<WithSpan<error::Kind>>,
    grammar: PhantomData<G>,
}

impl<'a, G: Grammar> Lexer<'a, G> {
    fn new(src: &'a str) -> Self {
        Self {
            it: Scanner::new(src),
            tokens: vec![],
            errors: vec![],
            grammar: PhantomData,
        }
    }

    pub fn tokenize(&mut self) {
        while let Some(token) = self.match_next_token() {
            match token {
                Ok(token) => self.tokens.push(token),
                Err(err) => self.errors.push(err),
            }
        }

        let end = self.it.offset();
        self.tokens.push(WithSpan::with_span(Token::End, Span::empty(end)));
    }

    /// Parentheses and whitespace separate fragments.
    fn is_boundary(ch: char) -> bool {
        ch.is_whitespace() || ch == '(' || ch == ')'
    }

    /// Validates if the character is valid within an identifier.
    /// Valid characters are alphanumeric (`a-z`, `A-Z`, `0-9`) and underscore (`_`).
    fn is_valid_ident_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }
}

impl<'a, G: Grammar> Lexer<'a, G> {
    fn next_while<F>(&mut self, predicate: F) -> Vec<char>
    where
        F: Fn(char) -> bool,
    {
        let mut chars = vec![];
        while let Some(ch) = self.it.peek() {
            if !predicate(ch) {
                break;
            }
            self.it.next();
            chars.push(ch);
        }
        chars
    }

    fn match_next_token(&mut self) -> Option<Result<WithSpan<Token>, WithSpan<error::Kind>>> {
        self.next_while(char::is_whitespace);
        let pos_start = self.it.offset();
        let char = self.it.next()?;

        let token = match char {
            '(' => Ok(WithSpan::at(Token::ParenLeft, pos_start)),
            ')' => Ok(WithSpan::at(Token::ParenRight, pos_start)),
            char => {
                let rest = self.next_while(|ch| !Self::is_boundary(ch));
                let fragment = iter::once(char).chain(rest).collect::<String>();
                let pos_end = self.it.offset();
                match Self::classify(fragment) {
                    Ok(token) => Ok(WithSpan::new(token, pos_start, pos_end)),
                    Err(kind) => Err(WithSpan::new(kind, pos_start, pos_end)),
                }
            }
        };

        Some(token)
    }

    /// Classify a whitespace delimited fragment.
    fn classify(fragment: String) -> Result<Token, error::Kind> {
        if let Some(op) = G::operator(&fragment) {
            return Ok(Token::Operator(op));
        }

        let digits = fragment.strip_prefix('-').unwrap_or(&fragment);
        if digits.starts_with(|ch: char| ch.is_ascii_digit()) {
            if digits.chars().all(|ch| ch.is_ascii_digit()) {
                Ok(Token::Number(fragment))
            } else {
                Err(error::Kind::InvalidNumber)
            }
        } else if fragment.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
            if let Some(word) = G::keyword(&fragment) {
                Ok(Token::Keyword(word))
            } else if fragment.chars().all(Self::is_valid_ident_char) {
                Ok(Token::Identifier(fragment))
            } else {
                Err(error::Kind::InvalidIdentifier)
            }
        } else {
            Err(error::Kind::UnrecognizedToken)
        }
    }
}

impl<'a, G> Into<Lex> for Lexer<'a, G> {
    fn into(self) -> Lex {
        Lex {
            tokens: self.tokens,
            errors: self.errors,
        }
    }
}

pub mod error {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// Fragment starts like a number but is not only digits.
        /// e.g. `12ab`, `1.5`
        #[error("invalid number")]
        InvalidNumber,

        /// Fragment starts with a letter but contains characters
        /// not allowed in an identifier.
        /// e.g. `a-b`
        #[error("invalid identifier")]
        InvalidIdentifier,

        /// Fragment does not match any token shape.
        #[error("unrecognized token")]
        UnrecognizedToken,
    }
}
