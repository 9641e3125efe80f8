use std::fmt;

/// Reserved constant words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Keyword {
    True,
    False,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
        }
    }

    /// Matches case insensitively.
    pub fn from_str(value: impl AsRef<str>) -> Option<Self> {
        match value.as_ref().to_ascii_uppercase().as_str() {
            "TRUE" => Some(Self::True),
            "FALSE" => Some(Self::False),
            _ => None,
        }
    }
}

/// Operator symbols and words.
/// Which of them a grammar accepts, and how they bind, is decided by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    SlashForward,
    /// `%`
    Percent,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`
    Not,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::SlashForward => "/",
            Operator::Percent => "%",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    pub fn from_symbol(value: impl AsRef<str>) -> Option<Self> {
        match value.as_ref() {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            "*" => Some(Self::Star),
            "/" => Some(Self::SlashForward),
            "%" => Some(Self::Percent),
            _ => None,
        }
    }

    /// Matches case insensitively.
    pub fn from_word(value: impl AsRef<str>) -> Option<Self> {
        match value.as_ref().to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    Identifier(String),
    Keyword(Keyword),
    Number(String),
    Operator(Operator),
    ParenLeft,
    ParenRight,
    /// Sentinel after the last real token.
    End,
}

/// Kind of token without any data.
/// Should match the variants in [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    Identifier,
    Keyword(Keyword),
    Number,
    Operator(Operator),
    ParenLeft,
    ParenRight,
    End,
}

impl Kind {
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::Identifier(_) => Self::Identifier,
            Token::Keyword(word) => Self::Keyword(*word),
            Token::Number(_) => Self::Number,
            Token::Operator(op) => Self::Operator(*op),
            Token::ParenLeft => Self::ParenLeft,
            Token::ParenRight => Self::ParenRight,
            Token::End => Self::End,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Identifier => f.write_str("identifier"),
            Kind::Keyword(word) => write!(f, "`{}`", word.as_str()),
            Kind::Number => f.write_str("number"),
            Kind::Operator(op) => write!(f, "`{op}`"),
            Kind::ParenLeft => f.write_str("`(`"),
            Kind::ParenRight => f.write_str("`)`"),
            Kind::End => f.write_str("end of input"),
        }
    }
}

/// Display a list of token kinds, e.g. `number, identifier or `(``.
pub(crate) struct KindList<'a>(pub &'a [Kind]);

impl fmt::Display for KindList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((last, rest)) = self.0.split_last() else {
            return f.write_str("nothing");
        };
        for (idx, kind) in rest.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        if !rest.is_empty() {
            f.write_str(" or ")?;
        }
        write!(f, "{last}")
    }
}
