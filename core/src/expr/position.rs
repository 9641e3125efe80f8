use std::fmt;

/// Byte offset into the source expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, derive_more::Deref, derive_more::From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BytePos(pub usize);

impl std::ops::Add<usize> for BytePos {
    type Output = Self;
    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl fmt::Display for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half open range of bytes, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: BytePos,
    pub end: BytePos,
}

impl Span {
    pub fn new(start: impl Into<BytePos>, end: impl Into<BytePos>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Span a single position.
    pub fn at(position: impl Into<BytePos>) -> Self {
        let pos = position.into();
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Zero width span, e.g. the end of input.
    pub fn empty(position: impl Into<BytePos>) -> Self {
        let pos = position.into();
        Self {
            start: pos,
            end: pos,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

impl<T> WithSpan<T> {
    pub fn new(value: T, start: impl Into<BytePos>, end: impl Into<BytePos>) -> Self {
        Self {
            value,
            span: Span::new(start, end),
        }
    }

    /// Span a single position.
    pub fn at(value: T, pos: impl Into<BytePos>) -> Self {
        Self {
            value,
            span: Span::at(pos),
        }
    }

    pub fn with_span(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Position the value starts at.
    pub fn pos(&self) -> BytePos {
        self.span.start
    }
}
