use super::position::Span;
use std::mem;

/// Expression tree.
/// `V` is the value type of the grammar the tree was parsed with.
///
/// Left associative chains nest as deep as they are long.
/// Dropping is iterative.
/// The derived `Clone`, `PartialEq`, `Debug` and serde impls recurse
/// and are bounded by the call stack.
#[derive(Debug, Clone, derive_more::From, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr<V> {
    Literal(ExprLiteral<V>),
    Variable(ExprVariable),
    Unary(ExprUnary<V>),
    Binary(ExprBinary<V>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprLiteral<V> {
    pub value: V,
}

/// Reference to a variable, resolved at evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprVariable {
    pub name: String,
    /// Where the identifier appeared.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprBinary<V> {
    pub op: OpBinary,
    pub left: Box<Expr<V>>,
    pub right: Box<Expr<V>>,
    /// Where the operator appeared.
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpBinary {
    Add,
    And,
    Divide,
    Multiply,
    Or,
    Remainder,
    Subtract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprUnary<V> {
    pub op: OpUnary,
    pub expr: Box<Expr<V>>,
    /// Where the operator appeared.
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpUnary {
    Not,
    Minus,
}

impl<V> Expr<V> {
    pub fn literal(value: V) -> Self {
        Self::Literal(ExprLiteral { value })
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Self::Literal(_) | Self::Variable(_))
    }

    /// Leaf left behind when a child is detached.
    fn hole() -> Self {
        Self::Variable(ExprVariable {
            name: String::new(),
            span: Span::empty(0),
        })
    }

    /// Move non-leaf children onto `stack`, leaving holes in their place.
    fn detach_children(&mut self, stack: &mut Vec<Self>) {
        let children = match self {
            Self::Literal(_) | Self::Variable(_) => return,
            Self::Unary(unary) => [Some(&mut unary.expr), None],
            Self::Binary(binary) => [Some(&mut binary.left), Some(&mut binary.right)],
        };

        for child in children.into_iter().flatten() {
            if !child.is_leaf() {
                stack.push(mem::replace(child.as_mut(), Self::hole()));
            }
        }
    }
}

impl<V> Drop for Expr<V> {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.detach_children(&mut stack);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn drop_deep_left_spine() {
        let mut expr = Expr::literal(1);
        for pos in 0..300_000_usize {
            expr = ExprBinary {
                op: OpBinary::Add,
                left: Box::new(expr),
                right: Box::new(Expr::literal(1)),
                span: Span::new(pos, pos + 1),
            }
            .into();
        }
        drop(expr);
    }

    #[test]
    fn drop_deep_unary_chain() {
        let mut expr = Expr::literal(true);
        for pos in 0..300_000_usize {
            expr = ExprUnary {
                op: OpUnary::Not,
                expr: Box::new(expr),
                span: Span::new(pos, pos + 1),
            }
            .into();
        }
        drop(expr);
    }

    #[test]
    fn detach_leaves_holes() {
        let inner: Expr<i64> = ExprUnary {
            op: OpUnary::Minus,
            expr: Box::new(Expr::literal(2)),
            span: Span::new(2, 3),
        }
        .into();
        let mut expr: Expr<i64> = ExprBinary {
            op: OpBinary::Multiply,
            left: Box::new(Expr::literal(1)),
            right: Box::new(inner.clone()),
            span: Span::new(1, 2),
        }
        .into();

        let mut stack = Vec::new();
        expr.detach_children(&mut stack);
        assert_eq!(stack, vec![inner]);
        let Expr::Binary(binary) = &expr else {
            panic!("expected binary, found {expr:?}");
        };
        assert_eq!(*binary.left, Expr::literal(1));
        assert_eq!(*binary.right, Expr::hole());
    }
}
