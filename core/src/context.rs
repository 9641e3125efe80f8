//! Variable bindings supplied at evaluation.
use std::{
    borrow::Borrow,
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

/// Provides the context to evaluate an expression in.
///
/// A context is only read during evaluation, so one expression
/// may be evaluated against many contexts, including from several threads.
pub trait Context<V> {
    /// Return the value bound to the name.
    /// `None` if the name is not bound.
    fn value(&self, name: &str) -> Option<V>;
}

/// Context without any bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl<V> Context<V> for Empty {
    fn value(&self, _name: &str) -> Option<V> {
        None
    }
}

impl<K, V, S> Context<V> for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    fn value(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

impl<K, V> Context<V> for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Clone,
{
    fn value(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

/// Name-value pairs.
/// The first binding of a name wins.
impl<K, V> Context<V> for [(K, V)]
where
    K: AsRef<str>,
    V: Clone,
{
    fn value(&self, name: &str) -> Option<V> {
        self.iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value.clone())
    }
}

impl<K, V, const N: usize> Context<V> for [(K, V); N]
where
    K: AsRef<str>,
    V: Clone,
{
    fn value(&self, name: &str) -> Option<V> {
        self.as_slice().value(name)
    }
}

impl<K, V> Context<V> for Vec<(K, V)>
where
    K: AsRef<str>,
    V: Clone,
{
    fn value(&self, name: &str) -> Option<V> {
        self.as_slice().value(name)
    }
}

impl<V, C> Context<V> for &C
where
    C: Context<V> + ?Sized,
{
    fn value(&self, name: &str) -> Option<V> {
        (**self).value(name)
    }
}
