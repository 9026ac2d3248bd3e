use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash, Hasher};

/// Decides when two values are the same item of a [`MultiSet`](crate::MultiSet).
///
/// Implementations must be an equivalence relation, and `hash` must agree with it:
/// `equivalent(a, b)` implies `hash(a) == hash(b)`.
pub trait Equivalence<T: ?Sized> {
    /// Returns `true` if `a` and `b` are the same item.
    fn equivalent(&self, a: &T, b: &T) -> bool;

    /// Hashes `value` consistently with [`equivalent`](Equivalence::equivalent).
    fn hash(&self, value: &T) -> u64;
}

impl<T, E> Equivalence<T> for &E
where
    T: ?Sized,
    E: ?Sized + Equivalence<T>,
{
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (**self).equivalent(a, b)
    }

    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
}

/// The natural [`Eq`] and [`Hash`] of the item type, hashed with the given hash builder.
#[derive(Clone, Default)]
pub struct DefaultEquivalence<S = RandomState> {
    hash_builder: S,
}

impl<S> DefaultEquivalence<S> {
    /// Creates a strategy which will use the given hash builder to hash items.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns a reference to the strategy's [`BuildHasher`].
    pub const fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<T, S> Equivalence<T> for DefaultEquivalence<S>
where
    T: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash(&self, value: &T) -> u64 {
        make_hash(&self.hash_builder, value)
    }
}

impl<S> Debug for DefaultEquivalence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultEquivalence")
    }
}

/// Compares and hashes items by a projected key.
///
/// # Examples
///
/// ```
/// use counted_multiset::{ByKey, MultiSet};
///
/// let ignore_case = ByKey::new(|s: &String| s.to_lowercase());
/// let set = MultiSet::from_iter_with(
///     ["Apple", "APPLE", "pear"].map(String::from),
///     ignore_case,
/// );
///
/// assert_eq!(set.get(&"apple".to_string()), Some(2));
/// assert_eq!(set.distinct_len(), 2);
/// ```
#[derive(Clone)]
pub struct ByKey<F, S = RandomState> {
    key: F,
    hash_builder: S,
}

impl<F> ByKey<F, RandomState> {
    /// Creates a strategy comparing items by `key(item)`.
    pub fn new(key: F) -> Self {
        Self::with_hasher(key, RandomState::new())
    }
}

impl<F, S> ByKey<F, S> {
    /// Creates a strategy comparing items by `key(item)`, hashing keys with the given hash builder.
    pub const fn with_hasher(key: F, hash_builder: S) -> Self {
        Self { key, hash_builder }
    }
}

impl<T, K, F, S> Equivalence<T> for ByKey<F, S>
where
    T: ?Sized,
    F: Fn(&T) -> K,
    K: Eq + Hash,
    S: BuildHasher,
{
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.key)(a) == (self.key)(b)
    }

    fn hash(&self, value: &T) -> u64 {
        make_hash(&self.hash_builder, &(self.key)(value))
    }
}

impl<F, S> Debug for ByKey<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByKey")
    }
}

fn make_hash<T, S>(hash_builder: &S, value: &T) -> u64
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    value.hash(&mut state);
    state.finish()
}
