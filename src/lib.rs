//! A multiset (bag) implementation storing every distinct item once, together with its multiplicity.
//!
//! ---
//!
//! [`MultiSet`] is a [multiset](https://en.wikipedia.org/wiki/Multiset)
//! implementation where items are stored in a hash table mapping each item
//! to the number of times it occurs:
//!  - `a -> 2`
//!  - `b -> 1`
//!
//! Adding or removing occurrences only touches the counter, and multisets
//! are combined by their multiplicities:
//!
//! | Operation | Multiplicity of `e` in the result |
//! |---|---|
//! | `&a + &b` | `a[e] + b[e]` |
//! | `&a - &b` | `a[e] - b[e]`, removed at 0 |
//! | `&a * &b` | `min(a[e], b[e])` |
//!
//! ---
//!
//! Items are compared through an [`Equivalence`] strategy fixed when the set
//! is created. [`DefaultEquivalence`] uses the item's own [`Eq`] and
//! [`Hash`](std::hash::Hash) implementations, [`ByKey`] compares a projected key.
//!
//! ```
//! use counted_multiset::MultiSet;
//!
//! let mut set: MultiSet<_> = ["a", "a", "b"].into_iter().collect();
//! set.union_with(["b", "c"])?;
//!
//! assert_eq!(set.multiplicity_of(&"b")?, 2);
//! assert!(set.is_superset_of(["a", "a", "c"]));
//! # Ok::<(), counted_multiset::Error>(())
//! ```

/// Strategies deciding when two values are the same item.
pub mod equivalence;

mod error;

/// Item to multiplicity mapping backing a [`MultiSet`].
pub mod map;

mod ops;

/// Multiset implementation mapping items to their multiplicity.
pub mod set;

pub use equivalence::{ByKey, DefaultEquivalence, Equivalence};
pub use error::{Error, Result};
pub use map::CountMap;
pub use set::MultiSet;
