use crate::equivalence::Equivalence;
use crate::set::MultiSet;
use std::ops::{Add, Mul, Sub};

impl<T, E> MultiSet<T, E>
where
    T: Clone,
    E: Equivalence<T> + Clone,
{
    /// Returns a new set where every item occurs as often as in `self` and `other` combined.
    ///
    /// The result saturates: once it holds `usize::MAX` items, further occurrences
    /// from `other` are dropped. Use [`union_with`](MultiSet::union_with) to get an
    /// [`Error::Overflow`](crate::Error::Overflow) instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let a = MultiSet::from(["a", "a", "b"]);
    /// let b = MultiSet::from(["a", "c"]);
    /// let sum = &a + &b;
    ///
    /// assert_eq!(sum.get(&"a"), Some(3));
    /// assert_eq!(sum.len(), 5);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.detached();

        for (item, count) in other.counts() {
            result.map.increment(item.clone(), count);
        }

        result
    }

    /// Returns a new set holding the occurrences of `self` left after removing
    /// every occurrence found in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let a = MultiSet::from(["a", "a", "b"]);
    /// let b = MultiSet::from(["a", "c"]);
    /// let diff = &a - &b;
    ///
    /// assert_eq!(diff, MultiSet::from(["a", "b"]));
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut result = self.detached();

        for (item, count) in other.counts() {
            result.map.decrement(item, count);
        }

        result
    }

    /// Returns a new set holding the items present in both sets, each with the
    /// smaller of its two multiplicities.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let a = MultiSet::from(["a", "a", "a", "b"]);
    /// let b = MultiSet::from(["a", "c"]);
    ///
    /// assert_eq!(&a * &b, MultiSet::from(["a"]));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = MultiSet::with_capacity_and_equivalence(
            self.distinct_len().min(other.distinct_len()),
            self.equivalence().clone(),
        );

        for (item, count) in self.counts() {
            if let Some(other_count) = other.get(item) {
                result.map.increment(item.clone(), count.min(other_count));
            }
        }

        result
    }

    /// A writable copy of `self`, whatever its read-only flag.
    fn detached(&self) -> Self {
        MultiSet::from_map(self.map.clone())
    }
}

/// Saturates like [`MultiSet::union`].
impl<'a, 'b, T, E> Add<&'b MultiSet<T, E>> for &'a MultiSet<T, E>
where
    T: Clone,
    E: Equivalence<T> + Clone,
{
    type Output = MultiSet<T, E>;

    fn add(self, rhs: &'b MultiSet<T, E>) -> MultiSet<T, E> {
        self.union(rhs)
    }
}

impl<'a, 'b, T, E> Sub<&'b MultiSet<T, E>> for &'a MultiSet<T, E>
where
    T: Clone,
    E: Equivalence<T> + Clone,
{
    type Output = MultiSet<T, E>;

    fn sub(self, rhs: &'b MultiSet<T, E>) -> MultiSet<T, E> {
        self.difference(rhs)
    }
}

impl<'a, 'b, T, E> Mul<&'b MultiSet<T, E>> for &'a MultiSet<T, E>
where
    T: Clone,
    E: Equivalence<T> + Clone,
{
    type Output = MultiSet<T, E>;

    fn mul(self, rhs: &'b MultiSet<T, E>) -> MultiSet<T, E> {
        self.intersection(rhs)
    }
}

/// Saturates like [`MultiSet::union`].
impl<T, E> Add for MultiSet<T, E>
where
    E: Equivalence<T>,
{
    type Output = MultiSet<T, E>;

    fn add(self, rhs: MultiSet<T, E>) -> MultiSet<T, E> {
        let mut result = MultiSet::from_map(self.map);

        for (item, count) in rhs {
            result.map.increment(item, count);
        }

        result
    }
}

impl<T, E> Sub for MultiSet<T, E>
where
    E: Equivalence<T>,
{
    type Output = MultiSet<T, E>;

    fn sub(self, rhs: MultiSet<T, E>) -> MultiSet<T, E> {
        let mut result = MultiSet::from_map(self.map);

        for (item, count) in rhs.counts() {
            result.map.decrement(item, count);
        }

        result
    }
}

impl<T, E> Mul for MultiSet<T, E>
where
    E: Equivalence<T>,
{
    type Output = MultiSet<T, E>;

    fn mul(self, rhs: MultiSet<T, E>) -> MultiSet<T, E> {
        let mut result = MultiSet::from_map(self.map);

        result.map.retain(|item, count| match rhs.get(item) {
            Some(other_count) => {
                *count = (*count).min(other_count);
                true
            }
            None => false,
        });

        result
    }
}
