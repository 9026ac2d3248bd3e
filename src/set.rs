use crate::equivalence::{DefaultEquivalence, Equivalence};
use crate::error::{Error, Result};
use crate::map::{self, CountMap, Keys};
use log::{debug, trace};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::iter::FusedIterator;

/// Multiset implementation where every distinct item is stored once, together with its multiplicity.
///
/// # Examples
///
/// ```
/// use counted_multiset::MultiSet;
///
/// let mut set = MultiSet::new();
/// set.add("a", 2)?.add("b", 1)?;
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.distinct_len(), 2);
/// assert_eq!(set.multiplicity_of(&"a")?, 2);
/// # Ok::<(), counted_multiset::Error>(())
/// ```
#[derive(Clone)]
pub struct MultiSet<T, E = DefaultEquivalence> {
    pub(crate) map: CountMap<T, E>,
    read_only: bool,
}

impl<T> MultiSet<T, DefaultEquivalence> {
    /// Creates an empty `MultiSet` comparing items by their [`Eq`] and [`Hash`] implementations.
    ///
    /// It will not allocate until it is first inserted into.
    #[must_use]
    pub fn new() -> Self {
        Self::with_equivalence(DefaultEquivalence::default())
    }

    /// Creates an empty `MultiSet` with room for at least `capacity` distinct items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_equivalence(capacity, DefaultEquivalence::default())
    }
}

impl<T, E> MultiSet<T, E> {
    /// Creates an empty `MultiSet` which will use the given strategy to compare items.
    pub const fn with_equivalence(equivalence: E) -> Self {
        Self::from_map(CountMap::with_equivalence(equivalence))
    }

    /// Creates an empty `MultiSet` with room for at least `capacity` distinct items,
    /// using the given strategy to compare items.
    pub fn with_capacity_and_equivalence(capacity: usize, equivalence: E) -> Self {
        Self::from_map(CountMap::with_capacity_and_equivalence(capacity, equivalence))
    }

    pub(crate) const fn from_map(map: CountMap<T, E>) -> Self {
        Self {
            map,
            read_only: false,
        }
    }

    /// Returns a reference to the set's equality strategy.
    pub const fn equivalence(&self) -> &E {
        self.map.equivalence()
    }

    /// Returns the number of distinct items the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the number of items in the set, counting every occurrence.
    pub fn len(&self) -> usize {
        self.map.total()
    }

    /// Returns the number of distinct items in the set.
    pub fn distinct_len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no items.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if the set rejects mutation.
    ///
    /// No constructor produces a read-only set; see [`freeze`](MultiSet::freeze).
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Marks the set read-only. Every later mutation fails with [`Error::Unsupported`].
    ///
    /// Clones of a frozen set are frozen as well, while the sets produced by the
    /// `+`, `-` and `*` operators never are.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::{Error, MultiSet};
    ///
    /// let mut set = MultiSet::from(["a"]);
    /// set.freeze();
    ///
    /// assert_eq!(set.insert("b").err(), Some(Error::Unsupported));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn freeze(&mut self) {
        debug!("freezing multiset with {} distinct items", self.distinct_len());
        self.read_only = true;
    }

    /// Clears the set, removing every item. The equality strategy is kept.
    pub fn clear(&mut self) -> Result<()> {
        self.check_writable()?;
        self.map.clear();
        Ok(())
    }

    /// Returns a read-only view of the item to multiplicity mapping.
    pub const fn as_map(&self) -> &CountMap<T, E> {
        &self.map
    }

    /// An iterator visiting every distinct item once, in arbitrary order.
    /// The iterator element type is `&'a T`.
    ///
    /// Calling `iter` again starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            iter: self.map.keys(),
        }
    }

    /// An iterator visiting every distinct item with its multiplicity, in arbitrary order.
    pub fn counts(&self) -> map::Iter<'_, T> {
        self.map.iter()
    }

    /// An iterator visiting every occurrence: an item with multiplicity `n` is yielded `n` times.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let set = MultiSet::from([1, 1, 2]);
    /// let mut items: Vec<_> = set.occurrences().copied().collect();
    /// items.sort_unstable();
    ///
    /// assert_eq!(items, [1, 1, 2]);
    /// ```
    pub fn occurrences(&self) -> Occurrences<'_, T> {
        Occurrences {
            iter: self.map.iter(),
            current: None,
            remaining: self.len(),
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::Unsupported);
        }
        Ok(())
    }
}

impl<T, E> MultiSet<T, E>
where
    E: Equivalence<T>,
{
    /// Creates a `MultiSet` from a sequence using the given strategy.
    /// Repeated items accumulate: every occurrence adds 1 to the item's multiplicity.
    /// Occurrences past a total of `usize::MAX` are dropped.
    pub fn from_iter_with<I>(iter: I, equivalence: E) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_map(CountMap::from_items(iter, equivalence))
    }

    /// Reserves capacity for at least `additional` more distinct items.
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Adds `count` occurrences of `item`. A `count` of 0 leaves the set unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if [`len`](MultiSet::len) would exceed `usize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::{Error, MultiSet};
    ///
    /// let mut set = MultiSet::new();
    /// set.add("a", usize::MAX)?;
    ///
    /// assert_eq!(set.add("b", 1).err(), Some(Error::Overflow));
    /// assert_eq!(set.len(), usize::MAX);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn add(&mut self, item: T, count: usize) -> Result<&mut Self> {
        self.check_writable()?;
        self.map.try_increment(item, count)?;
        Ok(self)
    }

    /// Adds a single occurrence of `item`.
    pub fn insert(&mut self, item: T) -> Result<&mut Self> {
        self.add(item, 1)
    }

    /// Removes up to `count` occurrences of `item`.
    ///
    /// The item is removed entirely once its multiplicity would drop to 0.
    /// Removing an absent item, or a `count` of 0, is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let mut set = MultiSet::from(["a", "a", "a"]);
    ///
    /// set.remove(&"a", 2)?;
    /// assert_eq!(set.get(&"a"), Some(1));
    ///
    /// set.remove(&"a", 5)?;
    /// assert!(!set.contains(&"a"));
    /// # Ok::<(), counted_multiset::Error>(())
    /// ```
    pub fn remove(&mut self, item: &T, count: usize) -> Result<&mut Self> {
        self.check_writable()?;
        self.map.decrement(item, count);
        Ok(self)
    }

    /// Removes every occurrence of `item`. Returns whether the item was present.
    pub fn remove_all(&mut self, item: &T) -> Result<bool> {
        self.check_writable()?;
        Ok(self.map.remove(item).is_some())
    }

    /// Returns `true` if the set contains at least one occurrence of `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.map.contains_key(item)
    }

    /// Returns the multiplicity of `item`, or `None` if it is not in the set.
    pub fn get(&self, item: &T) -> Option<usize> {
        self.map.get(item)
    }

    /// Returns the multiplicity of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `item` is not in the set.
    pub fn multiplicity_of(&self, item: &T) -> Result<usize> {
        self.map.get(item).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if any item of `other` is in the set.
    pub fn overlaps<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        other.into_iter().any(|item| self.contains(&item))
    }

    /// Adds one occurrence for every item of `other`.
    ///
    /// Fails with [`Error::Overflow`], leaving the set unchanged, if the result
    /// would hold more than `usize::MAX` items.
    pub fn union_with<I>(&mut self, other: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_writable()?;

        let before = self.len();
        let other = self.count_sequence(other);
        if before.checked_add(other.total()).is_none() {
            return Err(Error::Overflow);
        }

        for (item, count) in other.into_entries() {
            self.map.increment(item, count);
        }

        trace!("union_with added {} occurrences", self.len() - before);
        Ok(self)
    }

    /// Removes, for every distinct item of `other`, as many occurrences as it has in `other`.
    pub fn except_with<I>(&mut self, other: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_writable()?;

        let mut removed = 0;
        for (item, count) in self.count_sequence(other).into_entries() {
            removed += self.map.decrement(&item, count);
        }

        trace!("except_with removed {} occurrences", removed);
        Ok(self)
    }

    /// Keeps only the items also present in `other`.
    ///
    /// For an item in both, `this[e] - other[e]` occurrences are removed, and the
    /// removal does nothing when that difference is not positive. Items absent
    /// from `other` are removed entirely.
    ///
    /// This is phrased as a removal rather than as the `min` rule of the `*`
    /// operator, and the two definitions may be read as diverging. The removal
    /// form is kept on purpose rather than unified with `*`, so the behaviour of
    /// `intersect_with` stays as defined. Worked through, it leaves each shared
    /// item with `min(this[e], other[e])` occurrences, the same as `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let mut set = MultiSet::from(["a", "a", "a", "b", "c"]);
    /// set.intersect_with(["a", "b", "b"])?;
    ///
    /// assert_eq!(set.get(&"a"), Some(1));
    /// assert_eq!(set.get(&"b"), Some(1));
    /// assert!(!set.contains(&"c"));
    /// # Ok::<(), counted_multiset::Error>(())
    /// ```
    pub fn intersect_with<I>(&mut self, other: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_writable()?;

        let before = self.len();
        self.map.retain_against(other, |other_count, count| match other_count {
            Some(other_count) => {
                // Removing a non-positive number of occurrences is a no-op.
                let excess = count.saturating_sub(other_count);
                *count -= excess;
                true
            }
            None => false,
        });

        trace!("intersect_with kept {} of {} occurrences", self.len(), before);
        Ok(self)
    }

    /// Items present in both lose as many occurrences as they have in `other`;
    /// items only in `other` are added with their multiplicity in `other`.
    ///
    /// Fails with [`Error::Overflow`], leaving the set unchanged, if the current
    /// items plus the added ones would exceed `usize::MAX`.
    pub fn symmetric_except_with<I>(&mut self, other: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_writable()?;

        let other = self.count_sequence(other);
        let added: usize = other
            .iter()
            .filter(|&(item, _)| !self.map.contains_key(item))
            .map(|(_, count)| count)
            .sum();
        if self.len().checked_add(added).is_none() {
            return Err(Error::Overflow);
        }

        for (item, count) in other.into_entries() {
            if self.map.contains_key(&item) {
                self.map.decrement(&item, count);
            } else {
                self.map.increment(item, count);
            }
        }

        trace!("symmetric_except_with left {} occurrences", self.len());
        Ok(self)
    }

    /// Returns `true` if no item occurs more often in the set than in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let set = MultiSet::from(["a", "a"]);
    ///
    /// assert!(set.is_subset_of(["a", "a", "b"]));
    /// assert!(!set.is_subset_of(["a", "b"]));
    /// ```
    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        includes(&self.count_sequence(other), &self.map)
    }

    /// Returns `true` if no item occurs more often in `other` than in the set.
    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        includes(&self.map, &self.count_sequence(other))
    }

    /// Returns `true` if the set is a subset of `other` and not equal to it.
    pub fn is_proper_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.count_sequence(other);

        // Given inclusion, some item is short exactly when the totals differ.
        includes(&other, &self.map) && other.total() > self.len()
    }

    /// Returns `true` if the set is a superset of `other` and not equal to it.
    pub fn is_proper_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.count_sequence(other);

        includes(&self.map, &other) && self.len() > other.total()
    }

    /// Returns `true` if every item occurs in `other` exactly as often as in the set.
    pub fn multiset_equals<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.count_sequence(other);

        other.total() == self.len() && includes(&self.map, &other)
    }

    /// Writes every occurrence into `dest`, starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `offset` is past the end of `dest`, and
    /// [`Error::OutOfRange`] if fewer than [`len`](MultiSet::len) slots follow `offset`.
    /// `dest` is left untouched on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::MultiSet;
    ///
    /// let set = MultiSet::from([7, 7]);
    /// let mut buf = [0; 3];
    /// set.copy_to(&mut buf, 1)?;
    ///
    /// assert_eq!(buf, [0, 7, 7]);
    /// # Ok::<(), counted_multiset::Error>(())
    /// ```
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<()>
    where
        T: Clone,
    {
        if offset > dest.len() {
            return Err(Error::InvalidArgument("offset is past the end of the destination"));
        }

        let available = dest.len() - offset;
        if available < self.len() {
            return Err(Error::OutOfRange {
                needed: self.len(),
                available,
            });
        }

        for (slot, item) in dest[offset..].iter_mut().zip(self.occurrences()) {
            *slot = item.clone();
        }

        Ok(())
    }

    /// Returns a snapshot of the distinct items, independent of later changes to the set.
    pub fn to_set(&self) -> hashbrown::HashSet<T>
    where
        T: Clone + Eq + Hash,
    {
        self.iter().cloned().collect()
    }

    fn count_sequence<I>(&self, other: I) -> CountMap<T, &E>
    where
        I: IntoIterator<Item = T>,
    {
        CountMap::from_items(other, self.map.equivalence())
    }
}

/// Returns `true` if every item of `inner` occurs in `outer` at least as often.
fn includes<T, A, B>(outer: &CountMap<T, A>, inner: &CountMap<T, B>) -> bool
where
    A: Equivalence<T>,
{
    inner
        .iter()
        .all(|(item, count)| outer.get(item).map_or(false, |n| count <= n))
}

impl<T, E> PartialEq for MultiSet<T, E>
where
    E: Equivalence<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T, E> Eq for MultiSet<T, E> where E: Equivalence<T> {}

impl<T, E> FromIterator<T> for MultiSet<T, E>
where
    E: Equivalence<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(iter, E::default())
    }
}

impl<'a, T, E> IntoIterator for &'a MultiSet<T, E> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, E> IntoIterator for MultiSet<T, E> {
    type Item = (T, usize);
    type IntoIter = IntoIter<T>;

    /// Consumes the set, yielding every distinct item with its multiplicity.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            iter: self.map.into_entries(),
        }
    }
}

impl<T, E> Default for MultiSet<T, E>
where
    E: Default,
{
    fn default() -> Self {
        Self::with_equivalence(E::default())
    }
}

impl<T, E> Debug for MultiSet<T, E>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts()).finish()
    }
}

impl<T, const N: usize> From<[T; N]> for MultiSet<T, DefaultEquivalence>
where
    T: Eq + Hash,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

/// An iterator over the distinct items of a `MultiSet`.
pub struct Iter<'a, T> {
    iter: Keys<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over every occurrence of every item of a `MultiSet`.
pub struct Occurrences<'a, T> {
    iter: map::Iter<'a, T>,
    current: Option<(&'a T, usize)>,
    remaining: usize,
}

impl<T> Clone for Occurrences<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Occurrences<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some((item, left)) = self.current.as_mut() {
                if *left > 0 {
                    *left -= 1;
                    self.remaining -= 1;
                    return Some(*item);
                }
            }

            self.current = Some(self.iter.next()?);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Occurrences<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Occurrences<'_, T> {}

/// An owning iterator over the distinct items of a `MultiSet` and their multiplicities.
pub struct IntoIter<T> {
    iter: map::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<(T, usize)> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}
