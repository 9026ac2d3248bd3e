use crate::equivalence::Equivalence;
use crate::error::{Error, Result};
use hashbrown::raw::{RawIntoIter, RawIter, RawTable};
use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Mapping from items to their multiplicity, backing a [`MultiSet`](crate::MultiSet).
///
/// Every stored multiplicity is at least 1. The public surface is read-only;
/// obtain one through [`MultiSet::as_map`](crate::MultiSet::as_map).
#[derive(Clone)]
pub struct CountMap<T, E> {
    equivalence: E,
    table: RawTable<(T, usize)>,
    total: usize,
}

impl<T, E> CountMap<T, E> {
    pub(crate) const fn with_equivalence(equivalence: E) -> Self {
        Self {
            equivalence,
            table: RawTable::new(),
            total: 0,
        }
    }

    pub(crate) fn with_capacity_and_equivalence(capacity: usize, equivalence: E) -> Self {
        Self {
            equivalence,
            table: RawTable::with_capacity(capacity),
            total: 0,
        }
    }

    /// Counts every item of `items` under `equivalence`.
    /// Occurrences past a total of `usize::MAX` are dropped.
    pub(crate) fn from_items<I>(items: I, equivalence: E) -> Self
    where
        I: IntoIterator<Item = T>,
        E: Equivalence<T>,
    {
        let iter = items.into_iter();
        let mut map = Self::with_capacity_and_equivalence(iter.size_hint().0, equivalence);

        for item in iter {
            map.increment(item, 1);
        }

        map
    }

    /// Returns the equality strategy of the map.
    pub const fn equivalence(&self) -> &E {
        &self.equivalence
    }

    /// Returns the number of distinct items the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of distinct items in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns the sum of all multiplicities.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` if the map contains no items.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// An iterator visiting all items with their multiplicity in arbitrary order.
    pub fn iter(&self) -> Iter<'_, T> {
        // The iterator borrows `self`, so the table cannot change while it is alive.
        unsafe {
            Iter {
                iter: self.table.iter(),
                phantom: PhantomData,
            }
        }
    }

    /// An iterator visiting all distinct items in arbitrary order.
    pub fn keys(&self) -> Keys<'_, T> {
        Keys { iter: self.iter() }
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
        self.total = 0;
    }

    pub(crate) fn into_entries(self) -> IntoIter<T> {
        IntoIter {
            iter: self.table.into_iter(),
        }
    }
}

impl<T, E> CountMap<T, E>
where
    E: Equivalence<T>,
{
    /// Returns the multiplicity of `item`, or `None` if it is not in the map.
    pub fn get(&self, item: &T) -> Option<usize> {
        let hash = self.equivalence.hash(item);

        self.table
            .get(hash, equivalent_key(&self.equivalence, item))
            .map(|&(_, count)| count)
    }

    /// Returns `true` if the map contains `item`.
    pub fn contains_key(&self, item: &T) -> bool {
        let hash = self.equivalence.hash(item);

        self.table
            .find(hash, equivalent_key(&self.equivalence, item))
            .is_some()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let equivalence = &self.equivalence;

        self.table
            .reserve(additional, |x| equivalence.hash(&x.0));
    }

    /// Adds `count` occurrences of `item`, failing without any change if the
    /// total would exceed `usize::MAX`.
    pub(crate) fn try_increment(&mut self, item: T, count: usize) -> Result<()> {
        if self.total.checked_add(count).is_none() {
            return Err(Error::Overflow);
        }

        self.increment(item, count);
        Ok(())
    }

    /// Adds as many of `count` occurrences of `item` as fit before the total reaches
    /// `usize::MAX`, returning how many were added. A `count` of 0 leaves the map unchanged.
    pub(crate) fn increment(&mut self, item: T, count: usize) -> usize {
        // Every multiplicity is at most the total, so clamping the total keeps each entry in range.
        let count = count.min(usize::MAX - self.total);
        if count == 0 {
            return 0;
        }

        let hash = self.equivalence.hash(&item);
        let equivalence = &self.equivalence;

        match self.table.get_mut(hash, equivalent_key(equivalence, &item)) {
            Some((_, existing)) => *existing += count,
            None => {
                self.table
                    .insert(hash, (item, count), |x| equivalence.hash(&x.0));
            }
        }

        self.total += count;
        count
    }

    /// Removes up to `count` occurrences of `item`, deleting the entry when none remain.
    /// Returns the number of occurrences actually removed.
    pub(crate) fn decrement(&mut self, item: &T, count: usize) -> usize {
        if count == 0 {
            return 0;
        }

        let hash = self.equivalence.hash(item);
        let equivalence = &self.equivalence;

        let existing = match self.table.get_mut(hash, equivalent_key(equivalence, item)) {
            Some((_, existing)) => existing,
            None => return 0,
        };

        if *existing > count {
            *existing -= count;
            self.total -= count;
            return count;
        }

        let removed = self
            .table
            .remove_entry(hash, equivalent_key(equivalence, item))
            .map_or(0, |(_, existing)| existing);

        self.total -= removed;
        removed
    }

    /// Removes `item` entirely, returning its former multiplicity.
    pub(crate) fn remove(&mut self, item: &T) -> Option<usize> {
        let hash = self.equivalence.hash(item);

        let removed = self
            .table
            .remove_entry(hash, equivalent_key(&self.equivalence, item))
            .map(|(_, count)| count);

        if let Some(count) = removed {
            self.total -= count;
        }

        removed
    }

    /// Retains only the entries for which `f` returns `true`.
    /// `f` may lower a multiplicity; entries lowered to 0 are removed.
    pub(crate) fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&T, &mut usize) -> bool,
    {
        retain_entries(&mut self.table, &mut self.total, f);
    }

    /// Counts `items` under this map's strategy, then retains the entries for which
    /// `f` returns `true`, given each entry's multiplicity among `items`.
    pub(crate) fn retain_against<I, F>(&mut self, items: I, mut f: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(Option<usize>, &mut usize) -> bool,
    {
        let other = CountMap::from_items(items, &self.equivalence);

        retain_entries(&mut self.table, &mut self.total, |item, count| {
            f(other.get(item), count)
        });
    }
}

fn retain_entries<T, F>(table: &mut RawTable<(T, usize)>, total: &mut usize, mut f: F)
where
    F: FnMut(&T, &mut usize) -> bool,
{
    // Erasing the bucket currently yielded is allowed while iterating a `RawTable`.
    unsafe {
        for bucket in table.iter() {
            let &mut (ref item, ref mut count) = bucket.as_mut();
            let before = *count;
            let keep = f(item, &mut *count) && *count > 0;

            if keep {
                *total = *total - before + *count;
            } else {
                *total -= before;
                table.erase(bucket);
            }
        }
    }
}

impl<T, E> PartialEq for CountMap<T, E>
where
    E: Equivalence<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.total == other.total
            && self
                .iter()
                .all(|(item, count)| other.get(item) == Some(count))
    }
}

impl<T, E> Eq for CountMap<T, E> where E: Equivalence<T> {}

impl<T, E> Debug for CountMap<T, E>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, E> IntoIterator for &'a CountMap<T, E> {
    type Item = (&'a T, usize);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An iterator over the entries of a `CountMap`.
pub struct Iter<'a, T> {
    iter: RawIter<(T, usize)>,
    phantom: PhantomData<&'a T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            phantom: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<(&'a T, usize)> {
        self.iter.next().map(|bucket| unsafe {
            let bucket = bucket.as_ref();
            (&bucket.0, bucket.1)
        })
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

/// An iterator over the distinct items of a `CountMap`.
pub struct Keys<'a, T> {
    iter: Iter<'a, T>,
}

impl<T> Clone for Keys<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, T> Iterator for Keys<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.iter.next().map(|(item, _)| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Keys<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Keys<'_, T> {}

/// An owning iterator over the entries of a `CountMap`.
pub(crate) struct IntoIter<T> {
    iter: RawIntoIter<(T, usize)>,
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

fn equivalent_key<'a, T, E>(equivalence: &'a E, item: &'a T) -> impl Fn(&(T, usize)) -> bool + 'a
where
    E: Equivalence<T>,
{
    move |x| equivalence.equivalent(item, &x.0)
}
