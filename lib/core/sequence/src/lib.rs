//! An owning, index-addressable ordered container.
//!
//! [`OrderedSequence`] only exposes positional operations (insert at an index, remove at an
//! index, split and splice whole runs). The order of the elements is entirely determined by the
//! caller; the container never reorders anything on its own.
#![no_std]

extern crate alloc;

use alloc::vec::{self, Vec};
use core::{error, fmt, slice};

/// An ordered run of `T` addressed by position.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct OrderedSequence<T> {
    /// The elements of the sequence in order.
    elements: Vec<T>,
}

impl<T> OrderedSequence<T> {
    /// Creates an empty [`OrderedSequence`].
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Creates an [`OrderedSequence`] holding only `value`.
    pub fn single(value: T) -> Self {
        let mut elements = Vec::with_capacity(1);
        elements.push(value);
        Self { elements }
    }

    /// Returns the number of elements in the [`OrderedSequence`].
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the [`OrderedSequence`] contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns a reference to the element at `index`, or `None` if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Returns a mutable reference to the element at `index`, or `None` if `index` is out of
    /// bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.elements.get_mut(index)
    }

    /// Returns the first element, or `None` if the [`OrderedSequence`] is empty.
    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Returns the last element, or `None` if the [`OrderedSequence`] is empty.
    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    /// Inserts `value` so that it ends up at position `index`, shifting every later element up by
    /// one.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(error) = self.try_insert(index, value) {
            panic!("{error}");
        }
    }

    /// Inserts `value` so that it ends up at position `index`, shifting every later element up by
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] holding `value` if `index > self.len()`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), InsertError<T>> {
        if index > self.elements.len() {
            return Err(InsertError {
                index,
                len: self.elements.len(),
                value,
            });
        }

        self.elements.insert(index, value);
        Ok(())
    }

    /// Appends `value` after the last element.
    pub fn push(&mut self, value: T) {
        self.elements.push(value);
    }

    /// Removes and returns the element at `index`, shifting every later element down by one.
    ///
    /// Returns `None` and leaves the [`OrderedSequence`] untouched if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.elements.len() {
            return None;
        }

        Some(self.elements.remove(index))
    }

    /// Moves the elements at positions `[index, len)` into a new [`OrderedSequence`], preserving
    /// their order.
    ///
    /// Returns `None` and leaves the [`OrderedSequence`] untouched if `index > self.len()`.
    pub fn split_off(&mut self, index: usize) -> Option<Self> {
        if index > self.elements.len() {
            return None;
        }

        Some(Self {
            elements: self.elements.split_off(index),
        })
    }

    /// Moves every element of `other` after the last element of `self`, preserving their order.
    pub fn append(&mut self, mut other: Self) {
        self.elements.append(&mut other.elements);
    }

    /// Moves every element of `other` before the first element of `self`, preserving their order.
    pub fn prepend(&mut self, mut other: Self) {
        other.elements.append(&mut self.elements);
        self.elements = other.elements;
    }

    /// Returns the position of the first element for which `predicate` returns `true`.
    pub fn position<P: FnMut(&T) -> bool>(&self, predicate: P) -> Option<usize> {
        self.elements.iter().position(predicate)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Returns an [`Iterator`] over the elements in order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Returns an [`Iterator`] over mutable references to the elements in order.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }
}

impl<T> Default for OrderedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for OrderedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for OrderedSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<T> IntoIterator for OrderedSequence<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSequence<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut OrderedSequence<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter_mut()
    }
}

/// An element could not be inserted because the requested position lies past the end of the
/// [`OrderedSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertError<T> {
    /// The requested position.
    pub index: usize,
    /// The length of the [`OrderedSequence`] at the time of the insertion.
    pub len: usize,
    /// The element that was not inserted.
    pub value: T,
}

impl<T> InsertError<T> {
    /// Returns the element that could not be inserted.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insertion index (is {}) should be <= len (is {})",
            self.index, self.len
        )
    }
}

impl<T: fmt::Debug> error::Error for InsertError<T> {}
