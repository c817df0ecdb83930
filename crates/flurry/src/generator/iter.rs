use core::iter::FusedIterator;

use crate::{generator::FlakeGenerator, id::FlakeId, time::TimeSource};

/// A borrowing, unbounded iterator over [`FlakeGenerator::next_id`].
///
/// Returned by [`FlakeGenerator::iter`]. It never yields `None`; stop with
/// `take`, `take_while`, or by dropping it. Nothing is generated ahead of
/// `next()`, and the generator keeps its position once the iterator is
/// dropped.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug)]
pub struct Iter<'a, T>
where
    T: TimeSource,
{
    generator: &'a mut FlakeGenerator<T>,
}

impl<'a, T> Iter<'a, T>
where
    T: TimeSource,
{
    pub(crate) fn new(generator: &'a mut FlakeGenerator<T>) -> Self {
        Self { generator }
    }
}

impl<T> Iterator for Iter<'_, T>
where
    T: TimeSource,
{
    type Item = FlakeId;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.next_id())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T> FusedIterator for Iter<'_, T> where T: TimeSource {}

/// An owning, unbounded iterator over [`FlakeGenerator::next_id`].
///
/// Returned by `FlakeGenerator::into_iter`. Use [`IntoIter::into_inner`] to
/// get the generator back.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug)]
pub struct IntoIter<T>
where
    T: TimeSource,
{
    generator: FlakeGenerator<T>,
}

impl<T> IntoIter<T>
where
    T: TimeSource,
{
    /// Returns the underlying generator, positioned after the last yielded ID.
    pub fn into_inner(self) -> FlakeGenerator<T> {
        self.generator
    }
}

impl<T> Iterator for IntoIter<T>
where
    T: TimeSource,
{
    type Item = FlakeId;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.next_id())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T> FusedIterator for IntoIter<T> where T: TimeSource {}

impl<T> IntoIterator for FlakeGenerator<T>
where
    T: TimeSource,
{
    type Item = FlakeId;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { generator: self }
    }
}

impl<'a, T> IntoIterator for &'a mut FlakeGenerator<T>
where
    T: TimeSource,
{
    type Item = FlakeId;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
