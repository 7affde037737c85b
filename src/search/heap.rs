use std::cmp::Ordering;

use super::error::{Result, SearchError};

/// Array-backed binary heap ordered by an arbitrary comparator.
///
/// The extreme is the element that compares greatest, so a reversed
/// comparator turns it into a min-heap. Callers that change elements through
/// [`Heap::iter_mut`] must call [`Heap::heapify`] before the next extraction.
pub struct Heap<T, C> {
    data: Vec<T>,
    compare: C,
}

impl<T, C> Heap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn new(data: Vec<T>, compare: C) -> Self {
        let mut heap = Self { data, compare };
        heap.heapify();
        heap
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn extreme(&self) -> Result<&T> {
        self.data.first().ok_or(SearchError::EmptyHeap)
    }

    pub fn extract_extreme(&mut self) -> Result<T> {
        let last = self.data.len().checked_sub(1).ok_or(SearchError::EmptyHeap)?;
        self.data.swap(0, last);
        let extreme = self.data.pop().ok_or(SearchError::EmptyHeap)?;
        self.sift_down(0);
        Ok(extreme)
    }

    pub fn insert(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    pub fn heapify(&mut self) {
        for index in (0..self.data.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.data.iter_mut()
    }

    /// Drains the heap, extreme first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Ok(value) = self.extract_extreme() {
            sorted.push(value);
        }
        sorted
    }

    fn outranks(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.data[a], &self.data[b]) == Ordering::Greater
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.outranks(index, parent) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut top = index;
            if left < len && self.outranks(left, top) {
                top = left;
            }
            if right < len && self.outranks(right, top) {
                top = right;
            }
            if top == index {
                break;
            }
            self.data.swap(index, top);
            index = top;
        }
    }
}
