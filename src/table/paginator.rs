//! Client-side pagination over the filtered row set

use serde::Serialize;
use std::ops::Range;

/// Emitted whenever the user moves between pages or changes the page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageEvent {
    pub page_index: usize,
    pub previous_page_index: usize,
    pub page_size: usize,
    pub length: usize,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    page_index: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    length: usize,
}

impl Paginator {
    pub fn new(page_size: usize, page_size_options: Vec<usize>) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            page_size_options,
            length: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn page_count(&self) -> usize {
        self.length.div_ceil(self.page_size)
    }

    /// Slice bounds of the current page within the filtered rows
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.length);
        let end = (start + self.page_size).min(self.length);
        start..end
    }

    /// Update the row count, keeping the page index in bounds
    pub fn set_length(&mut self, length: usize) {
        self.length = length;
        let last = self.page_count().saturating_sub(1);
        if self.page_index > last {
            self.page_index = last;
        }
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    /// Move to a page; `None` when the index is out of range or unchanged
    pub fn go_to(&mut self, page_index: usize) -> Option<PageEvent> {
        if page_index == self.page_index || page_index >= self.page_count() {
            return None;
        }
        let previous = self.page_index;
        self.page_index = page_index;
        Some(self.event(previous))
    }

    pub fn next_page(&mut self) -> Option<PageEvent> {
        self.go_to(self.page_index + 1)
    }

    pub fn previous_page(&mut self) -> Option<PageEvent> {
        self.page_index.checked_sub(1).and_then(|i| self.go_to(i))
    }

    /// Change the page size, keeping the first row of the current page visible
    pub fn set_page_size(&mut self, page_size: usize) -> Option<PageEvent> {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return None;
        }
        let previous = self.page_index;
        let first_row = self.page_index * self.page_size;
        self.page_size = page_size;
        self.page_index = first_row / page_size;
        Some(self.event(previous))
    }

    fn event(&self, previous_page_index: usize) -> PageEvent {
        PageEvent {
            page_index: self.page_index,
            previous_page_index,
            page_size: self.page_size,
            length: self.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_and_count() {
        let mut p = Paginator::new(8, vec![5, 10]);
        p.set_length(20);
        assert_eq!(p.page_count(), 3);
        assert_eq!(p.range(), 0..8);
        assert!(p.go_to(2).is_some());
        assert_eq!(p.range(), 16..20);
    }

    #[test]
    fn test_shrinking_length_clamps_page() {
        let mut p = Paginator::new(5, vec![]);
        p.set_length(12);
        p.go_to(2);
        p.set_length(4);
        assert_eq!(p.page_index(), 0);
        assert_eq!(p.range(), 0..4);
    }

    #[test]
    fn test_out_of_range_page_is_ignored() {
        let mut p = Paginator::new(5, vec![]);
        p.set_length(5);
        assert!(p.go_to(1).is_none());
        assert!(p.previous_page().is_none());
    }

    #[test]
    fn test_page_size_change_keeps_first_row() {
        let mut p = Paginator::new(5, vec![5, 10]);
        p.set_length(30);
        p.go_to(3); // rows 15..20
        let event = p.set_page_size(10).unwrap();
        assert_eq!(event.previous_page_index, 3);
        assert_eq!(event.page_index, 1);
        assert_eq!(p.range(), 10..20);
    }
}
