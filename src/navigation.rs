use crate::{Result, ViewerError};

/// Zero-based position within a document of `total` pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    current: usize,
    total: usize,
}

impl PageCursor {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Move one page forward. Returns `false` on the last page.
    pub fn forward(&mut self) -> bool {
        if self.current + 1 < self.total {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move one page back. Returns `false` on the first page.
    pub fn back(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, index: usize) -> Result<()> {
        if index >= self.total {
            return Err(ViewerError::PageOutOfRange {
                index,
                total: self.total,
            });
        }
        self.current = index;
        Ok(())
    }

    /// `"Page 3 of 10"`, or `"Page 0 of 0"` with nothing open.
    pub fn label(&self) -> String {
        if self.total == 0 {
            return "Page 0 of 0".to_string();
        }
        format!("Page {} of {}", self.current + 1, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor_never_moves() {
        let mut cursor = PageCursor::default();
        assert!(!cursor.forward());
        assert!(!cursor.back());
        assert_eq!(cursor.label(), "Page 0 of 0");
    }

    #[test]
    fn next_and_previous_stop_at_bounds() {
        let mut cursor = PageCursor::new(2);
        assert!(!cursor.back());
        assert!(cursor.forward());
        assert!(!cursor.forward());
        assert_eq!(cursor.label(), "Page 2 of 2");
        assert!(cursor.back());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn go_to_rejects_out_of_range() {
        let mut cursor = PageCursor::new(3);
        cursor.go_to(2).unwrap();
        assert_eq!(cursor.label(), "Page 3 of 3");
        assert!(matches!(
            cursor.go_to(3),
            Err(ViewerError::PageOutOfRange { index: 3, total: 3 })
        ));
        assert_eq!(cursor.current(), 2);
    }
}
