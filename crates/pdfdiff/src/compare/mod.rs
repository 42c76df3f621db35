pub mod diff;
pub mod document;
pub mod page;

pub use self::document::compare_documents;

/// Outcome of comparing a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageVerdict {
    pub equal: bool,
    /// Pixels outside the channel tolerance.
    pub diff_pixels: u64,
}

/// Outcome of comparing two documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentVerdict {
    /// Page counts of the first and second document.
    pub page_counts: (usize, usize),
    pub pages_total: usize,
    /// Pages actually compared; fewer than `pages_total` after an early exit.
    pub pages_compared: usize,
    pub pages_differ: usize,
    pub equal: bool,
}

/// Per-page results in page order, one entry per compared page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifferenceMap {
    pages: Vec<PageVerdict>,
}

impl DifferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, verdict: PageVerdict) {
        self.pages.push(verdict);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageVerdict> {
        self.pages.iter()
    }

    /// `true` for every page that differs.
    pub fn flags(&self) -> Vec<bool> {
        self.pages.iter().map(|v| !v.equal).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_map_flags_follow_page_order() {
        let mut map = DifferenceMap::new();
        assert!(map.flags().is_empty());
        map.push(PageVerdict {
            equal: true,
            diff_pixels: 0,
        });
        map.push(PageVerdict {
            equal: false,
            diff_pixels: 12,
        });
        assert_eq!(map.flags(), vec![false, true]);
        assert_eq!(map.iter().map(|v| v.diff_pixels).sum::<u64>(), 12);
    }
}
