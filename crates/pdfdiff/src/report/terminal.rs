//! Verbose report lines, printed to stdout.

pub fn page_pixels_line(page: usize, count: u64) -> String {
    format!("page {page} has {count} pixels that differ")
}

pub fn page_differs_line(page: usize) -> String {
    format!("page {page} differs")
}

pub fn page_count_mismatch_line(pages1: usize, pages2: usize) -> String {
    format!("pages count differs: {pages1} vs {pages2}")
}

pub fn summary_line(pages_differ: usize, pages_total: usize) -> String {
    format!("{pages_differ} of {pages_total} pages differ.")
}

/// Print the per-page count of pixels outside the channel tolerance.
pub fn print_page_pixels(page: usize, count: u64) {
    println!("{}", page_pixels_line(page, count));
}

pub fn print_page_differs(page: usize) {
    println!("{}", page_differs_line(page));
}

pub fn print_page_count_mismatch(pages1: usize, pages2: usize) {
    println!("{}", page_count_mismatch_line(pages1, pages2));
}

/// Print the final summary.
pub fn print_summary(pages_differ: usize, pages_total: usize) {
    println!("{}", summary_line(pages_differ, pages_total));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_match_expected_wording() {
        assert_eq!(page_pixels_line(0, 42), "page 0 has 42 pixels that differ");
        assert_eq!(page_differs_line(2), "page 2 differs");
        assert_eq!(page_count_mismatch_line(3, 2), "pages count differs: 3 vs 2");
        assert_eq!(summary_line(1, 3), "1 of 3 pages differ.");
    }
}
