//! Document access seams used by the comparators.
//!
//! The comparators only see the [`Document`] and [`OutputSink`] traits; the
//! PDFium-backed implementations live in [`document`] and [`writer`].

pub mod document;
pub mod library;
pub mod writer;

use image::RgbImage;

use crate::error::Result;

pub use self::document::PdfiumDocument;
pub use self::library::bind_pdfium;
pub use self::writer::PdfWriter;

/// PDF points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Page dimensions in document units (points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, used when neither document has the page.
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Raster dimensions at `dpi`, truncated to whole pixels, never zero.
    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        let scale = dpi as f64 / POINTS_PER_INCH;
        let w = (self.width as f64 * scale) as u32;
        let h = (self.height as f64 * scale) as u32;
        (w.max(1), h.max(1))
    }

    /// Where a raster of `pixels` rendered at `dpi` lands on this page:
    /// scaled back to points and anchored at the top-left corner. PDF user
    /// space grows upwards, so `y` is the distance from the bottom edge.
    pub fn bitmap_placement(&self, pixels: (u32, u32), dpi: u32) -> Placement {
        let scale = (POINTS_PER_INCH / dpi as f64) as f32;
        let width = pixels.0 as f32 * scale;
        let height = pixels.1 as f32 * scale;
        Placement {
            x: 0.0,
            y: self.height - height,
            width,
            height,
        }
    }
}

/// Position and extent of an image object, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A paginated input document.
pub trait Document {
    fn page_count(&self) -> usize;

    fn page_size(&self, index: usize) -> Result<PageSize>;

    /// Rasterize page `index` onto a white background at `dpi`.
    fn rasterize(&self, index: usize, dpi: u32) -> Result<RgbImage>;
}

/// Destination for the visualization document.
///
/// Drawing happens on the current page; `show_page` finalizes it and starts
/// the next one.
pub trait OutputSink {
    /// Size of the page being drawn, in points.
    fn set_page_size(&mut self, size: PageSize);

    /// Draw a raster rendered at `dpi`, scaled back to document units and
    /// anchored at the top-left corner.
    fn paint_bitmap(&mut self, image: RgbImage, dpi: u32) -> Result<()>;

    /// Draw page `index` of the first input document in its original
    /// (vector) form.
    fn paint_original(&mut self, index: usize) -> Result<()>;

    fn show_page(&mut self) -> Result<()>;

    /// Write the finished document out.
    fn finish(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_page_at_default_dpi() {
        let letter = PageSize::LETTER;
        assert_eq!(letter.pixels(300), (2550, 3300));
        assert_eq!(letter.pixels(72), (612, 792));
    }

    #[test]
    fn full_page_bitmap_fills_the_page() {
        let letter = PageSize::LETTER;
        let placement = letter.bitmap_placement(letter.pixels(300), 300);
        assert_eq!(
            placement,
            Placement {
                x: 0.0,
                y: 0.0,
                width: 612.0,
                height: 792.0
            }
        );
    }

    #[test]
    fn short_bitmap_is_anchored_at_the_top() {
        let page = PageSize::new(200.0, 100.0);
        // 144 px at 144 dpi is one inch.
        let placement = page.bitmap_placement((288, 144), 144);
        assert_eq!(placement.width, 144.0);
        assert_eq!(placement.height, 72.0);
        assert_eq!(placement.y, 28.0);
        assert_eq!(placement.x, 0.0);
    }

    #[test]
    fn pixel_size_truncates() {
        let page = PageSize::new(100.5, 10.0);
        assert_eq!(page.pixels(72), (100, 10));
        assert_eq!(page.pixels(1), (1, 1));
    }
}
