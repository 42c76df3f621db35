use std::time::Instant;

use image::RgbImage;
use tracing::{debug, debug_span};

use super::PageVerdict;
use super::diff::diff_images;
use crate::config::CompareOptions;
use crate::error::Result;
use crate::pdf::{Document, OutputSink};
use crate::report::terminal;

/// One page of an input document.
#[derive(Clone, Copy)]
pub struct PageRef<'d> {
    pub document: &'d dyn Document,
    pub index: usize,
}

impl<'d> PageRef<'d> {
    pub fn new(document: &'d dyn Document, index: usize) -> Self {
        Self { document, index }
    }

    fn rasterize(&self, dpi: u32) -> Result<RgbImage> {
        self.document.rasterize(self.index, dpi)
    }
}

/// Compare one page of each document; either side may be missing.
///
/// With an `output`, the page is drawn as the diff composite when the pages
/// differ, or as the first document's original page otherwise. Identical
/// pages are left out entirely under `skip_identical`.
pub fn compare_page(
    index: usize,
    output: Option<&mut dyn OutputSink>,
    page1: Option<PageRef<'_>>,
    page2: Option<PageRef<'_>>,
    options: &CompareOptions,
) -> Result<PageVerdict> {
    let _span = debug_span!("page", index).entered();
    let t0 = Instant::now();

    let img1 = page1.map(|p| p.rasterize(options.dpi)).transpose()?;
    let img2 = page2.map(|p| p.rasterize(options.dpi)).transpose()?;
    let t_render = t0.elapsed();

    let result = diff_images(img1.as_ref(), img2.as_ref(), (0, 0), &options.diff);
    drop((img1, img2));

    if options.verbose {
        terminal::print_page_pixels(index, result.diff_pixels);
    }

    let verdict = PageVerdict {
        equal: result.is_match(),
        diff_pixels: result.diff_pixels,
    };

    if let Some(out) = output {
        let painted = match result.diff_image {
            Some(composite) => {
                out.paint_bitmap(composite, options.dpi)?;
                true
            }
            None => {
                if !options.skip_identical
                    && let Some(page) = page1
                {
                    out.paint_original(page.index)?;
                }
                false
            }
        };

        if painted || !options.skip_identical {
            out.show_page()?;
        }
    }

    debug!(
        equal = verdict.equal,
        diff_pixels = verdict.diff_pixels,
        changed = result.changed,
        render_ms = t_render.as_millis() as u64,
        total_ms = t0.elapsed().as_millis() as u64,
        "compared page"
    );

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;
    use crate::compare::testing::{FakeDocument, RecordingSink, SinkOp};

    fn page_with_mark() -> RgbImage {
        let mut img = RgbImage::from_pixel(6, 6, Rgb([255, 255, 255]));
        img.put_pixel(3, 3, Rgb([0, 0, 0]));
        img
    }

    fn compare(
        sink: Option<&mut RecordingSink>,
        doc1: &FakeDocument,
        doc2: &FakeDocument,
        options: &CompareOptions,
    ) -> PageVerdict {
        let page1 = (doc1.page_count() > 0).then(|| PageRef::new(doc1, 0));
        let page2 = (doc2.page_count() > 0).then(|| PageRef::new(doc2, 0));
        compare_page(
            0,
            sink.map(|s| s as &mut dyn OutputSink),
            page1,
            page2,
            options,
        )
        .unwrap()
    }

    #[test]
    fn equal_pages_without_output() {
        let doc = FakeDocument::blank(1, 6, 6);
        let v = compare(None, &doc, &doc, &CompareOptions::default());
        assert!(v.equal);
        assert_eq!(v.diff_pixels, 0);
        assert_eq!(doc.rasterized.get(), 2);
    }

    #[test]
    fn differing_page_paints_composite() {
        let doc1 = FakeDocument::blank(1, 6, 6);
        let doc2 = FakeDocument::new(vec![page_with_mark()]);
        let mut sink = RecordingSink::default();
        let options = CompareOptions {
            dpi: 144,
            ..Default::default()
        };

        let v = compare(Some(&mut sink), &doc1, &doc2, &options);
        assert!(!v.equal);
        assert_eq!(v.diff_pixels, 1);
        assert_eq!(
            sink.ops,
            vec![
                SinkOp::Bitmap {
                    width: 6,
                    height: 6,
                    dpi: 144
                },
                SinkOp::ShowPage
            ]
        );
    }

    #[test]
    fn equal_page_is_copied_natively() {
        let doc = FakeDocument::blank(1, 6, 6);
        let mut sink = RecordingSink::default();
        compare(Some(&mut sink), &doc, &doc, &CompareOptions::default());
        assert_eq!(sink.ops, vec![SinkOp::Original(0), SinkOp::ShowPage]);
    }

    #[test]
    fn equal_page_is_omitted_with_skip_identical() {
        let doc = FakeDocument::blank(1, 6, 6);
        let mut sink = RecordingSink::default();
        let options = CompareOptions {
            skip_identical: true,
            ..Default::default()
        };
        compare(Some(&mut sink), &doc, &doc, &options);
        assert!(sink.ops.is_empty());
    }

    #[test]
    fn differing_page_is_kept_with_skip_identical() {
        let doc1 = FakeDocument::blank(1, 6, 6);
        let doc2 = FakeDocument::new(vec![page_with_mark()]);
        let mut sink = RecordingSink::default();
        let options = CompareOptions {
            skip_identical: true,
            ..Default::default()
        };
        compare(Some(&mut sink), &doc1, &doc2, &options);
        assert_eq!(sink.pages_shown(), 1);
    }

    #[test]
    fn missing_side_differs() {
        let doc1 = FakeDocument::blank(1, 6, 6);
        let empty = FakeDocument::new(Vec::new());
        let v = compare(None, &doc1, &empty, &CompareOptions::default());
        assert!(!v.equal);
        assert_eq!(doc1.rasterized.get(), 1);
        assert_eq!(empty.rasterized.get(), 0);
    }

    #[test]
    fn tolerated_difference_counts_as_equal() {
        let doc1 = FakeDocument::blank(1, 6, 6);
        let doc2 = FakeDocument::new(vec![page_with_mark()]);
        let mut sink = RecordingSink::default();
        let mut options = CompareOptions::default();
        options.diff.per_page_pixel_tolerance = 1;

        let v = compare(Some(&mut sink), &doc1, &doc2, &options);
        assert!(v.equal);
        assert_eq!(v.diff_pixels, 1);
        assert_eq!(sink.ops, vec![SinkOp::Original(0), SinkOp::ShowPage]);
    }
}
