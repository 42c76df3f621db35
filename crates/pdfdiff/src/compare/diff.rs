use image::{Rgb, RgbImage};

use crate::config::DiffOptions;
use crate::geometry::Rect;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Colour of the gutter painted on rows with differences.
const MARKER: Rgb<u8> = Rgb([0, 0, 255]);

/// Width in pixels of the difference gutter.
const MARKER_WIDTH: i32 = 10;

pub struct DiffResult {
    /// Pixels with at least one channel outside the channel tolerance.
    pub diff_pixels: u64,
    /// The images differ in extent/position or at least one pixel differs.
    pub changed: bool,
    /// Composite of both sides. `None` when the page is within tolerance.
    pub diff_image: Option<RgbImage>,
}

impl DiffResult {
    pub fn is_match(&self) -> bool {
        self.diff_image.is_none()
    }
}

/// Build the composite of `left` and `right`, with `right` displaced by
/// `offset`, and decide whether the page counts as different.
///
/// The composite covers the union of both images. Where they overlap, the
/// red and green channels come from `left` and blue from `right` (or, in
/// grayscale mode, `right`'s luminance in red and `left`'s in blue), so
/// identical content stays neutral and disagreements show up tinted.
///
/// # Panics
///
/// If both images are absent.
pub fn diff_images(
    left: Option<&RgbImage>,
    right: Option<&RgbImage>,
    offset: (i32, i32),
    options: &DiffOptions,
) -> DiffResult {
    assert!(
        left.is_some() || right.is_some(),
        "diff_images needs at least one image"
    );

    let mut r1 = left.map_or_else(Rect::default, |img| {
        Rect::from_image(0, 0, img.width(), img.height())
    });
    let mut r2 = right.map_or_else(Rect::default, |img| {
        Rect::from_image(offset.0, offset.1, img.width(), img.height())
    });

    // Union rectangle moved to start at (0, 0).
    let mut rdiff = r1;
    rdiff.union(&r2);
    let (dx, dy) = (-rdiff.x, -rdiff.y);
    r1.offset(dx, dy);
    r2.offset(dx, dy);
    rdiff.offset(dx, dy);

    let (w, h) = (rdiff.width as u32, rdiff.height as u32);
    let mut changed = false;

    // Blank canvas where the images don't fully overlap.
    let mut composite = if r1 != r2 {
        changed = true;
        RgbImage::from_pixel(w, h, WHITE)
    } else {
        RgbImage::new(w, h)
    };

    if let Some(left) = left {
        image::imageops::replace(&mut composite, left, r1.x as i64, r1.y as i64);
    }

    let mut diff_pixels: u64 = 0;

    if let Some(right) = right {
        let (ox, oy) = (r2.x as u32, r2.y as u32);
        let marker_width = r2.width.min(MARKER_WIDTH) as u32;

        for y in 0..right.height() {
            let mut row_differs = false;

            for x in 0..right.width() {
                let theirs = *right.get_pixel(x, y);
                let out = composite.get_pixel_mut(ox + x, oy + y);
                let ours = *out;

                if pixels_differ(ours, theirs, options.channel_tolerance) {
                    diff_pixels += 1;
                    changed = true;
                    row_differs = true;
                }

                *out = blend(ours, theirs, options.grayscale);
            }

            if options.mark_differences && row_differs {
                for x in 0..marker_width {
                    composite.put_pixel(ox + x, oy + y, MARKER);
                }
            }
        }
    }

    // With a pixel tolerance only the counter matters; an extent mismatch
    // alone does not push a page over it.
    let admitted = if options.per_page_pixel_tolerance == 0 {
        changed
    } else {
        diff_pixels > options.per_page_pixel_tolerance
    };

    DiffResult {
        diff_pixels,
        changed,
        diff_image: admitted.then_some(composite),
    }
}

fn pixels_differ(a: Rgb<u8>, b: Rgb<u8>, tolerance: u8) -> bool {
    a.0.iter().zip(b.0).any(|(&ca, cb)| ca.abs_diff(cb) > tolerance)
}

fn blend(ours: Rgb<u8>, theirs: Rgb<u8>, grayscale: bool) -> Rgb<u8> {
    if grayscale {
        let g1 = luminance(ours);
        let g2 = luminance(theirs);
        let mid = ((g1 as u16 + g2 as u16) / 2) as u8;
        Rgb([g2, mid, g1])
    } else {
        Rgb([ours[0], ours[1], theirs[2]])
    }
}

/// Rec. 709 luma, truncated.
fn luminance(Rgb([r, g, b]): Rgb<u8>) -> u8 {
    (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) as u8
}
