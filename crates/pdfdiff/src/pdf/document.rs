use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage, RgbaImage};
use pdfium_render::prelude::*;
use tracing::debug;

use super::{Document, PageSize};
use crate::error::{Error, Result};

/// Input document opened through PDFium.
pub struct PdfiumDocument<'a> {
    inner: PdfDocument<'a>,
    path: PathBuf,
}

impl<'a> PdfiumDocument<'a> {
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> Result<Self> {
        let inner = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::Open {
                path: path.to_path_buf(),
                message: format!("{e:?}"),
            })?;
        debug!(path = %path.display(), pages = inner.pages().len() as usize, "opened document");
        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying PDFium handle, used as the source of pass-through pages.
    pub fn pdfium_document(&self) -> &PdfDocument<'a> {
        &self.inner
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>> {
        let render_err = |message: String| Error::Render {
            page: index,
            message,
        };
        let pdf_index =
            page_index(index).ok_or_else(|| render_err("page index out of range".into()))?;
        self.inner
            .pages()
            .get(pdf_index)
            .map_err(|e| render_err(format!("{e:?}")))
    }
}

impl Document for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.inner.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<RgbImage> {
        let page = self.page(index)?;
        let size = PageSize::new(page.width().value, page.height().value);
        let (w, h) = size.pixels(dpi);

        let config = PdfRenderConfig::new()
            .set_target_width(w as i32)
            .set_target_height(h as i32)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::Render {
                page: index,
                message: format!("{e:?}"),
            })?;

        let (bw, bh) = (bitmap.width() as u32, bitmap.height() as u32);
        let rgba = RgbaImage::from_raw(bw, bh, bitmap.as_rgba_bytes()).ok_or_else(|| {
            Error::Render {
                page: index,
                message: format!("bitmap buffer does not match {bw}x{bh}"),
            }
        })?;
        debug!(page = index, width = bw, height = bh, dpi, "rasterized page");

        Ok(DynamicImage::ImageRgba8(rgba).to_rgb8())
    }
}

/// Convert a zero-based index into PDFium's page index type.
pub(crate) fn page_index(index: usize) -> Option<PdfPageIndex> {
    PdfPageIndex::try_from(index).ok()
}
