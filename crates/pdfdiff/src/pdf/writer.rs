use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use pdfium_render::prelude::*;
use tracing::debug;

use super::document::page_index;
use super::{OutputSink, PageSize};
use crate::error::{Error, Result};

/// Builds the visualization PDF.
///
/// Bitmap pages are new pages carrying a single image object; unchanged pages
/// are copied from `source` so they keep their vector content.
pub struct PdfWriter<'a, 's> {
    document: PdfDocument<'a>,
    source: &'s PdfDocument<'a>,
    path: PathBuf,
    page_size: PageSize,
    /// Whether the current page already exists in `document`.
    page_open: bool,
    pages_written: usize,
}

impl<'a, 's> PdfWriter<'a, 's> {
    pub fn new(
        pdfium: &'a Pdfium,
        source: &'s PdfDocument<'a>,
        path: &Path,
        page_size: PageSize,
    ) -> Result<Self> {
        let document = pdfium.create_new_pdf().map_err(|e| Error::Output {
            path: path.to_path_buf(),
            message: format!("{e:?}"),
        })?;
        Ok(Self {
            document,
            source,
            path: path.to_path_buf(),
            page_size,
            page_open: false,
            pages_written: 0,
        })
    }

    pub fn pages_written(&self) -> usize {
        self.pages_written
    }

    fn output_err(&self, e: PdfiumError) -> Error {
        Error::Output {
            path: self.path.clone(),
            message: format!("{e:?}"),
        }
    }

    /// The page currently being drawn, created on first use.
    fn current_page(&mut self) -> Result<PdfPage<'a>> {
        if !self.page_open {
            let size = PdfPagePaperSize::Custom(
                PdfPoints::new(self.page_size.width),
                PdfPoints::new(self.page_size.height),
            );
            let page = self
                .document
                .pages_mut()
                .create_page_at_end(size)
                .map_err(|e| self.output_err(e))?;
            self.page_open = true;
            return Ok(page);
        }

        let last = self.document.pages().len() as usize - 1;
        let index = page_index(last).ok_or_else(|| Error::Output {
            path: self.path.clone(),
            message: format!("page {last} out of range"),
        })?;
        self.document
            .pages()
            .get(index)
            .map_err(|e| self.output_err(e))
    }
}

impl OutputSink for PdfWriter<'_, '_> {
    fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
    }

    fn paint_bitmap(&mut self, image: RgbImage, dpi: u32) -> Result<()> {
        let at = self
            .page_size
            .bitmap_placement((image.width(), image.height()), dpi);

        let mut page = self.current_page()?;
        page.objects_mut()
            .create_image_object(
                PdfPoints::new(at.x),
                PdfPoints::new(at.y),
                &DynamicImage::ImageRgb8(image),
                Some(PdfPoints::new(at.width)),
                Some(PdfPoints::new(at.height)),
            )
            .map_err(|e| self.output_err(e))?;
        debug!(width = at.width, height = at.height, "painted diff bitmap");
        Ok(())
    }

    fn paint_original(&mut self, index: usize) -> Result<()> {
        let source_index = page_index(index).ok_or_else(|| Error::Output {
            path: self.path.clone(),
            message: format!("source page {index} out of range"),
        })?;
        let destination = self.document.pages().len();
        self.document
            .pages_mut()
            .copy_page_from_document(self.source, source_index, destination)
            .map_err(|e| self.output_err(e))?;
        self.page_open = true;
        Ok(())
    }

    fn show_page(&mut self) -> Result<()> {
        if !self.page_open {
            // Nothing was drawn: emit a blank page of the current size.
            self.current_page()?;
        }
        self.page_open = false;
        self.pages_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.document
            .save_to_file(&self.path)
            .map_err(|e| self.output_err(e))?;
        debug!(path = %self.path.display(), pages = self.pages_written, "wrote diff document");
        Ok(())
    }
}
