use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::compare::document::output_page_size;
use crate::compare::{DifferenceMap, compare_documents};
use crate::config::ResolvedRunConfig;
use crate::error::Result;
use crate::pdf::{OutputSink, PdfWriter, PdfiumDocument, bind_pdfium};
use crate::report::Report;

/// `pdfdiff FILE1 FILE2`: compare, optionally write the diff PDF and report.
/// Returns whether the documents are equal.
pub fn compare(file1: &Path, file2: &Path, config: &ResolvedRunConfig) -> Result<bool> {
    let t0 = Instant::now();
    let pdfium = bind_pdfium()?;

    let doc1 = PdfiumDocument::open(&pdfium, file1)?;
    let doc2 = PdfiumDocument::open(&pdfium, file2)?;

    let mut writer = match &config.output_diff {
        Some(path) => {
            let size = output_page_size(&doc1, &doc2, 0)?;
            Some(PdfWriter::new(&pdfium, doc1.pdfium_document(), path, size)?)
        }
        None => None,
    };
    let mut differences = config.report.as_ref().map(|_| DifferenceMap::new());

    let verdict = compare_documents(
        &doc1,
        &doc2,
        writer.as_mut().map(|w| w as &mut dyn OutputSink),
        differences.as_mut(),
        &config.options,
    )?;

    if let (Some(writer), Some(path)) = (&writer, &config.output_diff) {
        info!(path = %path.display(), pages = writer.pages_written(), "wrote diff PDF");
    }

    if let (Some(path), Some(map)) = (&config.report, &differences) {
        Report::new(doc1.path(), doc2.path(), &verdict, map).write(path)?;
    }

    debug!(
        equal = verdict.equal,
        pages_compared = verdict.pages_compared,
        pages_differ = verdict.pages_differ,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "done"
    );
    Ok(verdict.equal)
}
