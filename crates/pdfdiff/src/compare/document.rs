use std::time::Instant;

use tracing::{debug, info_span, warn};

use super::page::{PageRef, compare_page};
use super::{DifferenceMap, DocumentVerdict};
use crate::config::CompareOptions;
use crate::error::Result;
use crate::pdf::{Document, OutputSink, PageSize};
use crate::report::terminal;

/// Size of output page `index`: the first document's page, else the second's.
pub fn output_page_size(
    doc1: &dyn Document,
    doc2: &dyn Document,
    index: usize,
) -> Result<PageSize> {
    if index < doc1.page_count() {
        return doc1.page_size(index);
    }
    if index < doc2.page_count() {
        warn!(
            page = index,
            "first document has no such page, using the second's size"
        );
        return doc2.page_size(index);
    }
    Ok(PageSize::LETTER)
}

/// Compare two documents page by page.
///
/// Missing pages of the shorter document always count as different. Unless
/// `verbose` is set, an `output` is given, or a `differences` map is
/// requested, comparison stops at the first differing page; the verdict is
/// the same either way.
pub fn compare_documents(
    doc1: &dyn Document,
    doc2: &dyn Document,
    mut output: Option<&mut dyn OutputSink>,
    mut differences: Option<&mut DifferenceMap>,
    options: &CompareOptions,
) -> Result<DocumentVerdict> {
    let pages1 = doc1.page_count();
    let pages2 = doc2.page_count();
    let pages_total = pages1.max(pages2);
    let _span = info_span!("compare", pages1, pages2).entered();

    if pages1 != pages2 && options.verbose {
        terminal::print_page_count_mismatch(pages1, pages2);
    }

    let exhaustive = options.verbose || output.is_some() || differences.is_some();
    let mut pages_differ = 0;
    let mut pages_compared = 0;
    let t0 = Instant::now();

    for index in 0..pages_total {
        if let Some(out) = output.as_mut() {
            out.set_page_size(output_page_size(doc1, doc2, index)?);
        }

        let page1 = (index < pages1).then(|| PageRef::new(doc1, index));
        let page2 = (index < pages2).then(|| PageRef::new(doc2, index));

        let sink = output.as_mut().map(|o| &mut **o as &mut dyn OutputSink);
        let verdict = compare_page(index, sink, page1, page2, options)?;
        pages_compared += 1;

        if let Some(map) = differences.as_deref_mut() {
            map.push(verdict);
        }

        if !verdict.equal {
            pages_differ += 1;
            if options.verbose {
                terminal::print_page_differs(index);
            }
            if !exhaustive {
                debug!(page = index, "stopping at first difference");
                break;
            }
        }
    }

    if let Some(out) = output {
        out.finish()?;
    }

    if options.verbose {
        terminal::print_summary(pages_differ, pages_total);
    }

    debug!(
        pages_compared,
        pages_differ,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "compared documents"
    );

    Ok(DocumentVerdict {
        page_counts: (pages1, pages2),
        pages_total,
        pages_compared,
        pages_differ,
        equal: pages_differ == 0 && pages1 == pages2,
    })
}
