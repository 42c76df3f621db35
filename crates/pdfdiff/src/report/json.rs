use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::compare::{DifferenceMap, DocumentVerdict};
use crate::error::{Error, Result};

/// Machine-readable comparison result written by `--report`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub file1: PathBuf,
    pub file2: PathBuf,
    pub equal: bool,
    pub pages_total: usize,
    pub pages_differ: usize,
    pub page_count: [usize; 2],
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Serialize)]
pub struct PageEntry {
    pub index: usize,
    pub differs: bool,
    pub diff_pixels: u64,
}

impl Report {
    pub fn new(
        file1: &Path,
        file2: &Path,
        verdict: &DocumentVerdict,
        map: &DifferenceMap,
    ) -> Self {
        let pages = map
            .iter()
            .enumerate()
            .map(|(index, page)| PageEntry {
                index,
                differs: !page.equal,
                diff_pixels: page.diff_pixels,
            })
            .collect();

        Self {
            file1: file1.to_path_buf(),
            file2: file2.to_path_buf(),
            equal: verdict.equal,
            pages_total: verdict.pages_total,
            pages_differ: verdict.pages_differ,
            page_count: [verdict.page_counts.0, verdict.page_counts.1],
            pages,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let report_err = |source: io::Error| Error::Report {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| report_err(e.into()))?;
        std::fs::write(path, json + "\n").map_err(report_err)?;
        debug!(path = %path.display(), "wrote report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::PageVerdict;

    fn sample() -> Report {
        let mut map = DifferenceMap::new();
        map.push(PageVerdict {
            equal: true,
            diff_pixels: 0,
        });
        map.push(PageVerdict {
            equal: false,
            diff_pixels: 1234,
        });
        let verdict = DocumentVerdict {
            page_counts: (2, 3),
            pages_total: 3,
            pages_compared: 2,
            pages_differ: 1,
            equal: false,
        };
        Report::new(Path::new("a.pdf"), Path::new("b.pdf"), &verdict, &map)
    }

    #[test]
    fn report_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        sample().write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["file1"], "a.pdf");
        assert_eq!(value["file2"], "b.pdf");
        assert_eq!(value["equal"], false);
        assert_eq!(value["pages_total"], 3);
        assert_eq!(value["pages_differ"], 1);
        assert_eq!(value["page_count"], serde_json::json!([2, 3]));
        assert_eq!(value["pages"][1]["index"], 1);
        assert_eq!(value["pages"][1]["differs"], true);
        assert_eq!(value["pages"][1]["diff_pixels"], 1234);
    }

    #[test]
    fn unwritable_path_is_a_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = sample().write(&path).unwrap_err();
        assert!(matches!(err, Error::Report { .. }));
    }
}
