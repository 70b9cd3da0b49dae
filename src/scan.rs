//! Recursive discovery of CSV files and per-file extraction.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::grades::extract::{Extraction, extract_file};
use crate::grades::types::SectionRecord;

/// Records collected from a directory tree plus per-file bookkeeping.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub records: Vec<SectionRecord>,
    pub files_discovered: usize,
    pub files_accepted: usize,
    pub files_rejected: usize,
    pub files_skipped: usize,
}

/// Matches `*.csv` regardless of case.
pub fn is_csv(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(".csv"))
}

/// Lists every regular `.csv` file under `root`, sorted by file name within
/// each directory so runs are reproducible.
///
/// Unreadable entries are logged and skipped.
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_csv(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                warn!(error = %e, "Error accessing directory entry");
            }
        }
    }

    files
}

/// Scans `root` and extracts every grades file found under it.
///
/// Files that cannot be opened, or whose header cannot be read, are skipped.
/// A file that fails partway keeps the records read before the failure.
/// Files whose header does not look like grade data contribute nothing.
///
/// # Errors
///
/// Fails only if `root` is not a directory.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn scan_dir(root: &Path) -> Result<ScanReport> {
    if !root.is_dir() {
        bail!("input directory not found: {}", root.display());
    }

    let mut report = ScanReport::default();

    for path in discover_csv_files(root) {
        report.files_discovered += 1;

        match extract_file(&path) {
            Ok(Extraction::Accepted(records)) => {
                report.files_accepted += 1;
                report.records.extend(records);
            }
            Ok(Extraction::Partial { records, .. }) => {
                report.files_skipped += 1;
                report.records.extend(records);
            }
            Ok(Extraction::Rejected) => {
                debug!(path = %path.display(), "Header does not match grades layout");
                report.files_rejected += 1;
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable file");
                report.files_skipped += 1;
            }
        }
    }

    info!(
        files_discovered = report.files_discovered,
        files_accepted = report.files_accepted,
        files_rejected = report.files_rejected,
        files_skipped = report.files_skipped,
        records = report.records.len(),
        "Scan complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_csv() {
        assert!(is_csv(Path::new("a.csv")));
        assert!(is_csv(Path::new("dir/GRADES.CSV")));
        assert!(is_csv(Path::new("b.Csv")));
        assert!(!is_csv(Path::new("a.csv.bak")));
        assert!(!is_csv(Path::new("notes.txt")));
        assert!(!is_csv(Path::new("csv")));
    }

    #[test]
    fn test_discover_recurses_and_filters() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("2022/W")).unwrap();
        fs::write(dir.path().join("top.csv"), "x").unwrap();
        fs::write(dir.path().join("2022/W/deep.CSV"), "x").unwrap();
        fs::write(dir.path().join("2022/readme.md"), "x").unwrap();
        fs::create_dir_all(dir.path().join("folder.csv")).unwrap();

        let files = discover_csv_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names.len(), 2);
        assert!(names.contains(&"top.csv".to_string()));
        assert!(names.contains(&"deep.CSV".to_string()));
    }

    #[test]
    fn test_scan_counts_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("grades.csv"),
            "subject,course,average\nCPSC,110,80\nMATH,100,70\n",
        )
        .unwrap();
        fs::write(dir.path().join("other.csv"), "id,name,value\n1,a,2\n").unwrap();
        fs::write(
            dir.path().join("broken.csv"),
            b"subject,course,average\nENGL,112,75\n\xFF,110,80\n".as_slice(),
        )
        .unwrap();
        fs::write(dir.path().join("garbled.csv"), b"\xFF\xFE\n1,2\n".as_slice()).unwrap();

        let report = scan_dir(dir.path()).unwrap();

        assert_eq!(report.files_discovered, 4);
        assert_eq!(report.files_accepted, 1);
        assert_eq!(report.files_rejected, 1);
        assert_eq!(report.files_skipped, 2);

        // broken.csv sorts first and keeps its one readable line
        let subjects: Vec<_> = report
            .records
            .iter()
            .map(|r| r.subject.as_deref().unwrap())
            .collect();
        assert_eq!(subjects, vec!["ENGL", "CPSC", "MATH"]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        assert!(scan_dir(&dir.path().join("missing")).is_err());
    }
}
