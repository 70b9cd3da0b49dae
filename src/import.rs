//! End-to-end run: scan, aggregate, write.

use anyhow::Result;
use std::fmt;
use std::path::Path;
use tracing::warn;

use crate::grades::aggregate::aggregate_courses;
use crate::output::{OutputPaths, write_outputs};
use crate::scan::scan_dir;

/// What a completed run reports back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Records extracted from accepted files, complete or not.
    pub sections: usize,
    pub courses: usize,
    pub paths: OutputPaths,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OK sections={} courses={}", self.sections, self.courses)?;
        writeln!(f, "OUT {}", self.paths.sections.display())?;
        write!(f, "OUT {}", self.paths.course_averages.display())
    }
}

/// Reads every grades CSV under `input_dir` and writes the section and
/// course-average tables into `output_dir`.
pub fn import_grades(input_dir: &Path, output_dir: &Path) -> Result<ImportSummary> {
    let report = scan_dir(input_dir)?;
    let averages = aggregate_courses(&report.records);
    if averages.is_empty() {
        warn!(input = %input_dir.display(), "No course averages found");
    }
    let paths = write_outputs(output_dir, &report.records, &averages)?;

    Ok(ImportSummary {
        sections: report.records.len(),
        courses: averages.len(),
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_summary_format() {
        let summary = ImportSummary {
            sections: 12,
            courses: 3,
            paths: OutputPaths {
                sections: PathBuf::from("/tmp/out/grades_sections_import.csv"),
                course_averages: PathBuf::from("/tmp/out/grades_course_avg_import.csv"),
            },
        };

        assert_eq!(
            summary.to_string(),
            "OK sections=12 courses=3\n\
             OUT /tmp/out/grades_sections_import.csv\n\
             OUT /tmp/out/grades_course_avg_import.csv"
        );
    }
}
