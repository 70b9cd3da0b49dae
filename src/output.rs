//! CSV output for section records and course averages.
//!
//! Both files are plain comma-separated text with a fixed header row. Values
//! are written without quoting and averages use four decimal places.

use anyhow::{Context, Result};
use csv::{QuoteStyle, Writer, WriterBuilder};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::grades::aggregate::CourseAverages;
use crate::grades::types::SectionRecord;

pub const SECTIONS_FILE: &str = "grades_sections_import.csv";
pub const COURSE_AVG_FILE: &str = "grades_course_avg_import.csv";

const SECTIONS_HEADER: [&str; 7] = [
    "campus", "subject", "course", "section", "year", "session", "average",
];
const COURSE_AVG_HEADER: [&str; 5] = ["campus", "subject", "course", "avg", "samples"];

#[derive(Serialize)]
struct SectionRow<'a> {
    campus: &'a str,
    subject: &'a str,
    course: &'a str,
    section: &'a str,
    year: i32,
    session: &'a str,
    average: String,
}

impl<'a> SectionRow<'a> {
    /// `None` unless the record is complete.
    fn from_record(r: &'a SectionRecord) -> Option<Self> {
        Some(SectionRow {
            campus: r.campus.as_deref()?,
            subject: r.subject.as_deref()?,
            course: r.course.as_deref()?,
            section: r.section.as_deref()?,
            year: (r.year != 0).then_some(r.year)?,
            session: r.session.as_deref()?,
            average: format_average(r.average?),
        })
    }
}

#[derive(Serialize)]
struct CourseAvgRow<'a> {
    campus: &'a str,
    subject: &'a str,
    course: &'a str,
    avg: String,
    samples: usize,
}

/// Fixed four-decimal formatting, always with a `.` separator.
pub fn format_average(value: f64) -> String {
    format!("{value:.4}")
}

fn csv_writer<W: Write>(w: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(w)
}

/// Writes the sections table, skipping incomplete records.
///
/// Returns the number of data rows written.
pub fn write_sections<W: Write>(w: W, records: &[SectionRecord]) -> Result<usize> {
    let mut writer = csv_writer(w);
    writer.write_record(SECTIONS_HEADER)?;

    let mut written = 0;
    for row in records.iter().filter_map(SectionRow::from_record) {
        writer.serialize(row)?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Writes one row per course, in first-seen order.
pub fn write_course_averages<W: Write>(w: W, averages: &CourseAverages) -> Result<()> {
    let mut writer = csv_writer(w);
    writer.write_record(COURSE_AVG_HEADER)?;

    for agg in averages.iter() {
        writer.serialize(CourseAvgRow {
            campus: &agg.campus,
            subject: &agg.subject,
            course: &agg.course,
            avg: format_average(agg.mean()),
            samples: agg.samples(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Absolute locations of the two files produced by [`write_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub sections: PathBuf,
    pub course_averages: PathBuf,
}

/// Creates `out_dir` if needed and writes both tables into it.
#[tracing::instrument(skip_all, fields(out_dir = %out_dir.display()))]
pub fn write_outputs(
    out_dir: &Path,
    records: &[SectionRecord],
    averages: &CourseAverages,
) -> Result<OutputPaths> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let sections = std::path::absolute(out_dir.join(SECTIONS_FILE))?;
    let file = File::create(&sections)
        .with_context(|| format!("creating {}", sections.display()))?;
    let rows = write_sections(file, records)
        .with_context(|| format!("writing {}", sections.display()))?;
    info!(path = %sections.display(), rows, "Wrote section records");

    let course_averages = std::path::absolute(out_dir.join(COURSE_AVG_FILE))?;
    let file = File::create(&course_averages)
        .with_context(|| format!("creating {}", course_averages.display()))?;
    write_course_averages(file, averages)
        .with_context(|| format!("writing {}", course_averages.display()))?;
    info!(path = %course_averages.display(), rows = averages.len(), "Wrote course averages");

    Ok(OutputPaths {
        sections,
        course_averages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::aggregate::aggregate_courses;
    use tempfile::TempDir;

    fn record(section: &str, year: i32, average: Option<f64>) -> SectionRecord {
        SectionRecord {
            campus: Some("UBCV".into()),
            subject: Some("CPSC".into()),
            course: Some("110".into()),
            section: Some(section.into()),
            session: Some("W".into()),
            year,
            average,
        }
    }

    fn sections_text(records: &[SectionRecord]) -> (usize, String) {
        let mut buf = Vec::new();
        let written = write_sections(&mut buf, records).unwrap();
        (written, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(80.0), "80.0000");
        assert_eq!(format_average(85.12346), "85.1235");
        assert_eq!(format_average(2.0 / 3.0), "0.6667");
        assert_eq!(format_average(0.5), "0.5000");
    }

    #[test]
    fn test_write_sections_rows() {
        let (written, text) = sections_text(&[record("001", 2022, Some(85.5))]);

        assert_eq!(written, 1);
        assert_eq!(
            text,
            "campus,subject,course,section,year,session,average\n\
             UBCV,CPSC,110,001,2022,W,85.5000\n"
        );
    }

    #[test]
    fn test_write_sections_skips_incomplete() {
        let records = vec![
            record("001", 0, Some(70.0)),
            record("002", 2022, None),
            SectionRecord {
                session: None,
                ..record("003", 2022, Some(70.0))
            },
            record("004", 2021, Some(64.0)),
        ];

        let (written, text) = sections_text(&records);

        assert_eq!(written, 1);
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("UBCV,CPSC,110,004,2021,W,64.0000\n"));
    }

    #[test]
    fn test_write_sections_empty_still_has_header() {
        let (written, text) = sections_text(&[]);

        assert_eq!(written, 0);
        assert_eq!(text, "campus,subject,course,section,year,session,average\n");
    }

    #[test]
    fn test_write_course_averages() {
        let averages = aggregate_courses(&[
            record("001", 2022, Some(85.5)),
            record("002", 0, Some(74.5)),
        ]);

        let mut buf = Vec::new();
        write_course_averages(&mut buf, &averages).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "campus,subject,course,avg,samples\nUBCV,CPSC,110,80.0000,2\n"
        );
    }

    #[test]
    fn test_values_are_never_quoted() {
        let r = SectionRecord {
            subject: Some("\"CPSC".into()),
            ..record("001", 2022, Some(50.0))
        };

        let (_, text) = sections_text(&[r]);
        assert!(text.contains("UBCV,\"CPSC,110"));
    }

    #[test]
    fn test_write_outputs_creates_nested_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out");
        let records = vec![record("001", 2022, Some(90.0))];
        let averages = aggregate_courses(&records);

        let paths = write_outputs(&out, &records, &averages).unwrap();

        assert!(paths.sections.is_absolute());
        assert!(paths.course_averages.is_absolute());
        assert_eq!(paths.sections.file_name().unwrap(), SECTIONS_FILE);
        assert_eq!(paths.course_averages.file_name().unwrap(), COURSE_AVG_FILE);
        assert!(out.join(SECTIONS_FILE).exists());
        assert!(out.join(COURSE_AVG_FILE).exists());
    }
}
