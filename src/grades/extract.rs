//! Turns the lines of one CSV file into [`SectionRecord`]s.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::grades::header::{Field, HeaderMap};
use crate::grades::types::SectionRecord;

/// Result of reading one CSV file.
#[derive(Debug)]
pub enum Extraction {
    /// The header resolved; one record per data line.
    Accepted(Vec<SectionRecord>),
    /// The header resolved but reading stopped early. `records` holds every
    /// line read before the failure.
    Partial {
        records: Vec<SectionRecord>,
        error: io::Error,
    },
    /// Subject, course or average is missing from the header.
    Rejected,
}

impl Extraction {
    pub fn records(&self) -> &[SectionRecord] {
        match self {
            Extraction::Accepted(records) | Extraction::Partial { records, .. } => records,
            Extraction::Rejected => &[],
        }
    }
}

/// Returns the trimmed value at `index`, or `None` when the column is
/// unresolved, past the end of the line, or blank.
pub fn field_value<'a>(fields: &[&'a str], index: Option<usize>) -> Option<&'a str> {
    let value = fields.get(index?)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

/// Parses a year, falling back to 0 on anything that is not a valid `i32`.
pub fn parse_year(raw: Option<&str>) -> i32 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Parses a decimal average.
///
/// Accepts an optional sign, digits with an optional fraction and exponent,
/// and an optional `f`/`F`/`d`/`D` suffix. The only non-finite spellings
/// accepted are exactly `NaN` and `Infinity`.
pub fn parse_average(raw: Option<&str>) -> Option<f64> {
    let s = raw?;
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);

    if unsigned == "NaN" || unsigned == "Infinity" {
        return s.parse().ok();
    }
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    s.strip_suffix(['f', 'F', 'd', 'D']).unwrap_or(s).parse().ok()
}

/// Builds one record from a data line. Never fails: anything missing or
/// malformed simply ends up absent.
pub fn extract_record(header: &HeaderMap, line: &str) -> SectionRecord {
    let fields: Vec<&str> = line.split(',').collect();
    let value = |field: Field| field_value(&fields, header.index(field));
    let text = |field: Field| value(field).map(str::to_string);

    SectionRecord {
        campus: text(Field::Campus),
        subject: text(Field::Subject),
        // Passed through as-is apart from trimming; "211A" stays "211A".
        course: text(Field::Course),
        section: text(Field::Section),
        session: text(Field::Session),
        year: parse_year(value(Field::Year)),
        average: parse_average(value(Field::Average)),
    }
}

/// Reads comma-separated lines with no quote handling: every comma is a
/// delimiter and quote characters are kept literally. The first line is the
/// header, even when it is blank, and every later line yields one record.
///
/// # Errors
///
/// Returns an error only if the header line cannot be read. Failures on a
/// data line end the file early with [`Extraction::Partial`].
pub fn extract_reader<R: Read>(reader: R) -> Result<Extraction> {
    let mut lines = BufReader::new(reader).lines();

    let header = match lines.next() {
        Some(line) => HeaderMap::from_line(&line?),
        None => return Ok(Extraction::Rejected),
    };
    if !header.is_grades_file() {
        return Ok(Extraction::Rejected);
    }

    let mut records = Vec::new();
    for line in lines {
        match line {
            Ok(line) => records.push(extract_record(&header, &line)),
            Err(error) => return Ok(Extraction::Partial { records, error }),
        }
    }

    Ok(Extraction::Accepted(records))
}

/// Opens `path` and extracts it. The file is closed before returning.
pub fn extract_file(path: &Path) -> Result<Extraction> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let extraction =
        extract_reader(file).with_context(|| format!("reading {}", path.display()))?;

    match &extraction {
        Extraction::Accepted(records) => {
            debug!(path = %path.display(), records = records.len(), "Extracted grades file");
        }
        Extraction::Partial { records, error } => {
            debug!(
                path = %path.display(),
                records = records.len(),
                error = %error,
                "Stopped reading grades file early"
            );
        }
        Extraction::Rejected => {}
    }

    Ok(extraction)
}
