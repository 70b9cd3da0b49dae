//! Synonym-aware header matching.
//!
//! Grade exports name their columns inconsistently (`dept` vs `subject`,
//! `term` vs `session`, ...). Each logical [`Field`] carries an ordered list
//! of accepted names. The first one present in the header wins.

use std::collections::HashMap;

const FIELD_COUNT: usize = 7;

/// A logical column of a grades file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Subject,
    Course,
    Campus,
    Section,
    Year,
    Session,
    Average,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Subject,
        Field::Course,
        Field::Campus,
        Field::Section,
        Field::Year,
        Field::Session,
        Field::Average,
    ];

    /// Accepted lowercase column names, in priority order.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::Subject => &["subject", "dept", "department"],
            Field::Course => &["course", "number", "catalog", "catalog_number"],
            Field::Campus => &["campus"],
            Field::Section => &["section"],
            Field::Year => &["year"],
            Field::Session => &["session", "term"],
            Field::Average => &["average", "avg"],
        }
    }
}

/// Column positions resolved from one file's header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: [Option<usize>; FIELD_COUNT],
}

impl HeaderMap {
    /// Resolves every [`Field`] against a sequence of raw column names.
    ///
    /// Names are trimmed and lowercased before matching. If a name repeats,
    /// its last position is used.
    pub fn resolve<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let positions: HashMap<String, usize> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_lowercase(), i))
            .collect();

        let mut columns = [None; FIELD_COUNT];
        for field in Field::ALL {
            columns[field as usize] = field
                .synonyms()
                .iter()
                .find_map(|name| positions.get(*name).copied());
        }

        HeaderMap { columns }
    }

    /// Splits a raw header line on commas and resolves it.
    pub fn from_line(line: &str) -> Self {
        Self::resolve(line.split(','))
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns[field as usize]
    }

    /// A file is treated as grades data only if subject, course and average
    /// all resolve. Anything else is some unrelated CSV.
    pub fn is_grades_file(&self) -> bool {
        [Field::Subject, Field::Course, Field::Average]
            .iter()
            .all(|f| self.index(*f).is_some())
    }
}
