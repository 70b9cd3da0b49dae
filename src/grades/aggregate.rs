//! Per-course running means keyed case-insensitively by campus, subject
//! and course.

use std::collections::HashMap;

use crate::grades::types::{CourseAggregate, SectionRecord};

const KEY_SEPARATOR: char = '|';

/// Case-insensitive grouping key for a course offering.
pub fn course_key(campus: &str, subject: &str, course: &str) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
        campus.to_uppercase(),
        subject.to_uppercase(),
        course.to_uppercase()
    )
}

/// Per-course running means, kept in the order each course was first seen.
#[derive(Debug, Default)]
pub struct CourseAverages {
    entries: Vec<CourseAggregate>,
    positions: HashMap<String, usize>,
}

impl CourseAverages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into its course group.
    ///
    /// Returns `false` and leaves the store untouched unless campus, subject,
    /// course and average are all present. Section, session and year play no
    /// part here.
    pub fn add(&mut self, record: &SectionRecord) -> bool {
        let (Some(campus), Some(subject), Some(course), Some(average)) = (
            record.campus.as_deref(),
            record.subject.as_deref(),
            record.course.as_deref(),
            record.average,
        ) else {
            return false;
        };

        let key = course_key(campus, subject, course);
        let idx = match self.positions.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push(CourseAggregate::new(campus, subject, course));
                self.positions.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        self.entries[idx].add(average);
        true
    }

    #[cfg(test)]
    pub fn get(&self, campus: &str, subject: &str, course: &str) -> Option<&CourseAggregate> {
        self.positions
            .get(&course_key(campus, subject, course))
            .map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseAggregate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Groups every eligible record by (campus, subject, course).
pub fn aggregate_courses(records: &[SectionRecord]) -> CourseAverages {
    let mut averages = CourseAverages::new();
    for record in records {
        averages.add(record);
    }
    averages
}
