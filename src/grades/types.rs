//! Data types shared by the extraction and aggregation stages.

/// One data row pulled out of a grades CSV.
///
/// Absent or unparseable values are `None`, except `year`, where 0 stands for
/// a missing or non-numeric value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionRecord {
    pub campus: Option<String>,
    pub subject: Option<String>,
    pub course: Option<String>,
    pub section: Option<String>,
    pub session: Option<String>,
    pub year: i32,
    pub average: Option<f64>,
}

impl SectionRecord {
    /// True when every field is present and the year parsed.
    pub fn is_complete(&self) -> bool {
        self.campus.is_some()
            && self.subject.is_some()
            && self.course.is_some()
            && self.section.is_some()
            && self.session.is_some()
            && self.year != 0
            && self.average.is_some()
    }
}

/// Running mean for one (campus, subject, course) group.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseAggregate {
    pub campus: String,
    pub subject: String,
    pub course: String,
    pub(crate) sum: f64,
    pub(crate) n: usize,
}

impl CourseAggregate {
    pub fn new(campus: &str, subject: &str, course: &str) -> Self {
        CourseAggregate {
            campus: campus.to_string(),
            subject: subject.to_string(),
            course: course.to_string(),
            sum: 0.0,
            n: 0,
        }
    }

    pub fn add(&mut self, average: f64) {
        self.sum += average;
        self.n += 1;
    }

    pub fn samples(&self) -> usize {
        self.n
    }

    /// Arithmetic mean of the added averages. Returns 0.0 when nothing was added.
    pub fn mean(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }
}
