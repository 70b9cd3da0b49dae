//! Grade record extraction and per-course aggregation.
//!
//! Each CSV's header is matched against field synonyms, accepted files are
//! turned into section records, and the records are folded into per-course
//! running means.

pub mod aggregate;
pub mod extract;
pub mod header;
pub mod types;
