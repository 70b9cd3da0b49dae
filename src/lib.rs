pub mod grades;
pub mod import;
pub mod output;
pub mod scan;
