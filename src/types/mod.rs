pub mod analysis;
pub mod document;
pub mod project;
pub mod report;
pub mod submission;
