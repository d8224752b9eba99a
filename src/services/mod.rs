pub mod completion;
pub mod report;
