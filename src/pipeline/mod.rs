pub mod extraction;
pub mod summarize;
pub mod processor;
