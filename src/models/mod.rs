pub mod reading;
pub mod report;

pub use reading::*;
pub use report::*;
