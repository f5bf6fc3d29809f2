pub mod types;
pub mod pdf;
pub mod hba1c;

pub use types::*;
pub use pdf::*;
pub use hba1c::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Not a PDF document")]
    NotPdf,
}
