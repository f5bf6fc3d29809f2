use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Per-page extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
}

/// Text of a whole document, pages joined in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub pages: Vec<PageExtraction>,
    pub full_text: String,
    pub page_count: usize,
}

impl ExtractionResult {
    pub fn from_pages(pages: Vec<PageExtraction>) -> Self {
        let full_text = pages
            .iter()
            .map(|p| p.text.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        let page_count = pages.len();
        Self {
            pages,
            full_text,
            page_count,
        }
    }
}

/// PDF text extraction abstraction (allows mocking for tests)
pub trait PdfExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;

    /// Extract and join all pages.
    fn extract_document(&self, pdf_bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        Ok(ExtractionResult::from_pages(self.extract_text(pdf_bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_joins_pages_in_order() {
        let result = ExtractionResult::from_pages(vec![
            PageExtraction {
                page_number: 1,
                text: "Patient: Jane  \n".into(),
            },
            PageExtraction {
                page_number: 2,
                text: "HbA1c: 7.2".into(),
            },
        ]);
        assert_eq!(result.page_count, 2);
        assert_eq!(result.full_text, "Patient: Jane\nHbA1c: 7.2");
    }

    #[test]
    fn empty_document_has_empty_text() {
        let result = ExtractionResult::from_pages(vec![]);
        assert_eq!(result.page_count, 0);
        assert!(result.full_text.is_empty());
    }
}
