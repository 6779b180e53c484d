use crate::extraction::TextExtractor;
use crate::invoice::InvoiceExtractor;
use crate::resume::ResumeExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every extractor is configuration only, so cloning per request is cheap and
/// nothing is shared mutably between calls.
#[derive(Clone)]
pub struct AppState {
    pub text: TextExtractor,
    pub invoices: InvoiceExtractor,
    pub resumes: ResumeExtractor,
}

impl AppState {
    /// Wires the domain extractors around one generic extractor.
    pub fn new(text: TextExtractor) -> Self {
        Self {
            invoices: InvoiceExtractor::new(text.clone()),
            resumes: ResumeExtractor::new(text.clone()),
            text,
        }
    }
}
