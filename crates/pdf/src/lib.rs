//! Deterministic layout and serialization of issued award/report documents.
//!
//! `award` defines the typed input aggregate, `layout` paginates it into
//! positioned text blocks, `metrics` supplies the font measurements used for
//! word wrap and centering, and `writer` turns the page sequence into a
//! self-contained PDF byte stream.

pub mod award;
pub mod layout;
pub mod metrics;
pub mod writer;

use award::AwardDocument;

/// Render an award aggregate straight to PDF bytes.
pub fn generate_award_pdf(award: &AwardDocument) -> Vec<u8> {
    writer::document_to_pdf(&layout::render_award(award))
}
