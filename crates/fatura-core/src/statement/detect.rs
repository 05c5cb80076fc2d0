//! Statement layout detection from first-page text.

use tracing::debug;

use crate::models::statement::Layout;

use super::rules::patterns::{SICOOB_BANNER, SICOOB_DOCUMENT_TITLE};

const NUBANK_MARKERS: [&str; 2] = ["NU PAGAMENTOS", "RESUMO DA FATURA ATUAL"];

/// Identify the statement layout. Ambiguous text defaults to Nubank.
pub fn detect_layout(first_page: &str) -> Layout {
    let upper = first_page.to_uppercase();

    let layout = if upper.contains(SICOOB_BANNER) && upper.contains(SICOOB_DOCUMENT_TITLE) {
        Layout::Sicoob
    } else if NUBANK_MARKERS.iter().any(|m| upper.contains(m)) {
        Layout::Nubank
    } else {
        debug!("No layout markers on first page, assuming Nubank");
        Layout::Nubank
    };

    debug!("Detected layout: {}", layout);
    layout
}
