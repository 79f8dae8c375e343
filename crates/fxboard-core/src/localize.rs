//! Narrows fetched page text to the region holding the rate table.

use crate::fetch::FetchedPage;
use crate::relay::ContentShape;

/// Table openers, most specific first.
pub const TABLE_MARKERS: &[&str] = &[
    "<table title=\"牌告匯率\"",
    "<table title=\"Exchange Rate\"",
    "<table",
];

pub fn localize_page(page: &FetchedPage) -> &str {
    localize(&page.text, page.shape)
}

/// Returns `text` from the first table marker onward.
///
/// Condensed relay output and text without any marker come back whole.
pub fn localize(text: &str, shape: ContentShape) -> &str {
    if shape == ContentShape::Condensed {
        return text;
    }

    TABLE_MARKERS
        .iter()
        .find_map(|marker| text.find(marker))
        .map_or(text, |start| &text[start..])
}
