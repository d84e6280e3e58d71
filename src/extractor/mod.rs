pub mod cleaner;
pub mod info_block;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use cleaner::clean_text;
pub use model::{ExtractedPage, UNKNOWN_TITLE};

use scraper::Html;

use crate::catalog::AnimeRecord;
use crate::fetcher::types::PageResponse;

/// Turn one catalog page into a record. Never fails: every field has its own
/// fallback chain and a missing title becomes [`UNKNOWN_TITLE`].
pub fn extract_document(document: &Html, url: Option<&str>) -> ExtractedPage {
    // 1. Title, keyed into the database
    let title = reader::extract_title(document).unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    // 2. Information panel
    let attributes = info_block::extract_info_block(document);

    // 3. Score and description
    let rating = reader::extract_rating(document);
    let description = reader::extract_description(document);

    ExtractedPage {
        title,
        record: AnimeRecord {
            url: url.map(str::to_string),
            attributes,
            rating,
            description,
            ..AnimeRecord::default()
        },
    }
}

pub fn extract_page(resp: &PageResponse) -> ExtractedPage {
    let document = Html::parse_document(&resp.body_utf8);
    extract_document(&document, Some(resp.url_requested.as_str()))
}
