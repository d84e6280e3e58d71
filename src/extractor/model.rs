use crate::catalog::AnimeRecord;

/// Placeholder used when no title source on the page yields text.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A parsed page: the record plus the title it will be stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub title: String,
    pub record: AnimeRecord,
}

impl ExtractedPage {
    pub fn into_entry(self) -> (String, AnimeRecord) {
        (self.title, self.record)
    }
}
