//! Genre and theme inclusion/exclusion.
//!
//! Matching is plain case-sensitive substring search over the space-joined
//! singular and plural text, so a label that contains another label as a
//! substring matches it too.

use crate::catalog::AnimeRecord;
use crate::filters::{FilterChain, RecordFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRules {
    pub required_genres: Vec<String>,
    pub required_themes: Vec<String>,
    pub excluded_genres: Vec<String>,
    pub excluded_themes: Vec<String>,
}

impl Default for GenreRules {
    fn default() -> Self {
        Self {
            required_genres: labels(&["Романтика"]),
            required_themes: Vec::new(),
            excluded_genres: labels(&["Сверхъестественное", "Sci-Fi Фантастика", "Фэнтези"]),
            excluded_themes: labels(&["Школа", "Махо-сёдзё"]),
        }
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl GenreRules {
    /// The four filters in evaluation order: required genres, required
    /// themes, excluded genres, excluded themes.
    pub fn chain(&self) -> FilterChain {
        FilterChain::new()
            .with(RequiredGenres(self.required_genres.clone()))
            .with(RequiredThemes(self.required_themes.clone()))
            .with(ExcludedGenres(self.excluded_genres.clone()))
            .with(ExcludedThemes(self.excluded_themes.clone()))
    }
}

fn any_present(labels: &[String], text: &str) -> bool {
    labels.iter().any(|label| text.contains(label.as_str()))
}

/// At least one label must be present; an empty list accepts everything.
pub struct RequiredGenres(pub Vec<String>);

impl RecordFilter for RequiredGenres {
    fn name(&self) -> &'static str {
        "required_genres"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        self.0.is_empty() || any_present(&self.0, &record.genre_text())
    }
}

pub struct RequiredThemes(pub Vec<String>);

impl RecordFilter for RequiredThemes {
    fn name(&self) -> &'static str {
        "required_themes"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        self.0.is_empty() || any_present(&self.0, &record.theme_text())
    }
}

/// No label may be present.
pub struct ExcludedGenres(pub Vec<String>);

impl RecordFilter for ExcludedGenres {
    fn name(&self) -> &'static str {
        "excluded_genres"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        !any_present(&self.0, &record.genre_text())
    }
}

pub struct ExcludedThemes(pub Vec<String>);

impl RecordFilter for ExcludedThemes {
    fn name(&self) -> &'static str {
        "excluded_themes"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        !any_present(&self.0, &record.theme_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Database;

    fn tagged(genre: Option<&str>, genres: Option<&str>, themes: Option<&str>) -> AnimeRecord {
        AnimeRecord {
            genre: genre.map(str::to_string),
            genres: genres.map(str::to_string),
            themes: themes.map(str::to_string),
            ..AnimeRecord::default()
        }
    }

    #[test]
    fn test_required_genre_found_in_singular_field() {
        let filter = RequiredGenres(labels(&["Романтика"]));
        assert!(filter.accepts("t", &tagged(Some("Романтика"), None, None)));
        assert!(filter.accepts("t", &tagged(None, Some("Драма Романтика"), None)));
        assert!(!filter.accepts("t", &tagged(Some("Драма"), Some("Комедия"), None)));
    }

    #[test]
    fn test_empty_required_list_accepts() {
        assert!(RequiredThemes(Vec::new()).accepts("t", &AnimeRecord::default()));
        assert!(RequiredGenres(Vec::new()).accepts("t", &AnimeRecord::default()));
    }

    #[test]
    fn test_excluded_label_is_exact_substring() {
        let filter = ExcludedGenres(labels(&["Sci-Fi Фантастика"]));
        assert!(!filter.accepts("t", &tagged(None, Some("Экшен Sci-Fi Фантастика"), None)));
        // Separate fields do not form the label across the join
        assert!(filter.accepts("t", &tagged(Some("Фантастика"), Some("Sci-Fi"), None)));
        assert!(filter.accepts("t", &tagged(None, Some("sci-fi фантастика"), None)));
    }

    #[test]
    fn test_label_matches_inside_longer_label() {
        let filter = ExcludedThemes(labels(&["Школа"]));
        assert!(!filter.accepts("t", &tagged(None, None, Some("Старшая Школа"))));
    }

    #[test]
    fn test_default_rules_chain() {
        let mut db = Database::new();
        db.insert("keep".into(), tagged(None, Some("Драма Романтика"), Some("Работа")));
        db.insert("no_romance".into(), tagged(None, Some("Драма"), None));
        db.insert("fantasy".into(), tagged(None, Some("Романтика Фэнтези"), None));
        db.insert("school".into(), tagged(Some("Романтика"), None, Some("Школа")));

        let report = GenreRules::default().chain().apply(db);
        assert_eq!(report.survivors.keys().collect::<Vec<_>>(), vec!["keep"]);
        assert_eq!(report.rejected_by("required_genres"), 1);
        assert_eq!(report.rejected_by("required_themes"), 0);
        assert_eq!(report.rejected_by("excluded_genres"), 1);
        assert_eq!(report.rejected_by("excluded_themes"), 1);
    }
}
