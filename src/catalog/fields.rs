//! Decoding of the raw attribute table into named fields.
//!
//! Labels are matched by case-sensitive prefix on the rendered `label: value`
//! line, so both shapes the catalog produces decode the same way: a bare
//! label with its value (`"Тип" -> "TV Сериал"`) and a whole line stored as
//! the key with an empty value (`"Тип: TV Сериал" -> ""`).

use crate::catalog::model::{AnimeRecord, AttributeTable};

pub const TYPE_LABEL: &str = "Тип:";
pub const EPISODES_LABEL: &str = "Эпизоды:";
pub const GENRES_LABEL: &str = "Жанры:";
pub const GENRE_LABEL: &str = "Жанр:";
pub const AGE_RATING_LABEL: &str = "Рейтинг:";
pub const THEMES_LABEL: &str = "Темы:";
pub const THEME_LABEL: &str = "Тема:";

/// Substring the type value must contain for the record to count as a TV series.
pub const TV_SERIES_MARKER: &str = "TV Сериал";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFields {
    pub kind: Option<String>,
    pub episode_count: Option<String>,
    pub genre: Option<String>,
    pub genres: Option<String>,
    pub theme: Option<String>,
    pub themes: Option<String>,
    pub age_rating: Option<String>,
}

impl DecodedFields {
    pub fn decode(table: &AttributeTable) -> Self {
        let mut fields = Self::default();

        for (key, value) in table.iter() {
            let line = render_line(key, value);

            let slot = if let Some(rest) = line.strip_prefix(TYPE_LABEL) {
                Some((&mut fields.kind, rest))
            } else if let Some(rest) = line.strip_prefix(EPISODES_LABEL) {
                Some((&mut fields.episode_count, rest))
            } else if let Some(rest) = line.strip_prefix(GENRES_LABEL) {
                Some((&mut fields.genres, rest))
            } else if let Some(rest) = line.strip_prefix(GENRE_LABEL) {
                Some((&mut fields.genre, rest))
            } else if let Some(rest) = line.strip_prefix(AGE_RATING_LABEL) {
                Some((&mut fields.age_rating, rest))
            } else if let Some(rest) = line.strip_prefix(THEMES_LABEL) {
                Some((&mut fields.themes, rest))
            } else if let Some(rest) = line.strip_prefix(THEME_LABEL) {
                Some((&mut fields.theme, rest))
            } else {
                None
            };

            if let Some((field, rest)) = slot {
                let rest = rest.trim();
                if !rest.is_empty() {
                    *field = Some(rest.to_string());
                }
            }
        }

        fields
    }

    pub fn is_tv_series(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.contains(TV_SERIES_MARKER))
    }

    pub fn genre_text(&self) -> String {
        format!(
            "{} {}",
            self.genre.as_deref().unwrap_or(""),
            self.genres.as_deref().unwrap_or("")
        )
    }

    pub fn theme_text(&self) -> String {
        format!(
            "{} {}",
            self.theme.as_deref().unwrap_or(""),
            self.themes.as_deref().unwrap_or("")
        )
    }

    pub fn apply_to(self, record: &mut AnimeRecord) {
        record.kind = self.kind;
        record.episode_count = self.episode_count;
        record.genre = self.genre;
        record.genres = self.genres;
        record.theme = self.theme;
        record.themes = self.themes;
        record.age_rating = self.age_rating;
    }
}

fn render_line(key: &str, value: &str) -> String {
    if key.contains(':') {
        if value.is_empty() {
            key.to_string()
        } else {
            format!("{} {}", key, value)
        }
    } else {
        format!("{}: {}", key, value)
    }
}
