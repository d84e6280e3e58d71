use crate::catalog::AnimeRecord;
use crate::catalog::fields::TV_SERIES_MARKER;
use crate::extractor::clean_text;
use crate::filters::{RecordFilter, sequel::is_sequel};

/// Description placeholders that count as "no description".
const NO_DESCRIPTION: &[&str] = &["нет описания", "no description"];

pub const DEFAULT_MIN_SCORE: f64 = 6.0;
pub const CHILD_SAFE_RATING: &str = "G";

/// Keeps records whose decoded type is a TV series.
pub struct TvSeriesFilter;

impl RecordFilter for TvSeriesFilter {
    fn name(&self) -> &'static str {
        "not_tv"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        record
            .kind
            .as_deref()
            .is_some_and(|kind| kind.contains(TV_SERIES_MARKER))
    }
}

pub struct DescriptionFilter;

impl RecordFilter for DescriptionFilter {
    fn name(&self) -> &'static str {
        "no_description"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        has_description(record.description.as_deref())
    }
}

pub fn has_description(description: Option<&str>) -> bool {
    let Some(text) = description.map(clean_text) else {
        return false;
    };
    if text.is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    !NO_DESCRIPTION.contains(&lowered.as_str())
}

pub struct SequelFilter;

impl RecordFilter for SequelFilter {
    fn name(&self) -> &'static str {
        "sequel"
    }

    fn accepts(&self, title: &str, _record: &AnimeRecord) -> bool {
        !is_sequel(title)
    }
}

/// Rejects records whose age rating is exactly the configured label.
pub struct AgeRatingFilter {
    rejected_label: String,
}

impl AgeRatingFilter {
    pub fn new(rejected_label: impl Into<String>) -> Self {
        Self {
            rejected_label: rejected_label.into(),
        }
    }
}

impl Default for AgeRatingFilter {
    fn default() -> Self {
        Self::new(CHILD_SAFE_RATING)
    }
}

impl RecordFilter for AgeRatingFilter {
    fn name(&self) -> &'static str {
        "rating_g"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        record.age_rating.as_deref() != Some(self.rejected_label.as_str())
    }
}

/// Rejects records whose score is missing, unparseable or below the minimum.
pub struct ScoreFilter {
    min_score: f64,
}

impl ScoreFilter {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }
}

impl Default for ScoreFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCORE)
    }
}

impl RecordFilter for ScoreFilter {
    fn name(&self) -> &'static str {
        "low_score"
    }

    fn accepts(&self, _title: &str, record: &AnimeRecord) -> bool {
        parse_score(record.rating.as_deref()).is_some_and(|score| score >= self.min_score)
    }
}

pub fn parse_score(rating: Option<&str>) -> Option<f64> {
    rating?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}
