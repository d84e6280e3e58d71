//! Heuristic sequel detection over catalog titles.
//!
//! Titles look like `"Russian title / Romanized title"`. Numbering and season
//! markers are looked for in the Russian half only, and only when the title
//! has that bilingual form. Continuation keywords are looked for anywhere.

use regex::Regex;
use std::sync::LazyLock;

static SEQUEL_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s+\d+\s*$",      // "Гинтама 4"
        r"(?i)\s+\d+\s*:",      // "Блич 2: ..."
        r"(?i)\s+[IVX]+\s*$",   // "Гинтама III"
        r"(?i)второй\s+сезон",
        r"(?i)третий\s+сезон",
        r"(?i)2\s+сезон",
        r"(?i)3\s+сезон",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static CONTINUATION_KEYWORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"продолжение",
        r"финал",
        r"часть\s+\d+",
        r"final season",
        r"2nd season",
        r"3rd season",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

pub fn is_sequel(title: &str) -> bool {
    if let Some((russian, _)) = title.split_once('/')
        && has_sequel_marker(russian.trim())
    {
        return true;
    }

    has_continuation_keyword(title)
}

/// Numbering or season markers in a single-language title.
pub fn has_sequel_marker(title: &str) -> bool {
    SEQUEL_MARKERS.iter().any(|re| re.is_match(title))
}

pub fn has_continuation_keyword(title: &str) -> bool {
    let lowered = title.to_lowercase();
    CONTINUATION_KEYWORDS.iter().any(|re| re.is_match(&lowered))
}
