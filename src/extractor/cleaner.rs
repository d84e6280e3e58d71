use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Canonical text form used by every extractor: non-breaking spaces become
/// plain spaces, the ends are trimmed and inner whitespace runs collapse to a
/// single space.
pub fn clean_text(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    WHITESPACE_REGEX
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// Text of an element with each text node trimmed and the non-empty pieces
/// joined by one space, then cleaned.
pub fn collect_text(element: ElementRef<'_>) -> String {
    let joined = element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    clean_text(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Hello    world  \n\n\n  Test  "), "Hello world Test");
    }

    #[test]
    fn test_clean_text_replaces_nbsp() {
        assert_eq!(clean_text("12\u{a0}эп.\u{a0}\u{a0}по 24 мин."), "12 эп. по 24 мин.");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \t\n\u{a0} "), "");
    }

    #[test]
    fn test_clean_text_idempotent() {
        let samples = [
            "  Тип:\u{a0}TV Сериал ",
            "already clean",
            "\u{a0}\u{a0}",
            "a\r\nb\tc",
            "Кэйон! / K-On!",
        ];
        for sample in samples {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_collect_text_joins_nodes() {
        let html = Html::parse_fragment("<div><span> Кэйон! </span><span>K-On!</span>\n</div>");
        let selector = Selector::parse("div").unwrap();
        let div = html.select(&selector).next().unwrap();
        assert_eq!(collect_text(div), "Кэйон! K-On!");
    }

    #[cfg(feature = "fuzz")]
    mod fuzz {
        use super::super::clean_text;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clean_text_is_idempotent(text in "\\PC*") {
                let once = clean_text(&text);
                prop_assert_eq!(clean_text(&once), once);
            }

            #[test]
            fn clean_text_has_no_double_spaces(text in "[ a-zа-я\\t\\n\u{a0}]*") {
                let cleaned = clean_text(&text);
                prop_assert!(!cleaned.contains("  "));
                prop_assert!(!cleaned.contains('\u{a0}'));
            }
        }
    }
}
