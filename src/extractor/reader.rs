use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::extractor::cleaner::{clean_text, collect_text};

static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("header.head h1, header .head h1, header h1").unwrap());
static NAME_META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[itemprop="name"], meta[itemprop="headline"]"#).unwrap()
});
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static RATING_META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[itemprop="ratingValue"]"#).unwrap());
static ABOUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.c-about").unwrap());
static ROOT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("html").unwrap());
static DESCRIPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.c-description div.description-current").unwrap());
static DESCRIPTION_META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[itemprop="description"], [itemprop="description"]"#).unwrap()
});

static SCORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}[.,]\d{1,2})\b").unwrap());

const TITLE_QUOTES: &[char] = &[' ', '"', '\''];

pub fn extract_title(document: &Html) -> Option<String> {
    // Heading first; it often wraps the two names in quoted spans
    if let Some(heading) = document.select(&HEADING_SELECTOR).next() {
        let title = collect_text(heading);
        let title = title.trim_matches(TITLE_QUOTES);
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    for element in document.select(&NAME_META_SELECTOR) {
        if let Some(content) = element.value().attr("content") {
            let title = clean_text(content);
            if !title.is_empty() {
                return Some(title);
            }
        }
    }

    // "Title / Site" in <title>
    if let Some(element) = document.select(&TITLE_SELECTOR).next() {
        let raw = element.text().collect::<String>();
        let head = raw.split(" / ").next().unwrap_or_default();
        let title = clean_text(head);
        if !title.is_empty() {
            return Some(title);
        }
    }

    None
}

pub fn extract_rating(document: &Html) -> Option<String> {
    if let Some(element) = document.select(&RATING_META_SELECTOR).next()
        && let Some(content) = element.value().attr("content")
    {
        let rating = clean_text(content);
        if !rating.is_empty() {
            return Some(rating);
        }
    }

    let text = document
        .select(&ABOUT_SELECTOR)
        .next()
        .or_else(|| document.select(&ROOT_SELECTOR).next())
        .map(collect_text)
        .unwrap_or_default();

    SCORE_REGEX
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|score| score.as_str().replace(',', "."))
}

pub fn extract_description(document: &Html) -> Option<String> {
    if let Some(node) = document.select(&DESCRIPTION_SELECTOR).next() {
        let description = collect_text(node);
        if !description.is_empty() {
            return Some(description);
        }
    }

    if let Some(node) = document.select(&DESCRIPTION_META_SELECTOR).next() {
        let mut description = collect_text(node);
        if description.is_empty()
            && let Some(content) = node.value().attr("content")
        {
            description = clean_text(content);
        }
        if !description.is_empty() {
            return Some(description);
        }
    }

    None
}
