use chrono::Utc;
use reqwest::StatusCode;
use scraper::Html;
use std::fs;
use url::Url;

use crate::catalog::DecodedFields;
use crate::extractor::{UNKNOWN_TITLE, extract_document, extract_page};
use crate::fetcher::types::{Charset, PageResponse};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_catalog_page() {
    let response = create_test_response(fixture("anime_page.html"), "https://shikimori.one/animes/2167-clannad");
    let page = extract_page(&response);

    assert_eq!(page.title, "Кланнад / Clannad");
    assert_eq!(
        page.record.url.as_deref(),
        Some("https://shikimori.one/animes/2167-clannad")
    );
    assert_eq!(page.record.rating.as_deref(), Some("8.03"));
    assert_eq!(
        page.record.description.as_deref(),
        Some("Томоя Окадзаки считает школу скучной. Однажды он встречает странную девушку Нагису.")
    );

    let keys: Vec<_> = page.record.attributes.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![
            "Тип: TV Сериал",
            "Эпизоды: 23",
            "Статус: вышло в 2007 г.",
            "Жанры: Драма Романтика Повседневность",
            "Тема: Школа",
            "Рейтинг: PG-13",
        ]
    );
}

#[test]
fn test_catalog_page_decodes() {
    let document = Html::parse_document(&fixture("anime_page.html"));
    let page = extract_document(&document, None);
    let fields = DecodedFields::decode(&page.record.attributes);

    assert!(fields.is_tv_series());
    assert_eq!(fields.episode_count.as_deref(), Some("23"));
    assert_eq!(fields.genres.as_deref(), Some("Драма Романтика Повседневность"));
    assert_eq!(fields.genre, None);
    assert_eq!(fields.theme.as_deref(), Some("Школа"));
    assert_eq!(fields.age_rating.as_deref(), Some("PG-13"));
    assert_eq!(page.record.url, None);
}

#[test]
fn test_meta_only_page_uses_fallbacks() {
    let document = Html::parse_document(&fixture("meta_only.html"));
    let page = extract_document(&document, Some("https://shikimori.one/animes/572"));

    // No heading: the name meta wins over <title>
    assert_eq!(page.title, "Навсикая из Долины ветров");
    // No ratingValue meta: score scraped from the about block, comma normalized
    assert_eq!(page.record.rating.as_deref(), Some("8.35"));
    assert_eq!(
        page.record.description.as_deref(),
        Some("Спустя тысячу лет после гибели цивилизации.")
    );
    assert_eq!(page.record.attributes.get("Тип"), Some("Фильм"));
}

#[test]
fn test_title_tag_is_last_resort() {
    let html = "<html><head><title>Моя девушка / My Girl / Аниме</title></head><body></body></html>";
    let page = extract_document(&Html::parse_document(html), None);
    assert_eq!(page.title, "Моя девушка");
}

#[test]
fn test_empty_page_yields_unknown_title() {
    let document = Html::parse_document(&fixture("empty.html"));
    let page = extract_document(&document, Some("https://shikimori.one/animes/0"));

    assert_eq!(page.title, UNKNOWN_TITLE);
    assert!(page.record.attributes.is_empty());
    assert_eq!(page.record.rating, None);
    assert_eq!(page.record.description, None);
}

#[test]
fn test_malformed_html() {
    let html = r#"<html><head><title>Сломано / Broken</title><body><div class="c-about">Оценка 7.1<div>"#;
    let page = extract_document(&Html::parse_document(html), None);

    assert_eq!(page.title, "Сломано");
    assert_eq!(page.record.rating.as_deref(), Some("7.1"));
}

fn create_test_response(html: String, url: &str) -> PageResponse {
    PageResponse {
        url_requested: Url::parse(url).unwrap(),
        url_final: Url::parse(url).unwrap(),
        status: StatusCode::OK,
        body_utf8: html,
        charset: Charset::Utf8,
        fetched_at: Utc::now(),
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/[a-z0-9]*"
        ) {
            let response = create_test_response(html, &url);
            let page = extract_page(&response);
            prop_assert!(!page.title.is_empty());
        }

        #[test]
        fn test_extracted_text_is_normalized(
            html in ".*",
        ) {
            let page = extract_document(&Html::parse_document(&html), None);
            if let Some(description) = page.record.description {
                prop_assert_eq!(description.trim(), description.as_str());
                prop_assert!(!description.contains("  "));
            }
            for (key, value) in page.record.attributes.iter() {
                prop_assert!(!key.is_empty());
                prop_assert_eq!(value.trim(), value);
            }
        }
    }
}
