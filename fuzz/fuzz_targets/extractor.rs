#![no_main]

use libfuzzer_sys::fuzz_target;
use scraper::Html;

use anime_curator::catalog::DecodedFields;
use anime_curator::extractor::extract_document;
use anime_curator::filters::is_sequel;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Extraction never fails; every page yields some title
    let page = extract_document(&Html::parse_document(&html), Some("https://shikimori.one/animes/1"));
    assert!(!page.title.is_empty());

    let _ = DecodedFields::decode(&page.record.attributes);
    let _ = is_sequel(&page.title);
});
