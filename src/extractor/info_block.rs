use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::catalog::AttributeTable;
use crate::extractor::cleaner::{clean_text, collect_text};

static CONTAINER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.c-about div.b-entry-info div.line-container").unwrap()
});
static LOOSE_CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.b-entry-info div.line-container").unwrap());
static LINE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.line").unwrap());
static KEY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".line, .name, .key").unwrap());
static VALUE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".value, .val").unwrap());

/// Read the "Информация" panel into label/value pairs.
///
/// Each `line-container` contributes one pair: its first `div.line` is the
/// label (trailing colon dropped) and the remaining lines form the value.
/// Containers without nested lines fall back to a key-ish and a value-ish
/// child. Pairs with an empty label are skipped.
pub fn extract_info_block(document: &Html) -> AttributeTable {
    let mut containers: Vec<ElementRef<'_>> = document.select(&CONTAINER_SELECTOR).collect();
    if containers.is_empty() {
        containers = document.select(&LOOSE_CONTAINER_SELECTOR).collect();
    }

    let mut table = AttributeTable::new();
    for container in containers {
        if let Some((key, value)) = read_container(container)
            && !key.is_empty()
        {
            table.insert(key, value);
        }
    }
    table
}

fn read_container(container: ElementRef<'_>) -> Option<(String, String)> {
    let lines: Vec<ElementRef<'_>> = container.select(&LINE_SELECTOR).collect();

    let Some((first, rest)) = lines.split_first() else {
        let name = container.select(&KEY_SELECTOR).next()?;
        let value = container.select(&VALUE_SELECTOR).next()?;
        return Some((label_text(name), collect_text(value)));
    };

    let value = rest
        .iter()
        .map(|line| collect_text(*line))
        .collect::<Vec<_>>()
        .join(" ");
    Some((label_text(*first), clean_text(&value)))
}

fn label_text(element: ElementRef<'_>) -> String {
    let text = collect_text(element);
    clean_text(text.trim_end_matches(':'))
}
