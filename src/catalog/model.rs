use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::classifier::{Answer, Classification, HeroGender};

/// Whole-dataset mapping from title to record. A later insert under the same
/// title replaces the earlier record.
pub type Database = BTreeMap<String, AnimeRecord>;

/// Label -> text pairs scraped from a page's information panel, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    entries: Vec<(String, String)>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. A repeated key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl Serialize for AttributeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = AttributeTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute labels to text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = AttributeTable::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    if let Some(text) = scalar_text(value) {
                        table.insert(key, text);
                    }
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// One anime as it moves through the pipeline. The title is the database key
/// and is not repeated inside the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeRecord {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        default,
        rename = "info",
        alias = "attributes",
        skip_serializing_if = "AttributeTable::is_empty"
    )]
    pub attributes: AttributeTable,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,

    #[serde(
        default,
        rename = "type",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub episode_count: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub genres: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub themes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub age_rating: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub hero_gender: Option<HeroGender>,
    #[serde(
        default,
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub violence: Option<Answer>,
    #[serde(
        default,
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub mystical: Option<Answer>,
    #[serde(
        default,
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub romance_focus: Option<Answer>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub approximate_age: Option<String>,
}

impl AnimeRecord {
    /// Genre text matched by the genre filters: singular then plural, space-joined.
    pub fn genre_text(&self) -> String {
        join_pair(self.genre.as_deref(), self.genres.as_deref())
    }

    /// Theme text matched by the theme filters: singular then plural, space-joined.
    pub fn theme_text(&self) -> String {
        join_pair(self.theme.as_deref(), self.themes.as_deref())
    }

    pub fn annotate(&mut self, classification: Classification) {
        self.hero_gender = Some(classification.hero_gender);
        self.violence = Some(classification.violence);
        self.mystical = Some(classification.mystical);
        self.romance_focus = Some(classification.romance_focus);
        self.approximate_age = Some(classification.approximate_age);
    }

    /// The AI tags, when all of them are present.
    pub fn classification(&self) -> Option<Classification> {
        Some(Classification {
            hero_gender: self.hero_gender?,
            violence: self.violence?,
            mystical: self.mystical?,
            romance_focus: self.romance_focus?,
            approximate_age: self.approximate_age.clone()?,
        })
    }
}

/// Text field as stored, or a number rendered as text. Any other JSON
/// type reads as absent so one odd record cannot stop a stage.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Known tag value, or absent for anything else.
fn lenient_tag<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn join_pair(singular: Option<&str>, plural: Option<&str>) -> String {
    format!("{} {}", singular.unwrap_or(""), plural.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_table_keeps_document_order() {
        let raw = r#"{"Тип": "TV Сериал", "Эпизоды": "12", "Жанры": "Комедия"}"#;
        let table: AttributeTable = serde_json::from_str(raw).unwrap();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Тип", "Эпизоды", "Жанры"]);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"Тип":"TV Сериал","Эпизоды":"12","Жанры":"Комедия"}"#
        );
    }

    #[test]
    fn test_attribute_table_duplicate_key_replaces_in_place() {
        let mut table = AttributeTable::new();
        table.insert("Тип", "Фильм");
        table.insert("Эпизоды", "1");
        table.insert("Тип", "TV Сериал");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Тип"), Some("TV Сериал"));
        assert_eq!(table.iter().next(), Some(("Тип", "TV Сериал")));
    }

    #[test]
    fn test_record_reads_scraped_shape() {
        let value = json!({
            "url": "https://shikimori.one/animes/5680-k-on",
            "info": {"Тип: TV Сериал": ""},
            "rating": "8.2",
            "description": null
        });
        let record: AnimeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.attributes.get("Тип: TV Сериал"), Some(""));
        assert_eq!(record.rating.as_deref(), Some("8.2"));
        assert!(record.description.is_none());
        assert!(record.classification().is_none());
    }

    #[test]
    fn test_record_omits_absent_derived_fields() {
        let record = AnimeRecord {
            description: Some("Текст".to_string()),
            genres: Some("Романтика".to_string()),
            ..AnimeRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"rating": null, "description": "Текст", "genres": "Романтика"})
        );
    }

    #[test]
    fn test_genre_text_concatenates_singular_and_plural() {
        let record = AnimeRecord {
            genre: Some("Драма".to_string()),
            genres: Some("Романтика Комедия".to_string()),
            ..AnimeRecord::default()
        };
        assert_eq!(record.genre_text(), "Драма Романтика Комедия");
        assert_eq!(record.theme_text(), " ");
    }

    #[test]
    fn test_numbers_read_as_text() {
        let record: AnimeRecord = serde_json::from_value(json!({
            "info": {"Эпизоды:": 12, "Тип:": "TV Сериал", "Пусто:": null},
            "rating": 7.5,
            "approximateAge": 20
        }))
        .unwrap();
        assert_eq!(record.rating.as_deref(), Some("7.5"));
        assert_eq!(record.approximate_age.as_deref(), Some("20"));
        assert_eq!(record.attributes.get("Эпизоды:"), Some("12"));
        assert_eq!(record.attributes.len(), 2);
    }

    #[test]
    fn test_unknown_tags_read_as_absent() {
        let record: AnimeRecord = serde_json::from_value(json!({
            "heroGender": "Female",
            "violence": true,
            "mystical": "нет",
            "description": ["list"]
        }))
        .unwrap();
        assert_eq!(record.hero_gender, None);
        assert_eq!(record.violence, None);
        assert_eq!(record.mystical, Some(Answer::No));
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_annotate_round_trips_classification() {
        let mut record = AnimeRecord::default();
        record.annotate(Classification::fallback());
        assert_eq!(record.classification(), Some(Classification::fallback()));
    }
}
