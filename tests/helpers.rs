use anime_curator::classifier::{Answer, Classification, ClassifyError, Classifier, HeroGender};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A minimal catalog page with the sections the extractor reads.
pub fn catalog_page(title: &str, kind: &str, genres: &str, score: &str, description: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{title} / Аниме</title></head>
<body>
  <header class="head"><h1>{title}</h1></header>
  <div class="c-about"><div class="b-entry-info">
    <div class="line-container"><div class="line"><div class="key">Тип:</div><div class="value">{kind}</div></div></div>
    <div class="line-container"><div class="line"><div class="key">Жанры:</div><div class="value">{genres}</div></div></div>
    <div class="line-container"><div class="line"><div class="key">Рейтинг:</div><div class="value">PG-13</div></div></div>
  </div>
  <meta itemprop="ratingValue" content="{score}"></div>
  <div class="c-description"><div class="description-current">{description}</div></div>
</body></html>"#
    )
}

pub fn write_file(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
}

pub fn read_value(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

pub fn adult_romance() -> Classification {
    Classification {
        hero_gender: HeroGender::Female,
        violence: Answer::No,
        mystical: Answer::No,
        romance_focus: Answer::Yes,
        approximate_age: "20-25".to_string(),
    }
}

/// Answers every call with the same tags, or fails every call.
pub struct StubClassifier {
    answer: Option<Classification>,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub fn answering(answer: Classification) -> Self {
        Self {
            answer: Some(answer),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<Classification, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().ok_or(ClassifyError::EmptyResponse)
    }
}
