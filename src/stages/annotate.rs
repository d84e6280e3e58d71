use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::catalog::{Database, load_database, write_json};
use crate::classifier::{Classification, Classifier};
use crate::errors::StoreError;

#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    pub delay: Duration,
    /// Records between two rewrites of the output file; 0 writes only at the end.
    pub checkpoint_interval: usize,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            checkpoint_interval: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateReport {
    pub total: usize,
    pub classified: usize,
    /// Records that received the fallback tags after a classifier failure.
    pub defaulted: usize,
}

/// Tag every record in place. A failed call never drops the record: it gets
/// [`Classification::fallback`] and the run continues.
pub async fn annotate_database(
    database: &mut Database,
    classifier: &dyn Classifier,
    options: &AnnotateOptions,
    mut on_checkpoint: impl FnMut(&Database),
) -> AnnotateReport {
    let titles: Vec<String> = database.keys().cloned().collect();
    let total = titles.len();
    let mut report = AnnotateReport {
        total,
        ..AnnotateReport::default()
    };

    for (idx, title) in titles.iter().enumerate() {
        let Some(record) = database.get_mut(title) else {
            continue;
        };
        let description = record.description.as_deref().unwrap_or("");

        let classification = match classifier.classify(title, description).await {
            Ok(classification) => {
                report.classified += 1;
                classification
            }
            Err(e) => {
                warn!(title = %title, "classification failed, using fallback tags: {}", e);
                report.defaulted += 1;
                Classification::fallback()
            }
        };
        info!(
            "[{}/{}] {}: {}, violence {}, mystical {}, romance {}, age {}",
            idx + 1,
            total,
            title,
            classification.hero_gender,
            classification.violence,
            classification.mystical,
            classification.romance_focus,
            classification.approximate_age
        );
        record.annotate(classification);

        if options.checkpoint_interval > 0 && (idx + 1) % options.checkpoint_interval == 0 {
            on_checkpoint(database);
        }

        if idx + 1 < total && !options.delay.is_zero() {
            sleep(options.delay).await;
        }
    }

    report
}

#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub async fn run_annotate(
    input: &Path,
    output: &Path,
    classifier: &dyn Classifier,
    options: &AnnotateOptions,
) -> Result<AnnotateReport, StoreError> {
    let mut database = load_database(input)?;
    info!("Loaded {} records", database.len());

    let report = annotate_database(&mut database, classifier, options, |partial| {
        match write_json(output, partial) {
            Ok(()) => info!("Progress saved: {}", output.display()),
            Err(e) => warn!("Progress save failed: {}", e),
        }
    })
    .await;

    write_json(output, &database)?;
    info!("Annotated database saved: {}", output.display());
    Ok(report)
}

impl fmt::Display for AnnotateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<24}{}", "records", self.total)?;
        writeln!(f, "{:<24}{}", "classified", self.classified)?;
        write!(f, "{:<24}{}", "fallback", self.defaulted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AnimeRecord;
    use crate::classifier::{Answer, ClassifyError, HeroGender, MockClassifier};
    use mockall::predicate::eq;

    fn described(text: Option<&str>) -> AnimeRecord {
        AnimeRecord {
            description: text.map(str::to_string),
            ..AnimeRecord::default()
        }
    }

    fn adult_romance() -> Classification {
        Classification {
            hero_gender: HeroGender::Female,
            violence: Answer::No,
            mystical: Answer::No,
            romance_focus: Answer::Yes,
            approximate_age: "20-25".to_string(),
        }
    }

    fn no_pause(checkpoint_interval: usize) -> AnnotateOptions {
        AnnotateOptions {
            delay: Duration::ZERO,
            checkpoint_interval,
        }
    }

    #[tokio::test]
    async fn test_every_record_is_annotated() {
        let mut db = Database::new();
        db.insert("A".into(), described(Some("офисный роман")));
        db.insert("B".into(), described(None));

        let mut mock = MockClassifier::new();
        mock.expect_classify()
            .with(eq("A"), eq("офисный роман"))
            .times(1)
            .returning(|_, _| Ok(adult_romance()));
        mock.expect_classify()
            .with(eq("B"), eq(""))
            .times(1)
            .returning(|_, _| Ok(adult_romance()));

        let report = annotate_database(&mut db, &mock, &no_pause(0), |_| {}).await;
        assert_eq!(report.classified, 2);
        assert_eq!(report.defaulted, 0);
        assert_eq!(db["A"].classification(), Some(adult_romance()));
        assert_eq!(db["B"].approximate_age.as_deref(), Some("20-25"));
    }

    #[tokio::test]
    async fn test_failure_keeps_record_with_fallback() {
        let mut db = Database::new();
        db.insert("A".into(), described(Some("текст")));

        let mut mock = MockClassifier::new();
        mock.expect_classify()
            .returning(|_, _| Err(ClassifyError::EmptyResponse));

        let report = annotate_database(&mut db, &mock, &no_pause(0), |_| {}).await;
        assert_eq!(report.defaulted, 1);
        assert_eq!(db.len(), 1);
        assert_eq!(db["A"].classification(), Some(Classification::fallback()));
    }

    #[tokio::test]
    async fn test_checkpoint_callback_interval() {
        let mut db = Database::new();
        for title in ["A", "B", "C", "D", "E"] {
            db.insert(title.into(), described(Some("текст")));
        }

        let mut mock = MockClassifier::new();
        mock.expect_classify().returning(|_, _| Ok(adult_romance()));

        let mut snapshots = Vec::new();
        annotate_database(&mut db, &mock, &no_pause(2), |partial| {
            snapshots.push(partial.values().filter(|r| r.hero_gender.is_some()).count())
        })
        .await;
        assert_eq!(snapshots, vec![2, 4]);
    }
}
