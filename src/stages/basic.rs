use std::path::Path;
use tracing::{info, instrument};

use crate::catalog::{AttributeTable, Database, DecodedFields, load_database, write_json};
use crate::errors::StoreError;
use crate::filters::{
    AgeRatingFilter, DescriptionFilter, FilterChain, FilterReport, ScoreFilter, SequelFilter,
    TvSeriesFilter,
};

/// TV series, description, sequel, age rating, score; in that order.
pub fn basic_chain(min_score: f64) -> FilterChain {
    FilterChain::new()
        .with(TvSeriesFilter)
        .with(DescriptionFilter)
        .with(SequelFilter)
        .with(AgeRatingFilter::default())
        .with(ScoreFilter::new(min_score))
}

/// Decode the attribute tables, run the basic chain and reduce every
/// survivor to its simplified form: no source URL, no raw attribute table.
pub fn basic_filter(mut database: Database, min_score: f64) -> FilterReport {
    for record in database.values_mut() {
        DecodedFields::decode(&record.attributes).apply_to(record);
    }

    let mut report = basic_chain(min_score).apply(database);
    for record in report.survivors.values_mut() {
        record.url = None;
        record.attributes = AttributeTable::new();
    }
    report
}

#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn run_basic(input: &Path, output: &Path, min_score: f64) -> Result<FilterReport, StoreError> {
    let database = load_database(input)?;
    info!("Loaded {} records, minimum score {}", database.len(), min_score);

    let report = basic_filter(database, min_score);
    write_json(output, &report.survivors)?;
    info!(
        "Kept {} of {} records, saved to {}",
        report.survivors.len(),
        report.input,
        output.display()
    );
    Ok(report)
}
