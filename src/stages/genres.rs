use std::path::Path;
use tracing::{info, instrument};

use crate::catalog::{load_database, write_json};
use crate::errors::StoreError;
use crate::filters::{FilterReport, GenreRules};

#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn run_genres(
    input: &Path,
    output: &Path,
    rules: &GenreRules,
) -> Result<FilterReport, StoreError> {
    let database = load_database(input)?;
    info!("Loaded {} records", database.len());

    let report = rules.chain().apply(database);
    write_json(output, &report.survivors)?;
    info!(
        "Kept {} of {} records, saved to {}",
        report.survivors.len(),
        report.input,
        output.display()
    );
    Ok(report)
}
