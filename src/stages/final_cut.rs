use std::fmt;
use std::path::Path;
use tracing::{info, instrument};

use crate::catalog::{Database, load_database, write_json};
use crate::errors::StoreError;
use crate::filters::{FilterChain, FilterReport, TraitFilter};

#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport {
    pub filter: FilterReport,
}

impl FinalReport {
    /// Share of input records kept, in percent.
    pub fn kept_percent(&self) -> f64 {
        if self.filter.input == 0 {
            0.0
        } else {
            self.filter.survivors.len() as f64 * 100.0 / self.filter.input as f64
        }
    }
}

pub fn final_filter(database: Database, min_age: i64) -> FinalReport {
    FinalReport {
        filter: FilterChain::new()
            .with(TraitFilter::new(min_age))
            .apply(database),
    }
}

#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn run_final(input: &Path, output: &Path, min_age: i64) -> Result<FinalReport, StoreError> {
    let database = load_database(input)?;
    info!("Loaded {} annotated records", database.len());

    let report = final_filter(database, min_age);
    write_json(output, &report.filter.survivors)?;
    info!(
        "Kept {} of {} ({:.1}%), saved to {}",
        report.filter.survivors.len(),
        report.filter.input,
        report.kept_percent(),
        output.display()
    );
    Ok(report)
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)?;
        write!(f, "\n{:<32}{:.1}%", "kept", self.kept_percent())
    }
}
