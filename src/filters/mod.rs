//! Rule filter chain.
//!
//! Every filter is a pure predicate over one record. The chain applies them in
//! order to a whole database; a rejected record is counted once, against the
//! first filter it fails, and is never seen by later filters.

pub mod basic;
pub mod genre;
pub mod sequel;
pub mod traits;

pub use basic::{AgeRatingFilter, DescriptionFilter, ScoreFilter, SequelFilter, TvSeriesFilter};
pub use genre::{ExcludedGenres, ExcludedThemes, GenreRules, RequiredGenres, RequiredThemes};
pub use sequel::is_sequel;
pub use traits::{TraitFilter, min_age};

use std::fmt;
use tracing::debug;

use crate::catalog::{AnimeRecord, Database};

pub trait RecordFilter: Send + Sync {
    /// Short identifier used for the rejection counter.
    fn name(&self) -> &'static str;

    fn accepts(&self, title: &str, record: &AnimeRecord) -> bool;
}

#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn RecordFilter>>,
}

/// Rejections attributed to one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCount {
    pub name: &'static str,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    pub input: usize,
    pub stages: Vec<StageCount>,
    pub survivors: Database,
}

impl FilterChain {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn with<F: RecordFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn apply(&self, database: Database) -> FilterReport {
        let input = database.len();
        let mut counts = vec![0usize; self.filters.len()];
        let mut survivors = Database::new();

        for (title, record) in database {
            match self
                .filters
                .iter()
                .position(|filter| !filter.accepts(&title, &record))
            {
                Some(index) => {
                    debug!(title = %title, filter = self.filters[index].name(), "rejected");
                    counts[index] += 1;
                }
                None => {
                    survivors.insert(title, record);
                }
            }
        }

        let stages = self
            .filters
            .iter()
            .zip(counts)
            .map(|(filter, rejected)| StageCount {
                name: filter.name(),
                rejected,
            })
            .collect();

        FilterReport {
            input,
            stages,
            survivors,
        }
    }
}

impl FilterReport {
    pub fn rejected_total(&self) -> usize {
        self.stages.iter().map(|s| s.rejected).sum()
    }

    pub fn rejected_by(&self, name: &str) -> usize {
        self.stages
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.rejected)
            .sum()
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<32}{}", "input", self.input)?;
        for stage in &self.stages {
            writeln!(f, "{:<32}{}", format!("rejected: {}", stage.name), stage.rejected)?;
        }
        write!(f, "{:<32}{}", "survivors", self.survivors.len())
    }
}
