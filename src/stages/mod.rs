//! Batch drivers, one per pipeline stage.
//!
//! Each stage reads the previous stage's JSON file, does its work and writes
//! its own output file, so any stage can be re-run on its own.

pub mod annotate;
pub mod basic;
pub mod final_cut;
pub mod genres;
pub mod scrape;

pub use annotate::{AnnotateOptions, AnnotateReport, run_annotate};
pub use basic::{basic_chain, basic_filter, run_basic};
pub use final_cut::{FinalReport, final_filter, run_final};
pub use genres::run_genres;
pub use scrape::{ScrapeOptions, ScrapeReport, run_scrape};
