pub mod catalog;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod filters;
pub mod stages;
