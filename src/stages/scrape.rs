use chrono::Local;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::catalog::store::{self, ErrorLog, FailedLink, ScrapeMetadata, ScrapedDatabase};
use crate::catalog::{CatalogLink, Database};
use crate::errors::StoreError;
use crate::extractor::extract_page;
use crate::fetcher::fetch;

pub const DEFAULT_SOURCE: &str = "shikimori.one";

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub limit: Option<usize>,
    pub skip_first: usize,
    pub delay: Duration,
    /// Successful pages between snapshots; 0 disables them.
    pub checkpoint_interval: usize,
    pub source: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            limit: None,
            skip_first: 0,
            delay: Duration::from_secs(2),
            checkpoint_interval: 50,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub total_links: usize,
    pub attempted: usize,
    pub processed: usize,
    pub stored: usize,
    pub failures: Vec<FailedLink>,
    pub interrupted: bool,
    pub elapsed: Duration,
}

/// Download and parse every link, accumulating one database keyed by title.
///
/// A failed link is logged and recorded, never fatal. Cancelling the token
/// stops after the current page; whatever was collected is still written.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub async fn run_scrape(
    input: &Path,
    output: &Path,
    options: &ScrapeOptions,
    shutdown: CancellationToken,
) -> Result<ScrapeReport, StoreError> {
    let started = Instant::now();
    let links = store::load_links(input)?;
    let total_links = links.len();
    info!("Loaded {} links", total_links);

    let batch = select_batch(links, options.skip_first, options.limit);
    info!(
        "Scraping {} pages (skip_first: {}, limit: {:?}, delay: {:?}, checkpoint every {})",
        batch.len(),
        options.skip_first,
        options.limit,
        options.delay,
        options.checkpoint_interval
    );

    let mut database = Database::new();
    let mut failures = Vec::new();
    let mut processed = 0;
    let mut attempted = 0;
    let mut interrupted = false;

    for (idx, link) in batch.iter().enumerate() {
        if shutdown.is_cancelled() {
            interrupted = true;
            break;
        }
        attempted += 1;

        match scrape_link(link).await {
            Ok((title, record)) => {
                if database.insert(title.clone(), record).is_some() {
                    warn!(title = %title, "duplicate title, keeping the later page");
                }
                processed += 1;
                info!("[{}/{}] {}", idx + 1, batch.len(), title);

                if options.checkpoint_interval > 0 && processed % options.checkpoint_interval == 0 {
                    let path = store::sibling_path(output, &format!("checkpoint_{}", processed));
                    match store::write_json(&path, &database) {
                        Ok(()) => info!("Checkpoint saved: {}", path.display()),
                        Err(e) => warn!("Checkpoint failed: {}", e),
                    }
                }
            }
            Err(failure) => {
                warn!(
                    "[{}/{}] {} failed: {}",
                    idx + 1,
                    batch.len(),
                    failure.url.as_deref().unwrap_or("<no url>"),
                    failure.error
                );
                failures.push(failure);
            }
        }

        if idx + 1 < batch.len() && !options.delay.is_zero() {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    interrupted = true;
                    break;
                }
                _ = sleep(options.delay) => {}
            }
        }
    }

    if interrupted {
        warn!("Interrupted after {} pages, saving what was collected", attempted);
    }

    let metadata = ScrapeMetadata::new(
        database.len(),
        processed,
        failures.len(),
        options.source.clone(),
        Local::now(),
    );
    store::write_json(
        output,
        &ScrapedDatabase {
            metadata,
            anime: &database,
        },
    )?;
    info!("Database saved: {}", output.display());

    if !failures.is_empty() {
        let path = store::sibling_path(output, "errors");
        store::write_json(
            &path,
            &ErrorLog {
                errors: failures.clone(),
            },
        )?;
        info!("Error log saved: {}", path.display());
    }

    Ok(ScrapeReport {
        total_links,
        attempted,
        processed,
        stored: database.len(),
        failures,
        interrupted,
        elapsed: started.elapsed(),
    })
}

fn select_batch(links: Vec<CatalogLink>, skip_first: usize, limit: Option<usize>) -> Vec<CatalogLink> {
    links
        .into_iter()
        .skip(skip_first)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

async fn scrape_link(
    link: &CatalogLink,
) -> Result<(String, crate::catalog::AnimeRecord), FailedLink> {
    let failed = |error: String| FailedLink {
        url: link.url.clone(),
        id: link.id.clone(),
        error,
    };

    let url = link
        .url
        .as_deref()
        .ok_or_else(|| failed("link has no url".to_string()))?;

    let response = fetch(url).await.map_err(|e| {
        debug!(transient = e.is_transient(), "fetch error");
        failed(e.to_string())
    })?;
    debug!(
        status = %response.status,
        fetched_at = %response.fetched_at,
        final_url = %response.url_final,
        charset = ?response.charset,
        "page fetched"
    );

    Ok(extract_page(&response).into_entry())
}

impl std::fmt::Display for ScrapeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<24}{}", "links", self.total_links)?;
        writeln!(f, "{:<24}{}", "attempted", self.attempted)?;
        writeln!(f, "{:<24}{}", "processed", self.processed)?;
        writeln!(f, "{:<24}{}", "stored", self.stored)?;
        writeln!(f, "{:<24}{}", "errors", self.failures.len())?;
        if self.interrupted {
            writeln!(f, "{:<24}yes", "interrupted")?;
        }
        write!(f, "{:<24}{:.1}s", "elapsed", self.elapsed.as_secs_f64())?;
        if self.processed > 0 {
            write!(
                f,
                "\n{:<24}{:.1}s",
                "per page",
                self.elapsed.as_secs_f64() / self.processed as f64
            )?;
        }
        Ok(())
    }
}
