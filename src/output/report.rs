//! Run report generation
//!
//! This module collects what happened during an ingest run and prints it to
//! stdout once the run is over.

use crate::crawler::SitemapFailure;
use crate::storage::PersistSummary;
use std::fmt;

/// Which pipeline produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Sitemap resolution + direct fetch
    Sitemap,
    /// External crawling service
    CrawlService,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sitemap => write!(f, "sitemap"),
            Self::CrawlService => write!(f, "crawl service"),
        }
    }
}

/// A page that was not extracted
#[derive(Debug, Clone)]
pub struct SkippedPage {
    pub url: String,
    pub reason: String,
}

/// Summary of one ingest run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub pipeline: Pipeline,

    /// Sitemap URL or crawl root
    pub target: String,

    /// URLs listed by the sitemap, or pages returned by the crawl service
    pub urls_discovered: usize,

    /// Pages a fetch was attempted for (sitemap pipeline only)
    pub pages_attempted: usize,

    /// Pages turned into rows
    pub pages_extracted: usize,

    pub skipped_pages: Vec<SkippedPage>,

    /// Nested sitemaps that contributed nothing
    pub sitemap_failures: Vec<SitemapFailure>,

    pub persist: PersistSummary,

    /// Credits reported by the crawl service
    pub credits_used: Option<u64>,

    /// Why the run stopped before persisting anything
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn new(pipeline: Pipeline, target: &str) -> Self {
        Self {
            pipeline,
            target: target.to_string(),
            urls_discovered: 0,
            pages_attempted: 0,
            pages_extracted: 0,
            skipped_pages: Vec::new(),
            sitemap_failures: Vec::new(),
            persist: PersistSummary::default(),
            credits_used: None,
            aborted: None,
        }
    }

    /// Number of rows the store accepted
    pub fn rows_inserted(&self) -> usize {
        self.persist.inserted
    }

    /// Pages the run set out to save
    ///
    /// For the sitemap pipeline this is the pages actually fetched, which is
    /// smaller than the discovered URLs when the page cap applies.
    pub fn pages_targeted(&self) -> usize {
        match self.pipeline {
            Pipeline::Sitemap => self.pages_attempted,
            Pipeline::CrawlService => self.urls_discovered,
        }
    }

    /// Percentage of targeted pages that were saved
    pub fn success_rate(&self) -> f64 {
        let targeted = self.pages_targeted();
        if targeted == 0 {
            return 0.0;
        }
        (self.rows_inserted() as f64 / targeted as f64) * 100.0
    }

    /// True when every discovered page made it into the store
    pub fn is_clean(&self) -> bool {
        self.aborted.is_none()
            && self.skipped_pages.is_empty()
            && self.sitemap_failures.is_empty()
            && self.persist.failures.is_empty()
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!();
    println!("=== Ingest Report ({}) ===\n", report.pipeline);

    println!("Target: {}", report.target);
    if let Some(reason) = &report.aborted {
        println!("Stopped early: {}", reason);
    }
    println!();

    println!("Overview:");
    println!("  URLs discovered: {}", report.urls_discovered);
    if report.pipeline == Pipeline::Sitemap {
        println!("  Pages attempted: {}", report.pages_attempted);
    }
    println!("  Pages extracted: {}", report.pages_extracted);
    println!(
        "  Rows saved: {}/{}",
        report.persist.inserted, report.persist.attempted
    );
    if let Some(credits) = report.credits_used {
        println!("  Credits used: {}", credits);
    }
    println!();

    if !report.sitemap_failures.is_empty() {
        println!("Nested Sitemaps Skipped ({}):", report.sitemap_failures.len());
        for failure in &report.sitemap_failures {
            println!("  - {}: {}", failure.url, failure.reason);
        }
        println!();
    }

    if !report.skipped_pages.is_empty() {
        println!("Pages Skipped ({}):", report.skipped_pages.len());
        for page in &report.skipped_pages {
            println!("  - {}: {}", page.url, page.reason);
        }
        println!();
    }

    if !report.persist.failures.is_empty() {
        println!("Insert Failures ({}):", report.persist.failures.len());
        for failure in &report.persist.failures {
            println!("  - {}: {}", failure.label, failure.error);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages saved)",
        report.success_rate(),
        report.rows_inserted(),
        report.pages_targeted()
    );
}
