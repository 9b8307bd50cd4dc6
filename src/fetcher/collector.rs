use anyhow::{Context, Result, anyhow};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::fetcher::page_source::PageSource;
use crate::models::Table;
use crate::processor::ListingSelectors;

/// Walks search-result pages 1..=max_pages for one query
pub struct Collector<S> {
    source: S,
    selectors: ListingSelectors,
    base_url: String,
}

impl<S: PageSource> Collector<S> {
    pub fn new(source: S, selectors: ListingSelectors, base_url: impl Into<String>) -> Self {
        Self {
            source,
            selectors,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(source: S, config: &ScrapeConfig) -> Result<Self> {
        let selectors = ListingSelectors::from_config(&config.selectors)?;
        Ok(Self::new(source, selectors, config.site.base_url.clone()))
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Search URL for one page, e.g. `https://www.amazon.in/s?k=phone+under+30k&page=2`
    pub fn page_url(&self, query: &str, page: u32) -> Result<Url> {
        Url::parse_with_params(&self.base_url, &[("k", query), ("page", &page.to_string())])
            .with_context(|| format!("Invalid search base URL: {}", self.base_url))
    }

    /// Fetch every page in order and accumulate the listings. A non-success page is logged
    /// and skipped; transport errors abort the run.
    pub async fn collect(&self, query: &str, max_pages: u32, delay_range: (f64, f64)) -> Result<Table> {
        let mut table = Table::new();

        for page in 1..=max_pages {
            if page > 1 {
                let delay = random_delay(delay_range)?;
                info!("Waiting {:.2}s before next request", delay.as_secs_f64());
                sleep(delay).await;
            }

            let url = self.page_url(query, page)?;
            info!("Scraping page {} of {}: {}", page, max_pages, url);

            let response = self.source.fetch(url.as_str()).await?;
            if !response.is_success() {
                warn!("❌ Request failed: HTTP {} for {}", response.status, url);
                continue;
            }

            let records = self.selectors.parse_page(&response.body);
            info!("✅ Page {} yielded {} listings", page, records.len());
            table.extend(records);
        }

        info!("Collected {} listings from {} pages", table.len(), max_pages);
        Ok(table)
    }
}

/// Uniform draw from `[min, max]` seconds. Bounds that are not a valid duration are an error.
fn random_delay((min, max): (f64, f64)) -> Result<Duration> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(anyhow!("Delay bounds must be finite, got ({}, {})", min, max));
    }
    let secs = if max > min {
        rand::thread_rng().gen_range(min..=max)
    } else {
        min
    };
    Duration::try_from_secs_f64(secs.max(0.0))
        .with_context(|| format!("Delay of {} seconds is out of range", secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::page_source::PageResponse;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages keyed by page number and records every URL requested.
    #[derive(Default)]
    struct RecordedSource {
        pages: HashMap<u32, PageResponse>,
        requested: RefCell<Vec<String>>,
    }

    impl RecordedSource {
        fn with_page(mut self, page: u32, status: u16, body: &str) -> Self {
            self.pages.insert(
                page,
                PageResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }
    }

    impl PageSource for RecordedSource {
        async fn fetch(&self, url: &str) -> Result<PageResponse> {
            self.requested.borrow_mut().push(url.to_string());
            let parsed = Url::parse(url)?;
            let page: u32 = parsed
                .query_pairs()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);
            Ok(self.pages.get(&page).cloned().unwrap_or(PageResponse {
                status: 404,
                body: String::new(),
            }))
        }
    }

    fn listing(title: &str) -> String {
        format!(
            r#"<div data-component-type="s-search-result"><h2>{}</h2><span class="a-price-whole">9,999</span></div>"#,
            title
        )
    }

    fn collector(source: RecordedSource) -> Collector<RecordedSource> {
        Collector::new(source, ListingSelectors::default(), "https://www.amazon.in/s")
    }

    #[tokio::test]
    async fn test_zero_pages_issues_no_requests() {
        let collector = collector(RecordedSource::default());
        let table = collector.collect("phone under 30k", 0, (0.0, 0.0)).await.unwrap();

        assert!(table.is_empty());
        assert!(collector.source().requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped() {
        let page_one = format!("<html><body>{}{}</body></html>", listing("Redmi A3"), listing("Poco C65"));
        let page_three = format!("<html><body>{}</body></html>", listing("Redmi A3"));
        let source = RecordedSource::default()
            .with_page(1, 200, &page_one)
            .with_page(2, 503, "Service Unavailable")
            .with_page(3, 200, &page_three);

        let collector = collector(source);
        let table = collector.collect("phone under 30k", 3, (0.0, 0.0)).await.unwrap();

        let titles: Vec<_> = table.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Redmi A3", "Poco C65", "Redmi A3"]);
        assert_eq!(table[0].raw_price, "9,999");
        assert_eq!(collector.source().requested.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_page_contributes_nothing() {
        let source = RecordedSource::default().with_page(1, 200, "<html><body></body></html>");
        let collector = collector(source);
        let table = collector.collect("phone", 1, (0.0, 0.0)).await.unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_page_url_encodes_query() {
        let collector = collector(RecordedSource::default());
        let url = collector.page_url("phone under 30k", 2).unwrap();
        assert_eq!(url.as_str(), "https://www.amazon.in/s?k=phone+under+30k&page=2");
    }

    #[test]
    fn test_random_delay_stays_in_range() {
        for _ in 0..50 {
            let delay = random_delay((0.01, 0.02)).unwrap().as_secs_f64();
            assert!((0.0099..=0.0201).contains(&delay));
        }
        assert_eq!(random_delay((0.0, 0.0)).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_random_delay_rejects_unrepresentable_bounds() {
        assert!(random_delay((1e20, 1e20)).is_err());
        assert!(random_delay((1.0, f64::INFINITY)).is_err());
    }

    #[tokio::test]
    async fn test_oversized_delay_fails_instead_of_panicking() {
        let page = format!("<html><body>{}</body></html>", listing("Redmi A3"));
        let source = RecordedSource::default().with_page(1, 200, &page);
        let collector = collector(source);

        let result = collector.collect("phone", 2, (1e20, 1e20)).await;
        assert!(result.is_err());
        assert_eq!(collector.source().requested.borrow().len(), 1);
    }
}
