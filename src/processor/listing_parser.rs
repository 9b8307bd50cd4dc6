use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::SelectorConfig;
use crate::models::Record;

/// Compiled selectors for one search-results layout
pub struct ListingSelectors {
    listing: Selector,
    title: Selector,
    price_whole: Selector,
    price_fraction: Selector,
    rating: Selector,
    specs: Selector,
}

impl ListingSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            listing: parse_selector(&config.listing)?,
            title: parse_selector(&config.title)?,
            price_whole: parse_selector(&config.price_whole)?,
            price_fraction: parse_selector(&config.price_fraction)?,
            rating: parse_selector(&config.rating)?,
            specs: parse_selector(&config.specs)?,
        })
    }

    /// Extract every listing on the page. A page without listings yields an empty vector.
    pub fn parse_page(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        let records: Vec<Record> = document
            .select(&self.listing)
            .map(|item| self.parse_listing(item))
            .collect();

        info!("Extracted {} listings from page", records.len());
        records
    }

    fn parse_listing(&self, item: ElementRef) -> Record {
        let title = first_text(item, &self.title).unwrap_or_default();

        // Fraction only counts when the whole part exists.
        let raw_price = match first_text(item, &self.price_whole) {
            Some(mut whole) => {
                if let Some(fraction) = first_text(item, &self.price_fraction) {
                    whole.push_str(&fraction);
                }
                whole
            }
            None => String::new(),
        };

        let raw_rating = first_text(item, &self.rating).unwrap_or_default();
        let specs = first_text(item, &self.specs)
            .map(|text| text.replace('\n', " | "))
            .unwrap_or_default();

        debug!("Parsed listing: {} | {} | {}", title, raw_price, raw_rating);

        Record {
            title,
            raw_price,
            raw_rating,
            specs,
        }
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default()).expect("default selectors are valid")
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))
}

/// Trimmed text of the first matching descendant.
fn first_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
}
