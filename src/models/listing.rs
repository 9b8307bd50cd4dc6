use serde::{Deserialize, Serialize};

/// Column headers shared by the raw and cleaned tables.
pub const PRODUCT_NAME: &str = "Product Name";
pub const PRICE: &str = "Price (INR)";
pub const RATING: &str = "Rating";
pub const SPECS: &str = "Specs / Description";
pub const BRAND: &str = "Brand";
pub const RAM: &str = "RAM";

pub const RAW_COLUMNS: [&str; 4] = [PRODUCT_NAME, PRICE, RATING, SPECS];
pub const CLEANED_COLUMNS: [&str; 6] = [PRODUCT_NAME, PRICE, RATING, SPECS, BRAND, RAM];

/// One search-result listing as scraped. Absent sub-elements are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub raw_price: String,
    pub raw_rating: String,
    pub specs: String,
}

/// A listing after field derivation. `None` marks a value the extractor could not find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub title: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub specs: String,
    pub brand: Option<String>,
    pub ram: Option<String>,
}

/// Rows in scrape order; duplicates across pages are kept.
pub type Table = Vec<Record>;
pub type CleanedTable = Vec<CleanedRecord>;
