use anyhow::Result;
use polars::prelude::*;

use crate::models::{BRAND, PRICE, RATING};

/// Aggregates shown on the report's statistics page
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub rows: usize,
    pub columns: usize,
    pub unique_brands: usize,
    pub min_price: Option<f64>,
    pub median_price: Option<f64>,
    pub max_price: Option<f64>,
    pub ratings_available: usize,
}

impl SummaryStats {
    /// Compute from the cleaned table; missing prices and brands are ignored.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let prices = df.column(PRICE)?.f64()?;
        let ratings = df.column(RATING)?;
        let brands = df.column(BRAND)?.as_materialized_series().drop_nulls();

        Ok(Self {
            rows: df.height(),
            columns: df.width(),
            unique_brands: brands.n_unique()?,
            min_price: prices.min(),
            median_price: prices.median(),
            max_price: prices.max(),
            ratings_available: ratings.len() - ratings.null_count(),
        })
    }

    /// Report lines, in page order.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total products: {}", self.rows),
            format!("Unique Brands: {}", self.unique_brands),
            format!("Min Price: {}", format_number(self.min_price)),
            format!("Median Price: {}", format_number(self.median_price)),
            format!("Max Price: {}", format_number(self.max_price)),
            format!("Ratings Available: {}", self.ratings_available),
        ]
    }
}

/// Whole numbers print without decimals, missing values as "n/a".
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}
