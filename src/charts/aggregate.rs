use anyhow::Result;
use polars::prelude::*;

use crate::models::{BRAND, PRICE, RAM, RATING};

pub const UNKNOWN_CATEGORY: &str = "Unknown";
const AVG_PRICE: &str = "avg_price";
const COUNT: &str = "count";

/// One histogram bucket, `[lower, upper)` except the last which also includes `upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width buckets over the data range. A single distinct value gets a unit-wide range
/// centred on it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bucket> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bucket {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// The `n` most frequent values of a string column, most frequent first, ties alphabetical.
/// Nulls are dropped unless `missing_as` names a bucket to count them under.
pub fn top_categories(
    df: &DataFrame,
    column: &str,
    n: usize,
    missing_as: Option<&str>,
) -> Result<Vec<(String, usize)>> {
    let values = match missing_as {
        Some(bucket) => df
            .clone()
            .lazy()
            .select([col(column).fill_null(lit(bucket))]),
        None => df
            .clone()
            .lazy()
            .select([col(column)])
            .filter(col(column).is_not_null()),
    };

    let counts = values
        .group_by([col(column)])
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .sort_by_exprs(
            [col(COUNT), col(column)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(n as IdxSize)
        .collect()?;

    let categories = counts.column(column)?.str()?;
    let totals = counts.column(COUNT)?.u64()?;
    Ok(categories
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(category, count)| Some((category?.to_string(), count? as usize)))
        .collect())
}

pub fn non_missing(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    Ok(df.column(column)?.f64()?.into_iter().flatten().collect())
}

pub fn prices(df: &DataFrame) -> Result<Vec<f64>> {
    non_missing(df, PRICE)
}

pub fn ratings(df: &DataFrame) -> Result<Vec<f64>> {
    non_missing(df, RATING)
}

pub fn brand_share(df: &DataFrame, n: usize) -> Result<Vec<(String, usize)>> {
    top_categories(df, BRAND, n, None)
}

/// RAM share with missing capacities counted together as "Unknown".
pub fn ram_share(df: &DataFrame, n: usize) -> Result<Vec<(String, usize)>> {
    top_categories(df, RAM, n, Some(UNKNOWN_CATEGORY))
}

/// Mean price per brand, ascending, limited to the `n` highest. Brands with no priced row
/// are left out.
pub fn average_price_by_brand(df: &DataFrame, n: usize) -> Result<Vec<(String, f64)>> {
    let averages = df
        .clone()
        .lazy()
        .filter(col(BRAND).is_not_null())
        .group_by([col(BRAND)])
        .agg([col(PRICE).mean().alias(AVG_PRICE)])
        .filter(col(AVG_PRICE).is_not_null())
        .sort_by_exprs([col(AVG_PRICE)], SortMultipleOptions::default())
        .tail(n as IdxSize)
        .collect()?;

    let brands = averages.column(BRAND)?.str()?;
    let means = averages.column(AVG_PRICE)?.f64()?;
    Ok(brands
        .into_iter()
        .zip(means.into_iter())
        .filter_map(|(brand, mean)| Some((brand?.to_string(), mean?)))
        .collect())
}

/// (price, rating) pairs for rows that have both.
pub fn price_rating_points(df: &DataFrame) -> Result<Vec<(f64, f64)>> {
    let prices = df.column(PRICE)?.f64()?;
    let ratings = df.column(RATING)?.f64()?;
    Ok(prices
        .into_iter()
        .zip(ratings.into_iter())
        .filter_map(|(price, rating)| Some((price?, rating?)))
        .collect())
}
