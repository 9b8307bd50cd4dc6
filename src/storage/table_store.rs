use anyhow::{Context, Result, anyhow};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::models::{
    BRAND, CleanedRecord, PRICE, PRODUCT_NAME, RAM, RATING, RAW_COLUMNS, Record, SPECS,
};

/// Raw listings as an all-string frame with the four scrape columns.
pub fn records_to_frame(records: &[Record]) -> Result<DataFrame> {
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    let prices: Vec<&str> = records.iter().map(|r| r.raw_price.as_str()).collect();
    let ratings: Vec<&str> = records.iter().map(|r| r.raw_rating.as_str()).collect();
    let specs: Vec<&str> = records.iter().map(|r| r.specs.as_str()).collect();

    let columns: Vec<Column> = vec![
        Series::new(PRODUCT_NAME.into(), titles).into(),
        Series::new(PRICE.into(), prices).into(),
        Series::new(RATING.into(), ratings).into(),
        Series::new(SPECS.into(), specs).into(),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Cleaned listings with numeric Price / Rating and nullable Brand / RAM.
pub fn cleaned_to_frame(records: &[CleanedRecord]) -> Result<DataFrame> {
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    let prices: Vec<Option<f64>> = records.iter().map(|r| r.price).collect();
    let ratings: Vec<Option<f64>> = records.iter().map(|r| r.rating).collect();
    let specs: Vec<&str> = records.iter().map(|r| r.specs.as_str()).collect();
    let brands: Vec<Option<&str>> = records.iter().map(|r| r.brand.as_deref()).collect();
    let rams: Vec<Option<&str>> = records.iter().map(|r| r.ram.as_deref()).collect();

    let columns: Vec<Column> = vec![
        Series::new(PRODUCT_NAME.into(), titles).into(),
        Series::new(PRICE.into(), prices).into(),
        Series::new(RATING.into(), ratings).into(),
        Series::new(SPECS.into(), specs).into(),
        Series::new(BRAND.into(), brands).into(),
        Series::new(RAM.into(), rams).into(),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Rebuild raw records from a frame. Null cells come back as empty strings.
pub fn frame_to_records(df: &DataFrame) -> Result<Vec<Record>> {
    for name in RAW_COLUMNS {
        if df.column(name).is_err() {
            return Err(anyhow!("Table is missing required column '{}'", name));
        }
    }

    let text = |name: &str| -> Result<Vec<String>> {
        let column = df.column(name)?.cast(&DataType::String)?;
        Ok(column
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    };

    let titles = text(PRODUCT_NAME)?;
    let prices = text(PRICE)?;
    let ratings = text(RATING)?;
    let specs = text(SPECS)?;

    Ok(titles
        .into_iter()
        .zip(prices)
        .zip(ratings)
        .zip(specs)
        .map(|(((title, raw_price), raw_rating), specs)| Record {
            title,
            raw_price,
            raw_rating,
            specs,
        })
        .collect())
}

pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create table file {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write table to {}", path.display()))?;

    info!("Saved {} records to {}", df.height(), path.display());
    Ok(())
}

/// Read a table with every column as a string.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open table file {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse table file {}", path.display()))?;

    info!("Loaded {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

pub fn save_records(records: &[Record], path: impl AsRef<Path>) -> Result<()> {
    let mut df = records_to_frame(records)?;
    write_csv(&mut df, path)
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    frame_to_records(&read_csv(path)?)
}

pub fn save_cleaned(records: &[CleanedRecord], path: impl AsRef<Path>) -> Result<()> {
    let mut df = cleaned_to_frame(records)?;
    write_csv(&mut df, path)
}

/// Read a cleaned table back with Price and Rating as Float64; empty cells are null.
pub fn load_cleaned(path: impl AsRef<Path>) -> Result<DataFrame> {
    let mut df = read_csv(path)?;
    for name in [PRICE, RATING] {
        let numeric = df
            .column(name)
            .with_context(|| format!("Cleaned table is missing column '{}'", name))?
            .cast(&DataType::Float64)?;
        df.with_column(numeric)?;
    }
    Ok(df)
}
