use tracing::info;

use crate::models::{CleanedRecord, CleanedTable, Record};
use crate::processor::field_extractor::{extract_brand, extract_price, extract_ram, extract_rating};

/// Derive price, rating, brand and RAM for one listing. Misses become `None`.
pub fn clean_record(record: &Record) -> CleanedRecord {
    CleanedRecord {
        title: record.title.clone(),
        price: extract_price(&record.raw_price),
        rating: extract_rating(&record.raw_rating),
        specs: record.specs.clone(),
        brand: extract_brand(&record.title),
        ram: extract_ram(&record.title),
    }
}

/// Same rows, same order, with derived columns.
pub fn clean(table: &[Record]) -> CleanedTable {
    let cleaned: CleanedTable = table.iter().map(clean_record).collect();

    let priced = cleaned.iter().filter(|r| r.price.is_some()).count();
    let rated = cleaned.iter().filter(|r| r.rating.is_some()).count();
    let with_ram = cleaned.iter().filter(|r| r.ram.is_some()).count();
    info!(
        "Cleaned {} rows: {} priced, {} rated, {} with RAM",
        cleaned.len(),
        priced,
        rated,
        with_ram
    );

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, price: &str, rating: &str) -> Record {
        Record {
            title: title.to_string(),
            raw_price: price.to_string(),
            raw_rating: rating.to_string(),
            specs: String::new(),
        }
    }

    #[test]
    fn test_clean_derives_all_fields() {
        let cleaned = clean_record(&record(
            "Samsung Galaxy M14 5G (6 GB RAM, 128 GB)",
            "₹13,490",
            "4.1 out of 5 stars",
        ));

        assert_eq!(cleaned.title, "Samsung Galaxy M14 5G (6 GB RAM, 128 GB)");
        assert_eq!(cleaned.price, Some(13490.0));
        assert_eq!(cleaned.rating, Some(4.1));
        assert_eq!(cleaned.brand.as_deref(), Some("Samsung"));
        assert_eq!(cleaned.ram.as_deref(), Some("6GB"));
    }

    #[test]
    fn test_clean_preserves_row_count_and_order() {
        let table = vec![
            record("Redmi 13C 4GB", "", ""),
            record("", "9,999", "3.8 out of 5 stars"),
            record("Redmi 13C 4GB", "", ""),
        ];

        let cleaned = clean(&table);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[0].brand.as_deref(), Some("Redmi"));
        assert_eq!(cleaned[0].price, None);
        assert_eq!(cleaned[1].brand, None);
        assert_eq!(cleaned[1].ram, None);
        assert_eq!(cleaned[1].price, Some(9999.0));
        assert_eq!(cleaned[0], cleaned[2]);
    }

    #[test]
    fn test_clean_is_deterministic() {
        let table = vec![record("Apple iPhone 13 (128GB)", "52,999", "4.6 out of 5 stars")];
        assert_eq!(clean(&table), clean(&table));
    }
}
