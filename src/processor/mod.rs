pub mod cleaner;
pub mod field_extractor;
pub mod listing_parser;

pub use cleaner::*;
pub use field_extractor::*;
pub use listing_parser::*;
