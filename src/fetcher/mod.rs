pub mod collector;
pub mod page_source;

pub use collector::Collector;
pub use page_source::{HttpPageSource, PageResponse, PageSource};
