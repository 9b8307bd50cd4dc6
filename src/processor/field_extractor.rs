use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").expect("valid digits regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+)").expect("valid decimal regex"));
static MEMORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\s?GB)").expect("valid memory regex"));

/// Price in rupees: grouping commas are dropped and the first run of digits is taken, so a
/// fractional part after a decimal point is discarded.
pub fn extract_price(raw: &str) -> Option<f64> {
    let ungrouped = raw.replace(',', "");
    let digits = DIGITS.captures(&ungrouped)?.get(1)?;
    digits.as_str().parse::<f64>().ok()
}

/// First `d.d` number in the text, e.g. "4.3 out of 5 stars" gives 4.3.
pub fn extract_rating(raw: &str) -> Option<f64> {
    let number = DECIMAL.captures(raw)?.get(1)?;
    number.as_str().parse::<f64>().ok()
}

/// First whitespace-delimited token of the title.
pub fn extract_brand(title: &str) -> Option<String> {
    title.split_whitespace().next().map(str::to_string)
}

/// First `<digits>GB` in the title with an optional space before the unit, returned without
/// whitespace. First match wins when several capacities are mentioned.
pub fn extract_ram(title: &str) -> Option<String> {
    let capacity = MEMORY.captures(title)?.get(1)?;
    Some(capacity.as_str().split_whitespace().collect())
}
