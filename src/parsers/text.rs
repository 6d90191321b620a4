use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PRICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d[\d,]*(?:\.\d+)?|\.\d+").expect("static regex is valid")
});

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Numeric value of a displayed price
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericPrice {
    Integer(i64),
    Float(f64),
}

impl NumericPrice {
    pub fn as_f64(&self) -> f64 {
        match *self {
            NumericPrice::Integer(value) => value as f64,
            NumericPrice::Float(value) => value,
        }
    }
}

impl fmt::Display for NumericPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericPrice::Integer(value) => write!(f, "{value}"),
            NumericPrice::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Reads a price out of display text such as `"AED 1,234.50"`.
///
/// The text must hold exactly one number; thousands separators are dropped
/// and a point followed by digits is the decimal point, so `"Rs. 999"` is
/// `999` and `"AED .50"` is `0.5`. Text with no number or with several
/// (e.g. a struck-through and a sale price) is left alone.
pub fn coerce_price(text: &str) -> Option<NumericPrice> {
    let mut tokens = PRICE_TOKEN.find_iter(text);
    let token = tokens.next()?;
    if tokens.next().is_some() {
        ::log::debug!("Not coercing price with several numbers: {:?}", text);
        return None;
    }

    let numeric = token.as_str().replace(',', "");
    if numeric.contains('.') {
        format!("0{numeric}").parse::<f64>().ok().map(NumericPrice::Float)
    } else {
        numeric.parse::<i64>().ok().map(NumericPrice::Integer)
    }
}
