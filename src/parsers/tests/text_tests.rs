use crate::parsers::text::{NumericPrice, coerce_price, collapse_whitespace};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_price_float() {
        assert_eq!(coerce_price("AED 1,234.50"), Some(NumericPrice::Float(1234.50)));
        assert_eq!(coerce_price("$19.99"), Some(NumericPrice::Float(19.99)));
    }

    #[test]
    fn test_coerce_price_integer() {
        assert_eq!(coerce_price("AED 999"), Some(NumericPrice::Integer(999)));
        assert_eq!(coerce_price("1,299 AED"), Some(NumericPrice::Integer(1299)));
    }

    #[test]
    fn test_coerce_price_stray_points() {
        // Abbreviated currency labels contribute a point before the number
        assert_eq!(coerce_price("Dhs. 1,234.50"), Some(NumericPrice::Float(1234.5)));
        assert_eq!(coerce_price("Rs. 999"), Some(NumericPrice::Integer(999)));
    }

    #[test]
    fn test_coerce_price_leading_point() {
        assert_eq!(coerce_price("AED .50"), Some(NumericPrice::Float(0.5)));
    }

    #[test]
    fn test_coerce_price_declines_several_numbers() {
        assert_eq!(coerce_price("Was AED 1,500.00 Now AED 1,299.00"), None);
        assert_eq!(coerce_price("AED 999 - AED 1,099"), None);
    }

    #[test]
    fn test_coerce_price_without_digits() {
        assert_eq!(coerce_price(""), None);
        assert_eq!(coerce_price("Sold out"), None);
        assert_eq!(coerce_price("..."), None);
    }

    #[test]
    fn test_numeric_price_display() {
        assert_eq!(NumericPrice::Integer(999).to_string(), "999");
        assert_eq!(NumericPrice::Float(1234.5).to_string(), "1234.5");
        assert_eq!(NumericPrice::Integer(7).as_f64(), 7.0);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  iPhone 12 \n\t 128GB  "), "iPhone 12 128GB");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
