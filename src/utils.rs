use chrono::NaiveDate;
use uuid::Uuid;

const SUFFIX_LEN: usize = 6;

/// Six lowercase alphanumeric characters to keep export names unique
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_string()
}

/// `product_list_<date>_<suffix>.<extension>`
pub fn export_filename(date: NaiveDate, suffix: &str, extension: &str) -> String {
    format!(
        "product_list_{}_{}.{}",
        date.format("%Y-%m-%d"),
        suffix,
        extension
    )
}
