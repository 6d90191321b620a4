//! Tabular export of harvested records.

use crate::error::{Error, Result};
use crate::results::ProductRecord;
use crate::utils::{export_filename, random_suffix};
use serde::{Deserialize, Serialize};
use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A declared output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Category,
    Title,
    Link,
    Price,
    Images,
    Description,
}

impl Column {
    pub fn all() -> &'static [Column] {
        &[
            Column::Category,
            Column::Title,
            Column::Link,
            Column::Price,
            Column::Images,
            Column::Description,
        ]
    }

    pub fn header(&self) -> &'static str {
        match self {
            Column::Category => "Category",
            Column::Title => "Title",
            Column::Link => "Product Link",
            Column::Price => "Price",
            Column::Images => "Images",
            Column::Description => "Description",
        }
    }

    /// Cell value for tabular output
    pub fn cell(&self, record: &ProductRecord) -> String {
        match self {
            Column::Category => record.category.clone(),
            Column::Title => record.title.clone(),
            Column::Link => record.link.clone(),
            Column::Price => record.price.clone(),
            Column::Images => record.joined_images(),
            Column::Description => record.description.clone(),
        }
    }

    fn json(&self, record: &ProductRecord) -> Value {
        match self {
            Column::Images => Value::from(record.images.clone()),
            _ => Value::from(self.cell(record)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

/// Writes records as CSV with one header row
pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord], columns: &[Column]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(Column::header))?;
    for record in records {
        wtr.write_record(columns.iter().map(|c| c.cell(record)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes records as a JSON array of objects keyed by column header
pub fn write_json<W: Write>(writer: W, records: &[ProductRecord], columns: &[Column]) -> Result<()> {
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| (c.header().to_string(), c.json(record)))
                .collect::<Map<String, Value>>()
        })
        .collect::<Vec<_>>();
    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(())
}

/// Writes records as a single-sheet Excel workbook with a bold header row
pub fn write_xlsx<W: Write>(mut writer: W, records: &[ProductRecord], columns: &[Column]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Products")?;
    for (col, column) in columns.iter().enumerate() {
        let col = u16::try_from(col)
            .map_err(|_| Error::Config("too many output columns".to_string()))?;
        sheet.write_string_with_format(0, col, column.header(), &bold)?;

        for (index, record) in records.iter().enumerate() {
            let row = u32::try_from(index + 1)
                .map_err(|_| Error::Config("too many records for one worksheet".to_string()))?;
            sheet.write_string(row, col, column.cell(record))?;
        }
    }

    writer.write_all(&workbook.save_to_buffer()?)?;
    Ok(())
}

/// Writes records into a new dated file under `dir` and returns its path
pub fn export(
    records: &[ProductRecord],
    columns: &[Column],
    format: OutputFormat,
    dir: &Path,
) -> Result<PathBuf> {
    if columns.is_empty() {
        return Err(Error::Config("no output columns declared".to_string()));
    }

    fs::create_dir_all(dir)?;
    let today = chrono::Local::now().date_naive();
    let path = dir.join(export_filename(today, &random_suffix(), format.extension()));

    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        OutputFormat::Csv => write_csv(&mut writer, records, columns)?,
        OutputFormat::Json => write_json(&mut writer, records, columns)?,
        OutputFormat::Xlsx => write_xlsx(&mut writer, records, columns)?,
    }
    writer.flush()?;

    ::log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ProductRecord> {
        vec![
            ProductRecord {
                category: "Laptops".to_string(),
                title: "Dell, Latitude".to_string(),
                link: "https://shop.example.com/p/1".to_string(),
                price: "AED 1,299".to_string(),
                images: vec![
                    "https://cdn.example.com/1.jpg".to_string(),
                    "https://cdn.example.com/2.jpg".to_string(),
                ],
                description: "Line one\nLine two".to_string(),
            },
            ProductRecord::default(),
        ]
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &records(), Column::all()).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Category", "Title", "Product Link", "Price", "Images", "Description"]
        );

        let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Dell, Latitude");
        assert_eq!(
            &rows[0][4],
            "https://cdn.example.com/1.jpg, https://cdn.example.com/2.jpg"
        );
        assert_eq!(&rows[0][5], "Line one\nLine two");
        assert_eq!(&rows[1][2], "No link available");
        assert_eq!(&rows[1][4], "No image available");
    }

    #[test]
    fn test_csv_column_subset() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &records(), &[Column::Title, Column::Price]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some("Title,Price"));
        assert!(text.contains("\"Dell, Latitude\",\"AED 1,299\""));
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_json(&mut buf, &records(), &[Column::Title, Column::Images]).unwrap();

        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["Title"], "Dell, Latitude");
        assert_eq!(value[0]["Images"][1], "https://cdn.example.com/2.jpg");
        assert_eq!(value[1]["Images"][0], "No image available");
        assert!(value[0].get("Price").is_none());
    }

    #[test]
    fn test_export_creates_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&records(), Column::all(), OutputFormat::Csv, dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(name.starts_with(&format!("product_list_{today}_")));
        assert!(name.ends_with(".csv"));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Category,Title"));
    }

    #[test]
    fn test_xlsx_output_is_a_workbook() {
        let mut buf = Vec::new();
        write_xlsx(&mut buf, &records(), Column::all()).unwrap();

        // Office Open XML files are zip archives
        assert!(buf.len() > 100);
        assert_eq!(&buf[..2], b"PK");
    }

    #[test]
    fn test_export_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&records(), Column::all(), OutputFormat::Xlsx, dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(name.starts_with(&format!("product_list_{today}_")));
        assert!(name.ends_with(".xlsx"));

        let bytes = fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_export_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = export(&records(), Column::all(), OutputFormat::Json, dir.path()).unwrap();
        let b = export(&records(), Column::all(), OutputFormat::Json, dir.path()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_export_requires_columns() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export(&records(), &[], OutputFormat::Csv, dir.path()).is_err());
    }
}
