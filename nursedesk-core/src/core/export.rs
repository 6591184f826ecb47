//! CSV and XLSX export of the visible nurse rows.
//!
//! Both formats use the fixed column order in [`EXPORT_HEADERS`]. The XLSX
//! document is a minimal SpreadsheetML package written with the `zip` crate:
//! one worksheet, inline strings, numeric age cells.

use crate::{NurseRecord, NursedeskError, Result};
use chrono::NaiveDate;
use std::io::{Cursor, Write};
use std::str::FromStr;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const EXPORT_HEADERS: [&str; 4] = ["Name", "License Number", "Date of Birth", "Age"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = NursedeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(NursedeskError::Export(format!(
                "unsupported export format: {other}"
            ))),
        }
    }
}

/// Renders `records` in `format`, in the order given.
pub fn render(format: ExportFormat, records: &[NurseRecord]) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => Ok(to_csv(records).into_bytes()),
        ExportFormat::Xlsx => to_xlsx(records),
    }
}

/// A file name derived from the collection name and the export date, e.g.
/// `nurses_2024-03-01.csv`.
pub fn export_filename(collection: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        slugify(collection),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let slug: String = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "export".to_string() } else { slug }
}

fn row_cells(record: &NurseRecord) -> [String; 4] {
    [
        record.name.clone(),
        record.license_number.clone(),
        record.dob_string(),
        record.age.to_string(),
    ]
}

// ── CSV ───────────────────────────────────────────────────────

pub fn to_csv(records: &[NurseRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        EXPORT_HEADERS
            .iter()
            .map(|h| csv_escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        lines.push(
            row_cells(record)
                .iter()
                .map(|cell| csv_escape(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Cells that a spreadsheet would evaluate as a formula get a leading `'`.
fn neutralize_formula(value: &str) -> String {
    let trimmed = value.trim_start();
    match trimmed.chars().next() {
        Some('=') | Some('+') | Some('-') | Some('@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

fn csv_escape(value: &str) -> String {
    let safe = neutralize_formula(value);
    if safe.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}

// ── XLSX ──────────────────────────────────────────────────────

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Nurses" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const COLUMN_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn to_xlsx(records: &[NurseRecord]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(records)),
    ];
    for (name, body) in parts {
        writer.start_file(name, options)?;
        writer.write_all(body.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

fn worksheet_xml(records: &[NurseRecord]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        xml.push_str(&inline_string_cell(COLUMN_LETTERS[col], 1, header));
    }
    xml.push_str("</row>");

    for (index, record) in records.iter().enumerate() {
        let row = index + 2;
        xml.push_str(&format!(r#"<row r="{row}">"#));
        let [name, license, dob, _] = row_cells(record);
        xml.push_str(&inline_string_cell('A', row, &name));
        xml.push_str(&inline_string_cell('B', row, &license));
        xml.push_str(&inline_string_cell('C', row, &dob));
        xml.push_str(&format!(r#"<c r="D{row}"><v>{}</v></c>"#, record.age));
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn inline_string_cell(col: char, row: usize, value: &str) -> String {
    format!(
        r#"<c r="{col}{row}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        xml_escape(value)
    )
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Read;

    fn record(id: i64, name: &str, license: &str, age: u32) -> NurseRecord {
        let now = Utc::now();
        NurseRecord {
            id,
            name: name.to_string(),
            license_number: license.to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            age,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_csv_has_fixed_header_and_row_order() {
        let csv = to_csv(&[record(2, "Bob Ray", "RN-2", 39), record(1, "Ann Lee", "RN-1", 34)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,License Number,Date of Birth,Age");
        assert_eq!(lines[1], "Bob Ray,RN-2,1990-01-01,39");
        assert_eq!(lines[2], "Ann Lee,RN-1,1990-01-01,34");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_quotes_and_neutralizes() {
        let csv = to_csv(&[record(1, "Lee, \"Ann\"", "=HYPERLINK()", 34)]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "\"Lee, \"\"Ann\"\"\",'=HYPERLINK(),1990-01-01,34");
    }

    #[test]
    fn test_xlsx_is_zip_with_worksheet() {
        let bytes = to_xlsx(&[record(1, "Ann & Co <RN>", "RN-1", 34)]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("xl/workbook.xml").is_ok());

        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();
        assert!(sheet.contains("License Number"));
        assert!(sheet.contains("Ann &amp; Co &lt;RN&gt;"));
        assert!(sheet.contains(r#"<c r="D2"><v>34</v></c>"#));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(export_filename("Nurses", ExportFormat::Csv, date), "nurses_2024-03-01.csv");
        assert_eq!(
            export_filename("Night Shift!", ExportFormat::Xlsx, date),
            "night-shift_2024-03-01.xlsx"
        );
        assert_eq!(export_filename("---", ExportFormat::Csv, date), "export_2024-03-01.csv");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
