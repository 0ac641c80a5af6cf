//! Tabular format adapters.
//!
//! Each adapter reads ledger rows (skipping the header) and writes accrual
//! points (with a header). [`format_for_path`] picks the adapter from the
//! file extension.

use crate::engine::{AccrualPoint, DATE_FORMAT};
use crate::error::{AccrualError, Result};
use crate::ledger::RawRow;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::debug;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Column headers of the output file.
pub const OUTPUT_HEADER: [&str; 3] = ["Description", "Date", "Amount"];

/// Name of the worksheet holding results.
const RESULTS_SHEET: &str = "Results";

/// Reader and writer for one tabular file format.
pub trait TabularFormat {
    /// Reads all data rows, excluding the header, in file order.
    fn read_rows(&self, path: &Path) -> Result<Vec<RawRow>>;

    /// Writes a header followed by one row per point.
    fn write_rows(&self, path: &Path, points: &[AccrualPoint]) -> Result<()>;
}

/// Returns the adapter registered for the extension of `path`.
pub fn format_for_path(path: &Path) -> Result<Box<dyn TabularFormat>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(Box::new(DelimitedText::default())),
        Some("xlsx") | Some("xls") => Ok(Box::new(Spreadsheet)),
        _ => Err(AccrualError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Delimited text: `;`-separated input, `,`-separated output.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedText {
    pub input_delimiter: u8,
    pub output_delimiter: u8,
}

impl Default for DelimitedText {
    fn default() -> Self {
        DelimitedText {
            input_delimiter: b';',
            output_delimiter: b',',
        }
    }
}

impl DelimitedText {
    /// Reads rows from any reader; the first record is the header.
    ///
    /// Data fields are kept as written so descriptions pass through verbatim.
    pub fn read_from<R: std::io::Read>(&self, reader: R) -> Result<Vec<RawRow>> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.input_delimiter)
            .has_headers(true)
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (row_idx, result) in csv_reader.records().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row
            let record = result?;
            rows.push(raw_row_from_record(row_num, &record)?);
        }

        Ok(rows)
    }

    /// Writes the header and points to any writer.
    pub fn write_to<W: std::io::Write>(&self, writer: W, points: &[AccrualPoint]) -> Result<()> {
        // Header is written by hand so an empty ledger still gets one
        let mut csv_writer = WriterBuilder::new()
            .delimiter(self.output_delimiter)
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(OUTPUT_HEADER)?;

        for point in points {
            csv_writer.serialize(point)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl TabularFormat for DelimitedText {
    fn read_rows(&self, path: &Path) -> Result<Vec<RawRow>> {
        let file = std::fs::File::open(path)?;
        let rows = self.read_from(std::io::BufReader::new(file))?;
        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    fn write_rows(&self, path: &Path, points: &[AccrualPoint]) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file), points)
    }
}

fn raw_row_from_record(row: usize, record: &StringRecord) -> Result<RawRow> {
    match (record.get(0), record.get(1), record.get(2)) {
        (Some(description), Some(date), Some(amount)) => {
            Ok(RawRow::new(row, description, date, amount))
        }
        _ => Err(AccrualError::InvalidRow {
            row,
            message: format!("expected 3 fields, found {}", record.len()),
        }),
    }
}

/// Excel workbooks: reads the first worksheet, writes a `Results` sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spreadsheet;

impl TabularFormat for Spreadsheet {
    fn read_rows(&self, path: &Path) -> Result<Vec<RawRow>> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AccrualError::EmptyWorkbook {
                path: path.to_path_buf(),
            })??;

        // Absolute sheet coordinates: row 0 is the header, column 0 is A,
        // whatever the first used cell of the range is
        let last_row = range.end().map_or(0, |(row, _)| row);
        let mut rows = Vec::new();
        for row in 1..=last_row {
            let cell = |col: u32| range.get_value((row, col));

            // The ledger ends at the first row without a description cell
            if matches!(cell(0), None | Some(Data::Empty)) {
                break;
            }

            let text = |col: u32| cell(col).map(cell_text).unwrap_or_default();
            rows.push(RawRow::new(row as usize + 1, text(0), text(1), text(2)));
        }

        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    fn write_rows(&self, path: &Path, points: &[AccrualPoint]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(RESULTS_SHEET)?;

        for (col, title) in (0u16..).zip(OUTPUT_HEADER) {
            worksheet.write_string(0, col, title)?;
        }

        for (row, point) in (1u32..).zip(points) {
            worksheet.write_string(row, 0, point.description.as_str())?;
            worksheet.write_string(row, 1, point.period_end_date.as_str())?;
            worksheet.write_number(row, 2, point.balance.to_f64())?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Renders a cell the way it would be typed into the sheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        _ => String::new(),
    }
}

/// Converts an Excel serial day number to `yyyy-MM-dd`.
fn excel_serial_to_date(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .zip(Duration::try_days(serial.trunc() as i64))
        .and_then(|(base, offset)| base.checked_add_signed(offset))
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal2;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn point(description: &str, date: &str, balance: &str) -> AccrualPoint {
        AccrualPoint {
            description: description.to_string(),
            period_end_date: date.to_string(),
            balance: Decimal2::from_str(balance).unwrap(),
        }
    }

    #[test]
    fn test_registry_by_extension() {
        assert!(format_for_path(Path::new("ledger.csv")).is_ok());
        assert!(format_for_path(Path::new("ledger.CSV")).is_ok());
        assert!(format_for_path(Path::new("ledger.xlsx")).is_ok());
        assert!(format_for_path(Path::new("ledger.xls")).is_ok());
    }

    #[test]
    fn test_registry_rejects_unknown_extension() {
        for name in ["ledger.txt", "ledger", "ledger.json"] {
            match format_for_path(Path::new(name)) {
                Err(AccrualError::UnsupportedFormat { path }) => {
                    assert_eq!(path, PathBuf::from(name))
                }
                _ => panic!("Expected UnsupportedFormat for {}", name),
            }
        }
    }

    #[test]
    fn test_read_semicolon_rows_skips_header() {
        let csv = "Description;Date;Amount\nLoan A;2023-01-01;1000.00\nLoan B;2023-02-15;250.5\n";

        let rows = DelimitedText::default().read_from(Cursor::new(csv)).unwrap();
        assert_eq!(
            rows,
            vec![
                RawRow::new(2, "Loan A", "2023-01-01", "1000.00"),
                RawRow::new(3, "Loan B", "2023-02-15", "250.5"),
            ]
        );
    }

    #[test]
    fn test_read_keeps_description_padding() {
        let csv = "d;date;amt\n  Loan A  ; 2023-01-01 ; 1 \n";

        let rows = DelimitedText::default().read_from(Cursor::new(csv)).unwrap();
        assert_eq!(rows[0].description, "  Loan A  ");

        let entry = rows[0].parse().unwrap();
        assert_eq!(entry.description, "  Loan A  ");
        assert_eq!(entry.principal.to_string(), "1");
    }

    #[test]
    fn test_read_header_only() {
        let rows = DelimitedText::default()
            .read_from(Cursor::new("Description;Date;Amount\n"))
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_ignores_extra_fields() {
        let csv = "d;date;amount;note\nLoan;2023-01-01;10;ignored\n";

        let rows = DelimitedText::default().read_from(Cursor::new(csv)).unwrap();
        assert_eq!(rows, vec![RawRow::new(2, "Loan", "2023-01-01", "10")]);
    }

    #[test]
    fn test_read_rejects_short_row() {
        let csv = "d;date;amount\nLoan;2023-01-01;10\nShort;2023-01-01\n";

        let result = DelimitedText::default().read_from(Cursor::new(csv));
        assert!(matches!(result, Err(AccrualError::InvalidRow { row: 3, .. })));
    }

    #[test]
    fn test_write_output_format() {
        let points = vec![
            point("Loan A", "2023-02-01", "1004.246575"),
            point("Loan, with comma", "2023-03-01", "1008.1"),
        ];

        let mut output = Vec::new();
        DelimitedText::default().write_to(&mut output, &points).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(
            output_str,
            "Description,Date,Amount\n\
             Loan A,2023-02-01,1004.25\n\
             \"Loan, with comma\",2023-03-01,1008.10\n"
        );
    }

    #[test]
    fn test_write_empty_is_header_only() {
        let mut output = Vec::new();
        DelimitedText::default().write_to(&mut output, &[]).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Description,Date,Amount\n");
    }

    #[test]
    fn test_spreadsheet_written_results_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        let points = vec![
            point("Loan A", "2023-02-01", "1004.25"),
            point("Loan A", "2023-03-01", "1008.10"),
        ];

        Spreadsheet.write_rows(&path, &points).unwrap();
        let rows = Spreadsheet.read_rows(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].description, "Loan A");
        assert_eq!(rows[0].date, "2023-02-01");
        assert_eq!(rows[0].amount, "1004.25");
        assert_eq!(rows[1].amount, "1008.1");
    }

    #[test]
    fn test_spreadsheet_empty_results_have_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        Spreadsheet.write_rows(&path, &[]).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range(RESULTS_SHEET).unwrap();
        assert_eq!(range.rows().count(), 1);
        assert_eq!(workbook.sheet_names(), vec![RESULTS_SHEET.to_string()]);
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(44927.0), "2023-01-01");
        assert_eq!(excel_serial_to_date(44927.75), "2023-01-01");
    }

    #[test]
    fn test_excel_serial_out_of_range_is_empty() {
        assert_eq!(excel_serial_to_date(1e300), "");
        assert_eq!(excel_serial_to_date(-1e300), "");
        assert_eq!(excel_serial_to_date(1e12), "");
    }

    #[test]
    fn test_spreadsheet_reads_absolute_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.xlsx");

        // Blank header row; the ledger starts on sheet row 2
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(1, 0, "Loan A").unwrap();
        worksheet.write_string(1, 1, "2023-01-01").unwrap();
        worksheet.write_number(1, 2, 1000.0).unwrap();
        worksheet.write_string(2, 0, "Loan B").unwrap();
        worksheet.write_string(2, 1, "2023-02-01").unwrap();
        worksheet.write_number(2, 2, 250.5).unwrap();
        workbook.save(&path).unwrap();

        let rows = Spreadsheet.read_rows(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                RawRow::new(2, "Loan A", "2023-01-01", "1000"),
                RawRow::new(3, "Loan B", "2023-02-01", "250.5"),
            ]
        );
    }

    #[test]
    fn test_spreadsheet_blank_first_column_ends_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shifted.xlsx");

        // Nothing in column A, so there is no description on row 2
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 1, "Date").unwrap();
        worksheet.write_string(0, 2, "Amount").unwrap();
        worksheet.write_string(1, 1, "2023-01-01").unwrap();
        worksheet.write_number(1, 2, 1000.0).unwrap();
        workbook.save(&path).unwrap();

        assert!(Spreadsheet.read_rows(&path).unwrap().is_empty());
    }
}
