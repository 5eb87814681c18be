//! Spreadsheet file reader (xlsx, xlsm, xlsb, xls, ods) using calamine

use std::path::Path;

use calamine::{open_workbook_auto, CellErrorType, Data, Range, Reader};
use cellwise_core::{DateSystem, ErrorCode, RawValue};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::SheetResult;
use crate::worksheet::{StoredCell, Worksheet};

/// File extensions read through [`XlsxReader`]
const EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Spreadsheet reader
///
/// Every sheet of the file becomes a [`Worksheet`], with cells kept at their
/// absolute positions. Formula cells carry the value the spreadsheet last
/// computed as their cached result.
pub struct XlsxReader;

impl XlsxReader {
    /// Check if `path` has a spreadsheet extension
    pub fn supports(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
    }

    /// Read every sheet of a spreadsheet file, in workbook order
    ///
    /// Date cells are stored as serials in `date_system`.
    pub fn read_file<P: AsRef<Path>>(path: P, date_system: DateSystem) -> SheetResult<Vec<Worksheet>> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;

        let names = workbook.sheet_names();
        let mut sheets = Vec::with_capacity(names.len());
        for name in &names {
            let values = workbook.worksheet_range(name)?;
            let formulas = workbook.worksheet_formula(name)?;
            let sheet = build_worksheet(name, &values, &formulas, date_system);
            tracing::debug!(
                "Read sheet '{}' from '{}' ({} cells)",
                name,
                path.display(),
                sheet.cell_count()
            );
            sheets.push(sheet);
        }
        Ok(sheets)
    }
}

fn build_worksheet(
    name: &str,
    values: &Range<Data>,
    formulas: &Range<String>,
    date_system: DateSystem,
) -> Worksheet {
    let mut sheet = Worksheet::new(name);

    if let Some((top, left)) = values.start() {
        for (row, col, data) in values.used_cells() {
            let Some((row, col)) = position(top, left, row, col) else {
                continue;
            };
            if let Some(cell) = cell_from_data(data, date_system) {
                sheet.set_cell_at(row, col, cell);
            }
        }
    }

    if let Some((top, left)) = formulas.start() {
        for (row, col, text) in formulas.used_cells() {
            let Some((row, col)) = position(top, left, row, col) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            let stored = sheet.cell_at(row, col);
            let cached = stored.map(|cell| cell.raw().clone()).filter(|raw| *raw != RawValue::Blank);
            let is_date = stored.is_some_and(StoredCell::is_date);

            let text = if text.starts_with('=') {
                text.clone()
            } else {
                format!("={}", text)
            };
            let mut cell = StoredCell::formula(text, cached);
            if is_date {
                cell = cell.date_formatted();
            }
            sheet.set_cell_at(row, col, cell);
        }
    }

    sheet
}

/// Absolute (row, column) of a cell given relative to the range start
fn position(top: u32, left: u32, row: usize, col: usize) -> Option<(u32, u16)> {
    let row = top.checked_add(u32::try_from(row).ok()?)?;
    let col = u16::try_from(u64::from(left) + col as u64).ok()?;
    Some((row, col))
}

/// Map a calamine value to a stored cell; `None` for an empty cell
fn cell_from_data(data: &Data, date_system: DateSystem) -> Option<StoredCell> {
    let cell = match data {
        Data::Empty => return None,
        Data::Int(i) => StoredCell::number(*i as f64),
        Data::Float(f) => StoredCell::number(*f),
        Data::String(s) => StoredCell::text(s.as_str()),
        Data::Bool(b) => StoredCell::boolean(*b),
        Data::Error(e) => StoredCell::error(error_code(e)),
        Data::DateTime(dt) if dt.is_duration() => StoredCell::number(dt.as_f64()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => StoredCell::date(value, date_system),
            None => StoredCell::number(dt.as_f64()).date_formatted(),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => StoredCell::date(value, date_system),
            None => StoredCell::text(s.as_str()),
        },
        Data::DurationIso(s) => StoredCell::text(s.as_str()),
    };
    Some(cell)
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| s.parse::<NaiveDate>().ok().map(|d| d.and_time(NaiveTime::MIN)))
}

fn error_code(error: &CellErrorType) -> ErrorCode {
    match error {
        CellErrorType::Div0 => ErrorCode::Div0,
        CellErrorType::NA => ErrorCode::Na,
        CellErrorType::Name => ErrorCode::Name,
        CellErrorType::Null => ErrorCode::Null,
        CellErrorType::Num => ErrorCode::Num,
        CellErrorType::Ref => ErrorCode::Ref,
        CellErrorType::Value => ErrorCode::Value,
        // #GETTING_DATA: the value is not available yet
        CellErrorType::GettingData => ErrorCode::Na,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordMaterializer;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use cellwise_core::{CellKind, CoercedValue};
    use pretty_assertions::assert_eq;

    fn cell(data: Data) -> StoredCell {
        cell_from_data(&data, DateSystem::Excel1900).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_supported_extensions() {
        assert!(XlsxReader::supports(Path::new("data/Bookings.xlsx")));
        assert!(XlsxReader::supports(Path::new("Legacy.XLS")));
        assert!(XlsxReader::supports(Path::new("sheet.ods")));
        assert!(!XlsxReader::supports(Path::new("Bookings.csv")));
        assert!(!XlsxReader::supports(Path::new("Bookings")));
    }

    #[test]
    fn test_value_mapping() {
        assert!(cell_from_data(&Data::Empty, DateSystem::Excel1900).is_none());

        assert_eq!(cell(Data::Int(42)), StoredCell::number(42.0));
        assert_eq!(cell(Data::Float(2.5)), StoredCell::number(2.5));
        assert_eq!(cell(Data::String("Sydney".into())), StoredCell::text("Sydney"));
        assert_eq!(cell(Data::Bool(true)), StoredCell::boolean(true));
        assert_eq!(
            cell(Data::Error(CellErrorType::Div0)),
            StoredCell::error(ErrorCode::Div0)
        );
        assert_eq!(cell(Data::Error(CellErrorType::NA)).kind(), CellKind::Error);
    }

    #[test]
    fn test_dates_become_date_formatted_numbers() {
        let serial = cell(Data::DateTime(ExcelDateTime::new(
            45292.0,
            ExcelDateTimeType::DateTime,
            false,
        )));
        assert_eq!(serial, StoredCell::date(datetime(2024, 1, 1), DateSystem::Excel1900));
        assert!(serial.is_date());
        assert_eq!(serial.raw(), &RawValue::Number(45292.0));

        let iso = cell(Data::DateTimeIso("2024-01-01".into()));
        assert_eq!(iso, serial);

        let duration = cell(Data::DateTime(ExcelDateTime::new(
            1.5,
            ExcelDateTimeType::TimeDelta,
            false,
        )));
        assert!(!duration.is_date());
        assert_eq!(duration.raw(), &RawValue::Number(1.5));

        assert_eq!(cell(Data::DateTimeIso("soon".into())), StoredCell::text("soon"));
    }

    #[test]
    fn test_cells_keep_absolute_positions() {
        let mut values = Range::new((2, 1), (3, 2));
        values.set_value((2, 1), Data::String("Location".into()));
        values.set_value((2, 2), Data::String("NumberOfRooms".into()));
        values.set_value((3, 1), Data::String("Sydney".into()));
        values.set_value((3, 2), Data::Int(2));

        let sheet = build_worksheet("Bookings", &values, &Range::empty(), DateSystem::Excel1900);
        assert_eq!(sheet.cell_at(2, 1), Some(&StoredCell::text("Location")));
        assert_eq!(sheet.cell_at(3, 2), Some(&StoredCell::number(2.0)));
        assert_eq!(sheet.cell_at(0, 0), None);
        assert_eq!(sheet.cell_count(), 4);
    }

    #[test]
    fn test_formulas_carry_cached_results() {
        let mut values = Range::new((0, 0), (1, 2));
        values.set_value((0, 0), Data::String("Rooms".into()));
        values.set_value((0, 1), Data::String("Total".into()));
        values.set_value((0, 2), Data::String("Due".into()));
        values.set_value((1, 0), Data::Int(2));
        values.set_value((1, 1), Data::Error(CellErrorType::Div0));
        values.set_value(
            (1, 2),
            Data::DateTime(ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false)),
        );

        let mut formulas = Range::new((1, 1), (1, 2));
        formulas.set_value((1, 1), "A2/0".to_string());
        formulas.set_value((1, 2), "=DATE(2024,1,1)".to_string());

        let sheet = build_worksheet("Totals", &values, &formulas, DateSystem::Excel1900);
        assert_eq!(
            sheet.cell_at(1, 1),
            Some(&StoredCell::formula("=A2/0", Some(RawValue::Error(ErrorCode::Div0))))
        );
        let due = sheet.cell_at(1, 2).unwrap();
        assert_eq!(due.kind(), CellKind::Formula);
        assert!(due.is_date());

        let records = RecordMaterializer::default().materialize_all(&sheet).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value("Rooms"), CoercedValue::from(2));
        assert_eq!(records[0].value("Total"), CoercedValue::Absent);
        assert_eq!(
            records[0].value("Due"),
            CoercedValue::Date(datetime(2024, 1, 1))
        );
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bookings.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        assert!(matches!(
            XlsxReader::read_file(&path, DateSystem::Excel1900),
            Err(crate::SheetError::Xlsx(_))
        ));
    }
}
