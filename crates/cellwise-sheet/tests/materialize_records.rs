//! End-to-end record materialization over worksheets and CSV files

use std::io::Write;
use std::sync::Arc;

use cellwise_core::{CellAccess, CellKind, CoercedValue, ErrorCode, EvaluationError, RawValue};
use cellwise_sheet::{
    CsvReadOptions, FormulaEvaluator, MissingCellPolicy, RecordMaterializer, RowAccess, SheetAccess,
    SheetCell, SheetError, StoredCell, Workbook, Worksheet,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn bookings() -> Worksheet {
    let mut sheet = Worksheet::new("Bookings");
    sheet.push_row(["Location", "NumberOfRooms"]);
    sheet.push_row([
        StoredCell::text("Sydney"),
        StoredCell::declared(CellKind::Numeric, RawValue::text("2")),
    ]);
    sheet.push_row(["", ""]);
    sheet.push_row([
        StoredCell::text("Perth"),
        StoredCell::declared(CellKind::Numeric, RawValue::text("abc")),
    ]);
    sheet
}

#[test]
fn test_bookings_scenario() {
    let records = RecordMaterializer::default()
        .materialize_all(&bookings())
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value("Location"), CoercedValue::text("Sydney"));
    assert_eq!(records[0].value("NumberOfRooms"), CoercedValue::from(2));
    assert_eq!(records[1].value("Location"), CoercedValue::text("Perth"));
    assert!(!records[1].contains("NumberOfRooms"));
    assert_eq!(records[1].len(), 1);
}

#[test]
fn test_bookings_scenario_from_csv() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Location,NumberOfRooms").unwrap();
    writeln!(file, "Sydney,2").unwrap();
    writeln!(file, ",").unwrap();
    writeln!(file, "Perth,abc").unwrap();
    file.flush().unwrap();

    let options = CsvReadOptions::default().with_column_kind("NumberOfRooms", CellKind::Numeric);
    let workbook = Workbook::open_with_options(file.path(), &options).unwrap();
    assert_eq!(workbook.sheet_count(), 1);
    let sheet = workbook.worksheet(0).unwrap();

    let records = RecordMaterializer::default().materialize_all(sheet).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value("NumberOfRooms"), CoercedValue::from(2));
    assert_eq!(
        records[1].names().collect::<Vec<_>>(),
        vec!["Location"]
    );
}

#[test]
fn test_csv_dates_become_dates() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Guest,Arrival").unwrap();
    writeln!(file, "Ann,2024-03-01").unwrap();
    file.flush().unwrap();

    let options = CsvReadOptions::default().with_date_column("Arrival");
    let workbook = Workbook::open_with_options(file.path(), &options).unwrap();
    let records = RecordMaterializer::default()
        .materialize_all(workbook.worksheet(0).unwrap())
        .unwrap();

    let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(records[0].value("Arrival"), CoercedValue::from(expected));
    assert_eq!(records[0].value("Arrival").to_string(), "2024-03-01");
}

#[derive(Debug)]
struct BrokenEvaluator;

impl FormulaEvaluator for BrokenEvaluator {
    fn evaluate(&self, cell: &SheetCell<'_>) -> Result<RawValue, EvaluationError> {
        Err(EvaluationError::new(format!(
            "unsupported function in {:?}",
            cell.formula_text()
        )))
    }
}

#[test]
fn test_failing_formula_falls_back_to_text() {
    let mut sheet = Worksheet::new("Rates");
    sheet.push_row(["Rate", "Total"]);
    sheet.push_row([
        StoredCell::number(12.5),
        StoredCell::formula("=XLOOKUP(A2)", Some(RawValue::Number(3.0))),
    ]);
    sheet.set_evaluator(Arc::new(BrokenEvaluator));

    let records = RecordMaterializer::default().materialize_all(&sheet).unwrap();
    assert_eq!(records[0].value("Total"), CoercedValue::text("=XLOOKUP(A2)"));
    assert_eq!(records[0].value("Rate").to_string(), "12.5");
}

#[test]
fn test_formula_results_by_kind() {
    let mut sheet = Worksheet::new("Calc");
    sheet.push_row(["Sum", "Flag", "Ratio", "When"]);
    sheet.push_row([
        StoredCell::formula("=1+1", Some(RawValue::Number(2.0))),
        StoredCell::formula("=TRUE()", Some(RawValue::Boolean(true))),
        StoredCell::formula("=1/0", Some(RawValue::Error(ErrorCode::Div0))),
        StoredCell::formula("=DATE(2024,1,1)", Some(RawValue::Number(45292.0))).date_formatted(),
    ]);

    let records = RecordMaterializer::default().materialize_all(&sheet).unwrap();
    let record = &records[0];
    assert_eq!(record.value("Sum"), CoercedValue::from(2));
    assert_eq!(record.value("Flag"), CoercedValue::Boolean(true));
    assert!(!record.contains("Ratio"));
    assert_eq!(
        record.value("When"),
        CoercedValue::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    );
}

#[test]
fn test_missing_header_row() {
    let mut sheet = Worksheet::new("Headless");
    sheet.set_row(1, ["Sydney", "2"]);

    let err = RecordMaterializer::default()
        .materialize_all(&sheet)
        .unwrap_err();
    assert!(matches!(err, SheetError::MalformedSheet { ref sheet, .. } if sheet == "Headless"));
}

/// A backend whose cells cannot be read
struct CorruptSheet;

struct CorruptRow(u32);

struct CorruptCell;

impl CellAccess for CorruptCell {
    fn kind(&self) -> CellKind {
        CellKind::String
    }

    fn raw_value(&self) -> cellwise_core::Result<RawValue> {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "truncated shared strings");
        Err(cellwise_core::Error::read("read string", "shared string table", io))
    }
}

impl RowAccess for CorruptRow {
    type Cell = CorruptCell;

    fn index(&self) -> u32 {
        self.0
    }

    fn columns(&self) -> Vec<u16> {
        vec![0]
    }

    fn cell(&self, _column: u16, _policy: MissingCellPolicy) -> cellwise_core::Result<Option<CorruptCell>> {
        Ok(Some(CorruptCell))
    }
}

impl SheetAccess for CorruptSheet {
    type Row<'a> = CorruptRow;

    fn name(&self) -> &str {
        "Corrupt"
    }

    fn row_count(&self) -> cellwise_core::Result<u32> {
        Ok(2)
    }

    fn row(&self, index: u32) -> cellwise_core::Result<Option<CorruptRow>> {
        Ok(Some(CorruptRow(index)))
    }
}

#[test]
fn test_read_fault_is_fatal_and_annotated() {
    let err = RecordMaterializer::default()
        .materialize_all(&CorruptSheet)
        .unwrap_err();

    match &err {
        SheetError::Cell { sheet, row, column, .. } => {
            assert_eq!(sheet, "Corrupt");
            assert_eq!((*row, *column), (0, 0));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("shared string table"));
}
