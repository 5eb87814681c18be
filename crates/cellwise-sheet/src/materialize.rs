//! Sheet to record materialization
//!
//! Row 0 is the header row and names the fields. Every later row becomes a
//! [`Record`] holding only the cells that coerce to a usable value:
//!
//! - a row that does not exist, or whose cells are all unusable, is skipped;
//! - a header column with no cell in the row is treated as blank;
//! - a row that ends up with no usable fields is dropped, never emitted empty.
//!
//! Rows are emitted in source order as they are read.

use cellwise_core::{CellAccess, ValueCoercer};

use crate::access::{MissingCellPolicy, RowAccess, SheetAccess};
use crate::error::{SheetError, SheetResult};
use crate::record::Record;

/// Field names taken from a sheet's header row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderSet {
    columns: Vec<(u16, String)>,
}

impl HeaderSet {
    /// Header names paired with the column they sit in
    pub fn columns(&self) -> &[(u16, String)] {
        &self.columns
    }

    /// Header names in column order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, name)| name.as_str())
    }

    /// Column of a header; with duplicate names the last column is returned
    pub fn column_of(&self, name: &str) -> Option<u16> {
        self.columns
            .iter()
            .rev()
            .find(|(_, n)| n == name)
            .map(|(col, _)| *col)
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Turns sheets into record sequences
#[derive(Debug, Clone, Default)]
pub struct RecordMaterializer {
    coercer: ValueCoercer,
}

impl RecordMaterializer {
    /// Create a materializer using the given coercer
    pub fn new(coercer: ValueCoercer) -> Self {
        Self { coercer }
    }

    /// Get the coercer
    pub fn coercer(&self) -> &ValueCoercer {
        &self.coercer
    }

    /// Read the header row
    ///
    /// Fails when row 0 is missing or its first cell is unusable. Blank
    /// header cells after the first are left out of the set.
    pub fn headers<S: SheetAccess>(&self, sheet: &S) -> SheetResult<HeaderSet> {
        let name = sheet.name();
        let row = sheet
            .row(0)
            .map_err(|e| SheetError::at_cell("read header row", name, 0, 0, e))?
            .ok_or_else(|| SheetError::malformed(name, "missing header row"))?;

        let first = row
            .cell(0, MissingCellPolicy::ReturnBlankAsNull)
            .map_err(|e| SheetError::at_cell("read header", name, 0, 0, e))?;
        let first_usable = match first {
            Some(cell) => self
                .coercer
                .is_usable(&cell)
                .map_err(|e| SheetError::at_cell("read header", name, 0, 0, e))?,
            None => false,
        };
        if !first_usable {
            return Err(SheetError::malformed(name, "invalid header row"));
        }

        let mut columns = Vec::new();
        for col in row.columns() {
            let Some(cell) = row
                .cell(col, MissingCellPolicy::ReturnBlankAsNull)
                .map_err(|e| SheetError::at_cell("read header", name, 0, col, e))?
            else {
                continue;
            };
            let header = self
                .coercer
                .as_text(&cell)
                .map_err(|e| SheetError::at_cell("read header", name, 0, col, e))?;
            if let Some(header) = header {
                let header = header.trim();
                if !header.is_empty() {
                    columns.push((col, header.to_string()));
                }
            }
        }

        Ok(HeaderSet { columns })
    }

    /// Start streaming the records of a sheet
    ///
    /// The header row is read eagerly so a malformed sheet fails here; data
    /// rows are read as the iterator advances.
    pub fn materialize<'s, S: SheetAccess>(&self, sheet: &'s S) -> SheetResult<Records<'s, S>> {
        let headers = self.headers(sheet)?;
        let row_count = sheet
            .row_count()
            .map_err(|e| SheetError::at_cell("count rows", sheet.name(), 0, 0, e))?;
        if row_count <= 1 {
            tracing::warn!("Sheet '{}' is empty or contains only headers", sheet.name());
        }

        Ok(Records {
            sheet,
            coercer: self.coercer.clone(),
            headers,
            next_row: 1,
            row_count,
        })
    }

    /// Materialize every record of a sheet
    pub fn materialize_all<S: SheetAccess>(&self, sheet: &S) -> SheetResult<Vec<Record>> {
        self.materialize(sheet)?.collect()
    }
}

/// Lazily streamed records of one sheet
pub struct Records<'s, S: SheetAccess> {
    sheet: &'s S,
    coercer: ValueCoercer,
    headers: HeaderSet,
    next_row: u32,
    row_count: u32,
}

impl<'s, S: SheetAccess> Records<'s, S> {
    /// Headers the records are keyed by
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    fn is_row_empty<R: RowAccess>(&self, row: &R) -> SheetResult<bool> {
        for col in row.columns() {
            let cell = row
                .cell(col, MissingCellPolicy::ReturnNull)
                .map_err(|e| self.fault("read cell", row.index(), col, e))?;
            if let Some(cell) = cell {
                let usable = self
                    .coercer
                    .is_usable(&cell)
                    .map_err(|e| self.fault("check cell", row.index(), col, e))?;
                if usable {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn read_record<R: RowAccess>(&self, row: &R) -> SheetResult<Record> {
        let mut record = Record::new();
        for (col, name) in self.headers.columns() {
            let cell = row
                .cell(*col, MissingCellPolicy::ReturnBlankAsNull)
                .map_err(|e| self.fault("read cell", row.index(), *col, e))?;
            let Some(cell) = cell else {
                continue;
            };
            let value = self
                .coercer
                .coerce(&cell)
                .map_err(|e| self.fault("coerce cell", row.index(), *col, e))?;
            if value.is_present() {
                record.insert(name.clone(), value);
            }
        }
        Ok(record)
    }

    fn read_row(&self, index: u32) -> SheetResult<Option<Record>> {
        let row = self
            .sheet
            .row(index)
            .map_err(|e| self.fault("read row", index, 0, e))?;
        let Some(row) = row else {
            return Ok(None);
        };

        if self.is_row_empty(&row)? {
            tracing::debug!("Skipping empty row {} in '{}'", index, self.sheet.name());
            return Ok(None);
        }

        let record = self.read_record(&row)?;
        if record.is_empty() {
            tracing::debug!(
                "Dropping row {} in '{}': no usable fields under any header",
                index,
                self.sheet.name()
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn fault(&self, operation: &'static str, row: u32, col: u16, err: cellwise_core::Error) -> SheetError {
        SheetError::at_cell(operation, self.sheet.name(), row, col, err)
    }
}

impl<'s, S: SheetAccess> Iterator for Records<'s, S> {
    type Item = SheetResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_row < self.row_count {
            let index = self.next_row;
            self.next_row += 1;
            match self.read_row(index) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(err) => {
                    // A structural fault ends the stream.
                    self.next_row = self.row_count;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet::{StoredCell, Worksheet};
    use cellwise_core::{CellKind, CoercedValue, RawValue};
    use pretty_assertions::assert_eq;

    fn materialize(sheet: &Worksheet) -> Vec<Record> {
        RecordMaterializer::default().materialize_all(sheet).unwrap()
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let mut sheet = Worksheet::new("Empty");
        sheet.push_row(["Location", "Hotels"]);
        assert!(materialize(&sheet).is_empty());
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let sheet = Worksheet::new("Nothing");
        let err = RecordMaterializer::default().materialize_all(&sheet).unwrap_err();
        assert!(matches!(err, SheetError::MalformedSheet { .. }));

        let mut sheet = Worksheet::new("BlankFirst");
        sheet.push_row(["  ", "Hotels"]);
        sheet.push_row(["x", "y"]);
        let err = RecordMaterializer::default().materialize_all(&sheet).unwrap_err();
        assert!(err.to_string().contains("invalid header row"));
    }

    #[test]
    fn test_blank_row_is_skipped() {
        let mut sheet = Worksheet::new("Data");
        sheet.push_row(["A", "B"]);
        sheet.push_row(["", " "]);
        sheet.touch_row(2);
        sheet.push_row([StoredCell::BLANK, StoredCell::BLANK]);
        sheet.push_row(["a", "b"]);

        let records = materialize(&sheet);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value("A"), CoercedValue::text("a"));
    }

    #[test]
    fn test_partial_row_keeps_usable_fields() {
        let mut sheet = Worksheet::new("Data");
        sheet.push_row(["Name", "Age", "City"]);
        sheet.push_row([
            StoredCell::text("Ann"),
            StoredCell::declared(CellKind::Numeric, RawValue::text("n/a")),
            StoredCell::text("  "),
        ]);

        let records = materialize(&sheet);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[0].value("Name"), CoercedValue::text("Ann"));
    }

    #[test]
    fn test_row_with_data_only_outside_headers_is_dropped() {
        let mut sheet = Worksheet::new("Data");
        sheet.push_row(["Name"]);
        sheet.set_cell_at(1, 3, "stray note");
        sheet.push_row(["Bob"]);

        let records = materialize(&sheet);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value("Name"), CoercedValue::text("Bob"));
    }

    #[test]
    fn test_header_gap_keeps_column_positions() {
        let mut sheet = Worksheet::new("Data");
        sheet.set_row(0, ["Name", "", "Rooms"]);
        sheet.set_row(1, [StoredCell::text("Ann"), StoredCell::text("ignored"), StoredCell::number(3.0)]);

        let materializer = RecordMaterializer::default();
        let headers = materializer.headers(&sheet).unwrap();
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["Name", "Rooms"]);
        assert_eq!(headers.column_of("Rooms"), Some(2));

        let records = materializer.materialize_all(&sheet).unwrap();
        assert_eq!(records[0].value("Rooms"), CoercedValue::from(3));
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn test_duplicate_header_later_column_wins() {
        let mut sheet = Worksheet::new("Data");
        sheet.push_row(["Code", "Code"]);
        sheet.push_row(["first", "second"]);
        sheet.push_row(["only-first", ""]);

        let records = materialize(&sheet);
        assert_eq!(records[0].value("Code"), CoercedValue::text("second"));
        assert_eq!(records[1].value("Code"), CoercedValue::text("only-first"));
    }

    #[test]
    fn test_records_stream_in_source_order() {
        let mut sheet = Worksheet::new("Data");
        sheet.push_row(["N"]);
        for n in [3.0, 1.0, 2.0] {
            sheet.push_row([n]);
        }

        let materializer = RecordMaterializer::default();
        let mut records = materializer.materialize(&sheet).unwrap();
        assert_eq!(records.headers().len(), 1);
        let values: Vec<String> = records
            .by_ref()
            .map(|r| r.unwrap().value("N").to_string())
            .collect();
        assert_eq!(values, vec!["3", "1", "2"]);
        assert!(records.next().is_none());
    }
}
