//! CSV loading
//!
//! A CSV file has no cell types of its own, so every field is given a declared
//! kind on the way in: from `column_kinds` when the header names the column,
//! by auto-detection otherwise, or plain text when detection is off.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use cellwise_core::{CellKind, DateSystem, RawValue};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SheetResult;
use crate::worksheet::{StoredCell, Worksheet};

/// Options for reading CSV files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether first row is header
    pub has_header: bool,
    /// Automatic type detection
    pub auto_detect_types: bool,
    /// Declared kinds by header name; the raw text is kept and coerced under that kind
    pub column_kinds: HashMap<String, CellKind>,
    /// Header names of columns holding dates
    pub date_columns: HashSet<String>,
    /// `chrono` format of date column text (default: `%Y-%m-%d`)
    pub date_input_format: String,
    /// Date system used to store date serials
    pub date_system: DateSystem,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            auto_detect_types: true,
            column_kinds: HashMap::new(),
            date_columns: HashSet::new(),
            date_input_format: cellwise_core::DEFAULT_DATE_FORMAT.to_string(),
            date_system: DateSystem::default(),
        }
    }
}

impl CsvReadOptions {
    /// Declare the kind of a column
    pub fn with_column_kind<S: Into<String>>(mut self, column: S, kind: CellKind) -> Self {
        self.column_kinds.insert(column.into(), kind);
        self
    }

    /// Mark a column as holding dates
    pub fn with_date_column<S: Into<String>>(mut self, column: S) -> Self {
        self.date_columns.insert(column.into());
        self
    }
}

/// How one column's fields are stored
#[derive(Debug, Clone, Copy)]
enum ColumnRule {
    Detect,
    Text,
    Declared(CellKind),
    Date,
}

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a worksheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> SheetResult<Worksheet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut worksheet = Self::read(file, options)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            worksheet.set_name(stem);
        }
        tracing::debug!(
            "Loaded '{}' with {} rows",
            path.display(),
            worksheet.next_row()
        );
        Ok(worksheet)
    }

    /// Read CSV from a reader into a worksheet
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> SheetResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new("Sheet1");
        let mut row_idx = 0u32;
        let mut rules = Vec::new();

        if options.has_header {
            let headers = csv_reader.headers()?.clone();
            for (col, name) in headers.iter().enumerate() {
                if !name.is_empty() {
                    worksheet.set_cell_at(row_idx, col as u16, StoredCell::text(name));
                }
                rules.push(Self::column_rule(name.trim(), options));
            }
            worksheet.touch_row(row_idx);
            row_idx += 1;
        }

        for result in csv_reader.records() {
            let record = result?;
            worksheet.touch_row(row_idx);

            for (col, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let rule = rules.get(col).copied().unwrap_or(if options.auto_detect_types {
                    ColumnRule::Detect
                } else {
                    ColumnRule::Text
                });
                let cell = Self::store(field, rule, options);
                worksheet.set_cell_at(row_idx, col as u16, cell);
            }

            row_idx += 1;
        }

        Ok(worksheet)
    }

    fn column_rule(name: &str, options: &CsvReadOptions) -> ColumnRule {
        if options.date_columns.contains(name) {
            ColumnRule::Date
        } else if let Some(kind) = options.column_kinds.get(name) {
            ColumnRule::Declared(*kind)
        } else if options.auto_detect_types {
            ColumnRule::Detect
        } else {
            ColumnRule::Text
        }
    }

    fn store(field: &str, rule: ColumnRule, options: &CsvReadOptions) -> StoredCell {
        match rule {
            ColumnRule::Detect => Self::detect_type(field),
            ColumnRule::Text => StoredCell::text(field),
            ColumnRule::Declared(kind) => StoredCell::declared(kind, RawValue::text(field)),
            ColumnRule::Date => match Self::parse_date(field.trim(), &options.date_input_format) {
                Some(date) => StoredCell::date(date, options.date_system),
                None => {
                    tracing::debug!("Unparseable date {field:?}; stored as text");
                    StoredCell::text(field)
                }
            },
        }
    }

    fn parse_date(field: &str, format: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(field, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(field, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> StoredCell {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return StoredCell::text(field);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return StoredCell::boolean(true),
            "false" => return StoredCell::boolean(false),
            _ => {}
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return StoredCell::number(n);
            }
        }

        StoredCell::text(field)
    }
}
