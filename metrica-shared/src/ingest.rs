/// CSV upload parsing and column validation
///
/// Every bulk ingestion endpoint follows the same contract: reject
/// non-`.csv` filenames, parse the upload into named columns, check the
/// required column set for the record kind, convert cells into typed
/// rows, and hand the whole batch to a single bulk insert. Extra columns
/// are ignored; a single malformed cell fails the entire upload.
///
/// # Example
///
/// ```
/// use metrica_shared::ingest::{check_csv_filename, parse_productivity, CsvTable};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// check_csv_filename("metrics.csv")?;
///
/// let table = CsvTable::parse(b"user_id,date,value\n1,2024-01-01,3.5\n")?;
/// let rows = parse_productivity(&table)?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].value, 3.5);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::metrics::{NewProductivity, NewReport, NewSale};
use crate::models::task::{NewTaskLog, RoleTask, Task};

/// Error type for CSV ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Upload filename does not end in `.csv`
    #[error("Only CSV files are accepted")]
    UnsupportedFormat,

    /// The header row is missing one or more required columns
    #[error("Required columns: {0}")]
    MissingColumns(String),

    /// The file is not well-formed CSV
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A cell could not be parsed into its column's type
    #[error("Row {line}, column '{column}': {message}")]
    BadValue {
        /// 1-based line number in the file (header is line 1)
        line: usize,
        column: &'static str,
        message: String,
    },
}

/// Rejects filenames whose extension is not `.csv` (case-insensitive)
pub fn check_csv_filename(filename: &str) -> Result<(), IngestError> {
    if filename.to_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(IngestError::UnsupportedFormat)
    }
}

/// A parsed CSV file: a header row plus data records
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    /// Parses raw bytes into a table, treating the first row as headers
    ///
    /// Every record must have as many fields as the header; a ragged row
    /// fails the whole upload rather than filling text columns with
    /// empty strings.
    pub fn parse(data: &[u8]) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }

        Ok(Self { headers, rows })
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves the index of each required column
    ///
    /// Fails with `MissingColumns` naming the full required set if any
    /// column is absent, matching the error surfaced to uploaders.
    fn require(&self, required: &[&'static str]) -> Result<Vec<usize>, IngestError> {
        let indexes: Option<Vec<usize>> = required
            .iter()
            .map(|name| self.headers.iter().position(|h| h == name))
            .collect();

        indexes.ok_or_else(|| IngestError::MissingColumns(required.join(", ")))
    }

    fn cell<'a>(&self, record: &'a StringRecord, index: usize) -> &'a str {
        record.get(index).unwrap_or("")
    }
}

fn parse_i32(raw: &str, line: usize, column: &'static str) -> Result<i32, IngestError> {
    raw.parse::<i32>().map_err(|_| IngestError::BadValue {
        line,
        column,
        message: format!("expected an integer, got '{}'", raw),
    })
}

fn parse_f64(raw: &str, line: usize, column: &'static str) -> Result<f64, IngestError> {
    raw.parse::<f64>().map_err(|_| IngestError::BadValue {
        line,
        column,
        message: format!("expected a number, got '{}'", raw),
    })
}

fn parse_date(raw: &str, line: usize, column: &'static str) -> Result<NaiveDate, IngestError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| IngestError::BadValue {
        line,
        column,
        message: format!("expected a date (YYYY-MM-DD), got '{}'", raw),
    })
}

/// Parses a timezone-aware instant
///
/// Accepts RFC 3339, a naive `YYYY-MM-DD HH:MM:SS` (also with a `T`
/// separator) interpreted as UTC, or a bare date taken as UTC midnight.
fn parse_timestamp(
    raw: &str,
    line: usize,
    column: &'static str,
) -> Result<DateTime<Utc>, IngestError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap();
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(IngestError::BadValue {
        line,
        column,
        message: format!("expected a timestamp, got '{}'", raw),
    })
}

/// Parses a quantity cell, defaulting to 1 when empty
fn parse_quantity(raw: &str, line: usize, column: &'static str) -> Result<Decimal, IngestError> {
    if raw.is_empty() {
        return Ok(Decimal::ONE);
    }

    Decimal::from_str(raw).map_err(|_| IngestError::BadValue {
        line,
        column,
        message: format!("expected a decimal quantity, got '{}'", raw),
    })
}

/// Parses a tasks upload (columns: id, name, description)
pub fn parse_tasks(table: &CsvTable) -> Result<Vec<Task>, IngestError> {
    let idx = table.require(&["id", "name", "description"])?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = i + 2;
            Ok(Task {
                id: parse_i32(table.cell(record, idx[0]), line, "id")?,
                name: table.cell(record, idx[1]).to_string(),
                description: table.cell(record, idx[2]).to_string(),
            })
        })
        .collect()
}

/// Parses a role-tasks upload (columns: role_id, task_id)
pub fn parse_role_tasks(table: &CsvTable) -> Result<Vec<RoleTask>, IngestError> {
    let idx = table.require(&["role_id", "task_id"])?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = i + 2;
            Ok(RoleTask {
                role_id: parse_i32(table.cell(record, idx[0]), line, "role_id")?,
                task_id: parse_i32(table.cell(record, idx[1]), line, "task_id")?,
            })
        })
        .collect()
}

/// Parses a task-logs upload (columns: user_id, task_id, date, quantity)
pub fn parse_task_logs(table: &CsvTable) -> Result<Vec<NewTaskLog>, IngestError> {
    let idx = table.require(&["user_id", "task_id", "date", "quantity"])?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = i + 2;
            Ok(NewTaskLog {
                user_id: parse_i32(table.cell(record, idx[0]), line, "user_id")?,
                task_id: parse_i32(table.cell(record, idx[1]), line, "task_id")?,
                date: parse_date(table.cell(record, idx[2]), line, "date")?,
                quantity: parse_quantity(table.cell(record, idx[3]), line, "quantity")?,
            })
        })
        .collect()
}

/// Parses a productivity upload (columns: user_id, date, value)
pub fn parse_productivity(table: &CsvTable) -> Result<Vec<NewProductivity>, IngestError> {
    let idx = table.require(&["user_id", "date", "value"])?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = i + 2;
            Ok(NewProductivity {
                user_id: parse_i32(table.cell(record, idx[0]), line, "user_id")?,
                date: parse_date(table.cell(record, idx[1]), line, "date")?,
                value: parse_f64(table.cell(record, idx[2]), line, "value")?,
            })
        })
        .collect()
}

/// Parses a sales upload (columns: user_id, date, amount)
pub fn parse_sales(table: &CsvTable) -> Result<Vec<NewSale>, IngestError> {
    let idx = table.require(&["user_id", "date", "amount"])?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = i + 2;
            Ok(NewSale {
                user_id: parse_i32(table.cell(record, idx[0]), line, "user_id")?,
                date: parse_date(table.cell(record, idx[1]), line, "date")?,
                amount: parse_f64(table.cell(record, idx[2]), line, "amount")?,
            })
        })
        .collect()
}

/// Parses a reports upload (columns: user_id, created_at, type)
pub fn parse_reports(table: &CsvTable) -> Result<Vec<NewReport>, IngestError> {
    let idx = table.require(&["user_id", "created_at", "type"])?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = i + 2;
            Ok(NewReport {
                user_id: parse_i32(table.cell(record, idx[0]), line, "user_id")?,
                created_at: parse_timestamp(table.cell(record, idx[1]), line, "created_at")?,
                kind: table.cell(record, idx[2]).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_csv_filename() {
        assert!(check_csv_filename("data.csv").is_ok());
        assert!(check_csv_filename("DATA.CSV").is_ok());
        assert!(check_csv_filename("archive.tar.csv").is_ok());

        assert!(check_csv_filename("data.xlsx").is_err());
        assert!(check_csv_filename("data.csv.txt").is_err());
        assert!(check_csv_filename("data").is_err());
    }

    #[test]
    fn test_parse_table() {
        let table = CsvTable::parse(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_missing_columns_names_required_set() {
        let table = CsvTable::parse(b"user_id,date\n1,2024-01-01\n").unwrap();

        let err = parse_productivity(&table).unwrap_err();
        match err {
            IngestError::MissingColumns(cols) => {
                assert_eq!(cols, "user_id, date, value");
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_productivity_rows() {
        let table =
            CsvTable::parse(b"user_id,date,value\n1,2024-01-01,3.5\n2,2024-01-02,4\n").unwrap();

        let rows = parse_productivity(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].value, 3.5);
        assert_eq!(rows[1].value, 4.0);
    }

    #[test]
    fn test_short_row_is_rejected() {
        // A row missing its trailing fields must not insert empty strings
        let result = CsvTable::parse(b"id,name,description\n1,review\n");
        assert!(matches!(result, Err(IngestError::Csv(_))));
    }

    #[test]
    fn test_empty_trailing_field_is_still_a_field() {
        let table = CsvTable::parse(b"id,name,description\n1,review,\n").unwrap();
        let rows = parse_tasks(&table).unwrap();
        assert_eq!(rows[0].description, "");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let table =
            CsvTable::parse(b"note,user_id,date,value\nhi,1,2024-01-01,3.5\n").unwrap();

        let rows = parse_productivity(&table).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, 1);
    }

    #[test]
    fn test_bad_cell_reports_line_and_column() {
        let table =
            CsvTable::parse(b"user_id,date,value\n1,2024-01-01,3.5\nx,2024-01-02,4\n").unwrap();

        let err = parse_productivity(&table).unwrap_err();
        match err {
            IngestError::BadValue { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "user_id");
            }
            other => panic!("expected BadValue, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let table = CsvTable::parse(b"user_id,date,value\n1,01/02/2024,3.5\n").unwrap();
        assert!(matches!(
            parse_productivity(&table),
            Err(IngestError::BadValue { column: "date", .. })
        ));
    }

    #[test]
    fn test_parse_tasks_rows() {
        let table =
            CsvTable::parse(b"id,name,description\n1,review,weekly review\n2,triage,bug triage\n")
                .unwrap();

        let rows = parse_tasks(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].name, "triage");
    }

    #[test]
    fn test_parse_role_tasks_rows() {
        let table = CsvTable::parse(b"role_id,task_id\n1,10\n1,11\n").unwrap();

        let rows = parse_role_tasks(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].task_id, 11);
    }

    #[test]
    fn test_task_log_quantity_defaults_to_one_when_empty() {
        let table = CsvTable::parse(
            b"user_id,task_id,date,quantity\n1,10,2024-01-01,2.5\n1,11,2024-01-01,\n",
        )
        .unwrap();

        let rows = parse_task_logs(&table).unwrap();
        assert_eq!(rows[0].quantity, Decimal::from_str("2.5").unwrap());
        assert_eq!(rows[1].quantity, Decimal::ONE);
    }

    #[test]
    fn test_parse_sales_rows() {
        let table = CsvTable::parse(b"user_id,date,amount\n3,2024-02-01,99.99\n").unwrap();

        let rows = parse_sales(&table).unwrap();
        assert_eq!(rows[0].user_id, 3);
        assert_eq!(rows[0].amount, 99.99);
    }

    #[test]
    fn test_report_timestamp_formats() {
        let table = CsvTable::parse(
            b"user_id,created_at,type\n\
              1,2024-06-01T12:00:00Z,weekly\n\
              1,2024-06-01 12:00:00,weekly\n\
              1,2024-06-01,weekly\n",
        )
        .unwrap();

        let rows = parse_reports(&table).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].created_at, rows[1].created_at);
        assert_eq!(
            rows[2].created_at,
            "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(rows[0].kind, "weekly");
    }

    #[test]
    fn test_rfc3339_offset_is_normalized_to_utc() {
        let table =
            CsvTable::parse(b"user_id,created_at,type\n1,2024-06-01T14:00:00+02:00,daily\n")
                .unwrap();

        let rows = parse_reports(&table).unwrap();
        assert_eq!(
            rows[0].created_at,
            "2024-06-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_empty_file_has_no_rows() {
        let table = CsvTable::parse(b"user_id,date,value\n").unwrap();
        let rows = parse_productivity(&table).unwrap();
        assert!(rows.is_empty());
    }
}
