use crate::errors::AppError;
use crate::models::{Table, TableKind};
use std::cmp::Ordering;
use std::{env, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("EDUTRANSFORM_DATA_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from("data")
}

/// Append-only access to the three CSV tables. One instance owns the data
/// directory; handlers share it behind a mutex so read-modify-write appends
/// never interleave.
pub struct TabularStore {
    data_dir: PathBuf,
}

impl TabularStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Loads a table in stored order. A file that does not exist yet reads as
    /// an empty table with the canonical schema; nothing is written. A file
    /// that exists is returned with exactly the columns it has on disk, drift
    /// and all.
    pub async fn load(&self, kind: TableKind) -> Result<Table, AppError> {
        let path = self.table_path(kind);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Table::empty(kind.columns()));
            }
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                return Err(AppError::storage_read(&path, csv::Error::from(err)));
            }
        };

        decode_csv(&bytes).map_err(|err| {
            error!("failed to parse {}: {err}", path.display());
            AppError::storage_read(&path, err)
        })
    }

    /// Read-modify-write append: loads the table, aligns `row` to the loaded
    /// columns (absent columns become empty cells, keys without a matching
    /// column are dropped) and rewrites the whole file. Returns the table as
    /// written.
    pub async fn append(&self, kind: TableKind, row: &[(&str, String)]) -> Result<Table, AppError> {
        let mut table = self.load(kind).await?;
        table.rows.push(align_row(&table.columns, row));

        let path = self.table_path(kind);
        let payload = encode_csv(&table).map_err(|err| AppError::storage_write(&path, err))?;
        fs::write(&path, payload).await.map_err(|err| {
            error!("failed to write {}: {err}", path.display());
            AppError::storage_write(&path, csv::Error::from(err))
        })?;

        Ok(table)
    }
}

/// Rows ordered by `column` descending. Cells that both parse as integers
/// compare numerically, anything else lexicographically; the sort is stable,
/// so ties keep their stored order. Unknown columns leave the order as is.
pub fn sort_descending(table: &Table, column: &str) -> Table {
    let mut rows = table.rows.clone();
    if let Some(idx) = table.column_index(column) {
        rows.sort_by(|a, b| compare_cells(cell(b, idx), cell(a, idx)));
    }

    Table {
        columns: table.columns.clone(),
        rows,
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

fn align_row(columns: &[String], row: &[(&str, String)]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            row.iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .collect()
}

fn decode_csv(bytes: &[u8]) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // short rows from a drifted file pad out to the header width
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok(Table { columns, rows })
}

fn encode_csv(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
