use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Column, FleetDataset, VehicleRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading the vehicle table. All of these
/// are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("expected a top-level JSON array of records")]
    NotRecordArray,
    /// `row` counts data rows from 1; the CSV header is not a row.
    #[error("row {row}: '{value}' is not a valid model year")]
    InvalidYear { row: usize, value: String },
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the vehicle table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the expected column names (recommended)
/// * `.json`    – `[{ "Vehicle Type": "Taxi", ... }, ...]`
/// * `.parquet` – one column per field, strings or numbers
pub fn load_file(path: &Path) -> Result<FleetDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = FleetDataset::from_records(records);
    log::info!(
        "Loaded {} vehicles from {} ({} types, {} fuel sources, years {:?})",
        dataset.len(),
        path.display(),
        dataset.vehicle_types().len(),
        dataset.fuel_sources().len(),
        dataset.year_bounds(),
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw row – untyped cells shared by every format
// ---------------------------------------------------------------------------

/// One row as text, before validation. Field names match the CSV headers.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(rename = "Vehicle Type")]
    vehicle_type: Option<String>,
    #[serde(rename = "Vehicle Fuel Source")]
    fuel_source: Option<String>,
    #[serde(rename = "Vehicle Model Year")]
    model_year: Option<String>,
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Company Name")]
    company_name: Option<String>,
    #[serde(rename = "Wheelchair Accessible")]
    wheelchair_accessible: Option<String>,
    #[serde(rename = "Vehicle Make")]
    make: Option<String>,
    #[serde(rename = "Vehicle Model")]
    model: Option<String>,
}

impl RawRow {
    fn set(&mut self, column: Column, value: Option<String>) {
        let slot = match column {
            Column::VehicleType => &mut self.vehicle_type,
            Column::FuelSource => &mut self.fuel_source,
            Column::ModelYear => &mut self.model_year,
            Column::Status => &mut self.status,
            Column::CompanyName => &mut self.company_name,
            Column::WheelchairAccessible => &mut self.wheelchair_accessible,
            Column::Make => &mut self.make,
            Column::Model => &mut self.model,
        };
        *slot = value;
    }

    fn into_record(self, row: usize) -> Result<VehicleRecord> {
        Ok(VehicleRecord {
            vehicle_type: clean(self.vehicle_type),
            fuel_source: clean(self.fuel_source),
            model_year: parse_year(clean(self.model_year), row)?,
            status: clean(self.status),
            company_name: clean(self.company_name),
            wheelchair_accessible: clean(self.wheelchair_accessible),
            make: clean(self.make),
            model: clean(self.model),
        })
    }
}

/// Trim and turn blanks into `None`.
fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts `2015` and integral floats such as `2015.0`, which is what a
/// float column looks like after a join introduced missing values.
fn parse_year(value: Option<String>, row: usize) -> Result<Option<i32>> {
    let Some(text) = value else {
        return Ok(None);
    };
    if let Ok(year) = text.parse::<i32>() {
        return Ok(Some(year));
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_nan() => Ok(None),
        Ok(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
            Ok(Some(f as i32))
        }
        _ => Err(LoadError::InvalidYear { row, value: text }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with (at least) the eight expected column names, in
/// any order. Extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<VehicleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in Column::ALL {
        if !headers.iter().any(|h| h == column.header()) {
            return Err(LoadError::MissingColumn(column.header()));
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result?;
        records.push(raw.into_record(row_no + 1)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Vehicle Type": "Taxi", "Vehicle Model Year": 2015, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<VehicleRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or(LoadError::NotRecordArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, value) in rows.iter().enumerate() {
        let row_no = row_no + 1;
        let obj = value.as_object().ok_or_else(|| LoadError::InvalidRow {
            row: row_no,
            reason: "not a JSON object".to_string(),
        })?;

        let mut raw = RawRow::default();
        for column in Column::ALL {
            let cell = obj
                .get(column.header())
                .ok_or(LoadError::MissingColumn(column.header()))?;
            raw.set(column, json_cell_text(cell));
        }
        records.push(raw.into_record(row_no)?);
    }
    Ok(records)
}

fn json_cell_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings, integers, floats and booleans
/// are all accepted and normalised to text before validation.
fn load_parquet(path: &Path) -> Result<Vec<VehicleRecord>> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns: Vec<(Column, ArrayRef)> = Vec::with_capacity(Column::ALL.len());
        for column in Column::ALL {
            let idx = schema
                .index_of(column.header())
                .map_err(|_| LoadError::MissingColumn(column.header()))?;
            columns.push((column, batch.column(idx).clone()));
        }

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let mut raw = RawRow::default();
            for (column, array) in &columns {
                raw.set(*column, arrow_cell_text(array, row)?);
            }
            records.push(raw.into_record(row_no)?);
        }
    }
    Ok(records)
}

/// Extract a single cell from an Arrow column as text.
fn arrow_cell_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => {
            let v = col.as_primitive::<Float32Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        DataType::Boolean => col.as_boolean().value(row).to_string(),
        _ => arrow::util::display::array_value_to_string(col, row)?,
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Vehicle Type,Vehicle Fuel Source,Vehicle Model Year,Status,Company Name,Wheelchair Accessible,Vehicle Make,Vehicle Model";

    fn write_temp(ext: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_loads_typed_records() {
        let csv = format!(
            "{HEADER},License\n\
             Taxi,Gasoline,2015,ACTIVE,Yellow Cab,N,Toyota,Camry,1\n\
             Pedicab, Human ,,INACTIVE,Bike Co,Y,,,2\n\
             Livery,Hybrid,2019.0,ACTIVE,Acme,N,Ford,Fusion,3\n"
        );
        let file = write_temp("csv", &csv);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        let first = ds.get(0).unwrap();
        assert_eq!(first.vehicle_type.as_deref(), Some("Taxi"));
        assert_eq!(first.model_year, Some(2015));
        let second = ds.get(1).unwrap();
        assert_eq!(second.fuel_source.as_deref(), Some("Human"));
        assert_eq!(second.model_year, None);
        assert_eq!(second.make, None);
        assert_eq!(ds.get(2).unwrap().model_year, Some(2019));
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let file = write_temp("csv", "Vehicle Type,Status\nTaxi,ACTIVE\n");
        match load_file(file.path()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "Vehicle Fuel Source"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_bad_year_is_fatal() {
        let csv = format!(
            "{HEADER}\n\
             Taxi,Gasoline,2010,ACTIVE,A,N,B,C\n\
             Taxi,Gasoline,twenty,ACTIVE,A,N,B,C\n"
        );
        let file = write_temp("csv", &csv);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidYear { row: 2, .. }));
        assert_eq!(err.to_string(), "row 2: 'twenty' is not a valid model year");
    }

    #[test]
    fn json_rows_are_numbered_from_one() {
        let file = write_temp("json", "[42]");
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidRow { row: 1, .. })
        ));

        let file = write_temp("json", r#"{"Vehicle Type": "Taxi"}"#);
        assert!(matches!(load_file(file.path()), Err(LoadError::NotRecordArray)));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn unsupported_extension() {
        let file = write_temp("xlsx", "");
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_records_accept_numeric_years() {
        let json = r#"[
            {"Vehicle Type": "Taxi", "Vehicle Fuel Source": "Electric", "Vehicle Model Year": 2021.0,
             "Status": "ACTIVE", "Company Name": "Volt Cabs", "Wheelchair Accessible": "Y",
             "Vehicle Make": "Tesla", "Vehicle Model": "Model 3"},
            {"Vehicle Type": "Livery", "Vehicle Fuel Source": null, "Vehicle Model Year": null,
             "Status": "ACTIVE", "Company Name": "Acme", "Wheelchair Accessible": "N",
             "Vehicle Make": "Ford", "Vehicle Model": "Transit"}
        ]"#;
        let file = write_temp("json", json);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0).unwrap().model_year, Some(2021));
        assert_eq!(ds.get(1).unwrap().fuel_source, None);
        assert_eq!(ds.fuel_sources(), ["Electric"]);
    }

    /// Write `columns` as a single-batch Parquet file; every field is nullable.
    fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> tempfile::NamedTempFile {
        use std::sync::Arc;

        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let arrays = columns.into_iter().map(|(_, array)| array).collect();
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    fn text_column(values: [&str; 3]) -> ArrayRef {
        std::sync::Arc::new(arrow::array::StringArray::from(values.to_vec()))
    }

    fn fleet_columns() -> Vec<(&'static str, ArrayRef)> {
        use std::sync::Arc;

        use arrow::array::{BooleanArray, Float64Array};

        vec![
            ("Vehicle Type", text_column(["  Livery ", "Taxi", "Taxi"])),
            ("Vehicle Fuel Source", text_column(["Hybrid", "Gasoline", "Electric"])),
            (
                "Vehicle Model Year",
                Arc::new(Float64Array::from(vec![Some(2015.0), Some(f64::NAN), None])),
            ),
            ("Status", text_column(["ACTIVE", "ACTIVE", "INACTIVE"])),
            ("Company Name", text_column(["Acme", "Yellow Cab", "Volt Cabs"])),
            (
                "Wheelchair Accessible",
                Arc::new(BooleanArray::from(vec![Some(true), Some(false), None])),
            ),
            ("Vehicle Make", text_column(["Ford", "Toyota", "Tesla"])),
            ("Vehicle Model", text_column(["Transit", "Camry", "Model 3"])),
        ]
    }

    #[test]
    fn parquet_float_years_and_bool_flags() {
        let file = write_parquet(fleet_columns());
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);

        let years: Vec<Option<i32>> = ds.records().iter().map(|r| r.model_year).collect();
        assert_eq!(years, vec![Some(2015), None, None]);

        let first = ds.get(0).unwrap();
        assert_eq!(first.vehicle_type.as_deref(), Some("Livery"));
        assert_eq!(first.wheelchair_accessible.as_deref(), Some("true"));
        assert_eq!(ds.get(1).unwrap().wheelchair_accessible.as_deref(), Some("false"));
        assert_eq!(ds.get(2).unwrap().wheelchair_accessible, None);
        assert_eq!(ds.vehicle_types(), ["Livery", "Taxi"]);
    }

    #[test]
    fn parquet_missing_column_is_fatal() {
        let mut columns = fleet_columns();
        columns.retain(|(name, _)| *name != "Vehicle Make");
        let file = write_parquet(columns);
        match load_file(file.path()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "Vehicle Make"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parse_year_rules() {
        assert_eq!(parse_year(Some("1999".into()), 0).unwrap(), Some(1999));
        assert_eq!(parse_year(Some("2004.0".into()), 0).unwrap(), Some(2004));
        assert_eq!(parse_year(Some("NaN".into()), 0).unwrap(), None);
        assert_eq!(parse_year(None, 0).unwrap(), None);
        assert!(parse_year(Some("2004.5".into()), 3).is_err());
    }
}
