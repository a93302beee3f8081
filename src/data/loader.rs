use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Dataset, RawGeolocation, RawRecord};

/// Public "Meteorite Landings" endpoint.
pub const DEFAULT_SOURCE_URL: &str = "https://data.nasa.gov/resource/gh4g-9sfh.json";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset dump from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – the API payload: `[{ "name": ..., "mass": ..., ... }, ...]`
/// * `.csv`     – header row with the same column names
/// * `.parquet` – columns with the same names, string or numeric
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Fetch the dataset over HTTP. Blocks until the whole body is read.
pub fn fetch_remote(url: &str) -> Result<Dataset> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .context("Connection to API unsuccessful")?;
    let raw: Vec<RawRecord> = response.json().context("decoding API response")?;
    Ok(Dataset::from_raw(raw))
}

/// Run `fetch_remote` on a background thread.
///
/// The single result is delivered on the returned channel; `notify` runs
/// right after it is sent so the UI can wake up.
pub fn spawn_fetch<F>(url: String, notify: F) -> Receiver<Result<Dataset>>
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        log::debug!("Fetching dataset from {url}");
        let result = fetch_remote(&url);
        // The receiver only disappears when the app is shutting down.
        let _ = tx.send(result);
        notify();
    });
    rx
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Parse an API payload: a top-level array of record objects.
pub fn parse_json(text: &str) -> Result<Dataset> {
    let raw: Vec<RawRecord> =
        serde_json::from_str(text).context("Expected a top-level JSON array of objects")?;
    Ok(Dataset::from_raw(raw))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header names are matched case-insensitively; a unit suffix such as
/// `mass (g)` is ignored. `GeoLocation` cells of the form `"(lat, lon)"`
/// are used when `reclat`/`reclong` are missing.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: HashMap<String, usize> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .collect();

    let mut raw = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |col: &str| -> Option<String> {
            columns
                .get(col)
                .and_then(|&i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        raw.push(RawRecord {
            name: cell("name"),
            id: cell("id"),
            nametype: cell("nametype"),
            recclass: cell("recclass"),
            mass: cell("mass"),
            fall: cell("fall"),
            year: cell("year"),
            reclat: cell("reclat"),
            reclong: cell("reclong"),
            geolocation: cell("geolocation").and_then(|g| parse_point(&g)),
        });
    }

    Ok(Dataset::from_raw(raw))
}

fn normalize_header(header: &str) -> String {
    header
        .split('(')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// `"(50.775, 6.08333)"` → latitude / longitude text.
fn parse_point(text: &str) -> Option<RawGeolocation> {
    let inner = text.trim().trim_start_matches('(').trim_end_matches(')');
    let (lat, lon) = inner.split_once(',')?;
    Some(RawGeolocation {
        latitude: Some(lat.trim().to_string()),
        longitude: Some(lon.trim().to_string()),
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet dump. Every known column is optional and may hold
/// strings or numbers; other columns are ignored.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raw = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let name = column("name");
        let id = column("id");
        let nametype = column("nametype");
        let recclass = column("recclass");
        let mass = column("mass");
        let fall = column("fall");
        let year = column("year");
        let reclat = column("reclat");
        let reclong = column("reclong");

        let text = |col: Option<&Arc<dyn Array>>, row: usize| -> Option<String> {
            col.and_then(|c| extract_text(c, row))
        };

        for row in 0..batch.num_rows() {
            raw.push(RawRecord {
                name: text(name, row),
                id: text(id, row),
                nametype: text(nametype, row),
                recclass: text(recclass, row),
                mass: text(mass, row),
                fall: text(fall, row),
                year: text(year, row),
                reclat: text(reclat, row),
                reclong: text(reclong, row),
                geolocation: None,
            });
        }
    }

    Ok(Dataset::from_raw(raw))
}

/// Render a single Arrow cell as text. Nulls and unsupported types are `None`.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_any().downcast_ref::<StringArray>()?.value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_any().downcast_ref::<Int32Array>()?.value(row).to_string(),
        DataType::Int64 => col.as_any().downcast_ref::<Int64Array>()?.value(row).to_string(),
        DataType::Float32 => col.as_any().downcast_ref::<Float32Array>()?.value(row).to_string(),
        DataType::Float64 => col.as_any().downcast_ref::<Float64Array>()?.value(row).to_string(),
        DataType::Boolean => col.as_any().downcast_ref::<BooleanArray>()?.value(row).to_string(),
        other => {
            log::warn!("Ignoring parquet column of type {other:?}");
            return None;
        }
    };
    Some(text)
}
