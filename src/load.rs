// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Bulk-loading of road networks from road-map CSV files.
//!
//! A road-map file describes one directed road per record, preceded by a
//! header row:
//!
//! ```text
//! from_lat,from_lon,to_lat,to_lon,name,category,length,geometry
//! 52.2297,21.0122,52.2299,21.0145,Nowy Świat,residential,0.16,
//! ```
//!
//! Lengths are in kilometers. The trailing `geometry` field is optional
//! and carries the road's intermediate shape points as semicolon-separated
//! `lat lon` pairs.
//!
//! Loading is permissive, as suits bulk ingestion of noisy map data:
//! vertices are created implicitly for both endpoints of every record,
//! while malformed records and roads rejected by the [Graph] are skipped
//! with a warning. Only I/O and CSV-structure failures abort the load.

use std::fs::File;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::{GeoPoint, Graph, Road};

/// Format of the input road-map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// Guess the format from the file extension, falling back to plain CSV.
    /// Only meaningful with [add_roads_from_file]; elsewhere treated as
    /// [FileFormat::Csv].
    #[default]
    Unknown,

    /// Force plain CSV
    Csv,

    /// Force CSV with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    CsvGz,

    /// Force CSV with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    CsvBz2,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Self::CsvGz,
            Some("bz2") => Self::CsvBz2,
            _ => Self::Csv,
        }
    }
}

/// Error conditions which may abort loading a road-map file.
///
/// Problems with individual records don't abort the load - they are
/// logged and the offending record is skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o: {0}")]
    Io(#[from] io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

const FIELD_NAMES: [&str; 8] = [
    "from_lat",
    "from_lon",
    "to_lat",
    "to_lon",
    "name",
    "category",
    "length",
    "geometry",
];

#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("invalid {0}: {1}")]
    InvalidNumber(&'static str, std::num::ParseFloatError),

    #[error("invalid geometry point: {0:?}")]
    InvalidGeometry(String),
}

/// Parse road records from a file at the provided path into a [Graph].
/// Returns the number of roads added.
pub fn add_roads_from_file<P: AsRef<Path>>(
    g: &mut Graph,
    format: FileFormat,
    path: P,
) -> Result<usize, Error> {
    let format = match format {
        FileFormat::Unknown => FileFormat::from_path(path.as_ref()),
        other => other,
    };
    let f = File::open(path)?;
    add_roads_from_io(g, format, f)
}

/// Parse road records from a reader into a [Graph].
/// Returns the number of roads added.
///
/// The provided stream will be automatically wrapped in a buffered reader
/// when needed.
pub fn add_roads_from_io<R: io::Read>(
    g: &mut Graph,
    format: FileFormat,
    reader: R,
) -> Result<usize, Error> {
    match format {
        FileFormat::Unknown | FileFormat::Csv => add_records(g, reader),

        FileFormat::CsvGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            add_records(g, d)
        }

        FileFormat::CsvBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            add_records(g, d)
        }
    }
}

/// Parse road records from a static buffer into a [Graph].
/// Returns the number of roads added.
pub fn add_roads_from_buffer(g: &mut Graph, format: FileFormat, data: &[u8]) -> Result<usize, Error> {
    add_roads_from_io(g, format, data)
}

fn add_records<R: io::Read>(g: &mut Graph, reader: R) -> Result<usize, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut added: usize = 0;
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        // Record numbers in logs are 1-based, counting from the header
        let line = idx + 2;

        match parse_record(&record) {
            Ok(road) => {
                g.add_vertex(road.from);
                g.add_vertex(road.to);
                match g.add_edge(road) {
                    Ok(()) => added += 1,
                    Err(rejection) => warn!("record {}: {}", line, rejection),
                }
            }
            Err(e) => warn!("record {}: {}", line, e),
        }
    }

    debug!("loaded {} roads", added);
    Ok(added)
}

fn parse_record(record: &csv::StringRecord) -> Result<Road, RecordError> {
    let from = GeoPoint::new(parse_float(record, 0)?, parse_float(record, 1)?);
    let to = GeoPoint::new(parse_float(record, 2)?, parse_float(record, 3)?);
    let name = parse_str(record, 4)?;
    let category = parse_str(record, 5)?;
    let length = parse_float(record, 6)?;

    let mut road = Road::new(from, to, name, category, length);
    if let Some(geometry) = record.get(7) {
        road = road.with_geometry(parse_geometry(geometry)?);
    }
    Ok(road)
}

fn parse_str<'a>(record: &'a csv::StringRecord, idx: usize) -> Result<&'a str, RecordError> {
    record.get(idx).ok_or(RecordError::MissingField(FIELD_NAMES[idx]))
}

fn parse_float(record: &csv::StringRecord, idx: usize) -> Result<f64, RecordError> {
    parse_str(record, idx)?
        .trim()
        .parse()
        .map_err(|e| RecordError::InvalidNumber(FIELD_NAMES[idx], e))
}

fn parse_geometry(value: &str) -> Result<Vec<GeoPoint>, RecordError> {
    value
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let invalid = || RecordError::InvalidGeometry(pair.to_string());
            let mut coords = pair.split_whitespace();
            match (coords.next(), coords.next(), coords.next()) {
                (Some(lat), Some(lon), None) => {
                    let lat = lat.parse().map_err(|_| invalid())?;
                    let lon = lon.parse().map_err(|_| invalid())?;
                    Ok(GeoPoint::new(lat, lon))
                }
                _ => Err(invalid()),
            }
        })
        .collect()
}
