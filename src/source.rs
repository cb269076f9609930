//! Loading of inflammation tables from a data directory.

use crate::error::Error;
use crate::normalise::numeric_array;
use glob::{Pattern, glob};
use ndarray::{Array2, Ix1};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

/// Anything able to produce a collection of inflammation tables.
pub trait DataSource {
    /// Load every table of the collection, one per data file.
    ///
    /// # Errors
    /// Returns [`Error::NoDataFiles`] if there is nothing to load, or the
    /// error of the first file that fails to load.
    fn load_inflammation_data(&self) -> Result<Vec<Array2<f64>>, Error>;
}

/// On-disk format of the data files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Csv,
    Json,
}

impl DataFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
        }
    }

    /// Guess the format of a single file from its extension.
    pub fn from_path<P: AsRef<Path>>(file: P) -> Option<Self> {
        let ext = file.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DataFormat::Csv),
            "json" => Some(DataFormat::Json),
            _ => None,
        }
    }

    /// Load a single table in this format.
    pub fn load<P: AsRef<Path>>(self, file: P) -> Result<Array2<f64>, Error> {
        match self {
            DataFormat::Csv => load_csv(file),
            DataFormat::Json => load_json(file),
        }
    }
}

/// Construct the data source reading `inflammation*.<ext>` files from `dir`.
pub fn data_source<P: AsRef<Path>>(format: DataFormat, dir: P) -> Box<dyn DataSource> {
    match format {
        DataFormat::Csv => Box::new(CsvDataSource::new(dir)),
        DataFormat::Json => Box::new(JsonDataSource::new(dir)),
    }
}

/// Comma-separated files without a header, one patient per line.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for CsvDataSource {
    fn load_inflammation_data(&self) -> Result<Vec<Array2<f64>>, Error> {
        find_data_files(&self.dir, DataFormat::Csv)?
            .iter()
            .map(load_csv)
            .collect()
    }
}

/// JSON files holding an array of `{ "observations": [...] }` records, one
/// patient per record.
#[derive(Debug, Clone)]
pub struct JsonDataSource {
    dir: PathBuf,
}

impl JsonDataSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for JsonDataSource {
    fn load_inflammation_data(&self) -> Result<Vec<Array2<f64>>, Error> {
        find_data_files(&self.dir, DataFormat::Json)?
            .iter()
            .map(load_json)
            .collect()
    }
}

fn find_data_files(dir: &Path, format: DataFormat) -> Result<Vec<PathBuf>, Error> {
    let dir = Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&dir).join(format!("inflammation*.{}", format.extension()));
    let pattern = pattern.to_string_lossy().into_owned();

    let paths = glob(&pattern).map_err(|err| Error::Io {
        path: PathBuf::from(&pattern),
        source: io::Error::new(io::ErrorKind::InvalidInput, err),
    })?;
    let files: Vec<_> = paths
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    if files.is_empty() {
        return Err(Error::NoDataFiles { pattern });
    }

    log::debug!("found {} files matching {pattern:?}", files.len());
    Ok(files)
}

fn open<P: AsRef<Path>>(file: P) -> Result<File, Error> {
    let path = file.as_ref();
    File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a table from a CSV file.
///
/// Empty fields and `nan` are read as missing values (`NaN`). Every line must
/// have the same number of fields.
pub fn load_csv<P: AsRef<Path>>(file: P) -> Result<Array2<f64>, Error> {
    let file = file.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(open(file)?);

    let mut vals = Vec::new();
    let mut n_rows = 0;
    let mut n_cols = None;
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map_or(n_rows + 1, |pos| pos.line() as usize);

        let exp_n_cols = *n_cols.get_or_insert(record.len());
        if record.len() != exp_n_cols {
            return Err(Error::Shape(format!(
                "{file:?} line {line} has {} values, but previous lines have {exp_n_cols}",
                record.len()
            )));
        }

        for (i_col, field) in record.iter().enumerate() {
            let val = parse_value(field).ok_or_else(|| Error::Parse {
                path: file.to_path_buf(),
                line,
                column: i_col + 1,
                value: field.to_string(),
            })?;
            vals.push(val);
        }
        n_rows += 1;
    }

    let table = Array2::from_shape_vec((n_rows, n_cols.unwrap_or(0)), vals)?;
    log::debug!("loaded {file:?} with shape {:?}", table.dim());
    Ok(table)
}

fn parse_value(field: &str) -> Option<f64> {
    if field.is_empty() {
        return Some(f64::NAN);
    }
    field.parse().ok()
}

#[derive(Debug, Deserialize)]
struct PatientRecord {
    observations: Value,
}

/// Load a table from a JSON file of patient records.
///
/// Every record becomes one row, so all `observations` arrays must have the
/// same length. `null` observations are read as missing values (`NaN`).
pub fn load_json<P: AsRef<Path>>(file: P) -> Result<Array2<f64>, Error> {
    let file = file.as_ref();
    let reader = BufReader::new(open(file)?);
    let records: Vec<PatientRecord> = serde_json::from_reader(reader)?;

    let mut vals = Vec::new();
    let mut n_cols = None;
    for (i_rec, record) in records.iter().enumerate() {
        let row = numeric_array(&record.observations)?
            .into_dimensionality::<Ix1>()
            .map_err(|_| {
                Error::Shape(format!(
                    "{file:?} record {i_rec} observations should be a flat array"
                ))
            })?;

        let exp_n_cols = *n_cols.get_or_insert(row.len());
        if row.len() != exp_n_cols {
            return Err(Error::Shape(format!(
                "{file:?} record {i_rec} has {} observations, but previous records have {exp_n_cols}",
                row.len()
            )));
        }
        vals.extend(row.iter().copied());
    }

    let table = Array2::from_shape_vec((records.len(), n_cols.unwrap_or(0)), vals)?;
    log::debug!("loaded {file:?} with shape {:?}", table.dim());
    Ok(table)
}
