//! CSV-backed catalog tables for deployments that replace the built-in dataset.
//!
//! A catalog directory holds three files:
//!
//! - `types.csv`: `id,name`
//! - `makes.csv`: `id,name,types`
//! - `models.csv`: `id,name,make_id,types,year_start,year_end`
//!
//! `types` columns list vehicle type ids separated by `;`. An empty `year_end` marks a model
//! that is still in production.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{
    CatalogError, TypeMatchPolicy, VehicleCatalog, VehicleMake, VehicleModel, VehicleType,
    YearRange,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to open catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {table} CSV data: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct TypeRow {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MakeRow {
    id: String,
    name: String,
    types: String,
}

#[derive(Debug, Deserialize)]
struct ModelRow {
    id: String,
    name: String,
    make_id: String,
    types: String,
    year_start: i32,
    year_end: Option<i32>,
}

/// Load `types.csv`, `makes.csv`, and `models.csv` from `dir`.
pub fn load_dir<P: AsRef<Path>>(
    dir: P,
    policy: TypeMatchPolicy,
) -> Result<VehicleCatalog, CatalogLoadError> {
    let dir = dir.as_ref();
    let types = open(dir.join("types.csv"))?;
    let makes = open(dir.join("makes.csv"))?;
    let models = open(dir.join("models.csv"))?;
    from_readers(types, makes, models, policy)
}

pub fn from_readers<T: Read, M: Read, D: Read>(
    types: T,
    makes: M,
    models: D,
    policy: TypeMatchPolicy,
) -> Result<VehicleCatalog, CatalogLoadError> {
    let types = read_rows::<TypeRow, _>("types", types)?
        .into_iter()
        .map(|row| VehicleType {
            id: row.id,
            name: row.name,
        })
        .collect();

    let makes = read_rows::<MakeRow, _>("makes", makes)?
        .into_iter()
        .map(|row| VehicleMake {
            id: row.id,
            name: row.name,
            supported_types: split_types(&row.types),
        })
        .collect();

    let models = read_rows::<ModelRow, _>("models", models)?
        .into_iter()
        .map(|row| VehicleModel {
            supported_types: split_types(&row.types),
            id: row.id,
            name: row.name,
            make_id: row.make_id,
            years: YearRange {
                start: row.year_start,
                end: row.year_end,
            },
        })
        .collect();

    Ok(VehicleCatalog::new(types, makes, models, policy)?)
}

fn open(path: PathBuf) -> Result<std::fs::File, CatalogLoadError> {
    std::fs::File::open(&path).map_err(|source| CatalogLoadError::Io { path, source })
}

fn read_rows<T, R>(table: &'static str, reader: R) -> Result<Vec<T>, CatalogLoadError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| CatalogLoadError::Csv { table, source })
}

fn split_types(value: &str) -> BTreeSet<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
