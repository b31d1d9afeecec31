//! CSV Data Loader Module
//! Reads the dashboard CSVs with Polars and validates them into typed records.

use crate::config::DataPaths;
use crate::data::records::{
    AggressionRow, Dataset, PlayerId, PowerRow, RadialMetric, RadialProfileRow,
};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("{table}: missing column `{column}`")]
    MissingColumn { table: String, column: String },
    #[error("{table}: empty value in column `{column}` at row {row}")]
    NullValue {
        table: String,
        column: String,
        row: usize,
    },
    #[error("{table}: invalid value {value} in column `{column}` at row {row}")]
    InvalidValue {
        table: String,
        column: String,
        row: usize,
        value: String,
    },
    #[error("{table}: duplicate person_id {id}")]
    DuplicatePlayer { table: String, id: PlayerId },
}

/// Typed column access over one loaded DataFrame.
struct Columns<'a> {
    df: &'a DataFrame,
    table: &'a str,
}

impl<'a> Columns<'a> {
    fn new(df: &'a DataFrame, table: &'a str) -> Self {
        Self { df, table }
    }

    fn column(&self, name: &str) -> Result<&Column, LoaderError> {
        self.df.column(name).map_err(|_| LoaderError::MissingColumn {
            table: self.table.to_string(),
            column: name.to_string(),
        })
    }

    fn null(&self, column: &str, row: usize) -> LoaderError {
        LoaderError::NullValue {
            table: self.table.to_string(),
            column: column.to_string(),
            row,
        }
    }

    fn invalid(&self, column: &str, row: usize, value: impl ToString) -> LoaderError {
        LoaderError::InvalidValue {
            table: self.table.to_string(),
            column: column.to_string(),
            row,
            value: value.to_string(),
        }
    }

    /// Numeric column as f64. Empty cells and NaN are `NullValue`; cells the
    /// cast could not parse are `InvalidValue`.
    fn f64s(&self, name: &str) -> Result<Vec<f64>, LoaderError> {
        let col = self.column(name)?;
        let cast = col.cast(&DataType::Float64)?;
        cast.f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(x) if !x.is_nan() => Ok(x),
                Some(_) => Err(self.null(name, row)),
                None => {
                    let raw = col.get(row)?;
                    let blank = matches!(raw, AnyValue::String(s) if s.trim().is_empty());
                    if raw.is_null() || blank {
                        Err(self.null(name, row))
                    } else {
                        Err(self.invalid(name, row, raw))
                    }
                }
            })
            .collect()
    }

    /// Whole-number column. Fractional values are rejected, not truncated.
    fn i64s(&self, name: &str) -> Result<Vec<i64>, LoaderError> {
        let col = self.column(name)?;
        if col.dtype().is_integer() {
            let cast = col.cast(&DataType::Int64)?;
            return cast
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| v.ok_or_else(|| self.null(name, row)))
                .collect();
        }
        self.f64s(name)?
            .into_iter()
            .enumerate()
            .map(|(row, x)| {
                if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
                    Ok(x as i64)
                } else {
                    Err(self.invalid(name, row, x))
                }
            })
            .collect()
    }

    fn counts(&self, name: &str) -> Result<Vec<u32>, LoaderError> {
        self.i64s(name)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| u32::try_from(v).map_err(|_| self.invalid(name, row, v)))
            .collect()
    }

    fn strings(&self, name: &str) -> Result<Vec<String>, LoaderError> {
        let cast = self.column(name)?.cast(&DataType::String)?;
        cast.str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| self.null(name, row))
            })
            .collect()
    }

    /// `person_id` column, checked for uniqueness.
    fn ids(&self) -> Result<Vec<PlayerId>, LoaderError> {
        let ids: Vec<PlayerId> = self.i64s("person_id")?.into_iter().map(PlayerId).collect();
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            if !seen.insert(id) {
                return Err(LoaderError::DuplicatePlayer {
                    table: self.table.to_string(),
                    id,
                });
            }
        }
        Ok(ids)
    }
}

/// Loads the dashboard tables.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "read csv"
        );
        Ok(df)
    }

    pub fn load_aggression(path: &Path) -> Result<Vec<AggressionRow>, LoaderError> {
        let df = Self::read_csv(path)?;
        Self::aggression_from_frame(&df)
    }

    pub fn load_power(path: &Path) -> Result<Vec<PowerRow>, LoaderError> {
        let df = Self::read_csv(path)?;
        Self::power_from_frame(&df)
    }

    pub fn load_radial(path: &Path) -> Result<Vec<RadialProfileRow>, LoaderError> {
        let df = Self::read_csv(path)?;
        Self::radial_from_frame(&df)
    }

    pub fn aggression_from_frame(df: &DataFrame) -> Result<Vec<AggressionRow>, LoaderError> {
        let cols = Columns::new(df, "aggression");
        let ids = cols.ids()?;
        let names = cols.strings("player_name")?;
        let pa = cols.counts("pa")?;
        let swing = cols.f64s("swing_rate")?;
        let whiff = cols.f64s("whiff_rate")?;
        let hardhit = cols.f64s("hardhit_percent")?;
        let barrels = cols.f64s("barrels_per_pa_percent")?;

        Ok((0..df.height())
            .map(|i| AggressionRow {
                person_id: ids[i],
                player_name: names[i].clone(),
                pa: pa[i],
                swing_rate: swing[i],
                whiff_rate: whiff[i],
                hardhit_percent: hardhit[i],
                barrels_per_pa_percent: barrels[i],
            })
            .collect())
    }

    pub fn power_from_frame(df: &DataFrame) -> Result<Vec<PowerRow>, LoaderError> {
        let cols = Columns::new(df, "power");
        let ids = cols.ids()?;
        let names = cols.strings("player_name")?;
        let slg = cols.f64s("slg")?;
        let xslg = cols.f64s("xslg")?;
        let hardhit = cols.f64s("hardhit_percent")?;
        let barrels = cols.f64s("barrels_per_pa_percent")?;

        Ok((0..df.height())
            .map(|i| PowerRow {
                person_id: ids[i],
                player_name: names[i].clone(),
                slg: slg[i],
                xslg: xslg[i],
                hardhit_percent: hardhit[i],
                barrels_per_pa_percent: barrels[i],
            })
            .collect())
    }

    pub fn radial_from_frame(df: &DataFrame) -> Result<Vec<RadialProfileRow>, LoaderError> {
        let cols = Columns::new(df, "radial");
        let ids = cols.ids()?;
        let names = cols.strings("player_name")?;
        let metric = |m: RadialMetric| cols.f64s(m.column());
        let launch_speed = metric(RadialMetric::LaunchSpeed)?;
        let launch_angle = metric(RadialMetric::LaunchAngle)?;
        let barrels = metric(RadialMetric::BarrelsPerBbePercent)?;
        let hardhit = metric(RadialMetric::HardhitPercent)?;
        let xwoba = metric(RadialMetric::Xwoba)?;
        let babip = metric(RadialMetric::Babip)?;

        Ok((0..df.height())
            .map(|i| RadialProfileRow {
                person_id: ids[i],
                player_name: names[i].clone(),
                launch_speed: launch_speed[i],
                launch_angle: launch_angle[i],
                barrels_per_bbe_percent: barrels[i],
                hardhit_percent: hardhit[i],
                xwoba: xwoba[i],
                babip: babip[i],
            })
            .collect())
    }

    /// Load all three tables into an immutable dataset.
    pub fn load_dataset(paths: &DataPaths) -> Result<Dataset, LoaderError> {
        let aggression = Self::load_aggression(&paths.aggression())?;
        let power = Self::load_power(&paths.power())?;
        let radial = Self::load_radial(&paths.radial())?;

        info!(
            aggression = aggression.len(),
            power = power.len(),
            radial = radial.len(),
            "loaded dataset from {}",
            paths.dir.display()
        );

        Ok(Dataset::new(aggression, power, radial))
    }
}
