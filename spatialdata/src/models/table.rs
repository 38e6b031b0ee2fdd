use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::naming::{check_obs_column_names, check_target_region_column_symmetry, check_valid_name};

/// Row-major `rows x cols` observation matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseMatrix {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> ValidationResult<Self> {
        let Some(expected) = rows.checked_mul(cols) else {
            return Err(ValidationError::Table(format!(
                "matrix shape {rows}x{cols} overflows the value count"
            )));
        };
        if values.len() != expected {
            return Err(ValidationError::Table(format!(
                "matrix values length {} does not match {rows}x{cols}",
                values.len()
            )));
        }
        Ok(Self { values, rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.values[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// One observation-level metadata column.
#[derive(Debug, Clone, PartialEq)]
pub enum ObsColumn {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Str(Vec<String>),
}

impl ObsColumn {
    pub fn len(&self) -> usize {
        match self {
            ObsColumn::Float(values) => values.len(),
            ObsColumn::Int(values) => values.len(),
            ObsColumn::Str(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            ObsColumn::Float(_) => "float64",
            ObsColumn::Int(_) => "int64",
            ObsColumn::Str(_) => "str",
        }
    }
}

/// Ordered observation metadata; every column has `n_obs` rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObsFrame {
    n_obs: usize,
    columns: Vec<(String, ObsColumn)>,
}

impl ObsFrame {
    pub fn new(n_obs: usize) -> Self {
        Self {
            n_obs,
            columns: Vec::new(),
        }
    }

    /// Adds a column or replaces the column of the same name.
    pub fn insert(&mut self, name: &str, column: ObsColumn) -> ValidationResult<()> {
        if column.len() != self.n_obs {
            return Err(ValidationError::Table(format!(
                "column '{name}' has {} rows, expected {}",
                column.len(),
                self.n_obs
            )));
        }
        match self.columns.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name.to_string(), column)),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ObsColumn> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, column)| column)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + Clone {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// An observation matrix with its metadata frame, before region linkage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotatedMatrix {
    x: DenseMatrix,
    obs: ObsFrame,
}

impl AnnotatedMatrix {
    pub fn new(x: DenseMatrix, obs: ObsFrame) -> ValidationResult<Self> {
        if x.rows() != obs.n_obs() {
            return Err(ValidationError::Table(format!(
                "matrix has {} rows but obs has {}",
                x.rows(),
                obs.n_obs()
            )));
        }
        Ok(Self { x, obs })
    }

    pub fn x(&self) -> &DenseMatrix {
        &self.x
    }

    pub fn obs(&self) -> &ObsFrame {
        &self.obs
    }

    pub fn obs_mut(&mut self) -> &mut ObsFrame {
        &mut self.obs
    }

    pub fn n_obs(&self) -> usize {
        self.x.rows()
    }

    pub fn n_vars(&self) -> usize {
        self.x.cols()
    }
}

/// Spatial elements annotated by a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Every row annotates the same element.
    Single(String),
    /// Rows annotate the elements named in the region column.
    Many(Vec<String>),
}

impl Region {
    /// Distinct region names.
    pub fn names(&self) -> BTreeSet<&str> {
        match self {
            Region::Single(name) => BTreeSet::from([name.as_str()]),
            Region::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionLinkage {
    pub region: Region,
    pub region_key: Option<String>,
    pub instance_key: Option<String>,
}

/// A validated annotation table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    data: AnnotatedMatrix,
    linkage: Option<RegionLinkage>,
}

impl Table {
    /// A 0x0 table annotating nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn x(&self) -> &DenseMatrix {
        self.data.x()
    }

    pub fn obs(&self) -> &ObsFrame {
        self.data.obs()
    }

    pub fn n_obs(&self) -> usize {
        self.data.n_obs()
    }

    pub fn n_vars(&self) -> usize {
        self.data.n_vars()
    }

    pub fn linkage(&self) -> Option<&RegionLinkage> {
        self.linkage.as_ref()
    }

    pub fn region(&self) -> Option<&Region> {
        self.linkage.as_ref().map(|l| &l.region)
    }

    pub fn region_key(&self) -> Option<&str> {
        self.linkage.as_ref()?.region_key.as_deref()
    }

    pub fn instance_key(&self) -> Option<&str> {
        self.linkage.as_ref()?.instance_key.as_deref()
    }

    /// Sorted distinct names of annotated regions.
    pub fn regions(&self) -> Vec<String> {
        self.region()
            .map(|region| region.names().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn table_err(message: impl Into<String>) -> ValidationError {
    ValidationError::Table(message.into())
}

/// Validates metadata names and links every row to a region and instance.
///
/// `Region::Many` requires both keys. With a `region_key`, the distinct
/// values of that column must equal the region names exactly.
pub fn validate_table(
    adata: AnnotatedMatrix,
    region: Region,
    region_key: Option<&str>,
    instance_key: Option<&str>,
) -> ValidationResult<Table> {
    check_obs_column_names(adata.obs().names())?;

    let targets = region.names();
    if targets.is_empty() {
        return Err(table_err("region must name at least one element"));
    }
    for name in &targets {
        check_valid_name(name)?;
    }

    match (region_key, instance_key) {
        (None, None) => {
            if matches!(region, Region::Many(_)) {
                return Err(table_err(
                    "region_key and instance_key are required when region is a list",
                ));
            }
        }
        (Some(region_key), Some(instance_key)) => {
            let region_values = match adata.obs().get(region_key) {
                Some(ObsColumn::Str(values)) => values,
                Some(other) => {
                    return Err(table_err(format!(
                        "region column '{region_key}' must hold strings, got {}",
                        other.dtype()
                    )));
                }
                None => {
                    return Err(table_err(format!(
                        "region column '{region_key}' not found in obs"
                    )));
                }
            };
            match adata.obs().get(instance_key) {
                Some(ObsColumn::Int(_)) => {}
                Some(other) => {
                    return Err(table_err(format!(
                        "instance column '{instance_key}' must hold integers, got {}",
                        other.dtype()
                    )));
                }
                None => {
                    return Err(table_err(format!(
                        "instance column '{instance_key}' not found in obs"
                    )));
                }
            }
            check_target_region_column_symmetry(
                region_values.iter().map(String::as_str),
                targets.iter().copied(),
            )?;
        }
        _ => {
            return Err(table_err(
                "region_key and instance_key must be given together",
            ));
        }
    }

    debug!(
        n_obs = adata.n_obs(),
        n_vars = adata.n_vars(),
        regions = targets.len(),
        "validated table"
    );

    let linkage = RegionLinkage {
        region,
        region_key: region_key.map(str::to_string),
        instance_key: instance_key.map(str::to_string),
    };
    Ok(Table {
        data: adata,
        linkage: Some(linkage),
    })
}
