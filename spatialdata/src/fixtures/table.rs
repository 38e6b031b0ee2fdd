//! Annotation table fixtures.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};
use crate::models::{
    AnnotatedMatrix, DenseMatrix, ObsColumn, ObsFrame, Region, Table, validate_table,
};

pub const TABLE_OBS: usize = 100;
pub const TABLE_VARS: usize = 10;
/// Auxiliary observation columns, always present.
pub const OBS_COLUMNS: [&str; 3] = ["a", "b", "c"];
/// Upper bound (exclusive) of sampled instance ids.
pub const MAX_INSTANCE_ID: i64 = 10;

/// How generated rows link to regions.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRegion {
    /// All rows annotate one region; no linkage columns are added.
    Single(String),
    /// One region name per row, stored under `region_key`, plus random
    /// instance ids under `instance_key`.
    PerRow {
        regions: Vec<String>,
        region_key: String,
        instance_key: String,
    },
}

impl TableRegion {
    pub fn single(region: impl Into<String>) -> Self {
        TableRegion::Single(region.into())
    }
}

fn normal_values<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f64> {
    (0..len).map(|_| StandardNormal.sample(rng)).collect()
}

fn check_region(region: &TableRegion) -> FixtureResult<()> {
    if let TableRegion::PerRow {
        regions,
        region_key,
        instance_key,
    } = region
    {
        if regions.len() != TABLE_OBS {
            return Err(FixtureError::Precondition(format!(
                "expected {TABLE_OBS} per-row regions, got {}",
                regions.len()
            )));
        }
        if region_key == instance_key {
            return Err(FixtureError::Precondition(format!(
                "region_key and instance_key must differ, both are '{region_key}'"
            )));
        }
        if let Some(key) = [region_key, instance_key]
            .into_iter()
            .find(|key| OBS_COLUMNS.contains(&key.as_str()))
        {
            return Err(FixtureError::Precondition(format!(
                "linkage column '{key}' would overwrite an auxiliary column"
            )));
        }
    }
    Ok(())
}

/// Generates a 100 x 10 standard-normal table with columns `a`, `b`, `c`,
/// linked to regions as `region` describes.
pub fn get_table<R: Rng + ?Sized>(rng: &mut R, region: TableRegion) -> FixtureResult<Table> {
    check_region(&region)?;

    let x = DenseMatrix::new(
        TABLE_OBS,
        TABLE_VARS,
        normal_values(rng, TABLE_OBS * TABLE_VARS),
    )?;
    let mut obs = ObsFrame::new(TABLE_OBS);
    for column in OBS_COLUMNS {
        obs.insert(column, ObsColumn::Float(normal_values(rng, TABLE_OBS)))?;
    }
    let mut adata = AnnotatedMatrix::new(x, obs)?;

    let table = match region {
        TableRegion::Single(region) => validate_table(adata, Region::Single(region), None, None)?,
        TableRegion::PerRow {
            regions,
            region_key,
            instance_key,
        } => {
            let instances = (0..TABLE_OBS)
                .map(|_| rng.random_range(0..MAX_INSTANCE_ID))
                .collect();
            let obs = adata.obs_mut();
            obs.insert(&region_key, ObsColumn::Str(regions.clone()))?;
            obs.insert(&instance_key, ObsColumn::Int(instances))?;
            validate_table(
                adata,
                Region::Many(regions),
                Some(&region_key),
                Some(&instance_key),
            )?
        }
    };

    debug!(regions = ?table.regions(), "generated table");
    Ok(table)
}
