//! Random image and label rasters.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;

use super::element_name;
use crate::error::{FixtureError, FixtureResult};
use crate::models::{Raster, RasterData, RasterKind, check_raster_dims, validate_raster};
use crate::spatial_data::ElementMap;

/// Downsampling factors requested for multiscale rasters.
pub const MULTISCALE_FACTORS: [usize; 2] = [2, 4];

/// Upper bound (exclusive) of sampled label ids.
pub const MAX_LABEL_ID: i64 = 100;

/// Largest number of values sampled for a single raster.
pub const MAX_RASTER_VALUES: usize = 1 << 24;

/// Value type of generated rasters. Float rasters become images, integer
/// rasters become labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RasterDtype {
    Float,
    Int,
}

impl RasterDtype {
    pub fn kind(self) -> RasterKind {
        match self {
            RasterDtype::Float => RasterKind::Image,
            RasterDtype::Int => RasterKind::Label,
        }
    }
}

/// Samples raw values: standard normal for floats, uniform `[0, 100)` for ints.
pub fn sample_raster_data<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    dtype: RasterDtype,
) -> RasterData {
    match dtype {
        RasterDtype::Float => {
            RasterData::Float((0..len).map(|_| StandardNormal.sample(rng)).collect())
        }
        RasterDtype::Int => {
            RasterData::Int((0..len).map(|_| rng.random_range(0..MAX_LABEL_ID)).collect())
        }
    }
}

/// Generates `n` rasters named `{name}0 .. {name}{n-1}`.
///
/// The shape is checked before any value is sampled.
pub fn get_rasters<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    shape: &[usize],
    dtype: RasterDtype,
    name: &str,
    multiscale: bool,
) -> FixtureResult<ElementMap<Raster>> {
    let len = check_raster_dims(shape, dtype.kind(), &element_name(name, 0))?;
    if len > MAX_RASTER_VALUES {
        return Err(FixtureError::Precondition(format!(
            "raster shape {shape:?} holds {len} values, more than {MAX_RASTER_VALUES}"
        )));
    }
    let scale_factors = multiscale.then_some(&MULTISCALE_FACTORS[..]);
    let mut out = ElementMap::new();

    for i in 0..n {
        let element = element_name(name, i);
        let data = sample_raster_data(rng, len, dtype);
        let raster = validate_raster(data, shape, dtype.kind(), &element, scale_factors)?;
        debug!(raster = %element, %dtype, multiscale, "generated raster");
        out.insert(element, raster);
    }

    Ok(out)
}
