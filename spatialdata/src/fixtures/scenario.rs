use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{info, warn};

use super::FixtureConfig;
use super::geometry::{get_points, get_polygons, get_shapes};
use super::raster::{RasterDtype, get_rasters};
use super::table::{TableRegion, get_table};
use crate::error::FixtureResult;
use crate::models::{Table, validate_points};
use crate::spatial_data::{ElementMap, SpatialData};

/// Name of the single element built by the `empty_*` scenarios.
pub const EMPTY_ELEMENT: &str = "empty";

/// One test scenario: which modalities to populate and how.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Images, labels, polygons, points and a table together.
    Full,
    Images,
    ImagesMultiscale,
    Labels,
    LabelsMultiscale,
    Polygons,
    Shapes,
    Points,
    Table,
    EmptyImages,
    EmptyLabels,
    /// A point cloud with zero points.
    EmptyPoints,
    /// A table with zero rows.
    EmptyTable,
}

impl Scenario {
    /// Scenarios every container test runs against.
    pub const PARAMETRIZED: [Scenario; 9] = [
        Scenario::Full,
        Scenario::Images,
        Scenario::Labels,
        Scenario::Points,
        Scenario::Table,
        Scenario::EmptyImages,
        Scenario::EmptyLabels,
        Scenario::EmptyPoints,
        Scenario::EmptyTable,
    ];

    pub fn parametrized() -> &'static [Scenario] {
        &Self::PARAMETRIZED
    }

    pub fn is_empty_variant(self) -> bool {
        matches!(
            self,
            Scenario::EmptyImages
                | Scenario::EmptyLabels
                | Scenario::EmptyPoints
                | Scenario::EmptyTable
        )
    }
}

/// Result of building a scenario. Known gaps are `Unsupported`, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    Supported(SpatialData),
    Unsupported {
        scenario: Scenario,
        reason: &'static str,
    },
}

impl ScenarioOutcome {
    pub fn is_supported(&self) -> bool {
        matches!(self, ScenarioOutcome::Supported(_))
    }

    pub fn into_supported(self) -> Option<SpatialData> {
        match self {
            ScenarioOutcome::Supported(sdata) => Some(sdata),
            ScenarioOutcome::Unsupported { .. } => None,
        }
    }
}

/// Builds `scenario` from `config`, drawing all randomness from `rng`.
pub fn build_scenario<R: Rng + ?Sized>(
    rng: &mut R,
    config: &FixtureConfig,
    scenario: Scenario,
) -> FixtureResult<ScenarioOutcome> {
    let builder = SpatialData::builder();

    let builder = match scenario {
        Scenario::Full => builder
            .images(get_rasters(
                rng,
                config.raster_count,
                &config.image_shape,
                RasterDtype::Float,
                "image",
                false,
            )?)
            .labels(get_rasters(
                rng,
                config.raster_count,
                &config.label_shape,
                RasterDtype::Int,
                "label",
                false,
            )?)
            .polygons(get_polygons(config.polygon_count, "polygons")?)
            .points(get_points(rng, config.full_point_cloud_count)?)
            .table(get_table(rng, TableRegion::single(&config.table_region))?),
        Scenario::Images | Scenario::ImagesMultiscale => {
            let multiscale = scenario == Scenario::ImagesMultiscale;
            let name = if multiscale { "image_multiscale" } else { "image" };
            builder.images(get_rasters(
                rng,
                config.raster_count,
                &config.image_shape,
                RasterDtype::Float,
                name,
                multiscale,
            )?)
        }
        Scenario::Labels | Scenario::LabelsMultiscale => {
            let multiscale = scenario == Scenario::LabelsMultiscale;
            let name = if multiscale { "label_multiscale" } else { "label" };
            builder.labels(get_rasters(
                rng,
                config.raster_count,
                &config.label_shape,
                RasterDtype::Int,
                name,
                multiscale,
            )?)
        }
        Scenario::Polygons => builder.polygons(get_polygons(config.polygon_count, "polygons")?),
        Scenario::Shapes => builder.shapes(get_shapes(
            rng,
            config.shape_types.len(),
            "shapes",
            &config.shape_types,
            &config.shape_sizes,
        )?),
        Scenario::Points => builder.points(get_points(rng, config.point_cloud_count)?),
        Scenario::Table => {
            builder.table(get_table(rng, TableRegion::single(&config.table_region))?)
        }
        Scenario::EmptyImages => {
            return Ok(unsupported(scenario, "empty images not supported"));
        }
        Scenario::EmptyLabels => {
            return Ok(unsupported(scenario, "empty labels not supported"));
        }
        Scenario::EmptyPoints => {
            let mut points = ElementMap::new();
            points.insert(EMPTY_ELEMENT.to_string(), validate_points(Vec::new())?);
            builder.points(points)
        }
        Scenario::EmptyTable => builder.table(Table::empty()),
    };

    let sdata = builder.build()?;
    info!(%scenario, modalities = ?sdata.modalities(), "built scenario");
    Ok(ScenarioOutcome::Supported(sdata))
}

fn unsupported(scenario: Scenario, reason: &'static str) -> ScenarioOutcome {
    warn!(%scenario, reason, "skipping scenario");
    ScenarioOutcome::Unsupported { scenario, reason }
}
