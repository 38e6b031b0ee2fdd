//! Spatialdata - a small spatial omics data model.
//!
//! The crate provides:
//! - Validated element types: image and label rasters (optionally
//!   multiscale), polygons, point-like shapes, point clouds and annotation
//!   tables linked to regions
//! - [`SpatialData`], a container holding any subset of those modalities
//! - [`fixtures`], seeded generators that assemble synthetic test scenarios

pub mod error;
pub mod fixtures;
pub mod models;
pub mod naming;
pub mod spatial_data;

pub use error::{FixtureError, FixtureResult, ValidationError, ValidationResult};
pub use fixtures::{FixtureConfig, Fixtures, Scenario, ScenarioOutcome};
pub use models::{
    GeometryIssue, PointCloud, Polygon, PolygonSet, Raster, RasterData, RasterKind, Region,
    ShapeType, Shapes, Table, validate_points, validate_polygons, validate_raster,
    validate_shapes, validate_table,
};
pub use spatial_data::{ElementMap, Modality, SpatialData, SpatialDataBuilder};
