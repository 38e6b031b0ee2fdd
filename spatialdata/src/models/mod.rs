pub mod points;
pub mod polygons;
pub mod raster;
pub mod shapes;
pub mod table;

pub use points::{PointCloud, validate_points};
pub use polygons::{GeometryIssue, Polygon, PolygonSet, validate_polygons};
pub use raster::{
    Raster, RasterData, RasterKind, RasterLevel, check_raster_dims, element_count, validate_raster,
};
pub use shapes::{ShapeType, Shapes, validate_shapes};
pub use table::{
    AnnotatedMatrix, DenseMatrix, ObsColumn, ObsFrame, Region, RegionLinkage, Table,
    validate_table,
};
