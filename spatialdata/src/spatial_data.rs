use std::collections::BTreeMap;
use std::fmt;

use strum_macros::{Display, EnumIter};
use tracing::info;

use crate::error::{ValidationError, ValidationResult};
use crate::models::{PointCloud, PolygonSet, Raster, RasterKind, Shapes, Table};
use crate::naming::{check_all_keys_case_insensitively_unique, check_valid_name};

/// Element name to element, ordered by name.
pub type ElementMap<T> = BTreeMap<String, T>;

/// Category of spatial data held by a [`SpatialData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Modality {
    Images,
    Labels,
    Polygons,
    Shapes,
    Points,
    Table,
}

/// Multi-modal container. Any subset of modalities may be populated,
/// and element names share one case-insensitive namespace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpatialData {
    images: ElementMap<Raster>,
    labels: ElementMap<Raster>,
    polygons: ElementMap<PolygonSet>,
    shapes: ElementMap<Shapes>,
    points: ElementMap<PointCloud>,
    table: Option<Table>,
}

impl SpatialData {
    pub fn builder() -> SpatialDataBuilder {
        SpatialDataBuilder::default()
    }

    pub fn images(&self) -> &ElementMap<Raster> {
        &self.images
    }

    pub fn labels(&self) -> &ElementMap<Raster> {
        &self.labels
    }

    pub fn polygons(&self) -> &ElementMap<PolygonSet> {
        &self.polygons
    }

    pub fn shapes(&self) -> &ElementMap<Shapes> {
        &self.shapes
    }

    pub fn points(&self) -> &ElementMap<PointCloud> {
        &self.points
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.modalities().is_empty()
    }

    /// Populated modalities in declaration order.
    pub fn modalities(&self) -> Vec<Modality> {
        let present = [
            (Modality::Images, !self.images.is_empty()),
            (Modality::Labels, !self.labels.is_empty()),
            (Modality::Polygons, !self.polygons.is_empty()),
            (Modality::Shapes, !self.shapes.is_empty()),
            (Modality::Points, !self.points.is_empty()),
            (Modality::Table, self.table.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(modality, populated)| populated.then_some(modality))
            .collect()
    }

    /// Names of all elements; the table is unnamed and not listed.
    pub fn element_names(&self) -> Vec<(Modality, &str)> {
        let mut names = Vec::new();
        names.extend(self.images.keys().map(|k| (Modality::Images, k.as_str())));
        names.extend(self.labels.keys().map(|k| (Modality::Labels, k.as_str())));
        names.extend(self.polygons.keys().map(|k| (Modality::Polygons, k.as_str())));
        names.extend(self.shapes.keys().map(|k| (Modality::Shapes, k.as_str())));
        names.extend(self.points.keys().map(|k| (Modality::Points, k.as_str())));
        names
    }

    /// Sorted distinct regions annotated by the table.
    pub fn table_regions(&self) -> Vec<String> {
        self.table.as_ref().map(Table::regions).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct SpatialDataBuilder {
    images: ElementMap<Raster>,
    labels: ElementMap<Raster>,
    polygons: ElementMap<PolygonSet>,
    shapes: ElementMap<Shapes>,
    points: ElementMap<PointCloud>,
    table: Option<Table>,
}

impl SpatialDataBuilder {
    pub fn images(mut self, images: ElementMap<Raster>) -> Self {
        self.images = images;
        self
    }

    pub fn labels(mut self, labels: ElementMap<Raster>) -> Self {
        self.labels = labels;
        self
    }

    pub fn polygons(mut self, polygons: ElementMap<PolygonSet>) -> Self {
        self.polygons = polygons;
        self
    }

    pub fn shapes(mut self, shapes: ElementMap<Shapes>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn points(mut self, points: ElementMap<PointCloud>) -> Self {
        self.points = points;
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    pub fn build(self) -> ValidationResult<SpatialData> {
        check_rasters(&self.images, RasterKind::Image)?;
        check_rasters(&self.labels, RasterKind::Label)?;

        let sdata = SpatialData {
            images: self.images,
            labels: self.labels,
            polygons: self.polygons,
            shapes: self.shapes,
            points: self.points,
            table: self.table,
        };

        let names = sdata.element_names();
        for (_, name) in &names {
            check_valid_name(name)?;
        }
        check_all_keys_case_insensitively_unique(names.iter().map(|(_, name)| *name))?;

        info!(
            elements = names.len(),
            modalities = ?sdata.modalities(),
            "assembled spatial data"
        );
        Ok(sdata)
    }
}

fn check_rasters(rasters: &ElementMap<Raster>, kind: RasterKind) -> ValidationResult<()> {
    for (key, raster) in rasters {
        if raster.kind() != kind {
            return Err(ValidationError::Container(format!(
                "element '{key}' is a {} raster, expected {kind}",
                raster.kind()
            )));
        }
        if key != raster.name() {
            return Err(ValidationError::Container(format!(
                "element stored under '{key}' is named '{}'",
                raster.name()
            )));
        }
    }
    Ok(())
}

fn fmt_dims(dims: &[usize]) -> String {
    let parts: Vec<String> = dims.iter().map(usize::to_string).collect();
    format!("({})", parts.join(", "))
}

impl fmt::Display for SpatialData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "SpatialData object with no elements");
        }
        writeln!(f, "SpatialData object with:")?;

        for (modality, rasters) in [
            (Modality::Images, &self.images),
            (Modality::Labels, &self.labels),
        ] {
            if rasters.is_empty() {
                continue;
            }
            writeln!(f, "  {modality}:")?;
            for (name, raster) in rasters {
                writeln!(
                    f,
                    "    '{name}': {} {}, {} level(s)",
                    raster.base().data.dtype(),
                    fmt_dims(raster.dims()),
                    raster.levels().len()
                )?;
            }
        }
        if !self.polygons.is_empty() {
            writeln!(f, "  {}:", Modality::Polygons)?;
            for (name, set) in &self.polygons {
                writeln!(
                    f,
                    "    '{name}': {} polygons, {} degenerate",
                    set.len(),
                    set.degenerate_count()
                )?;
            }
        }
        if !self.shapes.is_empty() {
            writeln!(f, "  {}:", Modality::Shapes)?;
            for (name, shapes) in &self.shapes {
                writeln!(
                    f,
                    "    '{name}': {} x {} (size {})",
                    shapes.len(),
                    shapes.shape_type(),
                    shapes.shape_size()
                )?;
            }
        }
        if !self.points.is_empty() {
            writeln!(f, "  {}:", Modality::Points)?;
            for (name, cloud) in &self.points {
                writeln!(f, "    '{name}': {} points", cloud.len())?;
            }
        }
        if let Some(table) = &self.table {
            writeln!(
                f,
                "  {}: {} obs x {} vars, regions [{}]",
                Modality::Table,
                table.n_obs(),
                table.n_vars(),
                table.regions().join(", ")
            )?;
        }
        Ok(())
    }
}
