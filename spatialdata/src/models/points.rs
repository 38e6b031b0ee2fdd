use glam::DVec2;

use crate::error::{ValidationError, ValidationResult};

/// Featureless 2D coordinates. May hold zero points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    coords: Vec<DVec2>,
}

impl PointCloud {
    pub fn coords(&self) -> &[DVec2] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

pub fn validate_points(coords: Vec<DVec2>) -> ValidationResult<PointCloud> {
    if let Some(index) = coords.iter().position(|p| !p.is_finite()) {
        return Err(ValidationError::Points(format!(
            "coordinate {index} is not finite"
        )));
    }
    Ok(PointCloud { coords })
}
