use glam::DVec2;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{ValidationError, ValidationResult};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum ShapeType {
    Circle,
    Square,
}

/// Point-like annotations that all share one shape type and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Shapes {
    coords: Vec<DVec2>,
    shape_type: ShapeType,
    shape_size: f64,
}

impl Shapes {
    pub fn coords(&self) -> &[DVec2] {
        &self.coords
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    pub fn shape_size(&self) -> f64 {
        self.shape_size
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

pub fn validate_shapes(
    coords: Vec<DVec2>,
    shape_type: ShapeType,
    shape_size: f64,
) -> ValidationResult<Shapes> {
    if !(shape_size.is_finite() && shape_size > 0.0) {
        return Err(ValidationError::Shapes(format!(
            "{shape_type} size must be positive and finite, got {shape_size}"
        )));
    }
    if let Some(index) = coords.iter().position(|p| !p.is_finite()) {
        return Err(ValidationError::Shapes(format!(
            "coordinate {index} is not finite"
        )));
    }

    Ok(Shapes {
        coords,
        shape_type,
        shape_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_type_parses_from_name() {
        assert_eq!("Circle".parse::<ShapeType>().unwrap(), ShapeType::Circle);
        assert_eq!(ShapeType::Square.to_string(), "Square");
        assert!("Hexagon".parse::<ShapeType>().is_err());
    }

    #[test]
    fn keeps_type_and_size() {
        let shapes = validate_shapes(
            vec![DVec2::new(0.5, -1.0), DVec2::ZERO],
            ShapeType::Square,
            2.0,
        )
        .unwrap();

        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes.shape_type(), ShapeType::Square);
        assert_eq!(shapes.shape_size(), 2.0);
    }

    #[test]
    fn rejects_non_positive_size() {
        for size in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert!(validate_shapes(Vec::new(), ShapeType::Circle, size).is_err());
        }
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let err = validate_shapes(
            vec![DVec2::ZERO, DVec2::new(f64::NAN, 0.0)],
            ShapeType::Circle,
            1.0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Shapes("coordinate 1 is not finite".to_string())
        );
    }
}
