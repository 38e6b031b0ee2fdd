use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::naming::check_valid_name;

/// Semantic meaning of raster values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum RasterKind {
    /// Floating-point intensities laid out as `(c, y, x)`.
    Image,
    /// Integer segmentation ids laid out as `(y, x)`.
    Label,
}

impl RasterKind {
    pub fn ndim(self) -> usize {
        match self {
            RasterKind::Image => 3,
            RasterKind::Label => 2,
        }
    }
}

/// Row-major raster values.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterData {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl RasterData {
    pub fn len(&self) -> usize {
        match self {
            RasterData::Float(values) => values.len(),
            RasterData::Int(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            RasterData::Float(_) => "float64",
            RasterData::Int(_) => "int64",
        }
    }
}

/// One resolution of a raster pyramid.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLevel {
    pub dims: Vec<usize>,
    pub data: RasterData,
}

/// A validated image or label raster, possibly multiscale.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    name: String,
    kind: RasterKind,
    scale_factors: Vec<usize>,
    levels: Vec<RasterLevel>,
}

impl Raster {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RasterKind {
        self.kind
    }

    /// Dimensions of the full-resolution level.
    pub fn dims(&self) -> &[usize] {
        &self.levels[0].dims
    }

    pub fn base(&self) -> &RasterLevel {
        &self.levels[0]
    }

    /// All levels, full resolution first.
    pub fn levels(&self) -> &[RasterLevel] {
        &self.levels
    }

    pub fn scale_factors(&self) -> &[usize] {
        &self.scale_factors
    }

    pub fn is_multiscale(&self) -> bool {
        self.levels.len() > 1
    }
}

/// Number of values held by a raster of `dims`, or `None` on overflow.
pub fn element_count(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Checks the name, rank and extents of a raster before any values exist.
/// Returns the number of values the raster holds.
pub fn check_raster_dims(dims: &[usize], kind: RasterKind, name: &str) -> ValidationResult<usize> {
    let fail = |reason: String| ValidationError::Raster {
        name: name.to_string(),
        reason,
    };

    check_valid_name(name)?;

    if dims.len() != kind.ndim() {
        return Err(fail(format!(
            "{kind} requires {} dimensions, got {:?}",
            kind.ndim(),
            dims
        )));
    }
    if dims.contains(&0) {
        return Err(fail(format!("empty {kind} rasters are not supported: {dims:?}")));
    }
    element_count(dims)
        .ok_or_else(|| fail(format!("dimensions {dims:?} overflow the value count")))
}

/// Validates raw raster values and optionally builds a downsampled pyramid.
///
/// Scale factors are relative to the previous level, so `[2, 4]` yields
/// levels at 1/2 and 1/8 of the base resolution. Only the trailing `(y, x)`
/// axes are downsampled; windows that do not fit are trimmed.
pub fn validate_raster(
    data: RasterData,
    dims: &[usize],
    kind: RasterKind,
    name: &str,
    scale_factors: Option<&[usize]>,
) -> ValidationResult<Raster> {
    let fail = |reason: String| ValidationError::Raster {
        name: name.to_string(),
        reason,
    };

    let expected = check_raster_dims(dims, kind, name)?;
    if data.len() != expected {
        return Err(fail(format!(
            "data length {} does not match dimensions {:?} ({} values)",
            data.len(),
            dims,
            expected
        )));
    }
    if kind == RasterKind::Label && !matches!(data, RasterData::Int(_)) {
        return Err(fail(format!(
            "labels require integer data, got {}",
            data.dtype()
        )));
    }

    let scale_factors = scale_factors.unwrap_or_default().to_vec();
    let mut levels = vec![RasterLevel {
        dims: dims.to_vec(),
        data,
    }];

    for &factor in &scale_factors {
        if factor < 2 {
            return Err(fail(format!("scale factor must be at least 2, got {factor}")));
        }
        let previous = &levels[levels.len() - 1];
        let next = downsample_level(previous, kind, factor).ok_or_else(|| {
            fail(format!(
                "scale factor {factor} is larger than level dimensions {:?}",
                previous.dims
            ))
        })?;
        levels.push(next);
    }

    debug!(
        raster = name,
        %kind,
        dims = ?dims,
        levels = levels.len(),
        "validated raster"
    );

    Ok(Raster {
        name: name.to_string(),
        kind,
        scale_factors,
        levels,
    })
}

fn downsample_level(level: &RasterLevel, kind: RasterKind, factor: usize) -> Option<RasterLevel> {
    let ndim = level.dims.len();
    let (height, width) = (level.dims[ndim - 2], level.dims[ndim - 1]);
    let (new_height, new_width) = (height / factor, width / factor);
    if new_height == 0 || new_width == 0 {
        return None;
    }

    let grid = Grid {
        planes: level.dims[..ndim - 2].iter().product(),
        height,
        width,
        factor,
    };

    let data = match (&level.data, kind) {
        (RasterData::Float(values), _) => RasterData::Float(grid.reduce(values, mean_f64)),
        (RasterData::Int(values), RasterKind::Image) => {
            RasterData::Int(grid.reduce(values, |window| {
                let sum: i64 = window.iter().sum();
                (sum as f64 / window.len() as f64).round() as i64
            }))
        }
        (RasterData::Int(values), RasterKind::Label) => {
            RasterData::Int(grid.reduce(values, |window| window[0]))
        }
    };

    let mut dims = level.dims.clone();
    dims[ndim - 2] = new_height;
    dims[ndim - 1] = new_width;

    Some(RasterLevel { dims, data })
}

fn mean_f64(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

struct Grid {
    planes: usize,
    height: usize,
    width: usize,
    factor: usize,
}

impl Grid {
    /// Applies `reduce` to every `factor x factor` window, top-left value first.
    fn reduce<T: Copy>(&self, values: &[T], reduce: impl Fn(&[T]) -> T) -> Vec<T> {
        let (new_height, new_width) = (self.height / self.factor, self.width / self.factor);
        let mut out = Vec::with_capacity(self.planes * new_height * new_width);
        let mut window = Vec::with_capacity(self.factor * self.factor);

        for plane in 0..self.planes {
            let plane_offset = plane * self.height * self.width;
            for y in 0..new_height {
                for x in 0..new_width {
                    window.clear();
                    for dy in 0..self.factor {
                        let row = plane_offset + (y * self.factor + dy) * self.width;
                        let start = row + x * self.factor;
                        window.extend_from_slice(&values[start..start + self.factor]);
                    }
                    out.push(reduce(&window));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_image(channels: usize, height: usize, width: usize) -> RasterData {
        RasterData::Float((0..channels * height * width).map(|v| v as f64).collect())
    }

    #[test]
    fn single_scale_image_keeps_base_level() {
        let raster =
            validate_raster(ramp_image(3, 4, 4), &[3, 4, 4], RasterKind::Image, "image0", None)
                .unwrap();

        assert_eq!(raster.name(), "image0");
        assert_eq!(raster.kind(), RasterKind::Image);
        assert_eq!(raster.dims(), &[3, 4, 4]);
        assert!(!raster.is_multiscale());
        assert_eq!(raster.levels().len(), 1);
    }

    #[test]
    fn multiscale_factors_are_relative_to_previous_level() {
        let raster = validate_raster(
            ramp_image(3, 64, 64),
            &[3, 64, 64],
            RasterKind::Image,
            "image_multiscale0",
            Some(&[2, 4]),
        )
        .unwrap();

        let dims: Vec<Vec<usize>> = raster.levels().iter().map(|l| l.dims.clone()).collect();
        assert_eq!(dims, vec![vec![3, 64, 64], vec![3, 32, 32], vec![3, 8, 8]]);
        assert_eq!(raster.scale_factors(), &[2, 4]);
        for level in raster.levels() {
            assert_eq!(level.data.len(), level.dims.iter().product::<usize>());
        }
    }

    #[test]
    fn image_downsampling_averages_windows() {
        // 1 channel, 2x2 -> 1x1
        let raster = validate_raster(
            RasterData::Float(vec![1.0, 2.0, 3.0, 6.0]),
            &[1, 2, 2],
            RasterKind::Image,
            "avg",
            Some(&[2]),
        )
        .unwrap();

        assert_eq!(raster.levels()[1].data, RasterData::Float(vec![3.0]));
    }

    #[test]
    fn label_downsampling_never_blends_ids() {
        let raster = validate_raster(
            RasterData::Int(vec![1, 2, 7, 8, 3, 4, 9, 9]),
            &[2, 4],
            RasterKind::Label,
            "label0",
            Some(&[2]),
        )
        .unwrap();

        assert_eq!(raster.levels()[1].dims, vec![1, 2]);
        assert_eq!(raster.levels()[1].data, RasterData::Int(vec![1, 7]));
    }

    #[test]
    fn odd_extents_trim_partial_windows() {
        let raster = validate_raster(
            RasterData::Int((0..15).collect()),
            &[3, 5],
            RasterKind::Label,
            "odd",
            Some(&[2]),
        )
        .unwrap();

        assert_eq!(raster.levels()[1].dims, vec![1, 2]);
        assert_eq!(raster.levels()[1].data, RasterData::Int(vec![0, 2]));
    }

    #[test]
    fn rejects_wrong_dimensionality() {
        let err = validate_raster(ramp_image(1, 4, 4), &[16], RasterKind::Image, "flat", None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Raster { .. }));

        let err = validate_raster(
            RasterData::Int(vec![0; 16]),
            &[1, 4, 4],
            RasterKind::Label,
            "cube",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Raster { .. }));
    }

    #[test]
    fn rejects_length_mismatch_and_float_labels() {
        assert!(
            validate_raster(ramp_image(1, 2, 2), &[1, 2, 3], RasterKind::Image, "x", None)
                .is_err()
        );
        assert!(
            validate_raster(
                RasterData::Float(vec![0.0; 4]),
                &[2, 2],
                RasterKind::Label,
                "x",
                None
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_empty_rasters() {
        let err = validate_raster(
            RasterData::Float(Vec::new()),
            &[0, 0, 0],
            RasterKind::Image,
            "empty",
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let err = validate_raster(
            RasterData::Int(Vec::new()),
            &[usize::MAX, 2],
            RasterKind::Label,
            "huge",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Raster { ref name, .. } if name == "huge"));
        assert!(err.to_string().contains("overflow"));

        assert_eq!(element_count(&[3, 4, 5]), Some(60));
        assert_eq!(element_count(&[usize::MAX, 2]), None);
    }

    #[test]
    fn rejects_bad_scale_factors() {
        let data = ramp_image(1, 4, 4);
        assert!(
            validate_raster(data.clone(), &[1, 4, 4], RasterKind::Image, "x", Some(&[1]))
                .is_err()
        );
        assert!(
            validate_raster(data, &[1, 4, 4], RasterKind::Image, "x", Some(&[2, 4])).is_err()
        );
    }

    #[test]
    fn rejects_invalid_names() {
        let err = validate_raster(ramp_image(1, 2, 2), &[1, 2, 2], RasterKind::Image, "__x", None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidName { .. }));
    }
}
