//! Polygon, shape and point fixtures.

use glam::DVec2;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use super::element_name;
use crate::error::{FixtureError, FixtureResult};
use crate::models::{
    PointCloud, Polygon, PolygonSet, ShapeType, Shapes, validate_points, validate_polygons,
    validate_shapes,
};
use crate::spatial_data::ElementMap;

pub const SHAPES_PER_ELEMENT: usize = 100;
pub const POINTS_PER_CLOUD: usize = 100;
/// Upper bound (exclusive) of sampled point coordinates.
pub const MAX_POINT_COORD: i64 = 10;

/// The five polygons every polygon fixture holds, in order:
/// 0. unit square in the first quadrant
/// 1. its reflection through the origin
/// 2. a sliver triangle with an outlying vertex
/// 3. a right triangle
/// 4. the unit square with its last vertex repeated
pub fn fixture_polygons() -> Vec<Polygon> {
    vec![
        Polygon::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]),
        Polygon::from_coords(&[(0.0, 0.0), (0.0, -1.0), (-1.0, -1.0), (-1.0, 0.0)]),
        Polygon::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 10.0)]),
        Polygon::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
        Polygon::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (1.0, 0.0)]),
    ]
}

pub fn get_polygons(n: usize, name: &str) -> FixtureResult<ElementMap<PolygonSet>> {
    let mut out = ElementMap::new();
    for i in 0..n {
        let element = element_name(name, i);
        let set = validate_polygons(fixture_polygons())?;
        debug!(
            polygons = %element,
            degenerate = set.degenerate_count(),
            "generated polygons"
        );
        out.insert(element, set);
    }
    Ok(out)
}

/// Generates `n` shape collections; the i-th is tagged with
/// `shape_types[i]` and `shape_sizes[i]`.
pub fn get_shapes<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    name: &str,
    shape_types: &[ShapeType],
    shape_sizes: &[f64],
) -> FixtureResult<ElementMap<Shapes>> {
    if shape_types.len() != n || shape_sizes.len() != n {
        return Err(FixtureError::Precondition(format!(
            "expected {n} shape types and sizes, got {} types and {} sizes",
            shape_types.len(),
            shape_sizes.len()
        )));
    }

    let mut out = ElementMap::new();
    for (i, (&shape_type, &shape_size)) in shape_types.iter().zip(shape_sizes).enumerate() {
        let element = element_name(name, i);
        let coords = (0..SHAPES_PER_ELEMENT)
            .map(|_| DVec2::new(StandardNormal.sample(rng), StandardNormal.sample(rng)))
            .collect();
        let shapes = validate_shapes(coords, shape_type, shape_size)?;
        debug!(shapes = %element, %shape_type, shape_size, "generated shapes");
        out.insert(element, shapes);
    }
    Ok(out)
}

/// Generates `n` point clouds named `points_{i}` with integer coordinates
/// in `[0, 10)`.
pub fn get_points<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
) -> FixtureResult<ElementMap<PointCloud>> {
    let mut out = ElementMap::new();
    for i in 0..n {
        let element = format!("points_{i}");
        let coords = (0..POINTS_PER_CLOUD)
            .map(|_| {
                let x = rng.random_range(0..MAX_POINT_COORD);
                let y = rng.random_range(0..MAX_POINT_COORD);
                DVec2::new(x as f64, y as f64)
            })
            .collect();
        out.insert(element, validate_points(coords)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::GeometryIssue;

    #[test]
    fn every_polygon_set_holds_the_fixture() {
        let sets = get_polygons(3, "polygons").unwrap();

        let names: Vec<&str> = sets.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["polygons0", "polygons1", "polygons2"]);
        for set in sets.values() {
            assert_eq!(set.geometries(), fixture_polygons().as_slice());
        }
    }

    // Degenerate geometry is tolerated. These pin down how each fixture
    // polygon is classified so a policy change shows up here.
    #[test]
    fn well_formed_fixture_polygons_have_no_issues() {
        let set = validate_polygons(fixture_polygons()).unwrap();
        for index in [0, 1, 3] {
            assert!(set.issues(index).is_empty(), "polygon {index}");
        }
        assert_eq!(set.geometries()[0].area(), set.geometries()[1].area());
    }

    #[test]
    fn sliver_triangle_is_accepted() {
        let set = validate_polygons(fixture_polygons()).unwrap();
        assert!(set.issues(2).is_empty());
        assert_eq!(set.geometries()[2].area(), 0.5);
    }

    #[test]
    fn repeated_closing_vertex_is_flagged() {
        let set = validate_polygons(fixture_polygons()).unwrap();
        assert_eq!(set.issues(4), &[GeometryIssue::DuplicateVertex]);
        assert_eq!(set.degenerate_count(), 1);
        assert!(!set.is_valid());
    }

    #[test]
    fn shapes_take_their_own_type_and_size() {
        let mut rng = StdRng::seed_from_u64(10);
        let shapes = get_shapes(
            &mut rng,
            2,
            "shapes",
            &[ShapeType::Circle, ShapeType::Square],
            &[1.0, 2.0],
        )
        .unwrap();

        let circle = &shapes["shapes0"];
        assert_eq!(circle.shape_type(), ShapeType::Circle);
        assert_eq!(circle.shape_size(), 1.0);
        assert_eq!(circle.len(), SHAPES_PER_ELEMENT);

        let square = &shapes["shapes1"];
        assert_eq!(square.shape_type(), ShapeType::Square);
        assert_eq!(square.shape_size(), 2.0);
    }

    #[test]
    fn mismatched_shape_lengths_fail_before_sampling() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut untouched = rng.clone();

        let err = get_shapes(&mut rng, 2, "shapes", &[ShapeType::Circle], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, FixtureError::Precondition(_)));

        let err = get_shapes(&mut rng, 3, "shapes", &[ShapeType::Circle; 2], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, FixtureError::Precondition(_)));

        // No values were drawn.
        assert_eq!(rng.random::<u64>(), untouched.random::<u64>());
    }

    #[test]
    fn points_are_small_integers() {
        let mut rng = StdRng::seed_from_u64(12);
        let clouds = get_points(&mut rng, 3).unwrap();

        let names: Vec<&str> = clouds.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["points_0", "points_1", "points_2"]);
        for cloud in clouds.values() {
            assert_eq!(cloud.len(), POINTS_PER_CLOUD);
            for p in cloud.coords() {
                assert_eq!(p.x.fract(), 0.0);
                assert!((0.0..MAX_POINT_COORD as f64).contains(&p.x));
                assert!((0.0..MAX_POINT_COORD as f64).contains(&p.y));
            }
        }
    }
}
