use common::EPSILON;
use glam::DVec2;
use strum_macros::Display;
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};

/// A polygon given by its exterior ring. The ring is implicitly closed; an
/// explicit closing vertex equal to the first one is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<DVec2>,
}

impl Polygon {
    pub fn new(exterior: Vec<DVec2>) -> Self {
        Self { exterior }
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    pub fn exterior(&self) -> &[DVec2] {
        &self.exterior
    }

    /// Ring without consecutive duplicates and without the closing vertex.
    fn distinct_ring(&self) -> Vec<DVec2> {
        let mut ring: Vec<DVec2> = Vec::with_capacity(self.exterior.len());
        for &p in &self.exterior {
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }

    /// Absolute shoelace area.
    pub fn area(&self) -> f64 {
        let ring = self.distinct_ring();
        if ring.len() < 3 {
            return 0.0;
        }
        let twice: f64 = ring
            .iter()
            .zip(ring.iter().cycle().skip(1))
            .map(|(a, b)| a.perp_dot(*b))
            .sum();
        twice.abs() / 2.0
    }

    fn issues(&self) -> Vec<GeometryIssue> {
        let mut issues = Vec::new();

        let body = match self.exterior.split_last() {
            Some((last, rest)) if rest.first() == Some(last) => rest,
            _ => &self.exterior[..],
        };
        if body.windows(2).any(|w| w[0] == w[1]) {
            issues.push(GeometryIssue::DuplicateVertex);
        }

        let ring = self.distinct_ring();
        if ring.len() < 3 {
            issues.push(GeometryIssue::TooFewVertices);
        } else if self.area() < EPSILON {
            issues.push(GeometryIssue::ZeroArea);
        }
        if ring_self_intersects(&ring) {
            issues.push(GeometryIssue::SelfIntersection);
        }

        issues
    }
}

/// Degenerate geometry found during validation. Degenerate polygons are
/// kept; callers decide whether to reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum GeometryIssue {
    DuplicateVertex,
    TooFewVertices,
    ZeroArea,
    SelfIntersection,
}

/// A validated collection of polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSet {
    geometries: Vec<Polygon>,
    issues: Vec<Vec<GeometryIssue>>,
}

impl PolygonSet {
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn geometries(&self) -> &[Polygon] {
        &self.geometries
    }

    /// Issues of the polygon at `index`; empty for well-formed polygons.
    pub fn issues(&self, index: usize) -> &[GeometryIssue] {
        &self.issues[index]
    }

    /// True when no polygon carries an issue.
    pub fn is_valid(&self) -> bool {
        self.issues.iter().all(Vec::is_empty)
    }

    pub fn degenerate_count(&self) -> usize {
        self.issues.iter().filter(|i| !i.is_empty()).count()
    }
}

/// Validates polygon geometry. Rejects empty rings and non-finite
/// coordinates; tolerates and classifies degenerate shapes.
pub fn validate_polygons(geometries: Vec<Polygon>) -> ValidationResult<PolygonSet> {
    let mut issues = Vec::with_capacity(geometries.len());

    for (index, polygon) in geometries.iter().enumerate() {
        if polygon.exterior.is_empty() {
            return Err(ValidationError::Geometry {
                index,
                reason: "exterior ring is empty".to_string(),
            });
        }
        if !polygon.exterior.iter().all(|p| p.is_finite()) {
            return Err(ValidationError::Geometry {
                index,
                reason: "coordinates must be finite".to_string(),
            });
        }
        let found = polygon.issues();
        if !found.is_empty() {
            debug!(index, issues = ?found, "degenerate polygon");
        }
        issues.push(found);
    }

    Ok(PolygonSet { geometries, issues })
}

fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Checks every pair of non-adjacent edges of a closed ring.
fn ring_self_intersects(ring: &[DVec2]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }
    let edge = |i: usize| (ring[i], ring[(i + 1) % n]);

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}
