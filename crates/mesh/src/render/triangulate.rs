//! Polygon triangulation for the render buffer.
//!
//! Collinear corners are dropped, the rest is projected onto the polygon's
//! plane and ear-clipped by `earcutr`. Output triangles keep the polygon's
//! winding.

use earcutr::earcut;
use glam::{Vec2, Vec3};
use tracing::trace;

use crate::graph::newell_normal;

/// Triangulate a closed polygon, returning corner indices into `positions`.
///
/// With `ear_clip` off, or when earcut cannot cover the polygon
/// (self-intersecting input), a fan from the first remaining corner is
/// emitted instead. A polygon whose corners are all collinear falls back to
/// a fan over every corner so it still occupies triangles for picking.
pub(crate) fn triangulate_polygon(positions: &[Vec3], epsilon: f32, ear_clip: bool) -> Vec<[usize; 3]> {
    let n = positions.len();
    if n < 3 {
        return Vec::new();
    }
    let all: Vec<usize> = (0..n).collect();
    if n == 3 || !ear_clip {
        return fan(&all);
    }

    let corners = drop_collinear(positions, epsilon);
    if corners.len() < 3 {
        return fan(&all);
    }
    if corners.len() == 3 {
        return vec![[corners[0], corners[1], corners[2]]];
    }

    let normal = plane_normal(positions, &corners, epsilon);
    let projected = project(positions, normal);
    let winding = signed_area(&projected, &corners).signum();
    ear_clip_2d(&projected, corners, winding)
}

fn fan(corners: &[usize]) -> Vec<[usize; 3]> {
    (1..corners.len().saturating_sub(1))
        .map(|i| [corners[0], corners[i], corners[i + 1]])
        .collect()
}

/// Repeatedly remove corners whose two sides are parallel
fn drop_collinear(positions: &[Vec3], epsilon: f32) -> Vec<usize> {
    let mut corners: Vec<usize> = (0..positions.len()).collect();
    let mut changed = true;
    while changed && corners.len() >= 3 {
        changed = false;
        let m = corners.len();
        for i in 0..m {
            let prev = positions[corners[(i + m - 1) % m]];
            let here = positions[corners[i]];
            let next = positions[corners[(i + 1) % m]];
            if (here - prev).cross(next - here).length() < epsilon {
                corners.remove(i);
                changed = true;
                break;
            }
        }
    }
    corners
}

/// Normal from the first three remaining corners, or Newell's method when
/// those happen to be degenerate
fn plane_normal(positions: &[Vec3], corners: &[usize], epsilon: f32) -> Vec3 {
    let (a, b, c) = (positions[corners[0]], positions[corners[1]], positions[corners[2]]);
    let normal = (b - a).cross(c - a);
    if normal.length() >= epsilon {
        return normal.normalize();
    }
    let kept: Vec<Vec3> = corners.iter().map(|&i| positions[i]).collect();
    newell_normal(&kept).try_normalize().unwrap_or(Vec3::Z)
}

/// Coordinates in a right-handed basis `(u, v, normal)` of the plane
fn project(positions: &[Vec3], normal: Vec3) -> Vec<Vec2> {
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);
    positions.iter().map(|p| Vec2::new(p.dot(u), p.dot(v))).collect()
}

fn signed_area(points: &[Vec2], corners: &[usize]) -> f32 {
    let m = corners.len();
    (0..m)
        .map(|i| points[corners[i]].perp_dot(points[corners[(i + 1) % m]]))
        .sum::<f32>()
        * 0.5
}

/// Ear-clip the remaining corners with earcut and orient every triangle to
/// the polygon's winding. Falls back to a fan over the corners when earcut
/// fails or leaves part of the polygon uncovered.
fn ear_clip_2d(points: &[Vec2], corners: Vec<usize>, winding: f32) -> Vec<[usize; 3]> {
    let flattened: Vec<f64> = corners
        .iter()
        .flat_map(|&i| [f64::from(points[i].x), f64::from(points[i].y)])
        .collect();

    let indices = match earcut(&flattened, &[], 2) {
        Ok(indices) => indices,
        Err(err) => {
            trace!("earcut failed ({:?}) on {} corners, fanning", err, corners.len());
            return fan(&corners);
        }
    };
    if indices.len() / 3 < corners.len() - 2 {
        trace!(
            "earcut covered {} of {} triangles, fanning",
            indices.len() / 3,
            corners.len() - 2
        );
        return fan(&corners);
    }

    indices
        .chunks_exact(3)
        .map(|tri| {
            let (a, b, c) = (corners[tri[0]], corners[tri[1]], corners[tri[2]]);
            let turn = (points[b] - points[a]).perp_dot(points[c] - points[a]);
            if turn * winding < 0.0 { [a, c, b] } else { [a, b, c] }
        })
        .collect()
}
