/// Depth resolution: self-occlusion culling and painter's ordering
///
/// Everything here works on a cube's projected vertices for a single frame
/// and keeps no state between frames. Vertices are identified by their index
/// in the cube's vertex array, never by comparing positions.
use std::cmp::Ordering;
use std::f32::consts::FRAC_1_SQRT_2;

use nalgebra::Point2;

use crate::geometry::{Cube, Edge, Face, VERTEX_COUNT};
use crate::projection::Projected;

/// Which rule hides the edges a solid cube would cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPolicy {
    /// Drop every edge touching the nearest or the farthest vertex
    #[default]
    VertexExclusion,
    /// Drop edges whose midpoint depth falls outside `[-c, c]`, `c = size / sqrt(2)`
    DepthCutoff,
}

/// Indices of the vertices closest to and farthest from the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremes {
    pub nearest: usize,
    pub farthest: usize,
}

/// Find the extreme vertices; on ties the first in enumeration order wins
pub fn depth_extremes(projected: &[Projected; VERTEX_COUNT]) -> Extremes {
    let mut nearest = 0;
    let mut farthest = 0;
    for (i, p) in projected.iter().enumerate().skip(1) {
        if p.depth > projected[nearest].depth {
            nearest = i;
        }
        if p.depth < projected[farthest].depth {
            farthest = i;
        }
    }
    Extremes { nearest, farthest }
}

/// Midpoint depth bound used by [`VisibilityPolicy::DepthCutoff`]
pub fn depth_cutoff(cube: &Cube) -> f32 {
    cube.size() * FRAC_1_SQRT_2
}

/// Edges left after culling with `policy`, in the cube's edge order
pub fn visible_edges(
    cube: &Cube,
    projected: &[Projected; VERTEX_COUNT],
    policy: VisibilityPolicy,
) -> Vec<Edge> {
    match policy {
        VisibilityPolicy::VertexExclusion => {
            let Extremes { nearest, farthest } = depth_extremes(projected);
            cube.edges()
                .iter()
                .filter(|e| !e.touches(nearest) && !e.touches(farthest))
                .copied()
                .collect()
        }
        VisibilityPolicy::DepthCutoff => {
            let cutoff = depth_cutoff(cube);
            cube.edges()
                .iter()
                .filter(|e| {
                    let mid = (projected[e.a].depth + projected[e.b].depth) / 2.0;
                    (-cutoff..=cutoff).contains(&mid)
                })
                .copied()
                .collect()
        }
    }
}

/// A face with the depth of its centre for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDepth {
    pub face: Face,
    pub depth: f32,
}

fn by_depth(a: &FaceDepth, b: &FaceDepth) -> Ordering {
    a.depth.partial_cmp(&b.depth).unwrap_or(Ordering::Equal)
}

/// Sort farthest first. The sort is stable, so equal depths keep their order.
pub fn sort_back_to_front(faces: &mut [FaceDepth]) {
    faces.sort_by(by_depth);
}

/// All six faces in painter's order
pub fn faces_back_to_front(cube: &Cube, projected: &[Projected; VERTEX_COUNT]) -> Vec<FaceDepth> {
    let mut faces: Vec<FaceDepth> = cube
        .faces()
        .iter()
        .map(|face| FaceDepth {
            face: *face,
            depth: face.corners.iter().map(|&c| projected[c].depth).sum::<f32>() / 4.0,
        })
        .collect();
    sort_back_to_front(&mut faces);
    faces
}

/// Outline of the projected cube as a hexagon suitable for filling.
///
/// The nearest and farthest vertices project inside the outline and are
/// dropped; the other six are ordered by angle around the origin.
pub fn silhouette(projected: &[Projected; VERTEX_COUNT]) -> Vec<Point2<f32>> {
    let Extremes { nearest, farthest } = depth_extremes(projected);
    let mut ring: Vec<Point2<f32>> = projected
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != nearest && *i != farthest)
        .map(|(_, p)| p.screen)
        .collect();
    ring.sort_by(|a, b| {
        a.y.atan2(a.x)
            .partial_cmp(&b.y.atan2(b.x))
            .unwrap_or(Ordering::Equal)
    });
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;
    use crate::projection::{Projection, DIMETRIC_TILT, ISOMETRIC_TILT};
    use std::collections::HashSet;
    use std::f32::consts::{FRAC_PI_4, PI};

    fn projected(cube: &Cube, rotation: f32, tilt: f32) -> [Projected; VERTEX_COUNT] {
        Projection::new(rotation, tilt).project_cube(cube)
    }

    fn hidden(cube: &Cube, visible: &[Edge]) -> HashSet<Edge> {
        cube.edges()
            .iter()
            .filter(|e| !visible.contains(e))
            .copied()
            .collect()
    }

    #[test]
    fn test_extremes_corner_view() {
        let cube = Cube::new(1.0).unwrap();
        let p = projected(&cube, FRAC_PI_4, ISOMETRIC_TILT);
        // (+,+,+) faces the viewer, (-,-,-) points away
        assert_eq!(
            depth_extremes(&p),
            Extremes {
                nearest: 7,
                farthest: 0
            }
        );
    }

    #[test]
    fn test_extremes_ties_keep_first() {
        let cube = Cube::new(1.0).unwrap();
        let p = projected(&cube, 0.0, ISOMETRIC_TILT);
        // Vertices 3 and 7 tie for nearest, 0 and 4 tie for farthest
        assert_eq!(p[3].depth, p[7].depth);
        assert_eq!(p[0].depth, p[4].depth);
        assert_eq!(
            depth_extremes(&p),
            Extremes {
                nearest: 3,
                farthest: 0
            }
        );
    }

    #[test]
    fn test_policies_agree_on_corner_views() {
        let cube = Cube::new(100.0).unwrap();
        for k in [1.0f32, 3.0, 5.0, 7.0] {
            let p = projected(&cube, k * FRAC_PI_4, ISOMETRIC_TILT);
            let by_vertex = visible_edges(&cube, &p, VisibilityPolicy::VertexExclusion);
            let by_cutoff = visible_edges(&cube, &p, VisibilityPolicy::DepthCutoff);
            assert_eq!(by_vertex, by_cutoff, "rotation {}pi/4", k);
            assert_eq!(by_vertex.len(), 6);

            let Extremes { nearest, farthest } = depth_extremes(&p);
            for e in hidden(&cube, &by_cutoff) {
                assert!(e.touches(nearest) || e.touches(farthest));
            }
        }
    }

    #[test]
    fn test_policies_on_face_on_view() {
        // With tied extremes both rules still hide six edges and share the
        // front-top and back-bottom ones
        let cube = Cube::new(1.0).unwrap();
        let p = projected(&cube, 0.0, ISOMETRIC_TILT);
        let by_vertex = hidden(
            &cube,
            &visible_edges(&cube, &p, VisibilityPolicy::VertexExclusion),
        );
        let by_cutoff = hidden(&cube, &visible_edges(&cube, &p, VisibilityPolicy::DepthCutoff));
        assert_eq!(by_vertex.len(), 6);
        assert_eq!(by_cutoff.len(), 6);
        for e in [Edge::new(3, 7), Edge::new(0, 4)] {
            assert!(by_vertex.contains(&e));
            assert!(by_cutoff.contains(&e));
        }
    }

    #[test]
    fn test_cutoff_scales_with_size() {
        let cube = Cube::new(2.0).unwrap();
        assert!((depth_cutoff(&cube) - 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_faces_back_to_front_corner_view() {
        let cube = Cube::new(1.0).unwrap();
        let p = projected(&cube, FRAC_PI_4, ISOMETRIC_TILT);
        let sorted = faces_back_to_front(&cube, &p);
        // The three faces meeting at (-,-,-) go down first
        let signs: Vec<i8> = sorted.iter().map(|f| f.face.sign).collect();
        assert_eq!(signs, vec![-1, -1, -1, 1, 1, 1]);
        let front: HashSet<Axis> = sorted[3..].iter().map(|f| f.face.axis).collect();
        assert_eq!(front.len(), 3);
    }

    #[test]
    fn test_equal_depths_keep_enumeration_order() {
        let cube = Cube::new(1.0).unwrap();
        let mut faces: Vec<FaceDepth> = cube
            .faces()
            .iter()
            .map(|face| FaceDepth {
                face: *face,
                depth: if face.sign > 0 { 1.0 } else { 0.0 },
            })
            .collect();
        sort_back_to_front(&mut faces);
        let order: Vec<(Axis, i8)> = faces.iter().map(|f| (f.face.axis, f.face.sign)).collect();
        assert_eq!(
            order,
            vec![
                (Axis::X, -1),
                (Axis::Y, -1),
                (Axis::Z, -1),
                (Axis::X, 1),
                (Axis::Y, 1),
                (Axis::Z, 1),
            ]
        );
    }

    #[test]
    fn test_face_sort_is_stable() {
        let cube = Cube::new(1.0).unwrap();
        for i in 0..24 {
            let p = projected(&cube, i as f32 * PI / 12.0, DIMETRIC_TILT);
            let sorted = faces_back_to_front(&cube, &p);
            for pair in sorted.windows(2) {
                assert!(pair[0].depth <= pair[1].depth);
            }
            let mut again = sorted.clone();
            sort_back_to_front(&mut again);
            assert_eq!(again, sorted);
        }
    }

    fn orient(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    fn properly_cross(p1: Point2<f32>, p2: Point2<f32>, q1: Point2<f32>, q2: Point2<f32>) -> bool {
        const E: f32 = 1e-4;
        let opposite = |u: f32, v: f32| (u > E && v < -E) || (u < -E && v > E);
        opposite(orient(q1, q2, p1), orient(q1, q2, p2))
            && opposite(orient(p1, p2, q1), orient(p1, p2, q2))
    }

    #[test]
    fn test_silhouette_is_simple() {
        let cube = Cube::new(1.0).unwrap();
        for tilt in [ISOMETRIC_TILT, DIMETRIC_TILT] {
            for i in 0..360 {
                let rotation = i as f32 * 2.0 * PI / 360.0;
                let ring = silhouette(&projected(&cube, rotation, tilt));
                assert_eq!(ring.len(), 6);
                let n = ring.len();
                for a in 0..n {
                    for b in a + 1..n {
                        if b == a + 1 || (a == 0 && b == n - 1) {
                            continue;
                        }
                        assert!(
                            !properly_cross(ring[a], ring[(a + 1) % n], ring[b], ring[(b + 1) % n]),
                            "self-intersection at rotation {} tilt {}",
                            rotation,
                            tilt
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_silhouette_corner_view_is_regular_hexagon() {
        let cube = Cube::new(1.0).unwrap();
        let ring = silhouette(&projected(&cube, FRAC_PI_4, ISOMETRIC_TILT));
        let radius = 2.0 * (2.0f32 / 3.0).sqrt();
        for p in &ring {
            assert!((p.coords.norm() - radius).abs() < 1e-4);
        }
        for i in 0..ring.len() {
            let a = ring[i].y.atan2(ring[i].x);
            let b = ring[(i + 1) % ring.len()].y.atan2(ring[(i + 1) % ring.len()].x);
            let step = (b - a).rem_euclid(2.0 * PI);
            assert!((step - PI / 3.0).abs() < 1e-3);
        }
    }
}
