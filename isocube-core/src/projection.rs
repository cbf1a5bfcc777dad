/// Axonometric projection of object-space points onto the drawing plane
use nalgebra::{Point2, Point3};

use crate::geometry::{Cube, VERTEX_COUNT};

/// Tilt giving the simple dimetric look (45 degrees)
pub const DIMETRIC_TILT: f32 = std::f32::consts::FRAC_PI_4;

/// Tilt at which all three axes foreshorten equally: atan(1/sqrt(2))
pub const ISOMETRIC_TILT: f32 = 0.615_479_7;

/// A projected point: screen position plus a depth used only for ordering
///
/// Larger depth is closer to the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Point2<f32>,
    pub depth: f32,
}

/// A rotation about the vertical axis followed by a tilt towards the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    rotation: f32,
    tilt: f32,
    rot_sin: f32,
    rot_cos: f32,
    tilt_sin: f32,
    tilt_cos: f32,
}

impl Projection {
    pub fn new(rotation: f32, tilt: f32) -> Self {
        let (rot_sin, rot_cos) = rotation.sin_cos();
        let (tilt_sin, tilt_cos) = tilt.sin_cos();
        Self {
            rotation,
            tilt,
            rot_sin,
            rot_cos,
            tilt_sin,
            tilt_cos,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Project a single point
    pub fn project(&self, p: &Point3<f32>) -> Projected {
        // Rotate in the xz plane
        let x = p.x * self.rot_cos - p.z * self.rot_sin;
        let z = p.x * self.rot_sin + p.z * self.rot_cos;
        let y = p.y;

        // Tilt the vertical towards the viewer
        Projected {
            screen: Point2::new(x, y * self.tilt_cos - z * self.tilt_sin),
            depth: y * self.tilt_sin + z * self.tilt_cos,
        }
    }

    /// Project every cube vertex, keeping the cube's vertex indices
    pub fn project_cube(&self, cube: &Cube) -> [Projected; VERTEX_COUNT] {
        cube.vertices().map(|p| self.project(&p))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(0.0, ISOMETRIC_TILT)
    }
}

/// Project `p` after rotating by `rotation` in the xz plane and tilting by `tilt`
pub fn project(p: &Point3<f32>, rotation: f32, tilt: f32) -> Projected {
    Projection::new(rotation, tilt).project(p)
}
