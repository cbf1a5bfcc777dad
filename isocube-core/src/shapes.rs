/// Shape renderers: strategies that draw one projected cube instance
use std::f32::consts::PI;

use nalgebra::Point2;

use crate::config::{ShapeKind, Style};
use crate::depth::{depth_extremes, faces_back_to_front, silhouette, visible_edges, VisibilityPolicy};
use crate::geometry::{Cube, VERTEX_COUNT};
use crate::projection::{Projected, Projection};
use crate::surface::{LineCap, LineJoin, Surface, SurfaceScope};

/// Everything a shape needs to draw the current frame
///
/// The cube is projected once per frame and shared by every instance.
pub struct Frame<'a> {
    pub cube: &'a Cube,
    pub projection: Projection,
    pub projected: [Projected; VERTEX_COUNT],
    pub style: &'a Style,
}

impl<'a> Frame<'a> {
    pub fn new(cube: &'a Cube, projection: Projection, style: &'a Style) -> Self {
        Self {
            cube,
            projection,
            projected: projection.project_cube(cube),
            style,
        }
    }

    fn screen(&self, vertex: usize) -> Point2<f32> {
        self.projected[vertex].screen
    }
}

/// Draws one instance at the surface's current origin
pub trait ShapeRenderer {
    fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>);
}

/// The renderer matching a configured shape kind
pub fn renderer_for(kind: ShapeKind, policy: VisibilityPolicy) -> Box<dyn ShapeRenderer> {
    match kind {
        ShapeKind::Wireframe => Box::new(Wireframe { policy }),
        ShapeKind::Faces => Box::new(SolidFaces),
        ShapeKind::Silhouette => Box::new(Silhouette),
        ShapeKind::Star => Box::new(Star::default()),
    }
}

fn line_style(surface: &mut dyn Surface, style: &Style) {
    surface.set_stroke_style(&style.stroke);
    surface.set_line_width(style.line_width);
    surface.set_line_cap(LineCap::Round);
    surface.set_line_join(LineJoin::Round);
}

fn stroke_line(surface: &mut dyn Surface, style: &Style, a: Point2<f32>, b: Point2<f32>) {
    surface.begin_path();
    line_style(surface, style);
    surface.move_to(a.x, a.y);
    surface.line_to(b.x, b.y);
    surface.stroke();
}

fn fill_polygon<I>(surface: &mut dyn Surface, style: &Style, points: I)
where
    I: IntoIterator<Item = Point2<f32>>,
{
    surface.begin_path();
    line_style(surface, style);
    surface.set_fill_style(&style.fill);
    let mut points = points.into_iter();
    if let Some(first) = points.next() {
        surface.move_to(first.x, first.y);
        for p in points {
            surface.line_to(p.x, p.y);
        }
    }
    surface.close_path();
    surface.fill();
    surface.stroke();
}

/// Edges only, with self-occluded edges culled by a [`VisibilityPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Wireframe {
    pub policy: VisibilityPolicy,
}

impl ShapeRenderer for Wireframe {
    fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        for edge in visible_edges(frame.cube, &frame.projected, self.policy) {
            stroke_line(surface, frame.style, frame.screen(edge.a), frame.screen(edge.b));
        }
    }
}

/// All six faces filled back to front
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidFaces;

impl ShapeRenderer for SolidFaces {
    fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        for face in faces_back_to_front(frame.cube, &frame.projected) {
            fill_polygon(
                surface,
                frame.style,
                face.face.corners.iter().map(|&c| frame.screen(c)),
            );
        }
    }
}

/// Filled hexagonal outline plus the three edges meeting at the nearest corner
#[derive(Debug, Clone, Copy, Default)]
pub struct Silhouette;

impl ShapeRenderer for Silhouette {
    fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        fill_polygon(surface, frame.style, silhouette(&frame.projected));

        let nearest = depth_extremes(&frame.projected).nearest;
        for edge in frame.cube.edges().iter().filter(|e| e.touches(nearest)) {
            stroke_line(surface, frame.style, frame.screen(edge.a), frame.screen(edge.b));
        }
    }
}

/// A flat star polygon turning with the cube
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub points: usize,
    /// Inner radius as a fraction of the outer one
    pub inner_ratio: f32,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            points: 6,
            inner_ratio: 0.5,
        }
    }
}

impl Star {
    fn outline(&self, outer: f32) -> Vec<Point2<f32>> {
        let n = self.points.max(2);
        (0..2 * n)
            .map(|k| {
                let r = if k % 2 == 0 {
                    outer
                } else {
                    outer * self.inner_ratio
                };
                let angle = k as f32 * PI / n as f32 - PI / 2.0;
                Point2::new(r * angle.cos(), r * angle.sin())
            })
            .collect()
    }
}

impl ShapeRenderer for Star {
    fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        // A quarter turn of the cube moves the star on by one point, which
        // keeps the loop seamless
        let spin = frame.projection.rotation() * 4.0 / self.points.max(2) as f32;
        let mut scope = SurfaceScope::new(surface);
        scope.rotate(spin);
        fill_polygon(&mut *scope, frame.style, self.outline(frame.cube.size() * 1.5));
    }
}
