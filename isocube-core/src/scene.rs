/// Scene controller: owns the animation state and drives a frame's drawing
use nalgebra::Vector2;

use crate::animation::AnimationState;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::geometry::Cube;
use crate::projection::Projection;
use crate::shapes::{renderer_for, Frame, ShapeRenderer};
use crate::surface::{Surface, SurfaceScope};
use crate::tiling::HexLayout;

/// Hex side that lets corner-on cube outlines of half-size `size` interlock
pub fn outline_side(size: f32) -> f32 {
    2.0 * size * (2.0f32 / 3.0).sqrt()
}

/// A configured animation: one cube model, an optional hex field of
/// instances and the loop progress.
///
/// The host calls [`Scene::update`] then [`Scene::render`] once per frame.
pub struct Scene {
    config: SceneConfig,
    cube: Cube,
    layout: Option<HexLayout>,
    shape: Box<dyn ShapeRenderer>,
    state: AnimationState,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self> {
        let cube = Cube::new(config.cube_size)?;
        let state = AnimationState::new(config.period)?;
        let layout = match &config.tiling {
            Some(tiling) => {
                let side = tiling.side.unwrap_or_else(|| outline_side(config.cube_size));
                Some(
                    HexLayout::centered(side, tiling.orientation, tiling.rows, tiling.cols)?
                        .with_mask(tiling.mask),
                )
            }
            None => None,
        };
        let shape = renderer_for(config.shape, config.policy);
        if let Some(layout) = &layout {
            log::debug!(
                "hex layout: {:?} side={:.2}",
                layout.orientation(),
                layout.side()
            );
        }

        log::debug!(
            "scene: shape={:?} policy={:?} motion={:?} period={}s instances={}",
            config.shape,
            config.policy,
            config.motion,
            config.period,
            layout.as_ref().map_or(1, |l| l.cells().count())
        );

        Ok(Self {
            config,
            cube,
            layout,
            shape,
            state,
        })
    }

    /// Swap in a custom shape strategy
    pub fn with_shape(self, shape: Box<dyn ShapeRenderer>) -> Self {
        Self { shape, ..self }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn layout(&self) -> Option<&HexLayout> {
        self.layout.as_ref()
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Jump to a given point of the loop
    pub fn seek(&mut self, anim_amt: f32) {
        self.state = self.state.with_amount(anim_amt);
    }

    /// Current rotation angle derived from loop progress
    pub fn rotation(&self) -> f32 {
        self.config.motion.rotation(self.state.anim_amt())
    }

    /// Advance the clock by `dt` seconds. A negative `dt` is rejected and
    /// leaves the state untouched.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.state = self.state.advance(dt)?;
        Ok(())
    }

    /// Issue one frame's draw calls. The host clears the surface beforehand.
    pub fn render(&self, surface: &mut dyn Surface) {
        let projection = Projection::new(self.rotation(), self.config.tilt);
        let frame = Frame::new(&self.cube, projection, &self.config.style);
        log::trace!(
            "render: anim_amt={:.4} rotation={:.4} tilt={:.4}",
            self.state.anim_amt(),
            projection.rotation(),
            projection.tilt()
        );

        match &self.layout {
            Some(layout) => {
                for offset in layout.offsets() {
                    self.draw_instance(surface, &frame, offset);
                }
            }
            None => self.draw_instance(surface, &frame, Vector2::zeros()),
        }
    }

    fn draw_instance(&self, surface: &mut dyn Surface, frame: &Frame<'_>, offset: Vector2<f32>) {
        let mut scope = SurfaceScope::new(surface);
        scope.translate(offset.x, offset.y);
        self.shape.draw(&mut *scope, frame);
    }
}
