/// Isocube Core - isometric projection and depth resolution for animated cubes
///
/// This library holds the platform-free engine: projecting a cube, culling its
/// self-occluded edges, ordering faces back to front, laying instances out on
/// a hex grid and driving a looping animation onto any 2D drawing surface.

pub mod animation;
pub mod config;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod tiling;

// Re-export commonly used types
pub use animation::{divide_interval, ease_in_out, AnimationState, Motion};
pub use config::{SceneConfig, ShapeKind, Style, TilingConfig};
pub use depth::{Extremes, FaceDepth, VisibilityPolicy};
pub use error::{Error, Result};
pub use geometry::{Cube, Edge, Face};
pub use projection::{project, Projected, Projection, DIMETRIC_TILT, ISOMETRIC_TILT};
pub use scene::Scene;
pub use shapes::{Frame, ShapeRenderer};
pub use surface::{DrawCommand, LineCap, LineJoin, RecordingSurface, Surface, SurfaceScope};
pub use tiling::{GridCell, HexLayout, HexOrientation};
