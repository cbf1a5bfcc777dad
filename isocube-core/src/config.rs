/// Scene configuration: presets plus `key=value` overrides
///
/// Every per-scene constant lives here so that each demo variant is a value
/// rather than a separate controller. Overrides look like
/// `size=80 period=4, tilt=dimetric shape=faces grid=3x5 hex=pointy mask=on`.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1, space0, u32 as dec_u32},
    combinator::{all_consuming, not, opt},
    multi::separated_list0,
    sequence::{delimited, preceded, separated_pair, terminated},
    Finish, IResult,
};

use crate::animation::Motion;
use crate::depth::VisibilityPolicy;
use crate::error::{Error, Result};
use crate::projection::{DIMETRIC_TILT, ISOMETRIC_TILT};
use crate::tiling::HexOrientation;

/// Names accepted by [`SceneConfig::preset`]
pub const PRESETS: &[&str] = &[
    "wireframe",
    "cutoff",
    "faces",
    "silhouette",
    "hex-field",
    "stars",
];

/// What gets drawn for each cube instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    #[default]
    Wireframe,
    Faces,
    Silhouette,
    Star,
}

/// Repeat the shape on a hex grid centred on the origin
#[derive(Debug, Clone, PartialEq)]
pub struct TilingConfig {
    pub rows: u32,
    pub cols: u32,
    pub orientation: HexOrientation,
    /// Hex side; defaults to the corner-on outline radius of the cube
    pub side: Option<f32>,
    pub mask: bool,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            orientation: HexOrientation::PointyTop,
            side: None,
            mask: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke: String,
    pub fill: String,
    pub line_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: "black".to_string(),
            fill: "white".to_string(),
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Half the cube's edge length
    pub cube_size: f32,
    /// Seconds per loop
    pub period: f32,
    pub tilt: f32,
    pub policy: VisibilityPolicy,
    pub shape: ShapeKind,
    pub motion: Motion,
    pub tiling: Option<TilingConfig>,
    pub style: Style,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cube_size: 100.0,
            period: 3.0,
            tilt: ISOMETRIC_TILT,
            policy: VisibilityPolicy::VertexExclusion,
            shape: ShapeKind::Wireframe,
            motion: Motion::Spin,
            tiling: None,
            style: Style::default(),
        }
    }
}

impl SceneConfig {
    pub fn preset(name: &str) -> Result<Self> {
        let base = Self::default();
        let config = match name {
            "wireframe" => base,
            "cutoff" => Self {
                period: 4.0,
                tilt: DIMETRIC_TILT,
                policy: VisibilityPolicy::DepthCutoff,
                ..base
            },
            "faces" => Self {
                period: 4.0,
                shape: ShapeKind::Faces,
                motion: Motion::EasedSpin,
                ..base
            },
            "silhouette" => Self {
                period: 9.0,
                shape: ShapeKind::Silhouette,
                motion: Motion::Staged,
                ..base
            },
            "hex-field" => Self {
                cube_size: 40.0,
                period: 9.0,
                shape: ShapeKind::Silhouette,
                motion: Motion::Staged,
                tiling: Some(TilingConfig {
                    rows: 5,
                    cols: 7,
                    ..TilingConfig::default()
                }),
                ..base
            },
            "stars" => Self {
                cube_size: 40.0,
                period: 4.0,
                shape: ShapeKind::Star,
                motion: Motion::EasedSpin,
                tiling: Some(TilingConfig {
                    rows: 3,
                    cols: 5,
                    orientation: HexOrientation::FlatTop,
                    side: None,
                    mask: true,
                }),
                ..base
            },
            other => {
                return Err(Error::Config(format!(
                    "unknown preset '{}', expected one of {}",
                    other,
                    PRESETS.join(", ")
                )))
            }
        };
        Ok(config)
    }

    /// Apply `key=value` overrides on top of this configuration
    pub fn with_overrides(mut self, text: &str) -> Result<Self> {
        for (key, value) in parse_overrides(text)? {
            self.apply(key, value)?;
        }
        Ok(self)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "size" => self.cube_size = number(key, value)?,
            "period" => self.period = number(key, value)?,
            "tilt" => {
                self.tilt = match value {
                    "isometric" | "iso" => ISOMETRIC_TILT,
                    "dimetric" => DIMETRIC_TILT,
                    degrees => number(key, degrees)?.to_radians(),
                }
            }
            "policy" => {
                self.policy = match value {
                    "vertex" => VisibilityPolicy::VertexExclusion,
                    "cutoff" => VisibilityPolicy::DepthCutoff,
                    _ => return Err(invalid(key, value)),
                }
            }
            "shape" => {
                self.shape = match value {
                    "edges" | "wireframe" => ShapeKind::Wireframe,
                    "faces" => ShapeKind::Faces,
                    "silhouette" => ShapeKind::Silhouette,
                    "star" => ShapeKind::Star,
                    _ => return Err(invalid(key, value)),
                }
            }
            "motion" => {
                self.motion = match value {
                    "spin" => Motion::Spin,
                    "eased" => Motion::EasedSpin,
                    "staged" => Motion::Staged,
                    _ => return Err(invalid(key, value)),
                }
            }
            "grid" => {
                if value == "none" {
                    self.tiling = None;
                } else {
                    let (rows, cols) = grid_dims(value).ok_or_else(|| invalid(key, value))?;
                    let tiling = self.tiling.get_or_insert_with(TilingConfig::default);
                    tiling.rows = rows;
                    tiling.cols = cols;
                }
            }
            "hex" => {
                let orientation = match value {
                    "flat" => HexOrientation::FlatTop,
                    "pointy" => HexOrientation::PointyTop,
                    _ => return Err(invalid(key, value)),
                };
                self.tiling
                    .get_or_insert_with(TilingConfig::default)
                    .orientation = orientation;
            }
            "side" => {
                let side = number(key, value)?;
                self.tiling.get_or_insert_with(TilingConfig::default).side = Some(side);
            }
            "mask" => {
                let mask = match value {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid(key, value)),
                };
                self.tiling.get_or_insert_with(TilingConfig::default).mask = mask;
            }
            "stroke" => self.style.stroke = value.to_string(),
            "fill" => self.style.fill = value.to_string(),
            "width" => self.style.line_width = number(key, value)?,
            _ => return Err(Error::Config(format!("unknown key '{}'", key))),
        }
        Ok(())
    }
}

/// Parse `"[preset] key=value ..."`; without a leading preset name the
/// default wireframe scene is used
pub fn parse_scene(text: &str) -> Result<SceneConfig> {
    let text = text.trim();
    let (rest, preset) = leading_preset(text)
        .finish()
        .map_err(|e| Error::Config(format!("malformed scene: {}", e)))?;
    match preset {
        Some(name) => SceneConfig::preset(name)?.with_overrides(rest),
        None => SceneConfig::default().with_overrides(text),
    }
}

fn invalid(key: &str, value: &str) -> Error {
    Error::Config(format!("invalid value '{}' for '{}'", value, key))
}

fn number(key: &str, value: &str) -> Result<f32> {
    value.parse::<f32>().map_err(|_| invalid(key, value))
}

fn key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

/// A bare word that is not the key of an assignment
fn leading_preset(input: &str) -> IResult<&str, Option<&str>> {
    opt(terminated(key, not(preceded(space0, char('=')))))(input)
}

fn raw_value(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ',' && c != '=')(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(key, delimited(space0, char('='), space0), raw_value)(input)
}

fn separator(input: &str) -> IResult<&str, &str> {
    alt((delimited(multispace0, tag(","), multispace0), multispace1))(input)
}

fn assignments(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    delimited(
        multispace0,
        separated_list0(separator, assignment),
        multispace0,
    )(input)
}

/// Split override text into `(key, value)` pairs without interpreting them
pub fn parse_overrides(input: &str) -> Result<Vec<(&str, &str)>> {
    all_consuming(assignments)(input)
        .finish()
        .map(|(_, pairs)| pairs)
        .map_err(|e| Error::Config(format!("malformed overrides: {}", e)))
}

fn grid_dims(input: &str) -> Option<(u32, u32)> {
    let parsed: IResult<&str, (u32, u32)> =
        all_consuming(separated_pair(dec_u32, alt((char('x'), char('X'))), dec_u32))(input);
    parsed.finish().ok().map(|(_, dims)| dims)
}
