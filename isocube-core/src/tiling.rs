/// Hexagonal placement of repeated cube instances
use std::ops::RangeInclusive;

use nalgebra::Vector2;

use crate::error::{Error, Result};

/// Which way the hexagonal cells point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HexOrientation {
    /// `width = 2 * side`, `height = sqrt(3) * side`; odd columns shift down
    FlatTop,
    /// `width = sqrt(3) * side`, `height = 2 * side`; odd rows shift right
    #[default]
    PointyTop,
}

/// Integer grid coordinates; a cell has no identity beyond these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// A bounded hex grid. Offsets are recomputed on demand and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct HexLayout {
    side: f32,
    orientation: HexOrientation,
    mask: bool,
    rows: RangeInclusive<i32>,
    cols: RangeInclusive<i32>,
}

impl HexLayout {
    pub fn new(
        side: f32,
        orientation: HexOrientation,
        rows: RangeInclusive<i32>,
        cols: RangeInclusive<i32>,
    ) -> Result<Self> {
        if !side.is_finite() || side <= 0.0 {
            return Err(Error::InvalidLayout(format!(
                "hex side must be positive, got {}",
                side
            )));
        }
        if rows.is_empty() || cols.is_empty() {
            return Err(Error::InvalidLayout(format!(
                "empty grid bounds rows={:?} cols={:?}",
                rows, cols
            )));
        }
        Ok(Self {
            side,
            orientation,
            mask: false,
            rows,
            cols,
        })
    }

    /// A grid of `rows x cols` cells centred on the origin
    pub fn centered(side: f32, orientation: HexOrientation, rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidLayout(format!(
                "grid must have at least one cell, got {}x{}",
                rows, cols
            )));
        }
        let span = |n: u32| {
            let n = n as i32;
            -(n - 1) / 2..=n / 2
        };
        Self::new(side, orientation, span(rows), span(cols))
    }

    /// Skip every third cell on odd rows
    pub fn with_mask(self, mask: bool) -> Self {
        Self { mask, ..self }
    }

    pub fn side(&self) -> f32 {
        self.side
    }

    pub fn orientation(&self) -> HexOrientation {
        self.orientation
    }

    pub fn cell_width(&self) -> f32 {
        match self.orientation {
            HexOrientation::FlatTop => 2.0 * self.side,
            HexOrientation::PointyTop => 3.0f32.sqrt() * self.side,
        }
    }

    pub fn cell_height(&self) -> f32 {
        match self.orientation {
            HexOrientation::FlatTop => 3.0f32.sqrt() * self.side,
            HexOrientation::PointyTop => 2.0 * self.side,
        }
    }

    /// World-space translation of a cell's centre
    pub fn grid_offset(&self, row: i32, col: i32) -> Vector2<f32> {
        let (w, h) = (self.cell_width(), self.cell_height());
        match self.orientation {
            HexOrientation::PointyTop => {
                let shift = if row.rem_euclid(2) == 1 { w / 2.0 } else { 0.0 };
                Vector2::new(col as f32 * w + shift, row as f32 * h * 0.75)
            }
            HexOrientation::FlatTop => {
                let shift = if col.rem_euclid(2) == 1 { h / 2.0 } else { 0.0 };
                Vector2::new(col as f32 * w * 0.75, row as f32 * h + shift)
            }
        }
    }

    pub fn is_masked(&self, cell: GridCell) -> bool {
        self.mask && cell.row.rem_euclid(2) == 1 && cell.col.rem_euclid(3) == 0
    }

    /// Cells inside the bounds, row-major, with masked cells skipped
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.cols.clone().map(move |col| GridCell::new(row, col)))
            .filter(move |cell| !self.is_masked(*cell))
    }

    pub fn offsets(&self) -> impl Iterator<Item = Vector2<f32>> + '_ {
        self.cells().map(move |cell| self.grid_offset(cell.row, cell.col))
    }
}
