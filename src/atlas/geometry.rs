//! Atlas grid geometry and code point to cell arithmetic.

use crate::error::{Error, Result};

/// First code point covered by the atlas (the space character).
pub const FIRST_CODE_POINT: u32 = 32;

/// Default cell width in pixels.
pub const DEFAULT_CELL_WIDTH: u32 = 10;
/// Default cell height in pixels.
pub const DEFAULT_CELL_HEIGHT: u32 = 6;
/// Default rendering multiplier.
pub const DEFAULT_SCALE: f32 = 4.0;
/// Default padding around each rendered glyph in pixels.
pub const DEFAULT_PADDING: u32 = 2;

/// Shape of the atlas grid in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub columns: u32,
    pub rows: u32,
}

impl GridShape {
    /// The grid every atlas image is laid out on: 8 columns by 24 rows,
    /// covering code points 32 through 223.
    pub const CANONICAL: Self = Self::new(8, 24);

    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of cells in the grid.
    #[must_use]
    pub const fn cell_count(self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// One slot of the atlas grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasCell {
    pub column: u32,
    pub row: u32,
}

impl AtlasCell {
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

/// Immutable description of a sprite atlas and how its cells are drawn.
///
/// A geometry is never mutated in place. Calibration and option changes
/// produce a new value that replaces the old one wholesale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasGeometry {
    cell_width: u32,
    cell_height: u32,
    scale: f32,
    padding: u32,
    grid: GridShape,
    first_code_point: u32,
}

impl AtlasGeometry {
    /// Geometry with the given cell size on the canonical grid, default scale and padding.
    #[must_use]
    pub const fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            scale: DEFAULT_SCALE,
            padding: DEFAULT_PADDING,
            grid: GridShape::CANONICAL,
            first_code_point: FIRST_CODE_POINT,
        }
    }

    #[must_use]
    pub const fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    #[must_use]
    pub const fn with_padding(self, padding: u32) -> Self {
        Self { padding, ..self }
    }

    #[must_use]
    pub const fn with_grid(self, grid: GridShape) -> Self {
        Self { grid, ..self }
    }

    #[must_use]
    pub const fn with_cell_size(self, cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            ..self
        }
    }

    #[must_use]
    pub const fn cell_width(&self) -> u32 {
        self.cell_width
    }

    #[must_use]
    pub const fn cell_height(&self) -> u32 {
        self.cell_height
    }

    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub const fn padding(&self) -> u32 {
        self.padding
    }

    #[must_use]
    pub const fn grid(&self) -> GridShape {
        self.grid
    }

    #[must_use]
    pub const fn first_code_point(&self) -> u32 {
        self.first_code_point
    }

    /// Last code point with a cell, or `None` for an empty grid.
    #[must_use]
    pub fn last_code_point(&self) -> Option<u32> {
        self.grid
            .cell_count()
            .checked_sub(1)
            .and_then(|n| self.first_code_point.checked_add(n))
    }

    /// Check that the geometry can be rendered.
    pub fn validate(&self) -> Result<()> {
        if self.cell_width == 0 {
            return Err(Error::InvalidGeometry(
                "cell width must be positive".to_string(),
            ));
        }
        if self.cell_height == 0 {
            return Err(Error::InvalidGeometry(
                "cell height must be positive".to_string(),
            ));
        }
        if self.grid.columns == 0 {
            return Err(Error::InvalidGeometry(
                "grid must have at least one column".to_string(),
            ));
        }
        if self.grid.rows == 0 {
            return Err(Error::InvalidGeometry(
                "grid must have at least one row".to_string(),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Whether `code_point` has a cell in this atlas.
    #[must_use]
    pub fn covers(&self, code_point: u32) -> bool {
        code_point
            .checked_sub(self.first_code_point)
            .is_some_and(|index| index < self.grid.cell_count())
    }

    /// Resolve the atlas cell for a code point.
    ///
    /// Codes below the first code point or past the last cell return
    /// [`Error::OutOfRangeCodePoint`].
    pub fn cell_of(&self, code_point: u32) -> Result<AtlasCell> {
        if !self.covers(code_point) {
            return Err(Error::OutOfRangeCodePoint {
                code_point,
                first: self.first_code_point,
                last: self.last_code_point().unwrap_or(self.first_code_point),
            });
        }
        // covers() guarantees a non-empty grid, so columns > 0.
        let index = code_point - self.first_code_point;
        Ok(AtlasCell {
            column: index % self.grid.columns,
            row: index / self.grid.columns,
        })
    }

    /// Code point drawn by a cell, if the cell lies inside the grid.
    #[must_use]
    pub fn code_point_of(&self, cell: AtlasCell) -> Option<u32> {
        if cell.column >= self.grid.columns || cell.row >= self.grid.rows {
            return None;
        }
        let index = cell.row * self.grid.columns + cell.column;
        self.first_code_point.checked_add(index)
    }

    /// Offset of the atlas image that brings `cell` to the origin of a glyph box.
    #[must_use]
    pub fn background_offset(&self, cell: AtlasCell) -> (f32, f32) {
        (
            -(cell.column as f32) * self.cell_width as f32 * self.scale,
            -(cell.row as f32) * self.cell_height as f32 * self.scale,
        )
    }

    /// Size of one cell once scaled.
    #[must_use]
    pub fn scaled_cell_size(&self) -> (f32, f32) {
        (
            self.cell_width as f32 * self.scale,
            self.cell_height as f32 * self.scale,
        )
    }

    /// Size of a rendered glyph box, scaled cell plus padding on both sides.
    #[must_use]
    pub fn box_size(&self) -> (f32, f32) {
        let (w, h) = self.scaled_cell_size();
        let pad = 2.0 * self.padding as f32;
        (w + pad, h + pad)
    }

    /// Pixel size of an atlas image that tiles exactly into this grid.
    #[must_use]
    pub fn atlas_size(&self) -> (u32, u32) {
        (
            self.cell_width.saturating_mul(self.grid.columns),
            self.cell_height.saturating_mul(self.grid.rows),
        )
    }

    /// Iterate every cell of the grid with its code point, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u32, AtlasCell)> + '_ {
        let columns = self.grid.columns;
        (0..self.grid.rows).flat_map(move |row| {
            (0..columns).filter_map(move |column| {
                let cell = AtlasCell::new(column, row);
                self.code_point_of(cell).map(|cp| (cp, cell))
            })
        })
    }
}

impl Default for AtlasGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // Cell Arithmetic
    // ============================================

    #[test]
    fn test_cell_of_grid_origin() {
        let g = AtlasGeometry::default();
        assert_eq!(g.cell_of(32).unwrap(), AtlasCell::new(0, 0));
    }

    #[test]
    fn test_cell_of_row_wrap() {
        let g = AtlasGeometry::default();
        assert_eq!(g.cell_of(39).unwrap(), AtlasCell::new(7, 0));
        assert_eq!(g.cell_of(40).unwrap(), AtlasCell::new(0, 1));
        assert_eq!(g.cell_of(u32::from('A')).unwrap(), AtlasCell::new(1, 4));
    }

    #[test]
    fn test_cell_of_last_cell() {
        let g = AtlasGeometry::default();
        assert_eq!(g.last_code_point(), Some(223));
        assert_eq!(g.cell_of(223).unwrap(), AtlasCell::new(7, 23));
    }

    #[test]
    fn test_cell_of_out_of_range() {
        let g = AtlasGeometry::default();
        assert_eq!(
            g.cell_of(224),
            Err(Error::OutOfRangeCodePoint {
                code_point: 224,
                first: 32,
                last: 223,
            })
        );
        assert!(g.cell_of(u32::from('\t')).is_err());
        assert!(g.cell_of(u32::from('中')).is_err());
        assert!(g.cell_of(u32::MAX).is_err());
    }

    #[test]
    fn test_cell_of_empty_grid_does_not_divide_by_zero() {
        let g = AtlasGeometry::default().with_grid(GridShape::new(0, 24));
        assert!(g.cell_of(32).is_err());
        assert_eq!(g.last_code_point(), None);
    }

    #[test]
    fn test_code_point_of_inverts_cell_of() {
        let g = AtlasGeometry::default();
        for cp in 32..=223 {
            let cell = g.cell_of(cp).unwrap();
            assert_eq!(g.code_point_of(cell), Some(cp));
        }
        assert_eq!(g.code_point_of(AtlasCell::new(8, 0)), None);
        assert_eq!(g.code_point_of(AtlasCell::new(0, 24)), None);
    }

    #[test]
    fn test_cells_enumerates_whole_grid() {
        let g = AtlasGeometry::default();
        let cells: Vec<_> = g.cells().collect();
        assert_eq!(cells.len(), 192);
        assert_eq!(cells[0], (32, AtlasCell::new(0, 0)));
        assert_eq!(cells[191], (223, AtlasCell::new(7, 23)));
    }

    // ============================================
    // Offsets and Sizes
    // ============================================

    #[test]
    fn test_background_offset() {
        let g = AtlasGeometry::new(10, 6).with_scale(4.0);
        assert_eq!(g.background_offset(AtlasCell::new(0, 0)), (0.0, 0.0));
        assert_eq!(g.background_offset(AtlasCell::new(7, 0)), (-280.0, 0.0));
        assert_eq!(g.background_offset(AtlasCell::new(1, 2)), (-40.0, -48.0));
    }

    #[test]
    fn test_box_size_includes_padding() {
        let g = AtlasGeometry::new(10, 6).with_scale(4.0).with_padding(2);
        assert_eq!(g.scaled_cell_size(), (40.0, 24.0));
        assert_eq!(g.box_size(), (44.0, 28.0));
    }

    #[test]
    fn test_atlas_size() {
        assert_eq!(AtlasGeometry::new(10, 6).atlas_size(), (80, 144));
    }

    // ============================================
    // Validation
    // ============================================

    #[test]
    fn test_validate_default() {
        assert!(AtlasGeometry::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cells() {
        assert!(AtlasGeometry::new(0, 6).validate().is_err());
        assert!(AtlasGeometry::new(10, 0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let g = AtlasGeometry::default();
        assert!(g.with_grid(GridShape::new(0, 24)).validate().is_err());
        assert!(g.with_grid(GridShape::new(8, 0)).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        let g = AtlasGeometry::default();
        assert!(g.with_scale(0.0).validate().is_err());
        assert!(g.with_scale(-1.0).validate().is_err());
        assert!(g.with_scale(f32::NAN).validate().is_err());
        assert!(g.with_scale(0.5).validate().is_ok());
    }
}
