//! Pure view parameters derived from an atlas geometry.
//!
//! These are the values a view layer applies to every glyph node. They are
//! computed here and applied elsewhere, so nothing in this module touches
//! presentation state.

use super::geometry::{AtlasCell, AtlasGeometry};

/// Flat styling parameter set applied uniformly to glyph nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewParams {
    pub cell_width: u32,
    pub cell_height: u32,
    pub scale: f32,
    pub padding: u32,
    /// Scaled size of the whole atlas image, used as the background size.
    pub background_width: f32,
    pub background_height: f32,
}

impl ViewParams {
    #[must_use]
    pub fn from_geometry(geometry: &AtlasGeometry) -> Self {
        let (aw, ah) = geometry.atlas_size();
        Self {
            cell_width: geometry.cell_width(),
            cell_height: geometry.cell_height(),
            scale: geometry.scale(),
            padding: geometry.padding(),
            background_width: aw as f32 * geometry.scale(),
            background_height: ah as f32 * geometry.scale(),
        }
    }
}

/// Background offset of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    pub code_point: u32,
    pub cell: AtlasCell,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Background offsets for every cell of a grid, indexed by code point.
#[derive(Clone, Debug, PartialEq)]
pub struct CellStyleTable {
    first_code_point: u32,
    styles: Vec<CellStyle>,
}

impl CellStyleTable {
    /// Enumerate every cell of `geometry` and compute its background offset.
    #[must_use]
    pub fn build(geometry: &AtlasGeometry) -> Self {
        let styles = geometry
            .cells()
            .map(|(code_point, cell)| {
                let (offset_x, offset_y) = geometry.background_offset(cell);
                CellStyle {
                    code_point,
                    cell,
                    offset_x,
                    offset_y,
                }
            })
            .collect();
        Self {
            first_code_point: geometry.first_code_point(),
            styles,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style for a code point, if the grid covers it.
    #[must_use]
    pub fn get(&self, code_point: u32) -> Option<&CellStyle> {
        let index = code_point.checked_sub(self.first_code_point)?;
        self.styles.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellStyle> {
        self.styles.iter()
    }
}
