//! Sprite atlas geometry, calibration and derived view parameters.
//!
//! An atlas is one image holding every glyph on a fixed grid. Code point 32
//! (space) sits at the top-left cell and codes advance left to right, then
//! top to bottom.
//!
//! # Examples
//!
//! ```
//! use glyphscribe::atlas::{AtlasCell, AtlasGeometry, GridShape, calibrate};
//!
//! let geometry = AtlasGeometry::default();
//! assert_eq!(geometry.cell_of(u32::from('(')).unwrap(), AtlasCell::new(0, 1));
//!
//! let calibrated = calibrate(&geometry, 160, 288, GridShape::CANONICAL).unwrap();
//! assert_eq!(calibrated.cell_width(), 20);
//! ```

pub mod calibrate;
pub mod geometry;
pub mod stylesheet;

pub use calibrate::{ImageResource, SUPPORTED_MEDIA_TYPES, calibrate, calibrate_image, check_media_type};
pub use geometry::{AtlasCell, AtlasGeometry, FIRST_CODE_POINT, GridShape};
pub use stylesheet::{CellStyle, CellStyleTable, ViewParams};
