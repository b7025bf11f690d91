//! Derive atlas cell geometry from an uploaded image.
//!
//! Calibration is the only way cell width and height change. The grid shape
//! is fixed; the image has to tile into it exactly or it is rejected and the
//! previous geometry stays in place.

use tracing::{debug, info, warn};

use super::geometry::{AtlasGeometry, GridShape};
use crate::error::{Axis, Error, Result};

/// Media types accepted as atlas images.
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["image/png", "image/svg+xml", "image/gif", "image/webp"];

/// A decoded atlas image as handed over by the host's image loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageResource {
    /// MIME type reported by the host.
    pub media_type: String,
    /// Embeddable reference to the image (usually a `data:` URL).
    pub data_url: String,
    /// Pixel width after decoding.
    pub width: u32,
    /// Pixel height after decoding.
    pub height: u32,
}

impl ImageResource {
    #[must_use]
    pub fn new(
        media_type: impl Into<String>,
        data_url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            media_type: media_type.into(),
            data_url: data_url.into(),
            width,
            height,
        }
    }
}

/// Check that a media type is one of [`SUPPORTED_MEDIA_TYPES`].
pub fn check_media_type(media_type: &str) -> Result<()> {
    if SUPPORTED_MEDIA_TYPES.contains(&media_type) {
        Ok(())
    } else {
        debug!(media_type, "skipping unsupported resource");
        Err(Error::UnsupportedResource(media_type.to_string()))
    }
}

fn cell_extent(pixels: u32, cells: u32, axis: Axis) -> Result<u32> {
    if cells == 0 {
        return Err(Error::InvalidGeometry(format!(
            "grid {axis} must span at least one cell"
        )));
    }
    if pixels % cells != 0 {
        return Err(Error::GeometryRejected {
            axis,
            pixels,
            cells,
        });
    }
    Ok(pixels / cells)
}

/// Compute the geometry for an image of `width` x `height` pixels laid out on `grid`.
///
/// Scale and padding are carried over from `base`; the grid shape is taken
/// from `grid`. On any error `base` is unaffected and the reason is logged.
pub fn calibrate(
    base: &AtlasGeometry,
    width: u32,
    height: u32,
    grid: GridShape,
) -> Result<AtlasGeometry> {
    let result = cell_extent(width, grid.columns, Axis::Width)
        .and_then(|cw| cell_extent(height, grid.rows, Axis::Height).map(|ch| (cw, ch)))
        .and_then(|(cw, ch)| {
            let geometry = base.with_grid(grid).with_cell_size(cw, ch);
            geometry.validate()?;
            Ok(geometry)
        });

    match &result {
        Ok(geometry) => info!(
            width,
            height,
            cell_width = geometry.cell_width(),
            cell_height = geometry.cell_height(),
            "atlas calibrated"
        ),
        Err(err) => warn!(width, height, %err, "atlas calibration rejected"),
    }
    result
}

/// Validate the media type of `image`, then calibrate against `grid`.
pub fn calibrate_image(
    base: &AtlasGeometry,
    image: &ImageResource,
    grid: GridShape,
) -> Result<AtlasGeometry> {
    check_media_type(&image.media_type)?;
    calibrate(base, image.width, image.height, grid)
}
