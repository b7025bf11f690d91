//! Error types for glyphscribe.

use std::fmt;

/// Result type alias for glyphscribe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Image axis that failed to tile into the atlas grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
        }
    }
}

/// Error type for glyphscribe operations.
///
/// Every failure is local: the operation that returns one leaves the text,
/// the atlas geometry and the current projection untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Atlas geometry with a zero-sized cell, an empty grid or a bad scale.
    InvalidGeometry(String),
    /// Atlas image does not tile exactly into the grid.
    GeometryRejected { axis: Axis, pixels: u32, cells: u32 },
    /// Ingested resource is not a supported image type.
    UnsupportedResource(String),
    /// Character code outside the cells covered by the atlas grid.
    OutOfRangeCodePoint { code_point: u32, first: u32, last: u32 },
    /// Persisted setting that could not be parsed.
    InvalidSetting { key: String, value: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry(reason) => write!(f, "invalid atlas geometry: {reason}"),
            Self::GeometryRejected {
                axis,
                pixels,
                cells,
            } => {
                let unit = match axis {
                    Axis::Width => "columns",
                    Axis::Height => "rows",
                };
                write!(
                    f,
                    "image {axis} {pixels}px must be divisible by {cells} grid {unit}"
                )
            }
            Self::UnsupportedResource(media_type) => {
                write!(f, "unsupported resource type: {media_type}")
            }
            Self::OutOfRangeCodePoint {
                code_point,
                first,
                last,
            } => write!(
                f,
                "code point U+{code_point:04X} outside atlas range U+{first:04X}..=U+{last:04X}"
            ),
            Self::InvalidSetting { key, value } => {
                write!(f, "invalid value {value:?} for setting {key}")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidGeometry("cell width must be positive".to_string());
        assert!(err.to_string().contains("invalid atlas geometry"));

        let err = Error::GeometryRejected {
            axis: Axis::Width,
            pixels: 81,
            cells: 8,
        };
        assert_eq!(
            err.to_string(),
            "image width 81px must be divisible by 8 grid columns"
        );

        let err = Error::GeometryRejected {
            axis: Axis::Height,
            pixels: 145,
            cells: 24,
        };
        assert!(err.to_string().contains("24 grid rows"));

        let err = Error::OutOfRangeCodePoint {
            code_point: 0x4E2D,
            first: 32,
            last: 223,
        };
        assert!(err.to_string().contains("U+4E2D"));
        assert!(err.to_string().contains("U+0020..=U+00DF"));
    }

    #[test]
    fn test_setting_error_display() {
        let err = Error::InvalidSetting {
            key: "glyphscribe.options.scale".to_string(),
            value: "big".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"big\" for setting glyphscribe.options.scale"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(Error::UnsupportedResource("text/plain".to_string()));
        assert!(err.to_string().contains("text/plain"));
    }
}
