//! Persisted options backed by a string key/value store.
//!
//! Every value is stored as a string under a key from [`keys`]. A missing key
//! means the documented default; a value that does not parse is logged and
//! also falls back to the default.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::atlas::{AtlasGeometry, GridShape};
use crate::atlas::geometry::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_PADDING, DEFAULT_SCALE};
use crate::error::Error;
use crate::render::{Direction, LayoutParams, WritingMode};

/// Key names in the store.
pub mod keys {
    pub const PLAINTEXT: &str = "glyphscribe.plaintext";
    pub const LINE_HEIGHT: &str = "glyphscribe.options.lineHeight";
    pub const DIRECTION: &str = "glyphscribe.options.direction";
    pub const WRITING_MODE: &str = "glyphscribe.options.writingMode";
    pub const CELL_WIDTH: &str = "glyphscribe.options.cellWidth";
    pub const CELL_HEIGHT: &str = "glyphscribe.options.cellHeight";
    pub const SCALE: &str = "glyphscribe.options.scale";
    pub const PADDING: &str = "glyphscribe.options.padding";
    pub const IMAGE: &str = "glyphscribe.image";
    pub const IMAGE_WIDTH: &str = "glyphscribe.imageWidth";
    pub const IMAGE_HEIGHT: &str = "glyphscribe.imageHeight";

    /// Names the same options had under the `secretcodecreator.` prefix.
    ///
    /// They are read when the current key is absent and never written.
    #[must_use]
    pub fn legacy(key: &str) -> Option<&'static str> {
        let name = match key {
            PLAINTEXT => "secretcodecreator.plaintext",
            LINE_HEIGHT => "secretcodecreator.options.lineHeight",
            DIRECTION => "secretcodecreator.options.direction",
            WRITING_MODE => "secretcodecreator.options.writingMode",
            CELL_WIDTH => "secretcodecreator.options.symbolWidth",
            CELL_HEIGHT => "secretcodecreator.options.symbolHeight",
            SCALE => "secretcodecreator.options.symbolScale",
            PADDING => "secretcodecreator.options.symbolPadding",
            IMAGE => "secretcodecreator.image",
            IMAGE_WIDTH => "secretcodecreator.imageWidth",
            IMAGE_HEIGHT => "secretcodecreator.imageHeight",
            _ => return None,
        };
        Some(name)
    }
}

/// Default line height in pixels.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.0;

/// String key/value storage owned by the host.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory [`KeyValueStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Reference to the atlas image in use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtlasImage {
    /// Embeddable image reference. `None` means the built-in atlas.
    pub data_url: Option<String>,
    /// Pixel size, `0 x 0` for the built-in atlas.
    pub width: u32,
    pub height: u32,
}

/// All persisted options.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub plaintext: String,
    pub line_height: f32,
    pub direction: Direction,
    pub writing_mode: WritingMode,
    pub cell_width: u32,
    pub cell_height: u32,
    pub scale: f32,
    pub padding: u32,
    pub image: AtlasImage,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plaintext: String::new(),
            line_height: DEFAULT_LINE_HEIGHT,
            direction: Direction::Ltr,
            writing_mode: WritingMode::HorizontalTb,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            scale: DEFAULT_SCALE,
            padding: DEFAULT_PADDING,
            image: AtlasImage::default(),
        }
    }
}

/// Stored value for `key`, falling back to its legacy name.
fn lookup<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    store.get(key).or_else(|| {
        let legacy = keys::legacy(key)?;
        let value = store.get(legacy)?;
        debug!(key, legacy, "reading setting from legacy key");
        Some(value)
    })
}

/// Parse a stored value, tolerating a trailing `px` unit.
fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, Error> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.parse().map_err(|_| Error::InvalidSetting {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// Strip a CSS `url(...)` wrapper from a stored image reference.
fn unwrap_url(raw: &str) -> &str {
    raw.strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw)
}

fn read_or<T, S>(store: &S, key: &str, default: T) -> T
where
    T: FromStr,
    S: KeyValueStore + ?Sized,
{
    match lookup(store, key) {
        None => default,
        Some(raw) => parse_value(key, &raw).unwrap_or_else(|err| {
            warn!(%err, "using default for unreadable setting");
            default
        }),
    }
}

fn read_enum<T, S>(store: &S, key: &str, default: T) -> T
where
    T: FromStr,
    S: KeyValueStore + ?Sized,
{
    match lookup(store, key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            let err = Error::InvalidSetting {
                key: key.to_string(),
                value: raw,
            };
            warn!(%err, "using default for unreadable setting");
            default
        }),
    }
}

const fn valid_cell_size(value: u32) -> bool {
    value > 0
}

fn valid_scale(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn valid_line_height(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// `value` if it passes `valid`, otherwise `default` with a warning.
fn checked<T: Copy + fmt::Display>(key: &str, value: T, valid: bool, default: T) -> T {
    if valid {
        return value;
    }
    let err = Error::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    };
    warn!(%err, "using default for out-of-range setting");
    default
}

/// Check a line height before it is stored.
pub fn validate_line_height(line_height: f32) -> crate::error::Result<f32> {
    if valid_line_height(line_height) {
        Ok(line_height)
    } else {
        Err(Error::InvalidSetting {
            key: keys::LINE_HEIGHT.to_string(),
            value: line_height.to_string(),
        })
    }
}

impl Settings {
    /// Read every option from `store`.
    ///
    /// Each value that is missing, unreadable or out of range is replaced by
    /// its own default; the other values are kept.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();
        let data_url = lookup(store, keys::IMAGE)
            .map(|raw| unwrap_url(raw.trim()).to_string())
            .filter(|url| !url.is_empty());
        let line_height = read_or(store, keys::LINE_HEIGHT, defaults.line_height);
        let cell_width = read_or(store, keys::CELL_WIDTH, defaults.cell_width);
        let cell_height = read_or(store, keys::CELL_HEIGHT, defaults.cell_height);
        let scale = read_or(store, keys::SCALE, defaults.scale);
        Self {
            plaintext: lookup(store, keys::PLAINTEXT).unwrap_or_default(),
            line_height: checked(
                keys::LINE_HEIGHT,
                line_height,
                valid_line_height(line_height),
                defaults.line_height,
            ),
            direction: read_enum(store, keys::DIRECTION, defaults.direction),
            writing_mode: read_enum(store, keys::WRITING_MODE, defaults.writing_mode),
            cell_width: checked(
                keys::CELL_WIDTH,
                cell_width,
                valid_cell_size(cell_width),
                defaults.cell_width,
            ),
            cell_height: checked(
                keys::CELL_HEIGHT,
                cell_height,
                valid_cell_size(cell_height),
                defaults.cell_height,
            ),
            scale: checked(keys::SCALE, scale, valid_scale(scale), defaults.scale),
            padding: read_or(store, keys::PADDING, defaults.padding),
            image: AtlasImage {
                data_url,
                width: read_or(store, keys::IMAGE_WIDTH, 0),
                height: read_or(store, keys::IMAGE_HEIGHT, 0),
            },
        }
    }

    /// Write every option to `store`.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(keys::PLAINTEXT, &self.plaintext);
        store.set(keys::LINE_HEIGHT, &self.line_height.to_string());
        store.set(keys::DIRECTION, self.direction.as_str());
        store.set(keys::WRITING_MODE, self.writing_mode.as_str());
        store.set(keys::CELL_WIDTH, &self.cell_width.to_string());
        store.set(keys::CELL_HEIGHT, &self.cell_height.to_string());
        store.set(keys::SCALE, &self.scale.to_string());
        store.set(keys::PADDING, &self.padding.to_string());
        self.save_image(store);
    }

    /// Write only the atlas image keys.
    pub fn save_image<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(
            keys::IMAGE,
            self.image.data_url.as_deref().unwrap_or_default(),
        );
        store.set(keys::IMAGE_WIDTH, &format!("{}px", self.image.width));
        store.set(keys::IMAGE_HEIGHT, &format!("{}px", self.image.height));
    }

    /// Atlas geometry on the canonical grid.
    ///
    /// A field that does not form a valid geometry falls back to its own
    /// default. Settings from [`Settings::load`] are already in range.
    #[must_use]
    pub fn geometry(&self) -> AtlasGeometry {
        let cell_width = checked(
            keys::CELL_WIDTH,
            self.cell_width,
            valid_cell_size(self.cell_width),
            DEFAULT_CELL_WIDTH,
        );
        let cell_height = checked(
            keys::CELL_HEIGHT,
            self.cell_height,
            valid_cell_size(self.cell_height),
            DEFAULT_CELL_HEIGHT,
        );
        let scale = checked(keys::SCALE, self.scale, valid_scale(self.scale), DEFAULT_SCALE);
        AtlasGeometry::new(cell_width, cell_height)
            .with_scale(scale)
            .with_padding(self.padding)
            .with_grid(GridShape::CANONICAL)
    }

    /// Layout parameters for `geometry` with the stored flow options.
    #[must_use]
    pub fn layout_params(&self, geometry: &AtlasGeometry) -> LayoutParams {
        LayoutParams::from_geometry(
            geometry,
            self.line_height,
            self.direction,
            self.writing_mode,
        )
    }
}
