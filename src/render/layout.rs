//! Slot layout of visual nodes and pixel hit testing.
//!
//! Every glyph node takes one slot. The inline position advances per glyph
//! and resets at each line break; the line advances per line break. Writing
//! mode picks which physical axis is inline, direction mirrors the inline
//! axis, and `vertical-rl` stacks lines right to left. Lines never wrap.

use std::fmt;
use std::str::FromStr;

use super::projection::VisualNode;
use crate::atlas::AtlasGeometry;

/// Inline text direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block flow of lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WritingMode {
    #[default]
    HorizontalTb,
    VerticalRl,
    VerticalLr,
}

impl WritingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HorizontalTb => "horizontal-tb",
            Self::VerticalRl => "vertical-rl",
            Self::VerticalLr => "vertical-lr",
        }
    }

    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !matches!(self, Self::HorizontalTb)
    }
}

impl FromStr for WritingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal-tb" => Ok(Self::HorizontalTb),
            "vertical-rl" => Ok(Self::VerticalRl),
            "vertical-lr" => Ok(Self::VerticalLr),
            _ => Err(()),
        }
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sizing and flow options for a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Glyph box width in pixels.
    pub box_width: f32,
    /// Glyph box height in pixels.
    pub box_height: f32,
    /// Minimum distance between lines in pixels.
    pub line_height: f32,
    pub direction: Direction,
    pub writing_mode: WritingMode,
}

impl LayoutParams {
    #[must_use]
    pub fn from_geometry(
        geometry: &AtlasGeometry,
        line_height: f32,
        direction: Direction,
        writing_mode: WritingMode,
    ) -> Self {
        let (box_width, box_height) = geometry.box_size();
        Self {
            box_width,
            box_height,
            line_height,
            direction,
            writing_mode,
        }
    }

    /// Pixel pitch of one slot along x and y.
    fn pitch(&self) -> (f32, f32) {
        if self.writing_mode.is_vertical() {
            (self.box_width.max(self.line_height), self.box_height)
        } else {
            (self.box_width, self.box_height.max(self.line_height))
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_geometry(
            &AtlasGeometry::default(),
            1.0,
            Direction::default(),
            WritingMode::default(),
        )
    }
}

/// Pixel rectangle in layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Where one node sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Position along the line, in slots.
    pub inline: u32,
    /// Line index.
    pub line: u32,
    /// Physical slot column and row.
    pub column: u32,
    pub row: u32,
    /// Pixel box. Line breaks get a zero-extent box at the end of their line.
    pub rect: Rect,
}

/// One laid out line: offset of its first node and number of glyphs on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LineSpan {
    start: usize,
    glyphs: u32,
}

/// Positioned nodes of one pass.
///
/// Storage is linear in the number of nodes. Hit tests map a slot back to
/// its line and inline position.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    params: LayoutParams,
    placements: Vec<Placement>,
    lines: Vec<LineSpan>,
    longest: u32,
}

impl Layout {
    /// Lay out `nodes`, which must be indexed by offset.
    #[must_use]
    pub fn compute(nodes: &[VisualNode], params: LayoutParams) -> Self {
        let mut logical = Vec::with_capacity(nodes.len());
        let mut lines = Vec::new();
        let mut span = LineSpan::default();
        for (offset, node) in nodes.iter().enumerate() {
            logical.push((span.glyphs, lines.len() as u32, node.is_line_break()));
            if node.is_line_break() {
                lines.push(span);
                span = LineSpan {
                    start: offset + 1,
                    glyphs: 0,
                };
            } else {
                span.glyphs += 1;
            }
        }
        if !nodes.is_empty() {
            lines.push(span);
        }
        let longest = lines.iter().map(|l| l.glyphs).max().unwrap_or(0);
        let line_count = lines.len() as u32;

        let vertical = params.writing_mode.is_vertical();
        let (pitch_x, pitch_y) = params.pitch();

        let placements = logical
            .into_iter()
            .map(|(inline, line, is_break)| {
                let along = match params.direction {
                    Direction::Ltr => inline,
                    Direction::Rtl => mirror(longest, inline),
                };
                let across = match params.writing_mode {
                    WritingMode::VerticalRl => mirror(line_count, line),
                    _ => line,
                };
                let (column, row) = if vertical {
                    (across, along)
                } else {
                    (along, across)
                };
                let (width, height) = if is_break {
                    (0.0, 0.0)
                } else {
                    (params.box_width, params.box_height)
                };
                Placement {
                    inline,
                    line,
                    column,
                    row,
                    rect: Rect {
                        x: column as f32 * pitch_x,
                        y: row as f32 * pitch_y,
                        width,
                        height,
                    },
                }
            })
            .collect();

        Self {
            params,
            placements,
            lines,
            longest,
        }
    }

    #[must_use]
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Placement of the node at `offset`.
    #[must_use]
    pub fn placement(&self, offset: usize) -> Option<&Placement> {
        self.placements.get(offset)
    }

    /// Number of laid out lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Slot columns and rows covered by the content.
    fn extent(&self) -> (u32, u32) {
        let lines = self.lines.len() as u32;
        if self.params.writing_mode.is_vertical() {
            (lines, self.longest)
        } else {
            (self.longest, lines)
        }
    }

    /// Size of the laid out content in pixels.
    #[must_use]
    pub fn content_size(&self) -> (f32, f32) {
        let (w, h) = self.extent();
        let (pitch_x, pitch_y) = self.params.pitch();
        (w as f32 * pitch_x, h as f32 * pitch_y)
    }

    /// Offset of the glyph node under a pixel position.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        let (pitch_x, pitch_y) = self.params.pitch();
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        if pitch_x <= 0.0 || pitch_y <= 0.0 {
            return None;
        }
        let column = (x / pitch_x).floor();
        let row = (y / pitch_y).floor();
        let (columns, rows) = self.extent();
        if column >= columns as f32 || row >= rows as f32 {
            return None;
        }
        let (column, row) = (column as u32, row as u32);

        let (across, along) = if self.params.writing_mode.is_vertical() {
            (column, row)
        } else {
            (row, column)
        };
        let line = match self.params.writing_mode {
            WritingMode::VerticalRl => mirror(self.lines.len() as u32, across),
            _ => across,
        };
        let inline = match self.params.direction {
            Direction::Ltr => along,
            Direction::Rtl => mirror(self.longest, along),
        };
        let span = self.lines.get(line as usize)?;
        (inline < span.glyphs).then(|| span.start + inline as usize)
    }
}

/// Mirror `index` within `0..len`.
fn mirror(len: u32, index: u32) -> u32 {
    len.saturating_sub(index + 1)
}
