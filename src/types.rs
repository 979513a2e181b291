// Core value types shared by the tracker, the renderer and the window.

use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with one color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A position on the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pixel dimensions of a surface (ink layer, overlay, window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// `hypot(width, height)`; gesture thresholds are fractions of this.
    pub fn diagonal(self) -> f32 {
        (self.width as f32).hypot(self.height as f32)
    }
}

/// An sRGB ink color. Parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(px: u32) -> Self {
        Self { r: (px >> 16) as u8, g: (px >> 8) as u8, b: px as u8 }
    }

    /// Packed as 0x00RRGGBB, the layout minifb expects.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0xfe, 0xff, 0xd4)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::Config(format!("color must look like #rrggbb, got {s:?}")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| Error::Config(format!("color {s:?}: {e}")))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Ink colors the `K` key cycles through.
pub const PALETTE: [Color; 6] = [
    Color::rgb(0xfe, 0xff, 0xd4),
    Color::rgb(0xc5, 0xb8, 0x9f),
    Color::rgb(0x9e, 0x2d, 0x4a),
    Color::rgb(0x4a, 0xc6, 0xff),
    Color::rgb(0x7d, 0xff, 0x7a),
    Color::rgb(0xff, 0x5e, 0x5e),
];

/// The persisted ink: color plus coverage per pixel, transparent where
/// nothing was drawn. Visual: unseen on its own; composited over the camera.
pub struct InkLayer {
    pub width: usize,
    pub height: usize,
    pub color: Vec<u32>, // 0x00RRGGBB, meaningful where alpha > 0
    pub alpha: Vec<f32>, // length = width * height, values in [0.0, 1.0]
}

impl InkLayer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, color: vec![0; width * height], alpha: vec![0.0; width * height] }
    }

    /// Back to fully transparent.
    pub fn clear(&mut self) {
        self.alpha.fill(0.0);
        self.color.fill(0);
    }
}

/// Precomputed round brush "stamp" we dab along a stroke.
/// Weights are coverage in [0,1]; the edge ring is antialiased.
pub struct Stamp {
    pub radius: i32,       // pixels from center to edge
    pub weights: Vec<f32>, // (2r+1)*(2r+1), centered kernel
}
