// Settings: built-in defaults, then a TOML file (`--config`), then CLI flags.
// DrawConfig is the live part: read every frame, changed by the window keys.
// Visual: `[`/`]` make the next stroke thinner/wider, `,`/`.` make the cursor
// snappier/steadier, `K` switches the ink color.

use crate::error::{Error, Result};
use crate::pen::{InteractionMode, PinchBasis};
use crate::strokes::StrokeStyle;
use crate::types::{Color, PALETTE};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Smoothing step for the `,` / `.` keys.
pub const SMOOTHING_STEP: f32 = 0.05;
pub const MAX_STROKE_WIDTH: u32 = 64;

/// Ink and gesture settings, read every frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Stroke width in pixels.
    pub stroke_width: u32,
    pub color: Color,
    /// 0 = raw fingertip, 1 = frozen cursor.
    pub smoothing: f32,
    pub mode: InteractionMode,
    /// Flip x so the picture behaves like a mirror.
    pub mirrored: bool,
    pub pinch_basis: PinchBasis,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            stroke_width: 6,
            color: Color::default(),
            smoothing: 0.5,
            mode: InteractionMode::default(),
            mirrored: true,
            pinch_basis: PinchBasis::default(),
        }
    }
}

impl DrawConfig {
    /// Style snapshot for a stroke starting now.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle { color: self.color, width: self.stroke_width }
    }

    /// Pull values read from a file or the command line into their valid
    /// ranges: width `1..=MAX_STROKE_WIDTH`, smoothing `0..=1`.
    pub fn clamp_ranges(&mut self) {
        let width = self.stroke_width.clamp(1, MAX_STROKE_WIDTH);
        if width != self.stroke_width {
            warn!(requested = self.stroke_width, used = width, "stroke width out of range");
            self.stroke_width = width;
        }
        let smoothing = if self.smoothing.is_nan() { 0.0 } else { self.smoothing.clamp(0.0, 1.0) };
        if smoothing != self.smoothing {
            warn!(requested = self.smoothing, used = smoothing, "smoothing out of range");
            self.smoothing = smoothing;
        }
    }

    pub fn nudge_width(&mut self, delta: i32) {
        let w = self.stroke_width as i32 + delta;
        self.stroke_width = w.clamp(1, MAX_STROKE_WIDTH as i32) as u32;
    }

    pub fn nudge_smoothing(&mut self, delta: f32) {
        self.smoothing = (self.smoothing + delta).clamp(0.0, 1.0);
    }

    /// Next palette color after the current one (first if it's off-palette).
    pub fn cycle_color(&mut self) {
        let next = PALETTE
            .iter()
            .position(|c| *c == self.color)
            .map_or(0, |i| (i + 1) % PALETTE.len());
        self.color = PALETTE[next];
    }
}

/// Everything the binary needs to get going.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub width: usize,
    pub height: usize,
    pub camera_index: u32,
    /// Replay landmarks from a JSON-lines file instead of following the mouse.
    pub replay: Option<PathBuf>,
    /// Where `S` writes PNG snapshots.
    pub export_dir: PathBuf,
    pub debug: bool,
    pub draw: DrawConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            camera_index: 0,
            replay: None,
            export_dir: PathBuf::from("."),
            debug: false,
            draw: DrawConfig::default(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "air-ink", version, about = "Draw in the air with your index finger")]
pub struct Args {
    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<usize>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<usize>,

    /// Camera device index (needs the `camera` feature)
    #[arg(long)]
    pub camera: Option<u32>,

    /// JSON-lines landmark recording to replay
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Directory for saved drawings
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Verbose logging (RUST_LOG is honoured)
    #[arg(short, long)]
    pub debug: bool,

    /// Stroke width in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Ink color as #rrggbb
    #[arg(long)]
    pub color: Option<String>,

    /// Cursor smoothing, 0 (none) to 1 (frozen)
    #[arg(long)]
    pub smoothing: Option<f32>,

    /// When tracked frames draw
    #[arg(long, value_enum)]
    pub mode: Option<InteractionMode>,

    /// Mirror the view horizontally
    #[arg(long, value_name = "BOOL")]
    pub mirror: Option<bool>,

    /// Surface whose diagonal scales the pinch threshold
    #[arg(long, value_enum)]
    pub pinch_basis: Option<PinchBasis>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.draw.clamp_ranges();
        Ok(config)
    }

    /// Defaults → file → flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let base = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        base.with_args(args)
    }

    /// Overlay CLI flags on top of this configuration.
    pub fn with_args(mut self, args: &Args) -> Result<Self> {
        if let Some(w) = args.width {
            self.width = w;
        }
        if let Some(h) = args.height {
            self.height = h;
        }
        if let Some(i) = args.camera {
            self.camera_index = i;
        }
        if let Some(path) = &args.replay {
            self.replay = Some(path.clone());
        }
        if let Some(dir) = &args.export_dir {
            self.export_dir = dir.clone();
        }
        self.debug |= args.debug;

        let draw = &mut self.draw;
        if let Some(size) = args.size {
            draw.stroke_width = size;
        }
        if let Some(color) = &args.color {
            draw.color = color.parse()?;
        }
        if let Some(s) = args.smoothing {
            draw.smoothing = s;
        }
        if let Some(mode) = args.mode {
            draw.mode = mode;
        }
        if let Some(m) = args.mirror {
            draw.mirrored = m;
        }
        if let Some(basis) = args.pinch_basis {
            draw.pinch_basis = basis;
        }
        draw.clamp_ranges();
        Ok(self)
    }
}
