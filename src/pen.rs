// Is the pen touching the paper this frame?
// Visual: in PINCH mode the cursor turns warm and ink flows while thumb and
// index tip are pinched; ALWAYS inks every frame, HOVER never does.

use crate::types::{Point, Size};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Pinch threshold as a fraction of the surface diagonal. Relative to the
/// diagonal so the gesture feels the same at any window size.
pub const PINCH_RATIO: f32 = 0.035;

/// How tracked frames turn into ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Every tracked frame draws.
    Always,
    /// The cursor follows the hand but never inks.
    Hover,
    /// Ink while thumb and index tip are pinched together.
    #[default]
    Pinch,
}

impl InteractionMode {
    /// The next mode in the `M` key rotation.
    pub fn next(self) -> Self {
        match self {
            Self::Always => Self::Hover,
            Self::Hover => Self::Pinch,
            Self::Pinch => Self::Always,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Always => "ALWAYS",
            Self::Hover => "HOVER",
            Self::Pinch => "PINCH",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which surface the pinch is measured on. Both tips are mapped onto it and
/// the threshold uses its diagonal.
///
/// The drawing surface follows the window; the overlay surface follows the
/// picture the skeleton is tracked in. They only differ in shape when the
/// camera and the window disagree on aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PinchBasis {
    Drawing,
    #[default]
    Overlay,
}

impl PinchBasis {
    pub fn surface(self, drawing: Size, overlay: Size) -> Size {
        match self {
            Self::Drawing => drawing,
            Self::Overlay => overlay,
        }
    }
}

/// Decide pen-down for one tracked frame. Tips are in surface pixels.
pub fn classify(mode: InteractionMode, index_tip: Point, thumb_tip: Point, surface_diagonal: f32) -> bool {
    match mode {
        InteractionMode::Always => true,
        InteractionMode::Hover => false,
        InteractionMode::Pinch => index_tip.distance(thumb_tip) < PINCH_RATIO * surface_diagonal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAG: f32 = 1000.0;

    #[test]
    fn always_and_hover_ignore_geometry() {
        let far = Point::new(900.0, 900.0);
        assert!(classify(InteractionMode::Always, Point::default(), far, DIAG));
        assert!(!classify(InteractionMode::Hover, Point::default(), Point::default(), DIAG));
    }

    #[test]
    fn pinch_threshold_is_strict() {
        let threshold = PINCH_RATIO * DIAG;
        let index = Point::new(0.0, 0.0);

        let at = Point::new(threshold, 0.0);
        assert!(!classify(InteractionMode::Pinch, index, at, DIAG));

        let below = Point::new(f32::from_bits(threshold.to_bits() - 1), 0.0);
        assert!(classify(InteractionMode::Pinch, index, below, DIAG));
    }

    #[test]
    fn pinch_scales_with_the_diagonal() {
        let index = Point::new(10.0, 10.0);
        let thumb = Point::new(30.0, 10.0); // 20 px apart
        assert!(!classify(InteractionMode::Pinch, index, thumb, 500.0)); // threshold 17.5
        assert!(classify(InteractionMode::Pinch, index, thumb, 1000.0)); // threshold 35
    }

    #[test]
    fn basis_picks_the_configured_surface() {
        let drawing = Size::new(600, 800);
        let overlay = Size::new(30, 40);
        assert_eq!(PinchBasis::Drawing.surface(drawing, overlay), drawing);
        assert_eq!(PinchBasis::Overlay.surface(drawing, overlay), overlay);
    }

    #[test]
    fn mode_rotation_visits_every_mode() {
        let m = InteractionMode::Always;
        assert_eq!(m.next(), InteractionMode::Hover);
        assert_eq!(m.next().next(), InteractionMode::Pinch);
        assert_eq!(m.next().next().next(), m);
    }
}
