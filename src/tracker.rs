// Per-frame gesture -> ink state machine.
// One `process` call per detector result: map the index tip onto the drawing
// surface, smooth it into the cursor, classify the pen on the pinch basis
// surface, feed the stroke model.
// Visual: the cursor trails your fingertip; losing the hand lifts the pen.

use crate::config::DrawConfig;
use crate::detector::{Detection, Hand};
use crate::mapper::map_to_surface;
use crate::pen::classify;
use crate::smoothing::smooth;
use crate::strokes::{StrokeEvent, StrokeModel};
use crate::types::{Point, Size};
use tracing::debug;

/// Sizes of the two layers the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Surfaces {
    /// Ink layer; stroke points live in its pixel space.
    pub drawing: Size,
    /// Cursor/skeleton layer.
    pub overlay: Size,
}

impl Surfaces {
    pub const fn uniform(size: Size) -> Self {
        Self { drawing: size, overlay: size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub point: Point,
    pub pen_down: bool,
}

/// What one frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// `None` when no hand was tracked.
    pub cursor: Option<Cursor>,
    pub event: StrokeEvent,
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    model: StrokeModel,
    previous: Option<Point>,
    pen_down: bool,
    surfaces: Surfaces,
}

impl Tracker {
    pub fn new(surfaces: Surfaces) -> Self {
        Self { surfaces, ..Self::default() }
    }

    pub fn process(&mut self, detection: &Detection, config: &DrawConfig) -> FrameUpdate {
        let Some((index, thumb)) = detection.primary().and_then(Hand::tips) else {
            return self.lose_tracking();
        };

        let index_pt = map_to_surface(index, config.mirrored, self.surfaces.drawing);
        let cursor = smooth(self.previous, index_pt, config.smoothing);
        self.previous = Some(cursor);

        // Distance and threshold must come from the same pixel space.
        let basis = config.pinch_basis.surface(self.surfaces.drawing, self.surfaces.overlay);
        self.pen_down = classify(
            config.mode,
            map_to_surface(index, config.mirrored, basis),
            map_to_surface(thumb, config.mirrored, basis),
            basis.diagonal(),
        );

        let event = if self.pen_down {
            self.model.pen_down(cursor, config.stroke_style())
        } else {
            self.model.pen_up()
        };
        if event == StrokeEvent::Started {
            debug!(x = cursor.x, y = cursor.y, width = config.stroke_width, color = %config.color, "stroke started");
        } else if event == StrokeEvent::Finalized {
            debug!(strokes = self.model.len(), "stroke finalized");
        }

        FrameUpdate { cursor: Some(Cursor { point: cursor, pen_down: self.pen_down }), event }
    }

    /// No hand this frame (or the session stopped): lift the pen and forget
    /// the cursor so the next detection starts fresh.
    pub fn lose_tracking(&mut self) -> FrameUpdate {
        self.previous = None;
        self.pen_down = false;
        let event = self.model.pen_up();
        if event == StrokeEvent::Finalized {
            debug!(strokes = self.model.len(), "tracking lost, stroke finalized");
        }
        FrameUpdate { cursor: None, event }
    }

    pub fn undo(&mut self) -> bool {
        self.model.undo()
    }

    pub fn clear(&mut self) {
        self.model.clear();
    }

    /// New layer sizes. Recorded points keep their original pixel coordinates.
    pub fn resize(&mut self, surfaces: Surfaces) {
        self.surfaces = surfaces;
    }

    pub fn surfaces(&self) -> Surfaces {
        self.surfaces
    }

    pub fn model(&self) -> &StrokeModel {
        &self.model
    }

    pub fn pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn cursor(&self) -> Option<Point> {
        self.previous
    }
}
