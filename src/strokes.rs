// The stroke model: committed ink plus the stroke being drawn right now.
// A stroke enters history the moment it starts, so a single-frame dab is
// visible and undoable. When the pen lifts the stroke is frozen.

use crate::types::{Color, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { color: Color::default(), width: 6 }
    }
}

/// One pen-down-to-pen-up ink path. Fewer than two points is legal: nothing
/// or a single dot gets painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: u32,
    pub points: Vec<Point>,
}

impl Stroke {
    fn begin(style: StrokeStyle, start: Point) -> Self {
        Self { color: style.color, width: style.width.max(1), points: vec![start] }
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle { color: self.color, width: self.width }
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }
}

/// Where the in-progress stroke lives.
#[derive(Debug, Clone, PartialEq)]
enum Current {
    /// The last element of `strokes`.
    InHistory,
    /// Undone while still being drawn: keeps taking points, but is no
    /// longer part of the drawing.
    Detached(Stroke),
}

/// What a frame did to the model. The renderer uses this to decide between
/// painting one new segment and leaving the ink layer alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEvent {
    Started,
    Extended,
    Finalized,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeModel {
    strokes: Vec<Stroke>,
    current: Option<Current>,
}

impl StrokeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pen is down at `point` this frame. Starts a stroke with `style` when
    /// idle, otherwise extends the in-progress one. `style` is ignored while
    /// extending: a stroke keeps the color and width it started with.
    pub fn pen_down(&mut self, point: Point, style: StrokeStyle) -> StrokeEvent {
        match &mut self.current {
            None => {
                self.strokes.push(Stroke::begin(style, point));
                self.current = Some(Current::InHistory);
                StrokeEvent::Started
            }
            Some(Current::InHistory) => {
                // Invariant: an in-history current stroke is always the last one.
                if let Some(stroke) = self.strokes.last_mut() {
                    stroke.points.push(point);
                }
                StrokeEvent::Extended
            }
            Some(Current::Detached(stroke)) => {
                stroke.points.push(point);
                StrokeEvent::Extended
            }
        }
    }

    /// Pen lifted or tracking lost: freeze the in-progress stroke.
    pub fn pen_up(&mut self) -> StrokeEvent {
        match self.current.take() {
            Some(_) => StrokeEvent::Finalized,
            None => StrokeEvent::Unchanged,
        }
    }

    /// Remove the most recent stroke. Returns false when there was nothing
    /// to remove. An in-progress stroke hit by this keeps collecting points
    /// outside of history until the pen lifts.
    pub fn undo(&mut self) -> bool {
        let Some(popped) = self.strokes.pop() else {
            return false;
        };
        if self.current == Some(Current::InHistory) {
            self.current = Some(Current::Detached(popped));
        }
        true
    }

    /// Drop every stroke, including the one in progress, without committing it.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    /// Committed strokes in paint order; includes the in-progress stroke
    /// unless it was undone mid-draw.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke being drawn, wherever it lives.
    pub fn current(&self) -> Option<&Stroke> {
        match self.current.as_ref()? {
            Current::InHistory => self.strokes.last(),
            Current::Detached(stroke) => Some(stroke),
        }
    }

    /// The in-progress stroke when it is no longer in history.
    pub fn detached(&self) -> Option<&Stroke> {
        match self.current.as_ref()? {
            Current::Detached(stroke) => Some(stroke),
            Current::InHistory => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
