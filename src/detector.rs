// Where hands come from.
// A detector is opened, asked once per frame for zero or more hands, closed.
// PointerDetector: the mouse is the index fingertip, left button = pinch.
// ReplayDetector: recorded frames from a JSON-lines file, looped.
// ScriptedDetector: a fixed queue of frames for tests.

use crate::error::{Error, Result};
use crate::types::FrameBuffer;
use serde::Deserialize;
use std::cell::Cell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// Landmarks per hand in the 21-point hand model.
pub const LANDMARK_COUNT: usize = 21;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

/// Bones of the 21-point hand model, drawn by the skeleton overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// A tracked point as a fraction of the camera frame, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    /// `(index tip, thumb tip)`, or `None` for a truncated landmark list.
    pub fn tips(&self) -> Option<(Landmark, Landmark)> {
        Some((*self.landmarks.get(INDEX_TIP)?, *self.landmarks.get(THUMB_TIP)?))
    }
}

/// Everything the detector found in one frame.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Detection {
    pub hands: Vec<Hand>,
}

impl Detection {
    pub fn single(hand: Hand) -> Self {
        Self { hands: vec![hand] }
    }

    /// The hand that drives the pen. Extra hands only show on the overlay.
    pub fn primary(&self) -> Option<&Hand> {
        self.hands.first()
    }
}

/// Anything that can turn frames into hands.
pub trait HandDetector {
    /// Bring the model up. Called from `Session::start`.
    fn open(&mut self) -> Result<()>;

    /// Detect hands in this frame. `frame` is `None` when the source has no
    /// picture (simulation mode).
    fn detect(&mut self, frame: Option<&FrameBuffer>) -> Result<Detection>;

    /// Tear down. Must tolerate being called when already closed.
    fn close(&mut self) -> Result<()>;
}

// ────────────────────────────────────────────────────────────────────────────
// PointerDetector
// ────────────────────────────────────────────────────────────────────────────

/// What the window saw of the mouse this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Where the index tip should be, already in landmark space.
    pub tip: Landmark,
    pub pinched: bool,
}

/// Shared slot the window loop writes and the detector reads.
/// Frame thread only; no locking.
pub type PointerHandle = Rc<Cell<Option<PointerSample>>>;

/// Offsets of every landmark from the index tip for a relaxed, upright right
/// hand, in normalized frame units.
const HAND_SHAPE: [(f32, f32); LANDMARK_COUNT] = [
    (0.02, 0.30),   // wrist
    (-0.05, 0.26), (-0.09, 0.21), (-0.11, 0.16), (-0.12, 0.12), // thumb
    (0.00, 0.14), (0.00, 0.09), (0.00, 0.04), (0.00, 0.00),     // index
    (0.04, 0.14), (0.04, 0.08), (0.04, 0.03), (0.04, -0.01),    // middle
    (0.08, 0.15), (0.08, 0.10), (0.08, 0.06), (0.08, 0.03),     // ring
    (0.11, 0.17), (0.12, 0.13), (0.12, 0.10), (0.12, 0.08),     // pinky
];

/// Thumb tip offset while pinching: close enough to count at any sane
/// window size.
const PINCHED_THUMB: (f32, f32) = (0.004, 0.004);

pub struct PointerDetector {
    sample: PointerHandle,
    open: bool,
}

impl PointerDetector {
    pub fn new(sample: PointerHandle) -> Self {
        Self { sample, open: false }
    }

    fn synthesize(sample: PointerSample) -> Hand {
        let landmarks = HAND_SHAPE
            .iter()
            .enumerate()
            .map(|(i, &(dx, dy))| {
                let (dx, dy) = if i == THUMB_TIP && sample.pinched { PINCHED_THUMB } else { (dx, dy) };
                Landmark { x: sample.tip.x + dx, y: sample.tip.y + dy }
            })
            .collect();
        Hand { landmarks }
    }
}

impl HandDetector for PointerDetector {
    fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn detect(&mut self, _frame: Option<&FrameBuffer>) -> Result<Detection> {
        if !self.open {
            return Err(Error::Detector("pointer detector is closed".into()));
        }
        Ok(match self.sample.get() {
            Some(sample) => Detection::single(Self::synthesize(sample)),
            None => Detection::default(), // mouse left the window
        })
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ReplayDetector
// ────────────────────────────────────────────────────────────────────────────

/// Plays back recorded detections, one JSON array of hands per line:
///
/// ```text
/// [[{"x":0.41,"y":0.52}, ... 21 landmarks], ...more hands]
/// ```
///
/// Blank lines are skipped; a line that does not parse is logged and
/// replayed as an empty frame. Playback loops at the end of the file.
pub struct ReplayDetector {
    path: Option<PathBuf>,
    frames: Vec<Detection>,
    cursor: usize,
    open: bool,
}

impl ReplayDetector {
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self { path: Some(path.as_ref().to_path_buf()), frames: Vec::new(), cursor: 0, open: false }
    }

    /// Replay from in-memory text instead of a file.
    pub fn from_lines(text: &str) -> Self {
        Self { path: None, frames: parse_frames(text), cursor: 0, open: false }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

fn parse_frames(text: &str) -> Vec<Detection> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<Detection>(line).unwrap_or_else(|e| {
                warn!(line = n + 1, error = %e, "skipping malformed replay frame");
                Detection::default()
            })
        })
        .collect()
}

impl HandDetector for ReplayDetector {
    fn open(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            let text = std::fs::read_to_string(path)
                .map_err(|e| Error::DetectorInit(format!("Read {}: {e}", path.display())))?;
            self.frames = parse_frames(&text);
        }
        if self.frames.is_empty() {
            return Err(Error::DetectorInit("replay has no frames".into()));
        }
        debug!(frames = self.frames.len(), "replay detector ready");
        self.cursor = 0;
        self.open = true;
        Ok(())
    }

    fn detect(&mut self, _frame: Option<&FrameBuffer>) -> Result<Detection> {
        if !self.open {
            return Err(Error::Detector("replay detector is closed".into()));
        }
        let detection = self.frames[self.cursor % self.frames.len()].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(detection)
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ScriptedDetector
// ────────────────────────────────────────────────────────────────────────────

/// Hands out a fixed script of detections, then empty frames forever.
/// Can be told to fail on open or close to exercise the session's error paths.
#[derive(Default)]
pub struct ScriptedDetector {
    script: VecDeque<Detection>,
    open: bool,
    fail_open: bool,
    fail_close: bool,
    close_calls: Rc<Cell<usize>>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = Detection>) -> Self {
        Self { script: script.into_iter().collect(), ..Self::default() }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Counter bumped on every `close`, readable after the detector has been
    /// moved into a session.
    pub fn close_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.close_calls)
    }
}

impl HandDetector for ScriptedDetector {
    fn open(&mut self) -> Result<()> {
        if self.fail_open {
            return Err(Error::DetectorInit("scripted open failure".into()));
        }
        self.open = true;
        Ok(())
    }

    fn detect(&mut self, _frame: Option<&FrameBuffer>) -> Result<Detection> {
        if !self.open {
            return Err(Error::Detector("scripted detector is closed".into()));
        }
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn close(&mut self) -> Result<()> {
        self.close_calls.set(self.close_calls.get() + 1);
        self.open = false;
        if self.fail_close {
            return Err(Error::DetectorClose("scripted close failure".into()));
        }
        Ok(())
    }
}

/// A hand whose every landmark sits at `index`, except the thumb tip.
/// Handy for building scripted frames.
pub fn hand_at(index: Landmark, thumb: Landmark) -> Hand {
    let mut landmarks = vec![index; LANDMARK_COUNT];
    landmarks[THUMB_TIP] = thumb;
    Hand { landmarks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tips_come_from_indices_8_and_4() {
        let hand = hand_at(Landmark { x: 0.5, y: 0.5 }, Landmark { x: 0.1, y: 0.2 });
        let (index, thumb) = hand.tips().unwrap();
        assert_eq!(index, Landmark { x: 0.5, y: 0.5 });
        assert_eq!(thumb, Landmark { x: 0.1, y: 0.2 });
    }

    #[test]
    fn truncated_hands_have_no_tips() {
        let hand = Hand { landmarks: vec![Landmark::default(); 5] };
        assert!(hand.tips().is_none());
    }

    #[test]
    fn pointer_detector_follows_the_shared_sample() {
        let slot: PointerHandle = Rc::new(Cell::new(None));
        let mut det = PointerDetector::new(Rc::clone(&slot));
        det.open().unwrap();

        assert!(det.detect(None).unwrap().hands.is_empty());

        let tip = Landmark { x: 0.4, y: 0.6 };
        slot.set(Some(PointerSample { tip, pinched: false }));
        let open_hand = det.detect(None).unwrap();
        let (index, thumb) = open_hand.primary().unwrap().tips().unwrap();
        assert_eq!(index, tip);
        assert!((thumb.x - tip.x).abs() > 0.05);

        slot.set(Some(PointerSample { tip, pinched: true }));
        let pinched = det.detect(None).unwrap();
        let (_, thumb) = pinched.primary().unwrap().tips().unwrap();
        assert!((thumb.x - tip.x).abs() < 0.01);
        assert_eq!(pinched.hands[0].landmarks.len(), LANDMARK_COUNT);
    }

    #[test]
    fn closed_detectors_refuse_to_detect() {
        let mut det = PointerDetector::new(Rc::new(Cell::new(None)));
        assert!(det.detect(None).is_err());
    }

    #[test]
    fn replay_parses_and_loops() {
        let text = concat!(
            "[[{\"x\":0.1,\"y\":0.2,\"z\":0.0}]]\n",
            "\n",
            "[]\n",
            "not json\n",
        );
        let mut det = ReplayDetector::from_lines(text);
        assert_eq!(det.frame_count(), 3);
        det.open().unwrap();

        let first = det.detect(None).unwrap();
        assert_eq!(first.hands[0].landmarks[0], Landmark { x: 0.1, y: 0.2 });
        assert!(det.detect(None).unwrap().hands.is_empty());
        assert!(det.detect(None).unwrap().hands.is_empty()); // malformed line
        assert_eq!(det.detect(None).unwrap(), first);
    }

    #[test]
    fn empty_replay_fails_to_open() {
        let mut det = ReplayDetector::from_lines("\n\n");
        assert!(matches!(det.open(), Err(Error::DetectorInit(_))));
    }

    #[test]
    fn missing_replay_file_fails_to_open() {
        let mut det = ReplayDetector::from_file("/definitely/not/here.jsonl");
        assert!(matches!(det.open(), Err(Error::DetectorInit(_))));
    }

    #[test]
    fn scripted_detector_runs_dry_into_empty_frames() {
        let hand = hand_at(Landmark::default(), Landmark::default());
        let mut det = ScriptedDetector::new([Detection::single(hand)]);
        det.open().unwrap();
        assert_eq!(det.detect(None).unwrap().hands.len(), 1);
        assert!(det.detect(None).unwrap().hands.is_empty());
    }
}
