// Status line and FPS counter for the top-left HUD.
// Visual: "LIVE | PINCH | W 6 | SMOOTH 0.50 | STROKES 3 | FPS: 29.8"

use crate::config::DrawConfig;
use std::time::{Duration, Instant};

/// Counts frames and reports a rate once per second.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self { window_start: now, frames: 0, fps: 0.0 }
    }

    /// Count one frame. Returns the new rate when a second has elapsed.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

pub fn status_line(running: bool, config: &DrawConfig, strokes: usize, fps: f32) -> String {
    format!(
        "{} | {} | W {} | SMOOTH {:.2} | STROKES {} | FPS: {:.1}",
        if running { "LIVE" } else { "STOPPED" },
        config.mode,
        config.stroke_width,
        config.smoothing,
        strokes,
        fps,
    )
}

pub const KEY_HINTS: &str = "SPACE START/STOP  C CLEAR  Z UNDO  S SAVE  M MODE  R MIRROR  K COLOR  [ ] SIZE  , . SMOOTH";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_reported_once_per_second() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::new(t0);
        for i in 1..30 {
            assert_eq!(fps.frame(t0 + Duration::from_millis(i * 33)), None);
        }
        let rate = fps.frame(t0 + Duration::from_secs(1)).expect("a full second passed");
        assert!((rate - 30.0).abs() < 0.01);
        assert_eq!(fps.fps(), rate);
    }

    #[test]
    fn status_line_shows_state_and_settings() {
        let line = status_line(true, &DrawConfig::default(), 3, 29.84);
        assert_eq!(line, "LIVE | PINCH | W 6 | SMOOTH 0.50 | STROKES 3 | FPS: 29.8");
        assert!(status_line(false, &DrawConfig::default(), 0, 0.0).starts_with("STOPPED"));
    }
}
