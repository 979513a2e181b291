// Exponential cursor smoothing.
// Visual: higher factor = steadier cursor that trails the fingertip,
// lower factor = snappier cursor that shows camera jitter.

use crate::types::Point;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Blend the previous cursor toward the new sample.
///
/// `factor` 0 returns `next` exactly, 1 keeps `previous`. Without a previous
/// sample the new one is taken as-is, so the first frame after tracking
/// resumes never drags a segment in from a stale position.
pub fn smooth(previous: Option<Point>, next: Point, factor: f32) -> Point {
    match previous {
        None => next,
        Some(prev) => {
            let t = 1.0 - factor;
            Point::new(lerp(prev.x, next.x, t), lerp(prev.y, next.y, t))
        }
    }
}
