// Normalized landmark space <-> surface pixels.
// Detectors report fractions of the camera frame, origin top-left. Values a
// little outside [0, 1] near the frame edges go through the map untouched.
// Visual: with mirroring on, moving your hand right moves the cursor right.

use crate::detector::Landmark;
use crate::types::{Point, Size};

/// Map a normalized landmark onto a surface of `size` pixels.
pub fn map_to_surface(landmark: Landmark, mirrored: bool, size: Size) -> Point {
    let x = if mirrored { 1.0 - landmark.x } else { landmark.x };
    Point::new(x * size.width as f32, landmark.y * size.height as f32)
}

/// Inverse of [`map_to_surface`]: where on the camera frame a surface pixel
/// came from. The pointer simulation uses this so the cursor lands under the
/// mouse whatever the mirror setting.
pub fn to_normalized(point: Point, mirrored: bool, size: Size) -> Landmark {
    let w = size.width.max(1) as f32;
    let h = size.height.max(1) as f32;
    let x = point.x / w;
    Landmark {
        x: if mirrored { 1.0 - x } else { x },
        y: point.y / h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Size = Size::new(640, 480);

    #[test]
    fn scales_by_surface_dimensions() {
        let p = map_to_surface(Landmark { x: 0.25, y: 0.5 }, false, SURFACE);
        assert_eq!(p, Point::new(160.0, 240.0));
    }

    #[test]
    fn mirroring_only_flips_x() {
        for &(x, y) in &[(0.0, 0.0), (0.1, 0.9), (0.5, 0.5), (0.75, 0.2), (1.0, 1.0)] {
            let lm = Landmark { x, y };
            let plain = map_to_surface(lm, false, SURFACE);
            let mirrored = map_to_surface(lm, true, SURFACE);
            assert!((mirrored.x - (SURFACE.width as f32 - plain.x)).abs() < 1e-3);
            assert_eq!(mirrored.y, plain.y);
        }
    }

    #[test]
    fn out_of_range_input_is_not_rejected() {
        let p = map_to_surface(Landmark { x: -0.05, y: 1.02 }, false, Size::new(100, 100));
        assert!((p.x + 5.0).abs() < 1e-4);
        assert!((p.y - 102.0).abs() < 1e-4);
    }

    #[test]
    fn to_normalized_inverts_the_map() {
        for mirrored in [false, true] {
            let lm = Landmark { x: 0.3, y: 0.6 };
            let back = to_normalized(map_to_surface(lm, mirrored, SURFACE), mirrored, SURFACE);
            assert!((back.x - lm.x).abs() < 1e-5);
            assert!((back.y - lm.y).abs() < 1e-5);
        }
    }
}
