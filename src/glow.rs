// Additive glow for the live cursor.
// Visual outcome: a soft halo of light around the fingertip, warm while the
// pen is down, dark red while it hovers. Drawn straight onto the screen buffer
// every frame, so it never touches the ink.

use crate::types::{Color, FrameBuffer};

/// Additive blend one RGB triplet at (x,y) with saturation to 255.
/// Visual: the pixel gets brighter/colored; repeated draws stack until white.
#[inline]
fn add_rgb_saturating(fb: &mut FrameBuffer, x: i32, y: i32, r: u8, g: u8, b: u8) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }

    let idx = y * fb.width + x;
    let old = fb.pixels[idx];

    let nr = (((old >> 16) & 0xFF) as u16 + r as u16).min(255) as u32;
    let ng = (((old >> 8) & 0xFF) as u16 + g as u16).min(255) as u32;
    let nb = ((old & 0xFF) as u16 + b as u16).min(255) as u32;

    fb.pixels[idx] = (nr << 16) | (ng << 8) | nb;
}

/// Draw a soft round glow centered at (cx,cy) with additive blending.
/// `strength` in [0,1] scales brightness.
/// Visual: a fuzzy dot of light. Nearby pixels brighten more than far pixels.
pub fn draw_glow_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: Color, strength: f32) {
    if radius <= 0 {
        return;
    }
    let r2 = (radius * radius) as f32;
    let sigma = radius as f32 * 0.5; // softness; smaller = sharper edge
    let denom = 2.0 * sigma * sigma;

    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d2 = dx * dx + dy * dy;
            if d2 > r2 {
                continue; // outside the circle
            }

            // Gaussian falloff: 1.0 at center → ~0 at edge
            let w = (-d2 / denom).exp() * strength;
            let scale = |c: u8| (c as f32 * w).round().clamp(0.0, 255.0) as u8;
            add_rgb_saturating(fb, x, y, scale(color.r), scale(color.g), scale(color.b));
        }
    }
}

/// Solid disc, no blending. Visual: the crisp core of the cursor.
pub fn fill_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: Color) {
    let r2 = radius * radius;
    let px = color.to_u32();
    for y in (cy - radius).max(0)..=(cy + radius).min(fb.height as i32 - 1) {
        for x in (cx - radius).max(0)..=(cx + radius).min(fb.width as i32 - 1) {
            if (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r2 {
                fb.pixels[y as usize * fb.width + x as usize] = px;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_brightens_the_center_most() {
        let mut fb = FrameBuffer::filled(21, 21, 0);
        draw_glow_disc(&mut fb, 10, 10, 8, Color::rgb(200, 100, 50), 1.0);
        let center = fb.pixels[10 * 21 + 10];
        let edge = fb.pixels[10 * 21 + 17];
        assert_eq!(center, 0x00C86432);
        assert!((edge >> 16) < (center >> 16));
        assert_eq!(fb.pixels[0], 0); // corner is outside the disc
    }

    #[test]
    fn glow_saturates_instead_of_wrapping() {
        let mut fb = FrameBuffer::filled(3, 3, 0x00F0F0F0);
        draw_glow_disc(&mut fb, 1, 1, 1, Color::rgb(255, 255, 255), 1.0);
        assert_eq!(fb.pixels[4], 0x00FFFFFF);
    }

    #[test]
    fn discs_clip_at_the_edges() {
        let mut fb = FrameBuffer::filled(4, 4, 0);
        fill_disc(&mut fb, 0, 0, 2, Color::rgb(1, 2, 3));
        draw_glow_disc(&mut fb, -5, 50, 6, Color::rgb(9, 9, 9), 1.0);
        assert_eq!(fb.pixels[0], 0x00010203);
        assert_eq!(fb.pixels[15], 0);
    }
}
