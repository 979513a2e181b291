// Round-brush rasterizer for strokes.
// Visual expectation: a stroke shows up as a smooth, evenly thick line with
// round ends, exactly as wide as its captured width, with soft 1-px edges.
use crate::config::MAX_STROKE_WIDTH;
use crate::gamma::GammaLut;
use crate::strokes::Stroke;
use crate::types::{Color, InkLayer, Point, Stamp};
use std::collections::HashMap;

/// Make a filled disc stamp of the given radius with an antialiased rim.
/// Visual: defines the pen tip; every dab paints one of these.
pub fn make_round_stamp(radius: f32) -> Stamp {
    let radius = radius.max(0.5);
    let r = radius.ceil() as i32;
    let d = 2 * r + 1; // kernel size (width = height)
    let mut weights = Vec::with_capacity((d * d) as usize);

    for y in -r..=r {
        for x in -r..=r {
            let dist = ((x * x + y * y) as f32).sqrt();
            // Full coverage inside, linear ramp across the last pixel
            weights.push((radius + 0.5 - dist).clamp(0.0, 1.0));
        }
    }

    Stamp { radius: r, weights }
}

/// Stamp one dab of `color` at (cx, cy), composited over the layer.
/// Visual: a round spot of ink appears; overlapping dabs merge seamlessly.
pub fn dab(layer: &mut InkLayer, cx: f32, cy: f32, stamp: &Stamp, color: Color, lut: &GammaLut) {
    let w = layer.width as i32;
    let h = layer.height as i32;
    let r = stamp.radius;
    let d = 2 * r + 1;
    let (cx, cy) = (cx.round() as i32, cy.round() as i32);
    let src = color.to_u32();

    for ky in 0..d {
        for kx in 0..d {
            let sx = cx + kx - r; // layer x for this kernel cell
            let sy = cy + ky - r; // layer y for this kernel cell
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            let cover = stamp.weights[(ky * d + kx) as usize];
            if cover <= 0.0 {
                continue;
            }
            let idx = sy as usize * layer.width + sx as usize;

            // "Over" in linear light: new ink covers `cover` of whatever is there.
            let under = layer.alpha[idx];
            let out_a = cover + under * (1.0 - cover);
            let share = cover / out_a;
            layer.color[idx] = if under <= 0.0 { src } else { lut.mix(layer.color[idx], src, share) };
            layer.alpha[idx] = out_a;
        }
    }
}

/// Dab along the segment a→b, excluding `a` itself (already painted).
/// Spacing is a quarter of the brush radius so the edge never scallops.
pub fn paint_segment(layer: &mut InkLayer, a: Point, b: Point, stamp: &Stamp, color: Color, lut: &GammaLut) {
    let spacing = (stamp.radius as f32 * 0.25).max(0.5);
    let steps = (a.distance(b) / spacing).ceil().max(1.0) as usize;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        dab(layer, a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t, stamp, color, lut);
    }
}

/// Round stamps by stroke width, built once on first use. Widths are capped
/// at [`MAX_STROKE_WIDTH`], so the cache stays small.
#[derive(Default)]
pub struct StampCache {
    stamps: HashMap<u32, Stamp>,
}

impl StampCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_width(&mut self, width: u32) -> &Stamp {
        let width = width.clamp(1, MAX_STROKE_WIDTH);
        self.stamps.entry(width).or_insert_with(|| make_round_stamp(width as f32 * 0.5))
    }
}

/// Paint a whole stroke. Empty strokes paint nothing, single points a dot.
pub fn paint_stroke(layer: &mut InkLayer, stroke: &Stroke, stamp: &Stamp, lut: &GammaLut) {
    let Some(&first) = stroke.points.first() else {
        return;
    };
    dab(layer, first.x, first.y, stamp, stroke.color, lut);
    for pair in stroke.points.windows(2) {
        paint_segment(layer, pair[0], pair[1], stamp, stroke.color, lut);
    }
}

/// Paint only the newest segment of a growing stroke (or its first dot).
pub fn paint_latest(layer: &mut InkLayer, stroke: &Stroke, stamp: &Stamp, lut: &GammaLut) {
    match stroke.points.as_slice() {
        [] => {}
        [only] => dab(layer, only.x, only.y, stamp, stroke.color, lut),
        [.., a, b] => paint_segment(layer, *a, *b, stamp, stroke.color, lut),
    }
}
