// Rendering: the ink layer plus the per-frame overlay.
// Ink holds every stroke in insertion order. It grows a segment at a time
// while drawing and is rebuilt after undo, clear or resize. Only ink is exported.
// Overlay holds the skeleton, the cursor and a stroke undone mid-draw.
// Visual: camera picture, then ink, then bones and joints, then the glowing cursor.

use crate::brush::{StampCache, paint_latest, paint_stroke};
use crate::detector::{HAND_CONNECTIONS, Hand};
use crate::draw::{draw_crosshair, draw_thick_line};
use crate::error::{Error, Result};
use crate::gamma::GammaLut;
use crate::glow::{draw_glow_disc, fill_disc};
use crate::mapper::map_to_surface;
use crate::strokes::Stroke;
use crate::tracker::Cursor;
use crate::types::{Color, FrameBuffer, InkLayer, Size};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor as IoCursor;

const BACKDROP: u32 = 0x00_10_10_14;
const BONE: Color = Color::rgb(0x9e, 0x2d, 0x4a);
const JOINT: Color = Color::rgb(0xfe, 0xff, 0xd4);
const CURSOR_DOWN: Color = Color::rgb(0xc5, 0xb8, 0x9f);
const CURSOR_UP: Color = Color::rgb(0x9e, 0x2d, 0x4a);

/// What goes on the overlay this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    pub hands: &'a [Hand],
    pub cursor: Option<Cursor>,
    pub mirrored: bool,
    /// In-progress stroke that is no longer part of the drawing.
    pub live: Option<&'a Stroke>,
}

pub trait Renderer {
    /// Clear the ink layer and repaint `strokes` in order.
    fn redraw(&mut self, strokes: &[Stroke]);

    /// Paint the newest segment (or first dot) of the stroke being drawn.
    fn extend(&mut self, stroke: &Stroke);

    /// New surface size. Leaves the ink layer blank; follow with `redraw`.
    fn resize(&mut self, size: Size);

    fn draw_overlay(&mut self, overlay: &Overlay<'_>);

    fn clear_overlay(&mut self);

    /// The ink layer alone as PNG bytes, transparent where nothing is drawn.
    fn export_png(&self) -> Result<Vec<u8>>;
}

/// Overlay content, owned so it survives until the next compose.
#[derive(Debug, Clone, Default)]
struct OverlayScene {
    hands: Vec<Hand>,
    cursor: Option<Cursor>,
    mirrored: bool,
}

pub struct SoftwareRenderer {
    lut: GammaLut,
    stamps: StampCache,
    ink: InkLayer,
    live: InkLayer,
    live_dirty: bool,
    scene: OverlayScene,
}

impl SoftwareRenderer {
    pub fn new(size: Size) -> Self {
        Self {
            lut: GammaLut::new(),
            stamps: StampCache::new(),
            ink: InkLayer::new(size.width, size.height),
            live: InkLayer::new(size.width, size.height),
            live_dirty: false,
            scene: OverlayScene::default(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.ink.width, self.ink.height)
    }

    pub fn ink(&self) -> &InkLayer {
        &self.ink
    }

    /// Build the picture for this frame into `screen` (resized to match).
    /// Order: background, ink, live stroke, skeleton, cursor.
    pub fn compose(&self, background: Option<&FrameBuffer>, screen: &mut FrameBuffer) {
        let size = self.size();
        if screen.size() != size {
            *screen = FrameBuffer::filled(size.width, size.height, BACKDROP);
        }

        match background {
            Some(frame) => blit_scaled(frame, screen, self.scene.mirrored),
            None => screen.pixels.fill(BACKDROP),
        }

        blend_layer(screen, &self.ink, &self.lut);
        if self.live_dirty {
            blend_layer(screen, &self.live, &self.lut);
        }

        for hand in &self.scene.hands {
            self.draw_skeleton(screen, hand);
        }

        if let Some(cursor) = self.scene.cursor {
            let (cx, cy) = (cursor.point.x.round() as i32, cursor.point.y.round() as i32);
            let color = if cursor.pen_down { CURSOR_DOWN } else { CURSOR_UP };
            draw_glow_disc(screen, cx, cy, 16, color, 0.8);
            fill_disc(screen, cx, cy, 6, color);
            draw_crosshair(screen, cx, cy, 12, JOINT.to_u32());
        }
    }

    fn draw_skeleton(&self, screen: &mut FrameBuffer, hand: &Hand) {
        let size = self.size();
        let pts: Vec<(i32, i32)> = hand
            .landmarks
            .iter()
            .map(|lm| {
                let p = map_to_surface(*lm, self.scene.mirrored, size);
                (p.x.round() as i32, p.y.round() as i32)
            })
            .collect();

        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(&(x0, y0)), Some(&(x1, y1))) = (pts.get(a), pts.get(b)) {
                draw_thick_line(screen, x0, y0, x1, y1, 3, BONE.to_u32());
            }
        }
        for &(x, y) in &pts {
            fill_disc(screen, x, y, 2, JOINT);
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn redraw(&mut self, strokes: &[Stroke]) {
        self.ink.clear();
        for stroke in strokes {
            let stamp = self.stamps.for_width(stroke.width);
            paint_stroke(&mut self.ink, stroke, stamp, &self.lut);
        }
    }

    fn extend(&mut self, stroke: &Stroke) {
        let stamp = self.stamps.for_width(stroke.width);
        paint_latest(&mut self.ink, stroke, stamp, &self.lut);
    }

    fn resize(&mut self, size: Size) {
        self.ink = InkLayer::new(size.width, size.height);
        self.live = InkLayer::new(size.width, size.height);
        self.live_dirty = false;
        self.clear_overlay();
    }

    fn draw_overlay(&mut self, overlay: &Overlay<'_>) {
        self.scene = OverlayScene {
            hands: overlay.hands.to_vec(),
            cursor: overlay.cursor,
            mirrored: overlay.mirrored,
        };
        if self.live_dirty {
            self.live.clear();
            self.live_dirty = false;
        }
        if let Some(stroke) = overlay.live {
            let stamp = self.stamps.for_width(stroke.width);
            paint_stroke(&mut self.live, stroke, stamp, &self.lut);
            self.live_dirty = true;
        }
    }

    fn clear_overlay(&mut self) {
        self.scene = OverlayScene { mirrored: self.scene.mirrored, ..OverlayScene::default() };
        if self.live_dirty {
            self.live.clear();
            self.live_dirty = false;
        }
    }

    fn export_png(&self) -> Result<Vec<u8>> {
        let (w, h) = (self.ink.width as u32, self.ink.height as u32);
        let mut raw = Vec::with_capacity(self.ink.color.len() * 4);
        for (px, a) in self.ink.color.iter().zip(&self.ink.alpha) {
            let alpha = (a * 255.0).round().clamp(0.0, 255.0) as u8;
            if alpha == 0 {
                raw.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                let c = Color::from_u32(*px);
                raw.extend_from_slice(&[c.r, c.g, c.b, alpha]);
            }
        }
        let img = RgbaImage::from_raw(w, h, raw)
            .ok_or_else(|| Error::Export("ink layer does not match its dimensions".into()))?;

        let mut bytes = Vec::new();
        img.write_to(&mut IoCursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| Error::Export(format!("Encode PNG: {e}")))?;
        Ok(bytes)
    }
}

/// Nearest-neighbour copy of `src` into `dst`, flipped horizontally when
/// mirrored so the picture lines up with mirrored landmarks.
fn blit_scaled(src: &FrameBuffer, dst: &mut FrameBuffer, mirrored: bool) {
    if src.width == 0 || src.height == 0 {
        dst.pixels.fill(BACKDROP);
        return;
    }
    for y in 0..dst.height {
        let sy = y * src.height / dst.height;
        let src_row = &src.pixels[sy * src.width..(sy + 1) * src.width];
        let dst_row = &mut dst.pixels[y * dst.width..(y + 1) * dst.width];
        for (x, out) in dst_row.iter_mut().enumerate() {
            let sx = x * src.width / dst.width;
            let sx = if mirrored { src.width - 1 - sx } else { sx };
            *out = src_row[sx];
        }
    }
}

/// Blend a layer over the screen in linear light, weighted by its coverage.
fn blend_layer(screen: &mut FrameBuffer, layer: &InkLayer, lut: &GammaLut) {
    if layer.width != screen.width || layer.height != screen.height {
        return;
    }
    for ((out, &px), &a) in screen.pixels.iter_mut().zip(&layer.color).zip(&layer.alpha) {
        if a > 0.0 {
            *out = lut.mix(*out, px, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Landmark, hand_at};
    use crate::types::Point;

    fn stroke(color: Color, width: u32, pts: &[(f32, f32)]) -> Stroke {
        Stroke { color, width, points: pts.iter().map(|&(x, y)| Point::new(x, y)).collect() }
    }

    #[test]
    fn redraw_paints_in_insertion_order() {
        let mut r = SoftwareRenderer::new(Size::new(20, 20));
        let red = stroke(Color::rgb(255, 0, 0), 4, &[(2.0, 10.0), (18.0, 10.0)]);
        let blue = stroke(Color::rgb(0, 0, 255), 4, &[(10.0, 2.0), (10.0, 18.0)]);
        r.redraw(&[red.clone(), blue.clone()]);
        assert_eq!(r.ink().color[10 * 20 + 10], 0x000000FF);

        r.redraw(&[blue, red]);
        assert_eq!(r.ink().color[10 * 20 + 10], 0x00FF0000);
    }

    #[test]
    fn redraw_tolerates_degenerate_strokes() {
        let mut r = SoftwareRenderer::new(Size::new(10, 10));
        let empty = stroke(Color::rgb(1, 1, 1), 3, &[]);
        let dot = stroke(Color::rgb(1, 1, 1), 3, &[(5.0, 5.0)]);
        r.redraw(&[empty.clone(), dot]);
        r.extend(&empty);
        assert_eq!(r.ink().alpha[5 * 10 + 5], 1.0);
        assert!(r.export_png().is_ok());
    }

    #[test]
    fn export_is_the_ink_layer_only() {
        let mut r = SoftwareRenderer::new(Size::new(16, 8));
        r.redraw(&[stroke(Color::rgb(0, 255, 0), 2, &[(4.0, 4.0)])]);
        let hands = [hand_at(Landmark { x: 0.5, y: 0.5 }, Landmark { x: 0.1, y: 0.1 })];
        r.draw_overlay(&Overlay {
            hands: &hands,
            cursor: Some(Cursor { point: Point::new(12.0, 4.0), pen_down: true }),
            mirrored: false,
            live: None,
        });

        let png = r.export_png().unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (16, 8));
        assert_eq!(img.get_pixel(4, 4).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(12, 4).0[3], 0); // cursor is not in the export
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn compose_stacks_background_ink_and_cursor() {
        let mut r = SoftwareRenderer::new(Size::new(40, 40));
        r.redraw(&[stroke(Color::rgb(255, 0, 0), 4, &[(5.0, 5.0)])]);
        r.draw_overlay(&Overlay {
            cursor: Some(Cursor { point: Point::new(30.0, 30.0), pen_down: false }),
            ..Overlay::default()
        });

        let bg = FrameBuffer::filled(20, 20, 0x00_20_40_60);
        let mut screen = FrameBuffer::filled(1, 1, 0);
        r.compose(Some(&bg), &mut screen);

        assert_eq!(screen.size(), Size::new(40, 40));
        assert_eq!(screen.pixels[5 * 40 + 5], 0x00FF0000); // ink
        assert_eq!(screen.pixels[20 * 40 + 0], 0x00_20_40_60); // background
        assert_eq!(screen.pixels[30 * 40 + 30], JOINT.to_u32()); // crosshair center
    }

    #[test]
    fn live_stroke_shows_on_screen_but_not_in_export() {
        let mut r = SoftwareRenderer::new(Size::new(10, 10));
        let detached = stroke(Color::rgb(0, 0, 255), 3, &[(5.0, 5.0)]);
        r.draw_overlay(&Overlay { live: Some(&detached), ..Overlay::default() });

        let mut screen = FrameBuffer::filled(10, 10, 0);
        r.compose(None, &mut screen);
        assert_eq!(screen.pixels[5 * 10 + 5], 0x000000FF);

        let img = image::load_from_memory(&r.export_png().unwrap()).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(5, 5).0[3], 0);

        r.clear_overlay();
        r.compose(None, &mut screen);
        assert_eq!(screen.pixels[5 * 10 + 5], BACKDROP);
    }

    #[test]
    fn oversized_stroke_widths_paint_without_panicking() {
        let mut r = SoftwareRenderer::new(Size::new(10, 10));
        let fat = stroke(Color::rgb(1, 2, 3), 70_000, &[(5.0, 5.0), (6.0, 5.0)]);
        r.redraw(std::slice::from_ref(&fat));
        r.extend(&fat);
        assert!(r.ink().alpha.iter().all(|a| *a == 1.0));
    }

    #[test]
    fn mirrored_background_is_flipped() {
        let mut src = FrameBuffer::filled(2, 1, 0);
        src.pixels = vec![0x00_11_11_11, 0x00_22_22_22];
        let mut dst = FrameBuffer::filled(4, 2, 0);
        blit_scaled(&src, &mut dst, true);
        assert_eq!(dst.pixels[0], 0x00_22_22_22);
        assert_eq!(dst.pixels[3], 0x00_11_11_11);
        blit_scaled(&src, &mut dst, false);
        assert_eq!(dst.pixels[0], 0x00_11_11_11);
    }

    #[test]
    fn resize_blanks_the_ink_until_redrawn() {
        let mut r = SoftwareRenderer::new(Size::new(10, 10));
        let s = stroke(Color::rgb(9, 9, 9), 2, &[(3.0, 3.0)]);
        r.redraw(std::slice::from_ref(&s));
        r.resize(Size::new(20, 5));
        assert_eq!(r.size(), Size::new(20, 5));
        assert!(r.ink().alpha.iter().all(|a| *a == 0.0));
        r.redraw(&[s]);
        assert_eq!(r.ink().alpha[3 * 20 + 3], 1.0);
    }
}
