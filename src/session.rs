// Session: the pipeline (frame source + hand detector), the tracker and the
// renderer, one frame at a time on the frame thread.
// start returns once both pipeline halves are up. stop tears both down
// independently and logs their failures, so the session is never stuck
// running. After stop no frame touches the drawing, not even one in flight.

use crate::config::DrawConfig;
use crate::detector::{Detection, HandDetector};
use crate::error::Result;
use crate::render::{Overlay, Renderer};
use crate::source::FrameSource;
use crate::strokes::StrokeEvent;
use crate::tracker::{FrameUpdate, Surfaces, Tracker};
use crate::types::{FrameBuffer, Size};
use tracing::{debug, info, warn};

pub struct Session<R: Renderer> {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    renderer: R,
    tracker: Tracker,
    background: Option<FrameBuffer>,
    running: bool,
}

impl<R: Renderer> Session<R> {
    pub fn new(source: Box<dyn FrameSource>, detector: Box<dyn HandDetector>, renderer: R, size: Size) -> Self {
        Self {
            source,
            detector,
            renderer,
            tracker: Tracker::new(Surfaces::uniform(size)),
            background: None,
            running: false,
        }
    }

    /// Bring the pipeline up. A no-op when already running. On failure
    /// nothing is left open and the session stays stopped.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            debug!("start ignored, session already running");
            return Ok(());
        }

        let requested = self.tracker.surfaces().drawing;
        let actual = self.source.open(requested)?;

        if let Err(e) = self.detector.open() {
            if let Err(close_err) = self.source.close() {
                warn!(error = %close_err, "closing frame source after failed start");
            }
            return Err(e);
        }

        self.running = true;
        info!(width = actual.width, height = actual.height, "session started");
        Ok(())
    }

    /// Tear the pipeline down. Safe to call any number of times.
    pub fn stop(&mut self) {
        if !self.running {
            debug!("stop ignored, session not running");
            return;
        }
        // Flip first: nothing below may let another frame through.
        self.running = false;

        if let Err(e) = self.source.close() {
            warn!(error = %e, "frame source teardown failed");
        }
        if let Err(e) = self.detector.close() {
            warn!(error = %e, "detector teardown failed");
        }

        self.tracker.lose_tracking();
        self.renderer.clear_overlay();
        self.background = None;
        self.sync_overlay();
        info!(strokes = self.tracker.model().len(), "session stopped");
    }

    /// Pull one frame through the pipeline. `Ok(None)` while stopped.
    pub fn tick(&mut self, config: &DrawConfig) -> Result<Option<FrameUpdate>> {
        if !self.running {
            return Ok(None);
        }
        let frame = self.source.next_frame()?;
        let detection = self.detector.detect(frame.as_ref())?;
        self.background = frame;
        self.sync_overlay();
        Ok(self.on_detection(&detection, config))
    }

    /// Apply one detector result. Dropped (returns `None`) once stopped.
    pub fn on_detection(&mut self, detection: &Detection, config: &DrawConfig) -> Option<FrameUpdate> {
        if !self.running {
            return None;
        }

        let update = self.tracker.process(detection, config);
        let model = self.tracker.model();

        if matches!(update.event, StrokeEvent::Started | StrokeEvent::Extended) && model.detached().is_none() {
            if let Some(stroke) = model.current() {
                self.renderer.extend(stroke);
            }
        }

        self.renderer.draw_overlay(&Overlay {
            hands: &detection.hands,
            cursor: update.cursor,
            mirrored: config.mirrored,
            live: model.detached(),
        });
        Some(update)
    }

    pub fn clear(&mut self) {
        self.tracker.clear();
        self.renderer.redraw(&[]);
        debug!("drawing cleared");
    }

    /// Remove the latest stroke. Returns false when there was none.
    pub fn undo(&mut self) -> bool {
        let removed = self.tracker.undo();
        if removed {
            self.renderer.redraw(self.tracker.model().strokes());
            debug!(strokes = self.tracker.model().len(), "undo");
        }
        removed
    }

    /// PNG snapshot of the drawing, without cursor or skeleton.
    pub fn export_raster(&self) -> Result<Vec<u8>> {
        self.renderer.export_png()
    }

    /// The window changed size. Stroke points keep their pixel coordinates;
    /// the ink is rebuilt from the model, the overlay starts over.
    pub fn resize(&mut self, size: Size) {
        if self.tracker.surfaces().drawing == size {
            return;
        }
        debug!(width = size.width, height = size.height, "surface resized");
        self.tracker.resize(Surfaces { drawing: size, overlay: self.overlay_size(size) });
        self.renderer.resize(size);
        self.renderer.redraw(self.tracker.model().strokes());
    }

    /// The hand is tracked in the camera picture when there is one,
    /// otherwise in the window itself.
    fn overlay_size(&self, drawing: Size) -> Size {
        self.background.as_ref().map_or(drawing, FrameBuffer::size)
    }

    fn sync_overlay(&mut self) {
        let drawing = self.tracker.surfaces().drawing;
        let surfaces = Surfaces { drawing, overlay: self.overlay_size(drawing) };
        if surfaces != self.tracker.surfaces() {
            debug!(width = surfaces.overlay.width, height = surfaces.overlay.height, "overlay surface changed");
            self.tracker.resize(surfaces);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Latest camera frame, if the source has pictures.
    pub fn background(&self) -> Option<&FrameBuffer> {
        self.background.as_ref()
    }
}
