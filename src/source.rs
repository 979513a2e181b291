// Where the background picture comes from.
// The camera is one source; simulation mode uses a blank one so the app runs
// on machines without a webcam (or without the `camera` feature).

use crate::error::Result;
use crate::types::{FrameBuffer, Size};

pub trait FrameSource {
    /// Start delivering frames, ideally at `requested`. Returns the size the
    /// source actually settled on.
    fn open(&mut self, requested: Size) -> Result<Size>;

    /// Next frame, or `None` when this source has no picture to give.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>>;

    /// Stop delivering frames. Must tolerate being called when already closed.
    fn close(&mut self) -> Result<()>;
}

/// No camera: the renderer paints its plain backdrop.
#[derive(Debug, Default)]
pub struct BlankSource;

impl BlankSource {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for BlankSource {
    fn open(&mut self, requested: Size) -> Result<Size> {
        Ok(requested)
    }

    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
