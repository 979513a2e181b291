// Opens a camera and converts frames into a buffer suitable for the window.
// Visual expectation: once the session is started, every `next_frame()` gives
// a Vec<u32> where each pixel is 0x00RRGGBB, ready to sit under the ink.

use crate::error::{Error, Result};
use crate::source::FrameSource;
use crate::types::{FrameBuffer, Size};
use tracing::{debug, info};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so the session only sees FrameSource.
// The device is opened on `open` and released on `close`, so a stopped
// session holds no camera handle.
pub struct CameraCapture {
    index: u32,
    cam: Option<Camera>,
}

impl CameraCapture {
    pub fn new(index: u32) -> Self {
        Self { index, cam: None }
    }
}

impl FrameSource for CameraCapture {
    /// Try to open the camera at a target resolution (falls back if not exact).
    fn open(&mut self, requested: Size) -> Result<Size> {
        let idx = CameraIndex::Index(self.index);

        let fmt = CameraFormat::new(
            Resolution::new(requested.width as u32, requested.height as u32),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, prioritizing the format closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // This fails if no device exists at that index.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera {}: {e}", self.index)))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(index = self.index, width = actual.width(), height = actual.height(), "camera streaming");

        self.cam = Some(cam);
        Ok(Size::new(actual.width() as usize, actual.height() as usize))
    }

    /// Grab one frame and convert it to 0x00RRGGBB pixels.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        let Some(cam) = self.cam.as_mut() else {
            return Err(Error::CameraFrame("camera is not open".into()));
        };

        // Blocks until a new frame is ready.
        let frame = cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let pixels = rgb_img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        Ok(Some(FrameBuffer { width: w as usize, height: h as usize, pixels }))
    }

    fn close(&mut self) -> Result<()> {
        // Already released: nothing to do.
        let Some(mut cam) = self.cam.take() else {
            return Ok(());
        };
        debug!(index = self.index, "stopping camera stream");
        cam.stop_stream()
            .map_err(|e| Error::CameraClose(format!("Stop stream: {e}")))
    }
}
