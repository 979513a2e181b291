// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Camera close error: {0}")]
    CameraClose(String), // Stopping the stream failed
    #[error("Detector init error: {0}")]
    DetectorInit(String), // The hand detector could not be brought up
    #[error("Detector error: {0}")]
    Detector(String), // A single detection pass failed
    #[error("Detector close error: {0}")]
    DetectorClose(String),
    #[error("Export error: {0}")]
    Export(String), // Encoding or writing the PNG snapshot failed
    #[error("Config error: {0}")]
    Config(String), // A value in the config file or flags could not be used
}
