// air_ink: draw in the air with your index finger.
// Per frame: detector -> mapper -> smoothing -> pen -> strokes -> render.
// tracker runs that chain for one detector result; session owns the
// pipeline around it; main.rs wires it to a window.
// Default build simulates the hand with the mouse (or `--replay`);
// the `camera` feature adds a live webcam background via nokhwa.

pub mod brush;
#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod detector;
pub mod draw;
pub mod error;
pub mod export;
pub mod gamma;
pub mod glow;
pub mod hud;
pub mod logging;
pub mod mapper;
pub mod pen;
pub mod render;
pub mod session;
pub mod smoothing;
pub mod source;
pub mod strokes;
pub mod tracker;
pub mod types;

pub use error::{Error, Result};
