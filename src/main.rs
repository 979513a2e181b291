// What you SEE:
// • The camera picture (or a dark backdrop in simulation mode) with your ink on top.
// • The hand skeleton and a glowing cursor at the index fingertip.
// • In PINCH mode, touching thumb and index puts the pen down
//   (simulation: hold the left mouse button).
// • SPACE start/stop, C clear, Z undo, S save, M mode, R mirror, K color,
//   [ ] size, , . smoothing, ESC quits.

use air_ink::config::{AppConfig, Args, SMOOTHING_STEP};
use air_ink::detector::{HandDetector, PointerDetector, PointerHandle, PointerSample, ReplayDetector};
use air_ink::draw::{Command, Drawer, draw_text_5x7};
use air_ink::export::save_png;
use air_ink::hud::{FpsCounter, KEY_HINTS, status_line};
use air_ink::logging;
use air_ink::mapper::to_normalized;
use air_ink::render::SoftwareRenderer;
use air_ink::session::Session;
use air_ink::source::FrameSource;
use air_ink::types::{FrameBuffer, Point};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let args = Args::parse();
    let app = AppConfig::resolve(&args).context("load configuration")?;
    logging::init(app.debug);

    /* --- Window ---
       Visual: an empty, resizable window opens. */
    let mut drawer = Drawer::new("Air Ink", app.width, app.height).context("open window")?;
    let size = drawer.size();

    /* --- Pipeline: background source + hand detector --- */
    let pointer: PointerHandle = Rc::new(Cell::new(None));
    let detector: Box<dyn HandDetector> = match &app.replay {
        Some(path) => {
            info!(path = %path.display(), "replaying recorded landmarks");
            Box::new(ReplayDetector::from_file(path))
        }
        None => Box::new(PointerDetector::new(Rc::clone(&pointer))),
    };
    let mut session = Session::new(frame_source(&app), detector, SoftwareRenderer::new(size), size);

    // A pipeline that fails here leaves the window up; SPACE retries.
    if let Err(e) = session.start() {
        error!(error = %e, "could not start session");
    }

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer::filled(size.width, size.height, 0);
    let mut fps = FpsCounter::new(Instant::now());
    let mut draw_cfg = app.draw.clone();

    /* ------------------------------ Main loop ------------------------------ */
    'frames: while drawer.is_open() {
        /* 1) Follow window resizes (ink is rebuilt, overlay starts over). */
        let size = drawer.size();
        session.resize(size);

        /* 2) Keyboard commands */
        for cmd in drawer.commands() {
            match cmd {
                Command::Quit => break 'frames,
                Command::Clear => session.clear(),
                Command::Undo => {
                    session.undo();
                }
                Command::Save => save(&session, &app),
                Command::ToggleRunning => {
                    if session.is_running() {
                        session.stop();
                    } else if let Err(e) = session.start() {
                        error!(error = %e, "could not start session");
                    }
                }
                Command::CycleMode => {
                    draw_cfg.mode = draw_cfg.mode.next();
                    debug!(mode = %draw_cfg.mode, "mode changed");
                }
                Command::ToggleMirror => draw_cfg.mirrored = !draw_cfg.mirrored,
                Command::CycleColor => draw_cfg.cycle_color(),
                Command::Wider => draw_cfg.nudge_width(1),
                Command::Thinner => draw_cfg.nudge_width(-1),
                Command::SmoothMore => draw_cfg.nudge_smoothing(SMOOTHING_STEP),
                Command::SmoothLess => draw_cfg.nudge_smoothing(-SMOOTHING_STEP),
            }
        }

        /* 3) Tell the pointer detector where the "fingertip" is.
           Visual: the cursor follows the mouse; outside the window = no hand. */
        let sample = drawer.mouse_pos().map(|(x, y)| PointerSample {
            tip: to_normalized(Point::new(x, y), draw_cfg.mirrored, size),
            pinched: drawer.left_mouse_down(),
        });
        pointer.set(sample);

        /* 4) One frame through the pipeline: detect, track, ink. */
        if let Err(e) = session.tick(&draw_cfg) {
            error!(error = %e, "frame failed, stopping session");
            session.stop();
        }

        /* 5) Compose background + ink + overlay, then the HUD on top. */
        session.renderer().compose(session.background(), &mut screen);
        let hud = status_line(session.is_running(), &draw_cfg, session.tracker().model().len(), fps.fps());
        draw_text_5x7(&mut screen, 8, 8, &hud, draw_cfg.color.to_u32());
        let hint_y = screen.height as i32 - 14;
        draw_text_5x7(&mut screen, 8, hint_y, KEY_HINTS, 0x00_A0_A0_A0);

        /* 6) Present (this is when the on-screen image updates). */
        drawer.present(&screen).context("present frame")?;

        /* 7) FPS counter (HUD + debug log once per second) */
        if let Some(rate) = fps.frame(Instant::now()) {
            debug!(fps = format!("{rate:.1}"), "frame rate");
        }
    }

    session.stop();
    Ok(())
}

/// Camera when built with it, blank backdrop otherwise.
fn frame_source(app: &AppConfig) -> Box<dyn FrameSource> {
    #[cfg(feature = "camera")]
    {
        Box::new(air_ink::camera::CameraCapture::new(app.camera_index))
    }
    #[cfg(not(feature = "camera"))]
    {
        let _ = app.camera_index;
        Box::new(air_ink::source::BlankSource::new())
    }
}

fn save(session: &Session<SoftwareRenderer>, app: &AppConfig) {
    let result = session
        .export_raster()
        .and_then(|png| save_png(&app.export_dir, &png, Local::now()));
    if let Err(e) = result {
        warn!(error = %e, "saving the drawing failed");
    }
}
