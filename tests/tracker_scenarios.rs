// End-to-end gesture scenarios: detector results in, strokes out.

use air_ink::config::DrawConfig;
use air_ink::detector::{Detection, Landmark, hand_at};
use air_ink::pen::InteractionMode;
use air_ink::strokes::StrokeEvent;
use air_ink::tracker::{Surfaces, Tracker};
use air_ink::types::{Point, Size};

fn hand(x: f32, y: f32) -> Detection {
    // Thumb far away so PINCH never fires by accident.
    Detection::single(hand_at(Landmark { x, y }, Landmark { x: 0.9, y: 0.9 }))
}

fn pinched(x: f32, y: f32) -> Detection {
    Detection::single(hand_at(Landmark { x, y }, Landmark { x, y }))
}

fn cfg(mode: InteractionMode) -> DrawConfig {
    DrawConfig { mode, smoothing: 0.0, mirrored: false, ..DrawConfig::default() }
}

fn tracker() -> Tracker {
    Tracker::new(Surfaces::uniform(Size::new(100, 100)))
}

fn assert_close(actual: Point, expected: Point) {
    assert!(
        actual.distance(expected) < 1e-3,
        "expected ({}, {}), got ({}, {})",
        expected.x,
        expected.y,
        actual.x,
        actual.y
    );
}

#[test]
fn always_mode_records_every_frame() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Always);
    for x in [0.1, 0.2, 0.3] {
        t.process(&hand(x, 0.1), &c);
    }

    let strokes = t.model().strokes();
    assert_eq!(strokes.len(), 1);
    let expected = [Point::new(10.0, 10.0), Point::new(20.0, 10.0), Point::new(30.0, 10.0)];
    assert_eq!(strokes[0].points.len(), expected.len());
    for (got, want) in strokes[0].points.iter().zip(expected) {
        assert_close(*got, want);
    }
}

#[test]
fn losing_the_hand_splits_the_stroke() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Always);
    t.process(&hand(0.1, 0.1), &c);
    t.process(&hand(0.2, 0.1), &c);
    assert_eq!(t.process(&Detection::default(), &c).event, StrokeEvent::Finalized);
    t.process(&hand(0.5, 0.5), &c);

    let strokes = t.model().strokes();
    assert_eq!(strokes.len(), 2);
    assert_eq!(strokes[0].points.len(), 2);
    assert_eq!(strokes[1].points.len(), 1);
    assert!(strokes[1].is_degenerate());
}

#[test]
fn n_pen_down_frames_give_n_points() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Pinch);
    for i in 0..25 {
        t.process(&pinched(0.2 + i as f32 * 0.01, 0.4), &c);
    }
    t.process(&hand(0.5, 0.4), &c);
    assert_eq!(t.model().strokes()[0].points.len(), 25);
    assert!(!t.model().is_active());
}

#[test]
fn hover_never_leaves_ink() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Hover);
    for x in [0.1, 0.4, 0.7] {
        let update = t.process(&pinched(x, 0.5), &c);
        assert!(update.cursor.is_some_and(|cursor| !cursor.pen_down));
    }
    assert!(t.model().is_empty());
}

#[test]
fn clear_while_drawing_leaves_nothing_to_undo() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Always);
    t.process(&hand(0.1, 0.1), &c);
    t.process(&hand(0.2, 0.1), &c);
    t.clear();

    assert!(t.model().is_empty());
    assert!(!t.undo());

    // The pen is still down: the next frame starts a fresh stroke.
    assert_eq!(t.process(&hand(0.3, 0.1), &c).event, StrokeEvent::Started);
    assert_eq!(t.model().len(), 1);
}

#[test]
fn undo_more_times_than_strokes_empties_the_history() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Always);
    for _ in 0..3 {
        t.process(&hand(0.5, 0.5), &c);
        t.process(&Detection::default(), &c);
    }
    assert_eq!(t.model().len(), 3);

    let removed = (0..5).filter(|_| t.undo()).count();
    assert_eq!(removed, 3);
    assert!(t.model().is_empty());
}

#[test]
fn undo_while_drawing_detaches_the_live_stroke() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Always);
    t.process(&hand(0.1, 0.1), &c);
    assert!(t.undo());
    assert!(t.model().is_empty());

    // Still drawing: points keep flowing into the detached stroke only.
    assert_eq!(t.process(&hand(0.2, 0.1), &c).event, StrokeEvent::Extended);
    assert_eq!(t.model().detached().map(|s| s.points.len()), Some(2));
    assert!(t.model().strokes().is_empty());

    t.process(&Detection::default(), &c);
    assert!(t.model().detached().is_none());
    assert!(t.model().is_empty());
}

#[test]
fn mirroring_flips_x_only() {
    let mut t = tracker();
    let c = DrawConfig { mirrored: true, ..cfg(InteractionMode::Always) };
    t.process(&hand(0.25, 0.75), &c);
    assert_close(t.model().strokes()[0].points[0], Point::new(75.0, 75.0));
}

#[test]
fn resize_keeps_recorded_points() {
    let mut t = tracker();
    let c = cfg(InteractionMode::Always);
    t.process(&hand(0.5, 0.5), &c);
    t.resize(Surfaces::uniform(Size::new(200, 200)));
    t.process(&hand(0.5, 0.5), &c);

    let points = &t.model().strokes()[0].points;
    assert_close(points[0], Point::new(50.0, 50.0));
    assert_close(points[1], Point::new(100.0, 100.0));
}
