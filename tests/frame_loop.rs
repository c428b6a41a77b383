use std::f32::consts::FRAC_PI_2;

use kinetic_sculpture::config::{BASE_HEIGHT, DEFAULT_WAVE_AMPLITUDE, DEFAULT_WAVE_SPEED};
use kinetic_sculpture::{AppState, FrameScene, InputEvent, KeyCode, PendantState, Playback};

fn key(app: &mut AppState, key: KeyCode, pressed: bool) {
    app.handle_event(InputEvent::KeyEdge { key, pressed });
}

#[test]
fn crest_after_quarter_period() {
    let mut app = AppState::default();
    app.animation.speed = 1.0;
    app.update(FRAC_PI_2);
    let pendant = app.animation.pendant(0, 0);
    assert!((pendant.position.y - (BASE_HEIGHT + DEFAULT_WAVE_AMPLITUDE)).abs() < 1e-4);
}

#[test]
fn reset_at_fifty_seconds() {
    let mut app = AppState::default();
    app.animation.time = 50.0;
    key(&mut app, KeyCode::UP, true);
    app.update(1.0);
    key(&mut app, KeyCode::UP, false);
    key(&mut app, KeyCode::R, true);
    app.update(0.0);
    assert_eq!(app.animation.time, 0.0);
    assert_eq!(app.animation.speed, DEFAULT_WAVE_SPEED);
    assert_eq!(app.animation.amplitude, DEFAULT_WAVE_AMPLITUDE);
}

#[test]
fn pause_cycle_over_many_frames() {
    let mut app = AppState::default();
    key(&mut app, KeyCode::P, true);
    for _ in 0..120 {
        app.update(1.0 / 120.0);
    }
    assert_eq!(app.playback(), Playback::Paused);
    let frozen = app.animation.time;
    let pendant = app.animation.pendant(5, 5);
    key(&mut app, KeyCode::P, false);
    for _ in 0..10 {
        app.update(0.1);
    }
    assert_eq!(app.animation.time, frozen);
    assert_eq!(app.animation.pendant(5, 5), pendant);
}

#[test]
fn every_frame_draws_full_scene() {
    let mut app = AppState::default();
    for _ in 0..3 {
        app.update(0.016);
        let scene = app.scene();
        assert_eq!(scene.object_count(), FrameScene::OBJECT_COUNT);
    }
    let lighting = app.frame_lighting();
    assert!(lighting.validate().is_ok());
    assert_eq!(lighting.spot.position, app.camera.position);
}

#[test]
fn heights_bounded_for_tuned_amplitude() {
    let amplitude = 2.3;
    for step in 0..50 {
        let t = step as f32 * 1.7;
        let y = PendantState::at(t, 13, 13, amplitude).position.y;
        assert!((BASE_HEIGHT - amplitude - 1e-4..=BASE_HEIGHT + amplitude + 1e-4).contains(&y));
    }
}
