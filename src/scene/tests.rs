use std::vec::Vec as StdVec;

use embassy_time::Instant;

use super::*;
use crate::{
    config::{WizardConfig, INSTRUCTIONS_TOP_LEFT, INSTRUCTIONS_TOP_RIGHT},
    types::{CalibrationPoint, CalibrationState, WizardEvent},
    wizard::CalibrationWizard,
};

const DISPLAY: Size = Size::new(480, 320);

fn at_ms(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn target_of(scene: &Scene, session: ObjectId) -> ObjectId {
    scene
        .children(session)
        .into_iter()
        .find(|id| matches!(scene.get(*id).map(|o| &o.kind), Some(ObjectKind::Target { .. })))
        .expect("target")
}

fn instructions_of(scene: &Scene, session: ObjectId) -> ObjectId {
    scene
        .children(session)
        .into_iter()
        .find(|id| {
            matches!(
                scene.get(*id).map(|o| &o.kind),
                Some(ObjectKind::Label {
                    align: LabelAlign::Center,
                    ..
                })
            )
        })
        .expect("instructions")
}

fn started(scene: &mut Scene) -> CalibrationWizard<Scene, ()> {
    CalibrationWizard::start(scene, WizardConfig::default(), ()).expect("start")
}

#[test]
fn wizard_takes_over_and_returns_home_screen() {
    let mut scene = Scene::new(DISPLAY);
    let home = scene.home_screen();
    let mut wizard = started(&mut scene);

    let session = scene.active_screen();
    assert_ne!(session, home);
    assert_eq!(
        scene.label_text(instructions_of(&scene, session)),
        Some(INSTRUCTIONS_TOP_LEFT)
    );

    let mut now = 0;
    for (x, y) in [(3, 4), (470, 6), (468, 311), (9, 309), (200, 200)] {
        now += 1_000;
        scene.tick(at_ms(now));
        let mut input = || Some(CalibrationPoint::new(x, y));
        wizard.on_tap(&mut scene, &mut input).expect("tap");
    }

    assert!(!wizard.is_active());
    assert_eq!(scene.active_screen(), home);
    assert!(!scene.contains(session));
    assert_eq!(scene.object_count(), 1);
    assert_eq!(scene.animations_running(), 0);
}

#[test]
fn target_glides_to_first_corner_after_delay() {
    let mut scene = Scene::new(DISPLAY);
    let _wizard = started(&mut scene);
    let target = target_of(&scene, scene.active_screen());

    assert_eq!(scene.position(target), Point::new(240, 160));
    assert_eq!(scene.animations_running(), 2);

    scene.tick(at_ms(499));
    assert_eq!(scene.position(target), Point::new(240, 160));

    scene.tick(at_ms(600));
    assert_eq!(scene.position(target), Point::new(120, 80));

    scene.tick(at_ms(700));
    assert_eq!(scene.position(target), Point::new(0, 0));
    assert_eq!(scene.animations_running(), 0);
}

#[test]
fn readout_lands_inside_display() {
    let mut scene = Scene::new(DISPLAY);
    let mut wizard = started(&mut scene);
    let session = scene.active_screen();
    scene.tick(at_ms(1_000));

    let mut first = || Some(CalibrationPoint::new(12, 34));
    wizard.on_tap(&mut scene, &mut first).expect("tap");
    scene.tick(at_ms(2_000));
    let mut second = || Some(CalibrationPoint::new(4095, 17));
    wizard.on_tap(&mut scene, &mut second).expect("tap");

    let readouts: StdVec<ObjectId> = scene
        .children(session)
        .into_iter()
        .filter(|id| {
            matches!(
                scene.get(*id).map(|o| &o.kind),
                Some(ObjectKind::Label {
                    align: LabelAlign::Manual,
                    ..
                })
            )
        })
        .collect();
    assert_eq!(readouts.len(), 2);
    assert_eq!(scene.label_text(readouts[0]), Some("x: 12\ny: 34"));
    assert_eq!(scene.label_text(readouts[1]), Some("x: 4095\ny: 17"));

    for id in readouts {
        let origin = scene.position(id);
        let size = scene.object_size(id);
        assert!(size.width > 0 && size.height > 0);
        assert!(origin.x >= 5 && origin.y >= 5);
        assert!(origin.x + size.width as i32 <= DISPLAY.width as i32 - 5);
        assert!(origin.y + size.height as i32 <= DISPLAY.height as i32 - 5);
    }
    assert_eq!(
        scene.label_text(instructions_of(&scene, session)),
        Some(crate::config::INSTRUCTIONS_BOTTOM_RIGHT)
    );
}

#[test]
fn hit_surface_routes_taps_only_while_active() {
    let mut scene = Scene::new(DISPLAY);
    let mut wizard = started(&mut scene);

    assert_eq!(scene.hit_test(Point::new(10, 10)), wizard.hit_surface());
    assert_eq!(scene.hit_test(Point::new(480, 10)), None);

    for _ in 0..5 {
        let mut input = || Some(CalibrationPoint::new(1, 1));
        wizard.on_tap(&mut scene, &mut input).expect("tap");
    }
    assert_eq!(scene.hit_test(Point::new(10, 10)), None);
}

#[test]
fn events_reach_channel_in_order() {
    use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};

    let channel: Channel<NoopRawMutex, WizardEvent, 8> = Channel::new();
    let mut scene = Scene::new(DISPLAY);
    let mut wizard =
        CalibrationWizard::start(&mut scene, WizardConfig::default(), channel.sender())
            .expect("start");
    for i in 0..5 {
        let mut input = || Some(CalibrationPoint::new(i, i));
        wizard.on_tap(&mut scene, &mut input).expect("tap");
    }

    let mut kinds = StdVec::new();
    while let Ok(event) = channel.try_receive() {
        kinds.push(match event {
            WizardEvent::Started => "started",
            WizardEvent::PointCaptured { .. } => "point",
            WizardEvent::AwaitingExit => "awaiting",
            WizardEvent::Finished { .. } => "finished",
        });
    }
    assert_eq!(
        kinds,
        std::vec!["started", "point", "point", "point", "point", "awaiting", "finished"]
    );
}

#[test]
fn draw_shows_target_until_final_prompt() {
    let mut scene = Scene::new(DISPLAY);
    let mut wizard = started(&mut scene);
    let target = target_of(&scene, scene.active_screen());
    let mut bits = std::vec![0u8; Framebuffer::buffer_len(DISPLAY)];

    scene.tick(at_ms(700));
    let mut frame = Framebuffer::new(DISPLAY, &mut bits).expect("frame");
    scene.draw(&mut frame);
    // Crosshair centre of the top-left target.
    assert!(frame.pixel(Point::new(10, 10)));

    for i in 0..4 {
        scene.tick(at_ms(2_000 * (i + 1)));
        let mut input = || Some(CalibrationPoint::new(1, 1));
        wizard.on_tap(&mut scene, &mut input).expect("tap");
    }
    assert_eq!(wizard.state(), CalibrationState::AwaitLeave);
    assert_eq!(scene.is_hidden(target), Some(true));
}

#[test]
fn hidden_objects_are_not_drawn() {
    let mut scene = Scene::new(DISPLAY);
    let screen = scene.create_screen().expect("screen");
    let target = scene.create_target(screen, 20).expect("target");
    scene.set_position(target, Point::new(50, 50));
    scene.load_screen(screen);
    let mut bits = std::vec![0u8; Framebuffer::buffer_len(DISPLAY)];

    {
        let mut frame = Framebuffer::new(DISPLAY, &mut bits).expect("frame");
        scene.draw(&mut frame);
        assert!(frame.pixel(Point::new(60, 60)));
    }

    scene.set_hidden(target, true);
    let mut frame = Framebuffer::new(DISPLAY, &mut bits).expect("frame");
    scene.draw(&mut frame);
    assert_eq!(frame.lit_pixels(), 0);
}

#[test]
fn instructions_label_is_centred() {
    let mut scene = Scene::new(DISPLAY);
    let mut wizard = started(&mut scene);
    let label = instructions_of(&scene, scene.active_screen());
    scene.tick(at_ms(1_000));

    let mut input = || Some(CalibrationPoint::new(1, 1));
    wizard.on_tap(&mut scene, &mut input).expect("tap");

    assert_eq!(scene.label_text(label), Some(INSTRUCTIONS_TOP_RIGHT));
    let size = scene.object_size(label);
    let origin = scene.position(label);
    assert_eq!(origin.x, (480 - size.width as i32) / 2);
    assert_eq!(origin.y, (320 - size.height as i32) / 2);
}

#[test]
fn arena_exhaustion_is_reported() {
    let mut scene = Scene::new(DISPLAY);
    let screen = scene.create_screen().expect("screen");
    let mut result = Ok(screen);
    for _ in 0..SCENE_MAX_OBJECTS {
        result = scene.create_label(screen, LabelAlign::Manual);
        if result.is_err() {
            break;
        }
    }
    assert_eq!(result, Err(SceneError::ObjectsExhausted));
}

#[test]
fn stale_handles_are_ignored() {
    let mut scene = Scene::new(DISPLAY);
    let screen = scene.create_screen().expect("screen");
    let label = scene.create_label(screen, LabelAlign::Manual).expect("label");
    scene.delete_screen(screen);

    let reused = scene.create_screen().expect("screen");
    assert!(!scene.contains(label));
    assert_ne!(reused, screen);
    scene.set_label_text(label, "stale");
    assert_eq!(scene.label_text(label), None);
    assert_eq!(
        scene.create_label(screen, LabelAlign::Manual),
        Err(SceneError::UnknownObject)
    );
}

#[test]
fn restarting_an_axis_replaces_it() {
    let mut scene = Scene::new(DISPLAY);
    let screen = scene.create_screen().expect("screen");
    let target = scene.create_target(screen, 20).expect("target");
    let [x, _] = AxisAnimation::pair(
        target,
        Point::zero(),
        Point::new(100, 0),
        embassy_time::Duration::from_millis(0),
        embassy_time::Duration::from_millis(100),
    );

    scene.animate(x);
    scene.animate(AxisAnimation { to: 50, ..x });
    assert_eq!(scene.animations_running(), 1);

    scene.tick(at_ms(100));
    assert_eq!(scene.position(target), Point::new(50, 0));
}

#[test]
fn long_label_text_is_truncated() {
    let mut scene = Scene::new(DISPLAY);
    let screen = scene.create_screen().expect("screen");
    let label = scene.create_label(screen, LabelAlign::Manual).expect("label");

    let long = "x".repeat(SCENE_LABEL_TEXT_MAX + 10);
    scene.set_label_text(label, &long);

    assert_eq!(scene.label_text(label).map(str::len), Some(SCENE_LABEL_TEXT_MAX));
}
