use crux_core::testing::AppTester;
use shared::{
    capabilities::{TickKind, TickOutput},
    dial::CENTER,
    gesture::Point,
    App, Effect, Event, Model,
};

// 2024-01-01T12:00:00Z, 20:00 in Taipei
const NOON_UTC: i64 = 1_704_110_400_000;

fn at_clock(deg: f64) -> Point {
    let r = deg.to_radians();
    Point::new(CENTER.x + 200.0 * r.cos(), CENTER.y + 200.0 * r.sin())
}

fn running(app: &AppTester<App, Effect>) -> Model {
    let mut model = Model::default();
    app.update(Event::AppStarted { now_ms: NOON_UTC }, &mut model);
    app.update(Event::StateLoaded(Ok(None)), &mut model);
    model
}

#[test]
fn dragging_a_quarter_turn_moves_three_hours() {
    let app = AppTester::<App, Effect>::default();
    let mut model = running(&app);

    app.update(Event::DragStarted { at: at_clock(0.0) }, &mut model);
    assert!(app.view(&model).is_dragging);

    for deg in [30.0, 60.0, 90.0] {
        app.update(Event::DragMoved { at: at_clock(deg) }, &mut model);
    }
    app.update(Event::DragEnded, &mut model);

    assert_eq!(model.manual_offset_minutes, 180);
    let view = app.view(&model);
    assert!(!view.is_dragging);
    assert!(view.is_time_travelling);
    assert_eq!(view.header_time, "23:00");

    // Time travel is never persisted.
    let update = app.update(Event::ResetToNow, &mut model);
    assert!(!update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::KeyValue(_))));
    assert_eq!(model.manual_offset_minutes, 0);
    assert_eq!(app.view(&model).header_time, "20:00");
}

#[test]
fn dragging_backwards_can_cross_midnight() {
    let app = AppTester::<App, Effect>::default();
    let mut model = running(&app);

    // Eleven hours back: 20:00 becomes 09:00 the same day.
    app.update(Event::DragStarted { at: at_clock(0.0) }, &mut model);
    for step in 1..=33 {
        let deg = -10.0 * f64::from(step);
        app.update(Event::DragMoved { at: at_clock(deg) }, &mut model);
    }
    app.update(Event::DragEnded, &mut model);

    assert_eq!(model.manual_offset_minutes, -660);
    assert_eq!(app.view(&model).header_time, "09:00");
}

#[test]
fn moves_outside_a_drag_are_ignored() {
    let app = AppTester::<App, Effect>::default();
    let mut model = running(&app);

    app.update(Event::DragMoved { at: at_clock(90.0) }, &mut model);
    assert_eq!(model.manual_offset_minutes, 0);

    // Presses off the surface never start a drag.
    app.update(
        Event::DragStarted {
            at: Point::new(-20.0, 600.0),
        },
        &mut model,
    );
    app.update(Event::DragMoved { at: at_clock(45.0) }, &mut model);
    assert_eq!(model.manual_offset_minutes, 0);
    assert!(!model.drag.is_dragging());
}

#[test]
fn ticks_advance_the_clock() {
    let app = AppTester::<App, Effect>::default();
    let mut model = running(&app);

    let update = app.update(
        Event::Tick(TickOutput {
            kind: TickKind::Header,
            now_ms: NOON_UTC + 90 * 60_000,
        }),
        &mut model,
    );
    assert!(update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Render(_))));
    assert_eq!(app.view(&model).header_time, "21:30");
}

#[test]
fn work_mode_marks_friends_in_office_hours() {
    let app = AppTester::<App, Effect>::default();
    let mut model = running(&app);
    app.update(Event::AddCity { name: "London".into() }, &mut model);
    app.update(Event::ToggleWorkMode, &mut model);

    let view = app.view(&model);
    assert!(view.show_work_mode);
    let london = view
        .dial
        .hands
        .iter()
        .find(|h| h.label.text.contains("London"))
        .unwrap();
    assert!(london.glow.is_some());
    assert!(london.label.text.starts_with("💼 "));

    let taipei = view
        .dial
        .hands
        .iter()
        .find(|h| h.label.text.contains("Taiwan"))
        .unwrap();
    assert!(taipei.glow.is_none());
}

#[test]
fn detaching_stops_the_tickers() {
    let app = AppTester::<App, Effect>::default();
    let mut model = running(&app);

    app.update(Event::DragStarted { at: at_clock(0.0) }, &mut model);
    let update = app.update(Event::ViewDetached, &mut model);

    let stops = update
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::Ticker(_)))
        .count();
    assert_eq!(stops, 2);
    assert!(!model.tickers_running);
    assert!(!model.drag.is_dragging());

    // Re-attaching starts them again.
    let update = app.update(Event::AppStarted { now_ms: NOON_UTC }, &mut model);
    assert!(update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Ticker(_))));
    assert!(model.tickers_running);
}
