/// Staging integration tests: sensors, the interact affordance and button presses.

use dialogue_engine::core::dispatcher::Dispatch;
use dialogue_engine::core::engine::{DialogueEngine, DialogueEngineBuilder};
use dialogue_engine::core::host::{Affordance, HostCall, RecordingHost};
use dialogue_engine::core::stage::StageState;
use dialogue_engine::schema::time::SunEvent;

fn scenario_engine() -> DialogueEngine<RecordingHost> {
    DialogueEngineBuilder::new()
        .module_path("tests/fixtures/scenarios.ron")
        .build(RecordingHost::new())
        .unwrap()
}

fn fire_dispatches(host: &RecordingHost) -> usize {
    host.displays()
        .iter()
        .filter(|d| d.passage.as_str() == "fire")
        .count()
}

#[test]
fn armed_press_dispatches_once_and_exit_disarms() {
    let mut engine = scenario_engine();

    engine.sensor_event("player", "flame", true);
    assert_eq!(engine.stages().state("flame"), StageState::Armed);
    assert_eq!(
        engine.host().last_affordances(),
        Some(
            &[Affordance {
                label: "interact".to_string(),
                slug: "passage/fire".to_string(),
            }][..]
        )
    );

    assert_eq!(
        engine.button_press_event("passage/fire", true),
        Some(Dispatch::Displayed)
    );
    assert_eq!(fire_dispatches(engine.host()), 1);
    assert_eq!(engine.store().count("fire"), 1);

    engine.sensor_event("player", "flame", false);
    assert_eq!(engine.stages().state("flame"), StageState::Idle);
    assert_eq!(engine.host().last_affordances(), Some(&[][..]));

    assert_eq!(engine.button_press_event("passage/fire", true), None);
    assert_eq!(fire_dispatches(engine.host()), 1);
    assert_eq!(engine.store().count("fire"), 1);
}

#[test]
fn repeated_presses_reopen_while_in_range() {
    let mut engine = scenario_engine();
    engine.sensor_event("player", "flame", true);

    for _ in 0..3 {
        engine.button_press_event("passage/fire", true);
        engine.button_press_event("passage/fire", false);
    }

    assert_eq!(fire_dispatches(engine.host()), 3);
    assert_eq!(engine.stages().state("flame"), StageState::Armed);
}

#[test]
fn releases_and_foreign_slugs_are_ignored() {
    let mut engine = scenario_engine();
    engine.sensor_event("player", "flame", true);
    engine.host_mut().clear();

    assert_eq!(engine.button_press_event("passage/fire", false), None);
    assert_eq!(engine.button_press_event("fruit-taken", true), None);
    assert_eq!(engine.button_press_event("passage/knight", true), None);
    assert!(engine.host().calls.is_empty());
}

#[test]
fn non_player_initiators_are_ignored() {
    let mut engine = scenario_engine();
    engine.sensor_event("goat", "flame", true);
    assert_eq!(engine.stages().state("flame"), StageState::Idle);
    assert!(engine.host().calls.is_empty());
}

#[test]
fn exit_sensor_transitions_on_enter_only() {
    let mut engine = scenario_engine();
    engine.sensor_event("player", "exit-east", true);
    engine.sensor_event("player", "exit-east", false);
    assert_eq!(
        engine.host().calls,
        vec![HostCall::Exit {
            name: "east".to_string(),
            immediate: false
        }]
    );
}

#[test]
fn latest_enter_owns_the_affordance() {
    let mut engine = scenario_engine();
    engine.sensor_event("player", "flame", true);
    engine.sensor_event("player", "knight", true);

    assert_eq!(
        engine.host().last_affordances().unwrap()[0].slug,
        "passage/knight"
    );
    // Both scopes are still armed; overlap is left to level authors.
    assert!(engine.button_press_event("passage/fire", true).is_some());
    assert!(engine.button_press_event("passage/knight", true).is_some());
}

#[test]
fn reset_reoffers_the_affordance_on_the_next_enter() {
    let mut engine = scenario_engine();
    engine.sensor_event("player", "flame", true);
    engine.reset();

    assert_eq!(engine.stages().state("flame"), StageState::Idle);
    assert_eq!(engine.button_press_event("passage/fire", true), None);

    engine.host_mut().clear();
    engine.sensor_event("player", "flame", true);
    assert_eq!(engine.host().calls.len(), 1);
    assert_eq!(
        engine.host().last_affordances().unwrap()[0].slug,
        "passage/fire"
    );
}

#[test]
fn reset_keeps_the_time_of_day() {
    let mut engine = scenario_engine();
    engine.time_changed_event(SunEvent::Night);
    engine.dispatch("knight");
    engine.reset();

    assert!(engine.store().is_night());
    assert_eq!(engine.store().count("knight"), 0);
    engine.dispatch("knight");
    assert_eq!(engine.host().last_display().unwrap().text, "sleeping");
}
