/// Dispatch integration tests: branch ladders, visit counts, choices and closes.

use dialogue_engine::core::dispatcher::{ChoiceOutcome, Dispatch};
use dialogue_engine::core::engine::{DialogueEngine, DialogueEngineBuilder};
use dialogue_engine::core::host::{HostCall, RecordingHost};
use dialogue_engine::core::resolver::ChoiceResolver;
use dialogue_engine::schema::module::DialogueModule;
use dialogue_engine::schema::passage::{Choice, Presentation};
use dialogue_engine::schema::pickup::Pickup;
use dialogue_engine::schema::time::SunEvent;

fn scenario_engine() -> DialogueEngine<RecordingHost> {
    DialogueEngineBuilder::new()
        .module_path("tests/fixtures/scenarios.ron")
        .strict(true)
        .build(RecordingHost::new())
        .unwrap()
}

#[test]
fn knight_sleeps_at_night() {
    let mut engine = scenario_engine();
    engine.time_changed_event(SunEvent::Night);

    assert_eq!(engine.dispatch("knight"), Dispatch::Displayed);

    let shown = engine.host().last_display().unwrap();
    assert_eq!(shown.passage.as_str(), "knight");
    assert_eq!(shown.title, "knight-title");
    assert_eq!(shown.text, "sleeping");
    assert!(shown.choices.is_empty());
}

#[test]
fn knight_silent_by_day_offers_greeting() {
    let mut engine = scenario_engine();
    engine.time_changed_event(SunEvent::SolarNoon);

    engine.dispatch("knight");

    let shown = engine.host().last_display().unwrap();
    assert_eq!(shown.text, "silence");
    assert_eq!(shown.choices, vec!["greet".to_string()]);
}

#[test]
fn pickup_branch_outranks_night() {
    let mut engine = scenario_engine();
    engine.time_changed_event(SunEvent::Nadir);
    engine.store_mut().add_pickup(Pickup::new("map", "document"));

    engine.dispatch("knight");
    assert_eq!(engine.host().last_display().unwrap().text, "map-recognized");
}

#[test]
fn story_flags_change_later_branches() {
    let mut engine = scenario_engine();
    engine.dispatch("knight");
    assert_eq!(engine.host().last_display().unwrap().text, "silence");

    engine.choice_made_event("knight", "greet");
    assert!(engine.store().story_flag("learnedStory"));

    engine.dispatch("knight");
    assert_eq!(engine.host().last_display().unwrap().text, "nod");

    engine.store_mut().set_story_flag("upset", true);
    engine.dispatch("knight");
    assert_eq!(engine.host().last_display().unwrap().text, "cold");
}

#[test]
fn every_dispatch_counts_exactly_once() {
    let mut engine = scenario_engine();
    let conditions = [SunEvent::Night, SunEvent::SolarNoon, SunEvent::Dusk];

    for (i, event) in conditions.iter().enumerate() {
        engine.time_changed_event(*event);
        let before = engine.store().count("knight");
        engine.dispatch("knight");
        assert_eq!(engine.store().count("knight"), before + 1);
        assert_eq!(engine.store().count("knight"), i as u32 + 1);
    }

    // Silent passages count too.
    assert_eq!(engine.dispatch("leave"), Dispatch::Silent);
    assert_eq!(engine.store().count("leave"), 1);
}

#[test]
fn unknown_ids_log_once_and_change_nothing() {
    let mut engine = scenario_engine();
    engine.dispatch("knight");
    let before = format!("{:?}", engine.store());

    for id in ["", "ghost", "passage/knight", "KNIGHT"] {
        engine.host_mut().clear();
        assert_eq!(engine.dispatch(id), Dispatch::NotFound);
        assert!(engine.host().displays().is_empty());
        assert_eq!(engine.host().logs().len(), 1);
        assert_eq!(engine.host().calls.len(), 1);
        assert_eq!(engine.store().count(id), 0);
    }

    assert_eq!(format!("{:?}", engine.store()), before);
}

#[test]
fn exhausted_options_drop_out_in_order() {
    let mut engine = scenario_engine();

    engine.dispatch("innkeeper");
    assert_eq!(
        engine.host().last_display().unwrap().choices,
        vec!["ask-name", "ask-room", "leave"]
    );
    assert!(!engine.store().get_flag("askedName"));

    engine.dispatch("innkeeper");
    assert_eq!(
        engine.host().last_display().unwrap().choices,
        vec!["ask-room", "leave"]
    );
}

#[test]
fn closing_never_dispatches() {
    let mut engine = scenario_engine();
    engine.host_mut().clear();

    let outcome = engine.choice_made_event("innkeeper", "");

    assert_eq!(outcome, ChoiceOutcome::Closed("innkeeper".into()));
    assert!(engine.host().displays().is_empty());
    assert_eq!(engine.store().count("innkeeper"), 0);
    assert_eq!(
        engine.host().calls,
        vec![HostCall::Log("Passage innkeeper closed.".to_string())]
    );
}

#[test]
fn choice_to_missing_passage_degrades_to_log() {
    let mut engine = scenario_engine();
    let outcome = engine.choice_made_event("innkeeper", "order-ale");
    assert_eq!(
        outcome,
        ChoiceOutcome::Dispatched {
            target: "order-ale".into(),
            result: Dispatch::NotFound
        }
    );
    assert_eq!(engine.host().logs().len(), 1);
}

#[test]
fn alias_to_missing_passage_falls_through_to_log() {
    let aliases = DialogueModule::parse_ron(r#"(title: "Inn", aliases: { "ask-ale": "order-ale" })"#)
        .unwrap();
    let mut engine = DialogueEngineBuilder::new()
        .with_module(aliases)
        .module_path("tests/fixtures/scenarios.ron")
        .build(RecordingHost::new())
        .unwrap();
    engine.dispatch("innkeeper");
    let before = format!("{:?}", engine.store());
    engine.host_mut().clear();

    let outcome = engine.choice_made_event("innkeeper", "ask-ale");

    assert_eq!(
        outcome,
        ChoiceOutcome::Dispatched {
            target: "order-ale".into(),
            result: Dispatch::NotFound
        }
    );
    assert_eq!(engine.host().calls.len(), 1);
    assert_eq!(
        engine.host().logs(),
        vec!["No passage found for order-ale, does it have content?"]
    );
    assert_eq!(format!("{:?}", engine.store()), before);
}

#[test]
fn resolve_is_single_hop() {
    let mut resolver = ChoiceResolver::new();
    resolver.insert("1ccc7c51", "e1e1ddc3".into()).unwrap();
    resolver.insert("057a1926", "e1e1ddc3".into()).unwrap();

    for x in ["65e17d6e", "1ccc7c51", "057a1926", "anything"] {
        let once = resolver.resolve(x);
        if !resolver.is_alias(once.as_str()) {
            assert_eq!(resolver.resolve(once.as_str()), once);
        }
    }
}

#[test]
fn markers_stay_set() {
    let mut engine = scenario_engine();
    engine.pickup_event("fruit", true);
    for id in ["knight", "innkeeper", "ghost", "knight"] {
        engine.dispatch(id);
        assert!(engine.store().has_marker("stole-fruit"));
    }
}

#[test]
fn code_evaluators_run_alongside_authored_passages() {
    let mut engine = DialogueEngineBuilder::new()
        .module_path("tests/fixtures/scenarios.ron")
        .with_evaluator("coin", |ctx| {
            let heads = ctx.store.count("coin") % 2 == 1;
            Some(Presentation {
                title: "coin-title".to_string(),
                text: if heads { "heads" } else { "tails" }.to_string(),
                choices: vec![Choice::new("coin")],
                animate: false,
            })
        })
        .build(RecordingHost::new())
        .unwrap();

    engine.dispatch("coin");
    assert_eq!(engine.host().last_display().unwrap().text, "heads");
    engine.choice_made_event("coin", "coin");
    assert_eq!(engine.host().last_display().unwrap().text, "tails");
    assert_eq!(engine.store().count("coin"), 2);
}
