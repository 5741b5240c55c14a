/// Oasis walkthrough: plays the oasis level from noon to the bottom of the well.
///
/// A mini day: steal a fruit → the knight turns cold → nightfall at the fire
/// → visions → the well calls.
///
/// Run with: cargo run --example oasis_walkthrough

use dialogue_engine::core::dispatcher::ChoiceOutcome;
use dialogue_engine::core::engine::{DialogueEngine, DialogueEngineBuilder};
use dialogue_engine::core::host::{Affordance, HostPort};
use dialogue_engine::schema::passage::PassageId;
use dialogue_engine::schema::time::SunEvent;
use std::collections::BTreeMap;

/// Narrates host calls the way a level's UI would show them.
#[derive(Default)]
struct StoryHost {
    last_choices: Vec<String>,
}

impl HostPort for StoryHost {
    fn display(
        &mut self,
        passage: &PassageId,
        title: &str,
        text: &str,
        choices: &[String],
        params: &BTreeMap<String, String>,
        _animate: bool,
    ) {
        let mut line = text.to_string();
        for (key, value) in params {
            line = line.replace(&format!("${}", key), value);
        }
        println!("  [{} / {}] {}", title, passage, line);
        for choice in choices {
            println!("      > {}", choice);
        }
        self.last_choices = choices.to_vec();
    }

    fn set_interact_affordances(&mut self, affordances: &[Affordance]) {
        match affordances.first() {
            Some(a) => println!("  ({} prompt: {})", a.label, a.slug),
            None => println!("  (prompt hidden)"),
        }
    }

    fn exit(&mut self, exit_name: &str, _immediate: bool) {
        println!("  ** leaving the oasis via '{}' **", exit_name);
    }

    fn record_marker(&mut self, token: &str) {
        println!("  (the world remembers: {})", token);
    }

    fn log(&mut self, message: &str) {
        eprintln!("  log: {}", message);
    }
}

fn talk(engine: &mut DialogueEngine<StoryHost>, sensor: &str, target: &str) {
    engine.sensor_event("player", sensor, true);
    engine.button_press_event(&format!("passage/{}", target), true);
}

fn walk_away(engine: &mut DialogueEngine<StoryHost>, sensor: &str) {
    engine.sensor_event("player", sensor, false);
}

fn main() {
    let mut engine = DialogueEngineBuilder::new()
        .module_path("content/oasis.ron")
        .strict(true)
        .build(StoryHost::default())
        .expect("Failed to build the oasis dialogue");

    println!("=== {} ===\n", engine.title());

    println!("-- Noon. The player meets the knight. --");
    talk(&mut engine, "knight", "knight");
    engine.choice_made_event("knight", "greet");
    engine.choice_made_event("greet", "ask-quest");
    engine.choice_made_event("ask-quest", "ask-more");
    engine.choice_made_event("greet", "farewell");
    walk_away(&mut engine, "knight");

    println!("\n-- A fruit goes missing from Nazar's stall. --");
    engine.pickup_event("fruit", true);
    talk(&mut engine, "nazar", "nazar");
    engine.choice_made_event("nazar", "nazar-apologise");
    walk_away(&mut engine, "nazar");

    println!("\n-- The knight has heard. --");
    talk(&mut engine, "knight", "knight");
    engine.choice_made_event("knight", "");
    talk(&mut engine, "knight", "knight");
    walk_away(&mut engine, "knight");

    println!("\n-- Dusk. The fire is lit. --");
    engine.time_changed_event(SunEvent::Dusk);
    talk(&mut engine, "flame", "fire");
    engine.choice_made_event("fire", "fire-stare");
    walk_away(&mut engine, "flame");

    println!("\n-- The well, three times. --");
    for _ in 0..3 {
        talk(&mut engine, "well", "well");
        walk_away(&mut engine, "well");
    }

    if engine.host().last_choices.iter().any(|c| c == "dive") {
        if let ChoiceOutcome::Dispatched { result, .. } =
            engine.choice_made_event("well", "dive")
        {
            println!("  (dive: {:?})", result);
        }
    }

    println!("\n-- Session summary --");
    for passage in ["knight", "greet", "nazar", "fire", "well", "dive"] {
        println!("  {:<8} visited {} time(s)", passage, engine.store().count(passage));
    }
}
