/// Playtest: interactive shell that plays a dialogue module the way a level would.
///
/// Usage: playtest <module.ron> [<module.ron> ...] [--strict]
///
/// Commands:
///   enter <sensor> / leave <sensor>  player crosses a sensor
///   press [slug]                     press the interact button
///   choose <n>                       pick the n-th displayed choice
///   close                            close the open passage
///   open <passage>                   dispatch a passage directly
///   pickup <slug>                    take a pickup
///   time <sunEvent>                  advance the clock
///   name <playerName>                set the player name scalar
///   state                            print the narrative state as RON
///   reset                            start the session over
///   help                             list commands
///   quit                             exit

use dialogue_engine::core::dispatcher::ChoiceOutcome;
use dialogue_engine::core::engine::{DialogueEngine, DialogueEngineBuilder};
use dialogue_engine::core::host::{Affordance, HostPort};
use dialogue_engine::schema::passage::PassageId;
use dialogue_engine::schema::time::SunEvent;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

/// Prints every host call and remembers what is on screen.
#[derive(Default)]
struct ConsoleHost {
    open: Option<(PassageId, Vec<String>)>,
    affordances: Vec<Affordance>,
}

impl HostPort for ConsoleHost {
    fn display(
        &mut self,
        passage: &PassageId,
        title: &str,
        text: &str,
        choices: &[String],
        params: &BTreeMap<String, String>,
        animate: bool,
    ) {
        println!("\n--- {} [{}]{} ---", title, passage, if animate { "" } else { " (still)" });
        println!("{}", text);
        if !params.is_empty() {
            let rendered: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            println!("  params: {}", rendered.join(", "));
        }
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}. {}", i + 1, choice);
        }
        println!("--- End ---\n");
        self.open = Some((passage.clone(), choices.to_vec()));
    }

    fn set_interact_affordances(&mut self, affordances: &[Affordance]) {
        if affordances.is_empty() {
            println!("[interact hidden]");
        }
        for a in affordances {
            println!("[{}: {}]", a.label, a.slug);
        }
        self.affordances = affordances.to_vec();
    }

    fn exit(&mut self, exit_name: &str, immediate: bool) {
        println!(
            ">> exit '{}'{}",
            exit_name,
            if immediate { " (immediate)" } else { "" }
        );
    }

    fn record_marker(&mut self, token: &str) {
        println!(">> marker '{}'", token);
    }

    fn log(&mut self, message: &str) {
        println!("LOG: {}", message);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let mut builder = DialogueEngineBuilder::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "--strict" => builder = builder.strict(true),
            path if path.starts_with("--") => {
                eprintln!("Unknown argument: {}", path);
                print_usage();
                std::process::exit(1);
            }
            path => builder = builder.module_path(path),
        }
    }

    let mut engine = match builder.build(ConsoleHost::default()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded '{}' with {} passages",
        engine.title(),
        engine.registry().len()
    );
    let mut sensors: Vec<&str> = engine.stages().bindings().map(|(s, _)| s).collect();
    sensors.sort_unstable();
    println!("Staged sensors: {}", sensors.join(", "));
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("playtest> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts.get(1).copied();

        match (cmd.as_str(), arg) {
            ("quit" | "exit" | "q", _) => {
                println!("Goodbye.");
                break;
            }
            ("help" | "h" | "?", _) => print_help(),
            ("enter", Some(sensor)) => engine.sensor_event("player", sensor, true),
            ("leave", Some(sensor)) => engine.sensor_event("player", sensor, false),
            ("press", slug) => press(&mut engine, slug),
            ("choose", Some(n)) => choose(&mut engine, n),
            ("close", _) => match engine.host_mut().open.take() {
                Some((passage, _)) => {
                    engine.choice_made_event(passage.as_str(), "");
                }
                None => println!("Nothing is open."),
            },
            ("open", Some(passage)) => {
                let result = engine.dispatch(passage);
                println!("({:?})", result);
            }
            ("pickup", Some(slug)) => engine.pickup_event(slug, true),
            ("time", Some(name)) => match SunEvent::from_name(name) {
                Some(event) => {
                    engine.time_changed_event(event);
                    println!(
                        "Time is now {}{}",
                        event.name(),
                        if event.is_night() { " (night)" } else { "" }
                    );
                }
                None => {
                    let names: Vec<&str> = SunEvent::ALL.iter().map(|e| e.name()).collect();
                    println!("Unknown sun event '{}'. One of: {}", name, names.join(", "));
                }
            },
            ("name", Some(name)) => {
                engine.store_mut().set_scalar("playerName", name);
                println!("playerName = {}", name);
            }
            ("state", _) => {
                match ron::ser::to_string_pretty(engine.store(), ron::ser::PrettyConfig::default()) {
                    Ok(text) => println!("{}", text),
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            ("reset", _) => {
                engine.reset();
                engine.host_mut().open = None;
                println!("Session reset.");
            }
            _ => println!("Unknown or incomplete command '{}'. Type 'help'.", line),
        }
    }
}

fn press(engine: &mut DialogueEngine<ConsoleHost>, slug: Option<&str>) {
    let slug = match slug {
        Some(slug) => slug.to_string(),
        None => match engine.host().affordances.last() {
            Some(a) => a.slug.clone(),
            None => {
                println!("Nothing to interact with here.");
                return;
            }
        },
    };
    engine.button_press_event(&slug, true);
    engine.button_press_event(&slug, false);
}

fn choose(engine: &mut DialogueEngine<ConsoleHost>, n: &str) {
    let Some((passage, choices)) = engine.host_mut().open.take() else {
        println!("Nothing is open.");
        return;
    };
    let picked = n
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| choices.get(i));
    match picked {
        Some(choice) => {
            if let ChoiceOutcome::Dispatched { target, result } =
                engine.choice_made_event(passage.as_str(), choice)
            {
                println!("({} -> {:?})", target, result);
            }
        }
        None => {
            println!("Choose 1-{}", choices.len());
            engine.host_mut().open = Some((passage, choices));
        }
    }
}

fn print_usage() {
    println!("Playtest: interactive shell for dialogue modules.");
    println!();
    println!("Usage: playtest <module.ron> [<module.ron> ...] [--strict]");
    println!();
    println!("  --strict  Refuse to start when validation finds errors");
}

fn print_help() {
    println!("Commands:");
    println!("  enter <sensor>    Player enters a sensor");
    println!("  leave <sensor>    Player leaves a sensor");
    println!("  press [slug]      Press the interact button (defaults to the shown one)");
    println!("  choose <n>        Pick the n-th choice of the open passage");
    println!("  close             Close the open passage");
    println!("  open <passage>    Dispatch a passage directly");
    println!("  pickup <slug>     Take a pickup");
    println!("  time <sunEvent>   Set the time of day (e.g. dusk, solarNoon)");
    println!("  name <name>       Set the player name");
    println!("  state             Print the narrative state");
    println!("  reset             Start the session over");
    println!("  help              Show this help");
    println!("  quit              Exit");
}
