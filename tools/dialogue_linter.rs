/// Dialogue Linter: loads dialogue modules and reports unreachable content.
///
/// Usage: dialogue_linter <module.ron | content_dir> [--quiet]

use dialogue_engine::core::engine::{DialogueEngineBuilder, EngineError};
use dialogue_engine::core::host::RecordingHost;
use dialogue_engine::core::validate::ValidationIssue;
use dialogue_engine::schema::module::DialogueModule;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: dialogue_linter <module.ron | content_dir> [--quiet]");
        process::exit(0);
    }

    let quiet = args[2..].iter().any(|a| a == "--quiet");
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let root = Path::new(&args[1]);
    let mut files = Vec::new();
    if root.is_file() {
        files.push(root.to_path_buf());
    } else if root.is_dir() {
        collect_modules(root, &mut files);
        files.sort();
    } else {
        eprintln!("ERROR: Path '{}' does not exist", root.display());
        process::exit(1);
    }

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for path in &files {
        let module = match DialogueModule::load_from_ron(path) {
            Ok(module) => module,
            Err(e) => {
                println!("ERROR: {}: {}", path.display(), e);
                total_errors += 1;
                continue;
            }
        };

        println!(
            "\n=== {} ({}, {} passages) ===\n",
            path.display(),
            module.title,
            module.passages.len()
        );

        let issues = match DialogueEngineBuilder::new()
            .with_module(module)
            .build(RecordingHost::new())
        {
            Ok(engine) => engine.validate(),
            Err(EngineError::Validation(issues)) => issues,
            Err(EngineError::Module(e)) => {
                println!("ERROR: {}", e);
                total_errors += 1;
                continue;
            }
        };

        let (errors, warnings): (Vec<&ValidationIssue>, Vec<&ValidationIssue>) =
            issues.iter().partition(|i| i.is_error());

        if issues.is_empty() {
            println!("All checks passed!");
        }
        for warning in &warnings {
            println!("WARNING: {}", warning);
        }
        for error in &errors {
            println!("ERROR: {}", error);
        }

        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    println!(
        "\nSummary: {} files, {} errors, {} warnings",
        files.len(),
        total_errors,
        total_warnings
    );

    if total_errors > 0 {
        process::exit(1);
    }
}

fn collect_modules(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_modules(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
    }
}
