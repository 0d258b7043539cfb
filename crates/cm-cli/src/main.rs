//! Crop model unit editor CLI
//!
//! Command-line tool for inspecting unit model packages and replaying edit
//! scripts through the validation engine.

use clap::{ArgAction, Parser, Subcommand};
use cm_core::{
    load_package, parameter_map, parameter_set_map, replay, scan_models, Column, EditScript,
    EditSession, LoadedModel, SessionConfig, Step, StepResult, TableKind,
};
use log::{LevelFilter, Log, Metadata, Record};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cm-cli")]
#[command(about = "Crop model unit table editor", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directories for unit model packages
    Scan {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },

    /// Show the tables of a model
    Show {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Model name
        #[arg(short, long)]
        model: String,

        /// Only this table (inputs, outputs, algorithms, functions)
        #[arg(short, long)]
        table: Option<TableKind>,
    },

    /// Replay an edit script against a model and report each step
    Replay {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Model name
        #[arg(short, long)]
        model: String,

        /// Path to the edit script (JSON)
        #[arg(short, long)]
        script: PathBuf,

        /// Session config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parameter map and parameter-set maps of a model
    Params {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Model name
        #[arg(short, long)]
        model: String,
    },

    /// Create an edit script template
    CreateScript {
        /// Model name for the script
        #[arg(short, long)]
        model: String,

        /// Output path for the script file
        #[arg(short, long)]
        output: PathBuf,

        /// Example edits to include (table:row:column:value)
        #[arg(short, long)]
        example: Vec<String>,
    },
}

/// Writes log records to stderr
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> cm_core::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan { root } => cmd_scan(&root),
        Commands::Show { root, model, table } => cmd_show(&root, &model, table),
        Commands::Replay {
            root,
            model,
            script,
            config,
            json,
        } => cmd_replay(&root, &model, &script, config.as_deref(), json),
        Commands::Params { root, model } => cmd_params(&root, &model),
        Commands::CreateScript {
            model,
            output,
            example,
        } => cmd_create_script(&model, &output, &example),
    }
}

fn load_model(roots: &[PathBuf], name: &str) -> cm_core::Result<LoadedModel> {
    let scan_result = scan_models(roots)?;
    let package = scan_result.require_model(name)?;
    log::info!("loading '{}' ({} files)", package.name, package.file_count());
    load_package(package)
}

fn cmd_scan(roots: &[PathBuf]) -> cm_core::Result<()> {
    let result = scan_models(roots)?;

    println!("Scanned {} root(s):", result.roots.len());
    for root in &result.roots {
        println!("  {}", root.display());
    }
    println!();
    println!("Found {} files in {} models", result.total_files, result.models.len());

    for model in &result.models {
        let status = if model.is_complete() { "" } else { " [incomplete]" };
        println!("  {} ({} files){}", model.name, model.file_count(), status);
    }

    Ok(())
}

fn cmd_show(roots: &[PathBuf], name: &str, only: Option<TableKind>) -> cm_core::Result<()> {
    let model = load_model(roots, name)?;

    if only.is_none() {
        let header = &model.header;
        println!("Model: {}", model.name);
        for (label, value) in [
            ("Title", &header.title),
            ("Authors", &header.authors),
            ("Institution", &header.institution),
            ("Reference", &header.reference),
            ("Abstract", &header.r#abstract),
        ] {
            if !value.is_empty() {
                println!("  {}: {}", label, value);
            }
        }
        println!();
    }

    let tables = [
        TableKind::Inputs,
        TableKind::Outputs,
        TableKind::Algorithms,
        TableKind::Functions,
    ];
    for table in tables.into_iter().filter(|t| only.map_or(true, |o| o == *t)) {
        let columns = table.columns();
        let count = model.tables.row_count(table);
        println!("{} ({} rows)", table, count);

        let header: Vec<&str> = columns.iter().map(Column::as_str).collect();
        println!("{}", header.join("\t"));
        println!("{}", "-".repeat(header.len() * 12));

        for row in 0..count {
            let values = columns
                .iter()
                .map(|&column| model.tables.cell(table, row, column))
                .collect::<cm_core::Result<Vec<String>>>()?;
            println!("{}", values.join("\t"));
        }
        println!();
    }

    Ok(())
}

fn cmd_replay(
    roots: &[PathBuf],
    name: &str,
    script_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> cm_core::Result<()> {
    let script = EditScript::load(script_path)?;
    if script.model != name {
        log::warn!(
            "script was recorded for '{}', replaying against '{}'",
            script.model,
            name
        );
    }

    let config = match config_path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let model = load_model(roots, name)?;
    let mut session = EditSession::new(model.tables, config);
    let report = replay(&mut session, &script);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Replayed {} steps on '{}'", report.steps.len(), name);
    for (i, entry) in report.steps.iter().enumerate() {
        let label = match &entry.step {
            Step::Edit {
                table,
                row,
                column,
                value,
            } => format!("{table}[{row}].{column} = {value:?}"),
            Step::Append { table } => format!("append {table}"),
        };
        match &entry.result {
            StepResult::Edited(outcome) => {
                let status = if outcome.accepted { "ok" } else { "rejected" };
                println!("  {}. {} -> {}", i + 1, label, status);
                for write in &outcome.writes {
                    println!("       {} := {:?}", write.column, write.value);
                }
                if let Some(message) = &outcome.message {
                    println!("       {}", message.display_message());
                }
            }
            StepResult::Appended { row, .. } => println!("  {}. {} -> row {}", i + 1, label, row),
            StepResult::Failed { error } => println!("  {}. {} -> failed: {}", i + 1, label, error),
        }
    }

    println!();
    println!("  {} accepted", report.accepted());
    println!("  {} rejected", report.rejected());
    println!("  {} failed", report.failed());

    Ok(())
}

fn cmd_params(roots: &[PathBuf], name: &str) -> cm_core::Result<()> {
    let model = load_model(roots, name)?;
    let inputs = &model.tables.inputs;

    let sets: serde_json::Map<String, serde_json::Value> =
        parameter_set_map(inputs, &model.parameter_sets)
            .into_iter()
            .map(|(set, (values, description))| {
                (
                    set,
                    serde_json::json!({ "description": description, "params": values }),
                )
            })
            .collect();

    let output = serde_json::json!({
        "model": model.name,
        "parameters": parameter_map(inputs),
        "parameter_sets": sets,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn cmd_create_script(model: &str, output: &Path, examples: &[String]) -> cm_core::Result<()> {
    let mut script = EditScript::new(model);

    // Parse example edits: "table:row:column:value"
    for example in examples {
        match parse_example(example) {
            Ok(step) => script.add_step(step),
            Err(reason) => eprintln!("Warning: Invalid example '{}': {}", example, reason),
        }
    }

    // If no examples provided, add a placeholder
    if script.steps.is_empty() {
        script.add_step(Step::Append {
            table: TableKind::Inputs,
        });
        script.add_step(Step::edit(TableKind::Inputs, 0, Column::Name, "NewInput"));
    }

    script.save(output)?;
    println!("Created script file: {}", output.display());
    println!("Model: {}", model);
    println!("Steps: {}", script.steps.len());
    println!();
    println!("Edit the file to add your changes, then run:");
    println!(
        "  cm-cli replay --root <path> --model {} --script {}",
        model,
        output.display()
    );

    Ok(())
}

fn parse_example(example: &str) -> Result<Step, String> {
    let parts: Vec<&str> = example.splitn(4, ':').collect();
    let [table, row, column, value] = parts[..] else {
        return Err("expected 'table:row:column:value'".to_string());
    };

    let table: TableKind = table.parse()?;
    let row: usize = row.parse().map_err(|_| format!("invalid row '{}'", row))?;
    let column: Column = column.parse().map_err(|e: cm_core::Error| e.to_string())?;
    Ok(Step::edit(table, row, column, value))
}
