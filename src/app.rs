//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler,
//! reads and orders the change list, runs the engine (or the dry-run plan),
//! and writes the changelog/revert scripts.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use tracing::{debug, error, info, warn};

use filesense_applier::cli::Args;
use filesense_applier::config::{CONFIG_ENV, load_config};
use filesense_applier::ops::{self, BatchCollision, Operation};
use filesense_applier::output as out;
use filesense_applier::{
    ApplierError, ApplyReport, Config, DecisionProvider, Engine, FsMover, Halt, PolicyDecider,
    PromptDecider, Shell, default_config_path, load_records, shutdown, write_scripts,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // File config first, CLI wins.
    let mut cfg = load_config()?.unwrap_or_default();
    args.apply_overrides(&mut cfg);

    // Held until `run` returns so an interrupted run still logs its halt and
    // script paths to the file.
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;

    ctrlc::set_handler(|| {
        shutdown::request();
        out::print_warn(
            "Received interrupt; stopping after the current operation (press Enter if a prompt is waiting)...",
        );
    })
    .context("install signal handler")?;

    debug!("Starting filesense-applier: {:?}", args);

    execute(&cfg, &args)
}

fn print_config_location() {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {explicit}\n"));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn execute(cfg: &Config, args: &Args) -> Result<()> {
    cfg.validate()?;

    let changes = args
        .resolved_changes()
        .context("missing path to the change list")?;
    let records = load_records(&changes).inspect_err(log_applier_error)?;

    let operations = ops::prepare(records);
    print_plan(&changes, &operations, cfg.dry_run);
    report_collisions(&operations);

    let report = if cfg.dry_run {
        ops::plan(operations)
    } else {
        out::print_user("\nApplying changes...");
        let decider: Box<dyn DecisionProvider> = if cfg.non_interactive {
            Box::new(PolicyDecider::new(cfg.on_conflict, cfg.on_failure, cfg.retries))
        } else {
            Box::new(PromptDecider::stdio())
        };
        Engine::new(FsMover, decider).apply(operations)
    };

    finish(cfg, report)
}

fn print_plan(changes: &Path, operations: &[Operation], dry_run: bool) {
    out::print_user(&format!(
        "Successfully parsed {} operations from {}.",
        operations.len(),
        changes.display()
    ));
    if dry_run {
        out::print_user("Running in dry-run mode. No changes will be made.");
    }
    out::print_user("Planned operations:");
    for op in operations {
        out::print_user(&format!(
            "  - Rename {} to {}",
            op.source().display(),
            op.destination().display()
        ));
    }
}

fn report_collisions(operations: &[Operation]) {
    for c in ops::find_batch_collisions(operations) {
        let msg = match &c {
            BatchCollision::DestinationIsPendingSource { op, pending, path } => format!(
                "'{}' targets '{}', which is only moved away later (operation {} of {}); expect a conflict",
                operations[*op].source().display(),
                path.display(),
                pending + 1,
                operations.len()
            ),
            BatchCollision::SharedDestination { first, second, path } => format!(
                "'{}' and '{}' both target '{}'; the second will conflict",
                operations[*first].source().display(),
                operations[*second].source().display(),
                path.display()
            ),
        };
        warn!(collision = ?c, "batch collision");
        out::print_warn(&msg);
    }
}

/// Summarize, write scripts, and map the halt reason to the exit status.
fn finish(cfg: &Config, report: ApplyReport) -> Result<()> {
    match &report.halt {
        None => out::print_user("Changes applied successfully."),
        Some(Halt::Aborted) => out::print_warn("Aborted by operator; remaining operations were not attempted."),
        Some(Halt::Interrupted) => out::print_warn("Interrupted; remaining operations were not attempted."),
        Some(Halt::DecisionFailed(e)) => out::print_error(&format!("Stopped: {e}")),
    }
    out::print_summary(
        report.applied_count(),
        report.skipped_count(),
        report.not_attempted_count(),
    );

    let applied: Vec<_> = report.applied().collect();
    let scripts = write_scripts(&cfg.script_dir, &applied, Shell::host(), &Local::now())
        .inspect_err(log_applier_error)?;
    out::print_user(&format!("Generated changelog script: {}", scripts.changelog.display()));
    out::print_user(&format!("Generated revert script: {}", scripts.revert.display()));
    info!(
        changelog = %scripts.changelog.display(),
        revert = %scripts.revert.display(),
        applied = applied.len(),
        "scripts written"
    );

    match report.halt {
        Some(Halt::DecisionFailed(e)) => {
            log_applier_error(&e);
            Err(e.into())
        }
        Some(Halt::Interrupted) => Err(ApplierError::Interrupted.into()),
        Some(Halt::Aborted) | None => Ok(()),
    }
}

fn log_applier_error(e: &ApplierError) {
    let code = e.code();
    match e {
        ApplierError::RecordsUnreadable { path, .. } => {
            error!(code, kind = "records_unreadable", path = %path.display(), error = %e, "Cannot read change list")
        }
        ApplierError::RecordsMalformed { path, .. } => {
            error!(code, kind = "records_malformed", path = %path.display(), error = %e, "Malformed change list")
        }
        ApplierError::EmptyRecordField { index, field } => {
            error!(code, kind = "empty_field", index, field, "Invalid change record")
        }
        ApplierError::ScriptWrite { label, path, .. } => {
            error!(code, kind = "script_write", label, path = %path.display(), error = %e, "Script write failed")
        }
        ApplierError::PromptClosed | ApplierError::PromptIo(_) => {
            error!(code, kind = "decision_input", error = %e, "Decision input unavailable")
        }
        ApplierError::Interrupted => error!(code, kind = "interrupted", "Run interrupted"),
    }
}
