use anyhow::{Context, Result};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::Config;
use crate::emit::JsonReport;
use crate::engine::{Engine, EngineResult, ProcessOptions};
use crate::generate::PatchOutcome;

static ANALYZING: Emoji<'_, '_> = Emoji("🔎 ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "");
static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");

pub fn run_generate(
    module: &Path,
    dry_run: bool,
    json: bool,
    config_path: Option<&Path>,
    include_sdk: bool,
) -> Result<()> {
    let options = ProcessOptions {
        dry_run,
        include_sdk,
    };
    let result = process(module, config_path, &options, json)?;

    if json {
        println!("{}", JsonReport::from_result(&result).to_json());
        return Ok(());
    }

    print_summary(&result);
    if result.is_empty() {
        println!("\n{}Nothing to generate.", INFO);
        return Ok(());
    }

    if dry_run {
        println!("\n{}Dry run, nothing written.", INFO);
    } else {
        println!(
            "\n{}Generated {} stub packages in {}",
            SUCCESS,
            style(result.written.len()).green(),
            style(result.project_root.display()).cyan()
        );
        match &result.patch {
            Some(PatchOutcome::Patched { added, kept, .. }) => {
                println!("  Manifest entries added: {}", style(added.len()).green());
                if !kept.is_empty() {
                    println!(
                        "  Already present:        {} ({})",
                        style(kept.len()).dim(),
                        kept.join(", ")
                    );
                }
            }
            Some(PatchOutcome::Missing { path }) => {
                println!(
                    "{}No manifest at {}, dependencies not registered",
                    WARNING,
                    path.display()
                );
            }
            None => {}
        }
    }

    Ok(())
}

pub fn run_scan(module: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    let options = ProcessOptions {
        dry_run: true,
        include_sdk: false,
    };
    let result = process(module, config_path, &options, json)?;

    if json {
        println!("{}", JsonReport::from_result(&result).to_json());
        return Ok(());
    }

    print_summary(&result);
    for dep in result.dependencies.values() {
        println!("\n{}{}", PACKAGE, style(&dep.module_path).bold());
        for node in dep.top_level_types() {
            println!("  {} {}", style(node.kind).dim(), node.name);
        }
        for node in dep.types.iter().filter(|t| !t.is_top_level()) {
            println!("  {} {}", style(node.kind).dim(), node.qualified_path());
        }
        for method in &dep.methods {
            println!("  {}.{}", style(&method.owning_interface_name).cyan(), method.signature());
        }
    }

    Ok(())
}

fn process(
    module: &Path,
    config_path: Option<&Path>,
    options: &ProcessOptions,
    quiet: bool,
) -> Result<EngineResult> {
    let config = Config::resolve(config_path, module).context("Failed to load configuration")?;
    let engine = Engine::new(config);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("{}Analyzing {}...", ANALYZING, module.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = engine
        .process(module, options)
        .with_context(|| format!("Failed to process module {}", module.display()));
    pb.finish_and_clear();

    result
}

fn print_summary(result: &EngineResult) {
    println!("{}Module: {}", INFO, style(result.module_path.display()).cyan());
    println!("  Files scanned:   {}", style(result.files_scanned).green());
    println!("  Dependencies:    {}", style(result.dependencies.len()).green());
    for dep in result.dependencies.values() {
        println!(
            "    - {} ({} imports, {} types, {} methods)",
            dep.module_path,
            dep.imports.len(),
            dep.types.len(),
            dep.methods.len()
        );
    }
    if !result.skipped_sdk.is_empty() {
        println!(
            "  SDK modules:     {} (skipped)",
            style(result.skipped_sdk.join(", ")).dim()
        );
    }

    if !result.warnings.is_empty() {
        println!("\n{}Unreadable files ({}):", WARNING, result.warnings.len());
        for warning in result.warnings.iter().take(10) {
            println!("  - {}: {}", warning.path, style(&warning.message).red());
        }
        if result.warnings.len() > 10 {
            println!("  ... and {} more", result.warnings.len() - 10);
        }
    }
}
