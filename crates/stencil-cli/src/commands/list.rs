//! Implementation of the `stencil list` command.

use stencil_adapters::BlueprintLoader;
use stencil_core::domain::{Blueprint, TemplateRootSpec};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = config.templates_dir(args.templates);
    let blueprint = BlueprintLoader::new(&templates).load()?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Template library: {}", templates.display()))?;
            for line in describe(&blueprint) {
                output.print(&line)?;
            }
        }
        ListFormat::Json => {
            // Straight to stdout: JSON must stay parseable when piped.
            let json = serde_json::to_string_pretty(&blueprint).map_err(|e| {
                CliError::InvalidInput {
                    message: format!("failed to serialise blueprint: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Human-readable summary of modules and roots.
fn describe(blueprint: &Blueprint) -> Vec<String> {
    let mut lines = vec!["Modules:".to_string()];
    for module in &blueprint.modules {
        match &module.description {
            Some(description) => lines.push(format!("  {:<10} {description}", module.name)),
            None => lines.push(format!("  {}", module.name)),
        }
    }

    lines.push(String::new());
    lines.push("Template roots:".to_string());
    for root in &blueprint.roots {
        lines.push(format!(
            "  {:<10} {} -> {}{}",
            root.name,
            root.source.display(),
            root.destination.display(),
            condition(root)
        ));
    }
    lines
}

fn condition(root: &TemplateRootSpec) -> String {
    let mut parts = Vec::new();
    if let Some(module) = &root.module {
        parts.push(format!("module {module}"));
    }
    if let Some(variant) = &root.variant {
        parts.push(format!("variant {} when {}", variant.tag, variant.when));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("  ({})", parts.join(", "))
    }
}
