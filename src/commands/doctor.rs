use anyhow::Result;
use colored::Colorize;
use samplegen::config::GeneratorConfig;
use samplegen::preflight::{self, PreflightReport};
use std::path::Path;

/// Print tool availability; returns whether a generation run could start
pub fn execute(config: Option<&Path>, json_output: bool) -> Result<bool> {
    let config = GeneratorConfig::load(config)?;
    let report = preflight::check_tools(&config);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report, &config);
    }

    Ok(report.is_ready())
}

fn display_report(report: &PreflightReport, config: &GeneratorConfig) {
    println!("Sample directory: {}", config.sample_dir().display());
    println!("\nTools:");
    for tool in &report.tools {
        match &tool.path {
            Some(path) => println!("  {} {:<12} {}", "✓".green(), tool.role, path.display()),
            None => println!("  {} {:<12} {} (not found)", "✗".red(), tool.role, tool.requested),
        }
    }

    if report.is_ready() {
        println!("\n{}", "Ready to generate".green());
    } else {
        println!("\n{}", "Missing tools, generation will fail".yellow());
    }
}
