//! Shared output formatting utilities for CLI commands
//!
//! Supports JSON, YAML, and a fixed-width table for API definition lists.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::Definition;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!(
                "Unsupported output format: '{}'. Use 'json', 'yaml', or 'table'.",
                s
            ),
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(data).context("Failed to serialize to YAML")?;
    println!("{}", yaml);
    Ok(())
}

/// Print a list of definitions in the requested format
pub fn print_definitions(definitions: &[Definition], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&definitions),
        OutputFormat::Yaml => print_yaml(&definitions),
        OutputFormat::Table => {
            print!("{}", render_definition_table(definitions));
            Ok(())
        }
    }
}

/// Render definitions as a fixed-width table
pub fn render_definition_table(definitions: &[Definition]) -> String {
    if definitions.is_empty() {
        return "No API definitions found\n".to_string();
    }

    let mut out = format!(
        "{:<24} {:<20} {:<24} {:<16} {:<6}\n",
        "API ID", "Name", "Listen Path", "Slug", "Active"
    );
    out.push_str(&"-".repeat(94));
    out.push('\n');

    for def in definitions {
        out.push_str(&format!(
            "{:<24} {:<20} {:<24} {:<16} {:<6}\n",
            truncate(&def.api_id, 24),
            truncate(&def.name, 20),
            truncate(def.listen_path(), 24),
            truncate(def.slug().unwrap_or("-"), 16),
            def.active
        ));
    }

    out
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
