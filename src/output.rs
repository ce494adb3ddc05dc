use crate::tally::{Tally, TallyMode};
use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub mode: TallyMode,
    pub authors: Vec<Tally>,
}

pub fn output_json(tallies: &[Tally], mode: TallyMode) -> Result<()> {
    let output = TallyOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        mode,
        authors: tallies.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(tallies: &[Tally]) -> Result<()> {
    for tally in tallies {
        println!("{}", serde_json::to_string(tally)?);
    }
    Ok(())
}

pub fn output_table(tallies: &[Tally], mode: TallyMode, show_email: bool) -> Result<()> {
    if tallies.is_empty() {
        println!("No authors to display");
        return Ok(());
    }

    let header = |label: &'static str| {
        if ranks_by(label, mode) {
            style(label).bold().underlined()
        } else {
            style(label).bold()
        }
    };

    println!(
        "{:<40} {:>8} {:>8} {:>8} {:>6} {:>20}",
        header("Author"),
        header("Commits"),
        header("Added"),
        header("Removed"),
        header("Files"),
        header("Last edit"),
    );
    println!("{}", "─".repeat(95));

    for tally in tallies {
        let author = if show_email {
            format!("{} <{}>", tally.author_name, tally.author_email)
        } else {
            tally.author_name.clone()
        };
        let last_edit = tally
            .last_commit_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<40} {:>8} {:>8} {:>8} {:>6} {:>20}",
            truncate(&author, 40),
            tally.commits,
            style(format!("+{}", tally.lines_added)).green(),
            style(format!("-{}", tally.lines_removed)).red(),
            tally.file_count,
            last_edit,
        );
    }

    if mode == TallyMode::Lines {
        let total = tallies
            .iter()
            .map(Tally::lines_changed)
            .fold(0u64, u64::saturating_add);
        println!("\n{} lines changed", style(total).bold());
    }

    Ok(())
}

/// Whether the table column labelled `label` holds the metric `mode` sorts by.
fn ranks_by(label: &str, mode: TallyMode) -> bool {
    match label {
        "Commits" => mode == TallyMode::Commits,
        "Added" | "Removed" => mode == TallyMode::Lines,
        "Files" => mode == TallyMode::Files,
        "Last edit" => mode == TallyMode::LastModified,
        _ => false,
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
