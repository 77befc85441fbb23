//! `wargame explain`: rule selection and modifier provenance.

use anyhow::Result;
use clap::Parser;
use console::style;
use serde::Serialize;
use wargame_core::eval::{AppliedRule, Diagnostic, DisplayableChoice, Reminder, SkippedRule};
use wargame_core::modifiers::ModifierLine;
use wargame_core::{EngagementSelection, Selection, Side};

use super::ScenarioArgs;
use crate::output::{OutputFormat, heading, print_json};

/// Show applicable rules without rolling any dice
#[derive(Parser)]
pub struct Explain {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct SideReport<'a> {
    applied: &'a [AppliedRule],
    choices: &'a [DisplayableChoice],
    reminders: &'a [Reminder],
    skipped: &'a [SkippedRule],
    diagnostics: &'a [Diagnostic],
    modifiers: Vec<ModifierLine>,
}

impl<'a> From<&'a Selection> for SideReport<'a> {
    fn from(selection: &'a Selection) -> Self {
        Self {
            applied: &selection.applied,
            choices: &selection.displayable_choices,
            reminders: &selection.reminders,
            skipped: &selection.skipped,
            diagnostics: &selection.diagnostics,
            modifiers: selection.modifiers.explain(),
        }
    }
}

#[derive(Serialize)]
struct ExplainReport<'a> {
    attacker: SideReport<'a>,
    defender: SideReport<'a>,
}

impl Explain {
    pub fn execute(self) -> Result<()> {
        let (loaded, _) = self.scenario.load()?;
        let engagement = loaded.engagement_with(self.scenario.options(&loaded))?;
        let selection = engagement.select();

        match self.format {
            OutputFormat::Json => print_json(&ExplainReport {
                attacker: SideReport::from(&selection.attacker),
                defender: SideReport::from(&selection.defender),
            }),
            OutputFormat::Text => {
                heading(&format!(
                    "{} ({}, {})",
                    loaded.scenario.name, engagement.phase, engagement.turn
                ));
                print_side(&selection, Side::Attacker, &engagement.attacker.name);
                print_side(&selection, Side::Defender, &engagement.defender.name);
                Ok(())
            }
        }
    }
}

fn print_side(selection: &EngagementSelection, side: Side, unit: &str) {
    let selection = selection.selection(side);
    println!();
    println!("{} {}", style(format!("{side:?}")).bold(), unit);

    for applied in &selection.applied {
        match &applied.option {
            Some(option) => println!("  {} {} [{}]", style("✓").green(), applied.name, option),
            None => println!("  {} {}", style("✓").green(), applied.name),
        }
    }
    for choice in &selection.displayable_choices {
        if choice.selected.is_none() {
            println!(
                "  {} {} awaiting choice: {}",
                style("?").yellow(),
                choice.name,
                choice.options.join(" | ")
            );
        }
    }
    for skipped in &selection.skipped {
        println!("  {} {} ({:?})", style("·").dim(), skipped.id, skipped.reason);
    }
    for reminder in &selection.reminders {
        println!("  {} {}: {}", style("!").cyan(), reminder.name, reminder.text);
    }
    for diagnostic in &selection.diagnostics {
        println!(
            "  {} {}: {:?}",
            style("✗").red(),
            diagnostic.rule,
            diagnostic.kind
        );
    }

    let lines = selection.modifiers.explain();
    if !lines.is_empty() {
        println!("  modifiers:");
    }
    for line in lines {
        let sources: Vec<String> = line
            .entries
            .iter()
            .map(|e| format!("{:+} {}", e.value, e.source))
            .collect();
        println!("    {:<28} {:>3}  ← {}", line.key, line.value, sources.join(", "));
    }
}
