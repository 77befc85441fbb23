//! Text rendering shared by the commands.

use console::style;
use serde::Serialize;
use wargame_core::{CombatResult, DieRoll, StepRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Full JSON output
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn heading(text: &str) {
    println!("{}", style(text).bold().cyan());
}

fn die(roll: &DieRoll) -> String {
    let face = match roll.rerolled {
        Some(after) => format!("{}→{}", roll.initial, after),
        None => roll.initial.to_string(),
    };
    if roll.is_critical() {
        style(face).green().bold().to_string()
    } else if roll.succeeded() {
        style(face).green().to_string()
    } else {
        style(face).dim().to_string()
    }
}

fn step_line(record: &StepRecord) -> String {
    let mut line = format!("{:<13}", record.step.to_string());
    if let Some(threshold) = record.threshold {
        line.push_str(&format!(" {threshold}+"));
    }
    if record.modifier != 0 {
        line.push_str(&format!(" ({:+})", record.modifier));
    }
    if let Some(reroll) = record.reroll {
        line.push_str(&format!(" reroll {reroll}"));
    }
    line.push_str(&format!(
        "  {} ok / {} crit",
        record.successes, record.criticals
    ));
    line
}

pub fn print_result(result: &CombatResult, verbose: bool) {
    heading(&format!("{} → {}", result.weapon.name, result.target.name));
    for record in &result.steps {
        println!("  {}", step_line(record));
        if verbose && !record.dice.is_empty() {
            let faces: Vec<String> = record.dice.iter().map(die).collect();
            println!("    [{}]", faces.join(" "));
        }
        for note in &record.notes {
            println!("    {}", style(format!("{note:?}")).yellow());
        }
    }

    let s = &result.summary;
    println!();
    println!(
        "  attacks {}  hits {}  wounds {}  unsaved {}",
        s.attacks, s.hits, s.wounds, s.failed_saves
    );
    println!(
        "  damage {} (negated {})  {}",
        s.damage,
        s.damage_negated,
        style(format!("final {}", s.final_damage)).bold()
    );
}
