//! Console output formatter for fan-out and decision results

use colored::Colorize;
use serde::Serialize;
use team_application::PersonaOutcome;
use team_domain::{ArtifactRecord, DecisionOutcome, DispatchResult, ProviderListing};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Answers of a `prompt` / `prompt-file` run, one section per model
    pub fn format_results(results: &[DispatchResult]) -> String {
        // A single answer is printed bare so it can be piped
        if let [only] = results {
            if only.is_success() {
                return format!("{}\n", only.text());
            }
        }

        let mut output = String::new();
        for result in results {
            let title = format!("── {} ──", result.target);
            match result.as_result() {
                Ok(text) => {
                    output.push_str(&format!("\n{}\n{}\n", title.yellow().bold(), text));
                }
                Err(message) => {
                    output.push_str(&format!("\n{}\n{}\n", title.red().bold(), message));
                }
            }
        }
        output
    }

    /// Files written by `prompt-file-to-file`
    pub fn format_records(records: &[ArtifactRecord]) -> String {
        records.iter().map(Self::record_line).collect()
    }

    pub fn format_decision(outcome: &DecisionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Team Responses"));
        output.push_str(&Self::format_records(&outcome.team));

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!(
            "  {} {}\n  {} {}\n",
            "Model:".cyan().bold(),
            outcome.decision_model,
            "File: ".cyan().bold(),
            outcome.decision_path.display()
        ));

        let failed = outcome.failed_team().count();
        if failed > 0 {
            output.push_str(&format!(
                "\n{}\n",
                format!("{} of {} team members failed", failed, outcome.team.len()).yellow()
            ));
        }
        output
    }

    pub fn format_persona(outcome: &PersonaOutcome) -> String {
        match outcome {
            PersonaOutcome::Single(record) => Self::format_records(std::slice::from_ref(record)),
            PersonaOutcome::Decision(decision) => Self::format_decision(decision),
        }
    }

    pub fn format_providers(listing: &ProviderListing) -> String {
        match listing {
            ProviderListing::Flat(names) => names.iter().map(|n| format!("{}\n", n)).collect(),
            ProviderListing::Detailed(entries) => entries
                .iter()
                .map(|(name, aliases)| {
                    if aliases.is_empty() {
                        format!("{}\n", name.bold())
                    } else {
                        format!("{} {}\n", name.bold(), format!("({})", aliases.join(", ")).dimmed())
                    }
                })
                .collect(),
        }
    }

    pub fn format_models(provider: &str, models: &[String]) -> String {
        if models.is_empty() {
            return format!(
                "{}\n",
                format!("No known models for {}; any model name is accepted", provider).dimmed()
            );
        }
        models.iter().map(|m| format!("{}\n", m)).collect()
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// JSON for a persona run: the record or the decision outcome, tagged
    pub fn format_persona_json(outcome: &PersonaOutcome) -> String {
        let value = match outcome {
            PersonaOutcome::Single(record) => {
                serde_json::json!({ "mode": "single", "artifact": record })
            }
            PersonaOutcome::Decision(decision) => {
                serde_json::json!({ "mode": "decision", "outcome": decision })
            }
        };
        Self::format_json(&value)
    }

    fn record_line(record: &ArtifactRecord) -> String {
        if record.is_error {
            format!(
                "  {} {} {}\n",
                "x".red(),
                record.path.display(),
                format!("({})", record.label).dimmed()
            )
        } else {
            format!(
                "  {} {} {}\n",
                "v".green(),
                record.path.display(),
                format!("({})", record.label).dimmed()
            )
        }
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}
