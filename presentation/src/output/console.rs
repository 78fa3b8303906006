//! Console output formatter for session results

use colored::Colorize;
use conductor_domain::{
    DiscoveryReport, OrchestrationResult, ProviderStatus, SessionOutcome, ToolCatalog,
    ToolLogEntry,
};

/// Placeholder shown for log entries whose tool was not in the catalog.
const UNKNOWN_PROVIDER: &str = "UNKNOWN";

/// Formats session results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result: goal, answer, tool log and summary
    pub fn format(result: &OrchestrationResult, goal: &str) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Session Result"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Goal:".cyan().bold(), goal));

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&format!("\n{}\n", result.final_answer));

        output.push_str(&Self::section_header("Tool Log"));
        if result.tool_log.is_empty() {
            output.push_str(&format!("\n{}\n", "(no tool calls)".dimmed()));
        } else {
            for entry in &result.tool_log {
                output.push('\n');
                output.push_str(&Self::format_entry(entry));
            }
        }

        output.push_str(&Self::footer(result));

        output
    }

    /// Format only the final answer
    pub fn format_answer(result: &OrchestrationResult) -> String {
        result.final_answer.clone()
    }

    /// Format the result as pretty JSON
    pub fn format_json(result: &OrchestrationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    /// Format a discovered catalog, grouped by provider
    pub fn format_catalog(catalog: &ToolCatalog, report: &DiscoveryReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Tool Catalog"));

        for (provider, status) in &report.providers {
            match status {
                ProviderStatus::Reachable {
                    tool_count,
                    duplicates,
                } => {
                    output.push_str(&format!(
                        "\n{} {} ({} tools)\n",
                        "v".green(),
                        provider.bold(),
                        tool_count
                    ));
                    for tool in catalog.iter().filter(|t| t.provider_id() == provider) {
                        output.push_str(&format!("  {}\n", tool.qualified_name().yellow()));
                        if !tool.description().is_empty() {
                            output.push_str(&Self::indent(tool.description(), 6));
                            output.push('\n');
                        }
                        let required = tool.argument_schema().required();
                        if !required.is_empty() {
                            output.push_str(&format!(
                                "      {} {}\n",
                                "required:".dimmed(),
                                required.join(", ")
                            ));
                        }
                    }
                    for name in duplicates {
                        output.push_str(&format!(
                            "  {} {} (duplicate, skipped)\n",
                            "!".yellow(),
                            name
                        ));
                    }
                }
                ProviderStatus::Unreachable { reason } => {
                    output.push_str(&format!(
                        "\n{} {} {}\n",
                        "x".red(),
                        provider.bold(),
                        format!("unreachable: {reason}").red()
                    ));
                }
            }
        }

        output.push_str(&format!(
            "\n{} {} tools from {}/{} providers\n",
            "Total:".cyan().bold(),
            catalog.len(),
            report.reachable_count(),
            report.providers.len()
        ));

        output
    }

    /// Warnings for providers that did not make it into the catalog
    pub fn format_discovery_warnings(report: &DiscoveryReport) -> Option<String> {
        let failures = report.failures();
        if failures.is_empty() {
            return None;
        }
        let lines: Vec<String> = failures
            .iter()
            .map(|(provider, reason)| {
                format!("{} {}: {}", "warning:".yellow().bold(), provider, reason)
            })
            .collect();
        Some(lines.join("\n"))
    }

    fn format_entry(entry: &ToolLogEntry) -> String {
        let provider = entry.provider_id().unwrap_or(UNKNOWN_PROVIDER);
        let title = format!("── step {} · {} ({}) ──", entry.step(), entry.tool_name(), provider);

        let mut out = String::new();
        if entry.is_success() {
            out.push_str(&format!("{}\n", title.yellow().bold()));
        } else {
            out.push_str(&format!("{}\n", title.red().bold()));
        }
        out.push_str(&format!("  {} {}\n", "args:".dimmed(), entry.arguments()));

        if let Some(preview) = entry.result_preview() {
            out.push_str(&Self::indent(preview, 2));
            out.push('\n');
        }
        if let Some(error) = entry.error() {
            let kind = entry
                .failure_kind()
                .map(|k| k.as_str())
                .unwrap_or("error");
            out.push_str(&format!("  {} {}\n", format!("[{kind}]").red(), error));
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(60);
        format!(
            "\n{}\n{}\n{}\n",
            line.cyan(),
            format!("  {title}").cyan().bold(),
            line.cyan()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", format!("▶ {title}").blue().bold(), "─".repeat(40).blue())
    }

    fn footer(result: &OrchestrationResult) -> String {
        let outcome = match result.outcome {
            SessionOutcome::Done => result.outcome.as_str().green(),
            SessionOutcome::Exhausted => result.outcome.as_str().yellow(),
        };
        format!(
            "\n{}\n{} {} · {} steps · {} calls ({} ok, {} failed)\n",
            "─".repeat(60).dimmed(),
            "Outcome:".cyan().bold(),
            outcome,
            result.steps_taken,
            result.tool_log.len(),
            result.successful_calls(),
            result.failed_calls()
        )
    }

    fn indent(text: &str, spaces: usize) -> String {
        let pad = " ".repeat(spaces);
        text.lines()
            .map(|line| format!("{pad}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
