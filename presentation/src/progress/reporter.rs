//! Progress reporting for a running session

use colored::Colorize;
use conductor_application::OrchestrationProgress;
use conductor_domain::{LoopState, OrchestrationResult, ToolCallAttempt, ToolLogEntry};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a step bar and a spinner message
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn step_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn state_message(state: LoopState) -> &'static str {
        match state {
            LoopState::Planning => "Planning...",
            LoopState::Validating => "Validating calls...",
            LoopState::Dispatching => "Calling tools...",
            LoopState::Logging => "Recording results...",
            LoopState::Done => "Done",
            LoopState::Exhausted => "Step budget exhausted",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestrationProgress for ProgressReporter {
    fn on_step_start(&self, step: usize, max_steps: usize) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new(max_steps as u64);
            pb.set_style(Self::step_style());
            pb.set_prefix("Session");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_position(step.saturating_sub(1) as u64);
        pb.set_message(format!("step {step}"));
    }

    fn on_state_change(&self, state: LoopState) {
        self.with_bar(|pb| pb.set_message(Self::state_message(state)));
    }

    fn on_tool_dispatch(&self, attempt: &ToolCallAttempt) {
        self.with_bar(|pb| pb.set_message(format!("-> {}", attempt.tool_name())));
    }

    fn on_tool_logged(&self, entry: &ToolLogEntry) {
        self.with_bar(|pb| {
            let marker = if entry.is_success() {
                "v".green()
            } else {
                "x".red()
            };
            pb.println(format!("  {} {}", marker, entry.tool_name()));
        });
    }

    fn on_planner_error(&self, step: usize, error: &str) {
        self.with_bar(|pb| {
            pb.println(format!("  {} planner error at step {}: {}", "!".yellow(), step, error));
        });
    }

    fn on_finished(&self, result: &OrchestrationResult) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.set_position(result.steps_taken as u64);
            pb.finish_with_message(format!(
                "{} ({} tool calls)",
                Self::state_message(result.outcome.into()).green(),
                result.tool_log.len()
            ));
        }
    }
}

/// Plain line-based progress on stderr, for non-interactive terminals
pub struct SimpleProgress;

impl OrchestrationProgress for SimpleProgress {
    fn on_step_start(&self, step: usize, max_steps: usize) {
        eprintln!("{} {} ({}/{})", "->".cyan(), "Step".bold(), step, max_steps);
    }

    fn on_tool_logged(&self, entry: &ToolLogEntry) {
        if entry.is_success() {
            eprintln!("  {} {}", "v".green(), entry.tool_name());
        } else {
            eprintln!(
                "  {} {} ({})",
                "x".red(),
                entry.tool_name(),
                entry.failure_kind().map(|k| k.as_str()).unwrap_or("failed")
            );
        }
    }

    fn on_planner_error(&self, step: usize, error: &str) {
        eprintln!("  {} planner error at step {}: {}", "!".yellow(), step, error);
    }

    fn on_finished(&self, result: &OrchestrationResult) {
        eprintln!(
            "{} {} after {} steps",
            "->".cyan(),
            result.outcome.as_str().bold(),
            result.steps_taken
        );
    }
}
