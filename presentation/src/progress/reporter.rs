//! Progress reporting for fan-out and decision runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use team_application::ProgressNotifier;
use team_domain::{Phase, ResolvedTarget};

/// Reports progress with one indicatif bar per phase (drawn on stderr)
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.phase_bar.lock() {
            f(&mut guard);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name());
        pb.set_message("Starting...");
        self.with_bar(|slot| *slot = Some(pb));
    }

    fn on_task_complete(&self, _phase: &Phase, target: &ResolvedTarget, success: bool) {
        self.with_bar(|slot| {
            if let Some(pb) = slot.as_ref() {
                let status = if success {
                    format!("{} {}", "v".green(), target)
                } else {
                    format!("{} {}", "x".red(), target)
                };
                pb.set_message(status);
                pb.inc(1);
            }
        });
    }

    fn on_phase_complete(&self, phase: &Phase) {
        self.with_bar(|slot| {
            if let Some(pb) = slot.take() {
                pb.finish_with_message(format!("{} complete!", phase.display_name().green()));
            }
        });
    }
}

/// Simple line-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, target: &ResolvedTarget, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), target);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), target);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }
}
