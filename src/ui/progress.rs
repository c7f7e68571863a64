use super::style as ui;
use crate::controller::{ProgressEvent, ProgressSink};
use crate::judge::JudgeReport;
use crate::utils::text::preview;

const TOTAL_STEPS: u8 = 6;
const PREVIEW_CHARS: usize = 180;
const TOP_ISSUES: usize = 3;

/// Terminal progress. Stage lines go to stderr so stdout carries only the
/// stories; `verbose = false` keeps just the stories and the saved path.
pub struct ConsoleProgress {
    verbose: bool,
    debug: bool,
}

impl ConsoleProgress {
    pub fn new(verbose: bool, debug: bool) -> Self {
        Self { verbose, debug }
    }

    /// Status lines for `event`. The saved-artifact line survives quiet mode.
    fn status_lines(&self, event: &ProgressEvent<'_>) -> Vec<String> {
        if let ProgressEvent::Saved { path } = event {
            return vec![format!(
                "{} {}",
                ui::accent("[Saved]"),
                ui::value(path.display())
            )];
        }
        if !self.verbose {
            return Vec::new();
        }

        match event {
            ProgressEvent::Started {
                session_id,
                trace_id,
                request,
            } => vec![
                format!(
                    "{} id={} trace_id={}",
                    ui::accent("[Session]"),
                    ui::value(session_id),
                    ui::dim(trace_id)
                ),
                format!("{} {request}", ui::accent("[User]")),
            ],
            ProgressEvent::Stage { step, label } => {
                let counter = if *step == 0 {
                    "[HITL]".to_string()
                } else {
                    format!("[{step}/{TOTAL_STEPS}]")
                };
                vec![format!("{} {label}...", ui::accent(counter))]
            }
            ProgressEvent::StageDone { verb, elapsed } => vec![format!(
                "      {} {verb} ({:.1}s)",
                ui::success("✓"),
                elapsed.as_secs_f64()
            )],
            ProgressEvent::Detail { label, text } if self.debug => vec![
                format!("      {} {label} (truncated):", ui::dim("·")),
                format!("      {}", ui::dim(preview(text, PREVIEW_CHARS))),
            ],
            ProgressEvent::Verdict { report } => {
                let mut lines = vec![format!("      {} {}", ui::dim("·"), verdict_line(report))];
                if self.debug && !report.issues.is_empty() {
                    let top: Vec<&str> = report
                        .issues
                        .iter()
                        .take(TOP_ISSUES)
                        .map(String::as_str)
                        .collect();
                    lines.push(format!(
                        "      {} top issues: {}",
                        ui::dim("·"),
                        top.join("; ")
                    ));
                }
                lines
            }
            _ => Vec::new(),
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: &ProgressEvent<'_>) {
        if let ProgressEvent::Story { text, updated } = event {
            let title = if *updated {
                "UPDATED STORY (after your feedback)"
            } else {
                "STORY"
            };
            println!("\n{}", ui::header(format!("--- {title} ---")));
            println!("{text}");
            println!("{}\n", ui::header(format!("--- END {title} ---")));
            return;
        }
        for line in self.status_lines(event) {
            eprintln!("{line}");
        }
    }
}

fn verdict_line(report: &JudgeReport) -> String {
    let score = |key: &str| {
        report
            .score(key)
            .map_or_else(|| "-".to_string(), |v| format!("{v}"))
    };
    let line = format!(
        "pass={} rewrite_required={} hard_flags={} cozy={} age_fit={}",
        report.pass,
        report.rewrite_required,
        report.hard_flags.len(),
        score("coziness"),
        score("age_fit"),
    );
    if report.pass { line } else { ui::yellow(line) }
}
