use crate::memory::PreferenceMemory;
use crate::session::SessionState;
use crate::ui::style as ui;
use crate::utils::text::preview;
use std::fmt::Write;
use std::path::Path;

const REQUEST_PREVIEW_CHARS: usize = 60;

/// One line per session for `sessions list`.
pub fn render_session_row(session: &SessionState) -> String {
    let verdict = match session.latest_report() {
        Some(report) if report.pass => ui::success("pass"),
        Some(_) => ui::yellow("best-effort"),
        None => ui::dim("unjudged"),
    };
    format!(
        "{}  {}  {}  drafts={} judged={}  {}",
        ui::value(&session.id),
        session.created_at.format("%Y-%m-%d %H:%M"),
        verdict,
        session.drafts.len(),
        session.judge_reports.len(),
        ui::dim(preview(&session.user_request_raw, REQUEST_PREVIEW_CHARS)),
    )
}

/// Full breakdown for `sessions show`.
pub fn render_session_detail(session: &SessionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", ui::header("Session"), ui::value(&session.id));
    let _ = writeln!(out, "  {} {}", ui::cyan("trace_id:"), session.trace_id);
    let _ = writeln!(out, "  {} {}", ui::cyan("created:"), session.created_at.to_rfc3339());
    let _ = writeln!(out, "  {} {}", ui::cyan("request:"), session.user_request_raw);
    let _ = writeln!(out, "  {} {}", ui::cyan("state:"), session.state);

    let path: Vec<String> = session
        .state_path()
        .iter()
        .map(ToString::to_string)
        .collect();
    let _ = writeln!(out, "\n{}", ui::header("Transitions"));
    let _ = writeln!(out, "  {}", path.join(" → "));

    let _ = writeln!(out, "\n{}", ui::header("Verdicts"));
    if session.judge_reports.is_empty() {
        let _ = writeln!(out, "  {}", ui::dim("(none)"));
    }
    for (index, report) in session.judge_reports.iter().enumerate() {
        let _ = writeln!(
            out,
            "  #{} pass={} rewrite_required={} hard_flags=[{}] {}",
            index + 1,
            report.pass,
            report.rewrite_required,
            report.hard_flags.join(", "),
            ui::dim(&report.one_sentence_verdict),
        );
    }

    if let Some(feedback) = &session.user_feedback {
        let _ = writeln!(out, "\n{} {feedback}", ui::header("Feedback:"));
    }

    if let Some(metrics) = &session.metrics {
        let _ = writeln!(out, "\n{}", ui::header("Metrics"));
        for (name, count) in &metrics.counters {
            let _ = writeln!(out, "  {} {count}", ui::cyan(format!("{name}:")));
        }
        for (name, value) in &metrics.gauges {
            let _ = writeln!(out, "  {} {value}", ui::cyan(format!("{name}:")));
        }
        for (name, timer) in &metrics.timers {
            let _ = writeln!(
                out,
                "  {} count={} mean={:.1}ms p95={:.1}ms",
                ui::cyan(format!("{name}:")),
                timer.count,
                timer.mean_ms,
                timer.p95_ms
            );
        }
    }

    let _ = writeln!(out, "\n{}", ui::header("Final story"));
    let _ = write!(out, "{}", session.final_story);
    out
}

pub fn render_preferences(memory: &PreferenceMemory, path: &Path) -> String {
    let field = |value: &Option<String>| {
        value
            .as_deref()
            .map_or_else(|| ui::dim("(unset)"), ui::value)
    };
    format!(
        "{} {}\n  {} {}\n  {} {}\n  {} {}",
        ui::header("Preferences"),
        ui::dim(path.display()),
        ui::cyan("preferred_length:"),
        field(&memory.preferred_length),
        ui::cyan("preferred_tone:"),
        field(&memory.preferred_tone),
        ui::cyan("recurring_character:"),
        field(&memory.recurring_character),
    )
}
