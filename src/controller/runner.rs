use super::feedback::{FeedbackSource, NoFeedback, normalize};
use super::progress::{ProgressEvent, ProgressSink, SilentProgress};
use super::settings::SessionSettings;
use crate::config::{Config, StageBudget};
use crate::judge::{JudgeReport, RevisionMode, parse_report};
use crate::llm::ModelClient;
use crate::memory::{PreferenceMemory, PreferenceStore, apply_feedback};
use crate::observability::{
    EventSink, Metrics, NoopEventSink, TraceContext, TraceEvent, create_event_sink, record,
};
use crate::observability::span::now_ms;
use crate::prompt::StoryPrompts;
use crate::session::{SessionState, SessionStore, StoryState};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Standing directives appended to user feedback for the HITL revision.
const HITL_DIRECTIVES: [&str; 2] = [
    "Apply the feedback while keeping the story safe and age-appropriate (5–10).",
    "Do not add scary elements. Keep a cozy bedtime ending.",
];

/// Result of a completed session.
#[derive(Debug)]
pub struct SessionOutcome {
    pub final_story: String,
    pub artifact_path: PathBuf,
    pub session: SessionState,
}

/// Drives one request from raw text to a saved session artifact.
///
/// Every collaborator is injected. Metrics and the trace context are created
/// per run and live exactly as long as it.
pub struct SessionController {
    model: Arc<dyn ModelClient>,
    prompts: StoryPrompts,
    sessions: SessionStore,
    preferences: PreferenceStore,
    events: Arc<dyn EventSink>,
    feedback: Box<dyn FeedbackSource>,
    progress: Box<dyn ProgressSink>,
    settings: SessionSettings,
}

impl SessionController {
    pub fn new(
        model: Arc<dyn ModelClient>,
        sessions: SessionStore,
        preferences: PreferenceStore,
        settings: SessionSettings,
    ) -> Result<Self> {
        Ok(Self {
            model,
            prompts: StoryPrompts::new()?,
            sessions,
            preferences,
            events: Arc::new(NoopEventSink),
            feedback: Box::new(NoFeedback),
            progress: Box::new(SilentProgress),
            settings,
        })
    }

    /// Controller wired to the stores and event log under `config.data_dir`.
    pub fn from_config(config: &Config, model: Arc<dyn ModelClient>) -> Result<Self> {
        Ok(Self::new(
            model,
            SessionStore::new(config.sessions_dir()),
            PreferenceStore::new(config.preferences_path()),
            SessionSettings::from_config(config),
        )?
        .with_event_sink(create_event_sink(config)?))
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_feedback(mut self, feedback: impl FeedbackSource + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Run the full pipeline. A model or storage failure aborts the run and
    /// nothing is saved.
    pub async fn run_session(self, user_request: &str) -> Result<SessionOutcome> {
        let session = SessionState::new(user_request);
        let mut run = SessionRun {
            trace: TraceContext::new(session.trace_id.clone()),
            metrics: Metrics::new(),
            session,
            ctl: &self,
        };
        run.execute().await
    }
}

/// Run a session with settings, stores and event log taken from `config`.
/// No feedback is collected and nothing is printed.
pub async fn run_session(
    config: &Config,
    model: Arc<dyn ModelClient>,
    user_request: &str,
) -> Result<(String, PathBuf)> {
    let outcome = SessionController::from_config(config, model)?
        .run_session(user_request)
        .await?;
    Ok((outcome.final_story, outcome.artifact_path))
}

/// Span annotations for one model call.
#[derive(Clone, Copy, Default)]
struct StageTags {
    iteration: Option<usize>,
    mode: Option<RevisionMode>,
}

impl StageTags {
    fn iteration(iteration: usize) -> Self {
        Self {
            iteration: Some(iteration),
            mode: None,
        }
    }

    fn revision(iteration: usize, mode: RevisionMode) -> Self {
        Self {
            iteration: Some(iteration),
            mode: Some(mode),
        }
    }
}

struct SessionRun<'a> {
    ctl: &'a SessionController,
    session: SessionState,
    metrics: Metrics,
    trace: TraceContext,
}

impl SessionRun<'_> {
    async fn execute(mut self) -> Result<SessionOutcome> {
        let ctl = self.ctl;
        info!(
            session_id = %self.session.id,
            trace_id = %self.session.trace_id,
            model = ctl.model.name(),
            max_iterations = ctl.settings.max_iterations,
            hitl = ctl.settings.hitl_enabled,
            "session.start"
        );
        ctl.progress.emit(&ProgressEvent::Started {
            session_id: &self.session.id,
            trace_id: &self.session.trace_id,
            request: self.session.user_request_raw.trim(),
        });
        ctl.events.append(&TraceEvent::SessionStarted {
            session_id: self.session.id.clone(),
            trace_id: self.session.trace_id.clone(),
            ts_ms: now_ms(),
        })?;

        let stored = self.load_preferences();
        let memory = stored.clone().unwrap_or_default();

        self.interpret(&memory).await?;
        self.plan().await?;
        self.draft_and_judge().await?;

        ctl.progress.emit(&ProgressEvent::Story {
            text: &self.session.final_story,
            updated: false,
        });

        if ctl.settings.hitl_enabled && !self.session.final_story.is_empty() {
            self.hitl_pass(&memory, stored.is_some()).await?;
        }

        self.persist()
    }

    /// `None` when the store exists but cannot be read; the session then runs
    /// with empty preferences and leaves the file alone.
    fn load_preferences(&self) -> Option<PreferenceMemory> {
        match self.ctl.preferences.load() {
            Ok(memory) => Some(memory),
            Err(error) => {
                warn!(
                    path = %self.ctl.preferences.path().display(),
                    error = %error,
                    "memory.unreadable"
                );
                None
            }
        }
    }

    async fn interpret(&mut self, memory: &PreferenceMemory) -> Result<()> {
        let ctl = self.ctl;
        self.advance(StoryState::Interpreting, "interpreting request")?;
        self.stage(1, "Interpreting request (intent + constraints)".into());

        let prompt = ctl
            .prompts
            .interpreter(&self.session.user_request_raw, &memory.to_prompt_text())?;
        let spec = self
            .call("interpreter", &prompt, ctl.settings.stages.interpret, StageTags::default())
            .await?;
        ctl.progress.emit(&ProgressEvent::Detail {
            label: "request_spec",
            text: &spec,
        });
        self.session.request_spec = spec;
        self.advance(StoryState::Interpreted, "request spec ready")
    }

    async fn plan(&mut self) -> Result<()> {
        let ctl = self.ctl;
        self.advance(StoryState::Planning, "planning outline")?;
        self.stage(2, "Planning story outline".into());

        let prompt = ctl.prompts.planner(&self.session.request_spec)?;
        let plan = self
            .call("planner", &prompt, ctl.settings.stages.plan, StageTags::default())
            .await?;
        ctl.progress.emit(&ProgressEvent::Detail {
            label: "plan",
            text: &plan,
        });
        self.session.plan = plan;
        self.advance(StoryState::Planned, "plan ready")
    }

    async fn draft_and_judge(&mut self) -> Result<()> {
        let ctl = self.ctl;
        let max_iterations = ctl.settings.max_iterations as usize;

        self.advance(StoryState::Drafting, "drafting story")?;
        self.stage(3, "Drafting story (v1)".into());
        let prompt = ctl
            .prompts
            .storyteller(&self.session.request_spec, &self.session.plan)?;
        let draft = self
            .call("storyteller", &prompt, ctl.settings.draft_budget(), StageTags::iteration(0))
            .await?;
        self.session.push_draft(draft);
        self.advance(StoryState::Drafted, "draft v1 ready")?;
        self.advance(StoryState::Judging, "judging draft v1")?;

        let mut iteration = 0;
        loop {
            let report = self.judge(iteration).await?;
            self.advance(StoryState::Judged, "verdict recorded")?;

            if report.pass {
                self.finalize("judge passed")?;
                break;
            }
            if iteration == max_iterations {
                self.metrics.inc("loop.exhausted", 1);
                warn!(
                    session_id = %self.session.id,
                    iterations = iteration + 1,
                    "loop.exhausted"
                );
                self.finalize("iteration limit reached, accepting latest draft")?;
                break;
            }

            let mode = report.revision_mode();
            self.advance(StoryState::Revising, &format!("revising ({mode})"))?;
            let revised = self.revise(&report, iteration, mode).await?;
            self.session.push_draft(revised);
            let version = self.session.drafts.len();
            self.advance(StoryState::Revised, &format!("draft v{version} ready"))?;
            self.advance(StoryState::Judging, &format!("judging draft v{version}"))?;
            iteration += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let judged = (iteration + 1) as f64;
        self.metrics.set_gauge("loop.iterations", judged);
        Ok(())
    }

    async fn judge(&mut self, iteration: usize) -> Result<JudgeReport> {
        let ctl = self.ctl;
        self.stage(4, "Judging quality & safety".into());

        let story = self.session.latest_draft().unwrap_or_default();
        let prompt = ctl.prompts.judge(&self.session.request_spec, story)?;
        let raw = self
            .call("judge", &prompt, ctl.settings.stages.judge, StageTags::iteration(iteration))
            .await?;

        let report = match parse_report(&raw) {
            Ok(report) => report,
            Err(malformed) => {
                self.metrics.inc("judge.malformed", 1);
                warn!(
                    session_id = %self.session.id,
                    iteration,
                    reason = malformed.reason,
                    chars = malformed.raw.len(),
                    "judge.malformed"
                );
                JudgeReport::default()
            }
        };

        self.metrics.inc("judge.calls", 1);
        if report.pass {
            self.metrics.inc("judge.pass", 1);
        }
        if report.rewrite_required {
            self.metrics.inc("judge.rewrite_required", 1);
        }
        for (dimension, score) in &report.scores {
            self.metrics.set_gauge(&format!("score.{dimension}"), *score);
        }

        info!(
            session_id = %self.session.id,
            iteration,
            pass = report.pass,
            rewrite_required = report.rewrite_required,
            hard_flags = report.hard_flags.len(),
            "judge.verdict"
        );
        ctl.progress.emit(&ProgressEvent::Verdict { report: &report });

        self.session.push_judge_report(report.clone())?;
        Ok(report)
    }

    async fn revise(
        &mut self,
        report: &JudgeReport,
        iteration: usize,
        mode: RevisionMode,
    ) -> Result<String> {
        let ctl = self.ctl;
        self.stage(5, "Revising story based on judge feedback".into());
        let tags = StageTags::revision(iteration, mode);

        match mode {
            RevisionMode::Rewrite => {
                let prompt = ctl
                    .prompts
                    .storyteller(&self.session.request_spec, &self.session.plan)?;
                self.call("rewrite", &prompt, ctl.settings.stages.rewrite, tags)
                    .await
            }
            RevisionMode::Revise | RevisionMode::HitlRevise => {
                let story = self.session.latest_draft().unwrap_or_default();
                let prompt = ctl.prompts.reviser(
                    &self.session.request_spec,
                    story,
                    &report.revision_instructions,
                )?;
                self.call("reviser", &prompt, ctl.settings.stages.revise, tags)
                    .await
            }
        }
    }

    fn finalize(&mut self, reason: &str) -> Result<()> {
        self.stage(6, "Finalizing story".into());
        self.advance(StoryState::Finalized, reason)?;
        self.session.final_story = self.session.latest_draft().unwrap_or_default().to_string();
        Ok(())
    }

    async fn hitl_pass(&mut self, memory: &PreferenceMemory, writable: bool) -> Result<()> {
        let ctl = self.ctl;
        let Some(feedback) = normalize(ctl.feedback.collect(&self.session.final_story)?) else {
            debug!(session_id = %self.session.id, "hitl.skipped");
            return Ok(());
        };

        self.metrics.inc("hitl.feedback", 1);
        info!(session_id = %self.session.id, chars = feedback.len(), "hitl.feedback");

        let updated = apply_feedback(memory, &feedback);
        if updated != *memory {
            if writable {
                ctl.preferences
                    .save(&updated)
                    .context("failed saving preference memory")?;
                self.metrics.inc("memory.updated", 1);
                info!(
                    path = %ctl.preferences.path().display(),
                    preferences = %updated.to_prompt_text(),
                    "memory.updated"
                );
            } else {
                self.metrics.inc("memory.save_skipped", 1);
                warn!(
                    path = %ctl.preferences.path().display(),
                    "memory.save_skipped"
                );
            }
        }

        ctl.progress.emit(&ProgressEvent::Stage {
            step: 0,
            label: "Applying your feedback to produce an updated story".into(),
        });
        let instructions = hitl_instructions(&feedback);
        let prompt = ctl.prompts.reviser(
            &self.session.request_spec,
            &self.session.final_story,
            &instructions,
        )?;
        let tags = StageTags {
            iteration: None,
            mode: Some(RevisionMode::HitlRevise),
        };
        let updated_story = self
            .call("hitl_reviser", &prompt, ctl.settings.stages.hitl, tags)
            .await?;

        self.session.user_feedback = Some(feedback);
        self.session.push_draft(updated_story.clone());
        self.session.final_story = updated_story;
        ctl.progress.emit(&ProgressEvent::Story {
            text: &self.session.final_story,
            updated: true,
        });
        Ok(())
    }

    fn persist(mut self) -> Result<SessionOutcome> {
        let ctl = self.ctl;
        self.session.metrics = Some(self.metrics.snapshot());
        let path = ctl.sessions.save(&self.session)?;

        ctl.events.append(&TraceEvent::SessionSaved {
            session_id: self.session.id.clone(),
            trace_id: self.session.trace_id.clone(),
            path: path.display().to_string(),
            ts_ms: now_ms(),
        })?;
        info!(
            session_id = %self.session.id,
            path = %path.display(),
            drafts = self.session.drafts.len(),
            judge_calls = self.session.judge_reports.len(),
            "session.saved"
        );
        ctl.progress.emit(&ProgressEvent::Saved { path: &path });

        Ok(SessionOutcome {
            final_story: self.session.final_story.clone(),
            artifact_path: path,
            session: self.session,
        })
    }

    /// Open a span, invoke the model, close and record the span.
    async fn call(
        &mut self,
        name: &str,
        prompt: &str,
        budget: StageBudget,
        tags: StageTags,
    ) -> Result<String> {
        let ctl = self.ctl;
        let mut span = self.trace.child_span(name);
        if let Some(iteration) = tags.iteration {
            span.annotate("iteration", iteration);
        }
        if let Some(mode) = tags.mode {
            span.annotate("mode", mode.to_string());
        }

        debug!(
            session_id = %self.session.id,
            stage = name,
            max_tokens = budget.max_tokens,
            temperature = budget.temperature,
            "stage.start"
        );
        let started = Instant::now();
        let output = ctl
            .model
            .invoke(prompt, budget.max_tokens, budget.temperature)
            .await
            .with_context(|| format!("{name} stage failed"))?;
        span.close(&output);

        record(ctl.events.as_ref(), &mut self.metrics, &mut span, prompt, &output)?;
        ctl.progress.emit(&ProgressEvent::StageDone {
            verb: stage_verb(name),
            elapsed: started.elapsed(),
        });
        Ok(output)
    }

    fn advance(&mut self, to: StoryState, reason: &str) -> Result<()> {
        let step = self.session.transition(to, reason)?;
        debug!(
            session_id = %self.session.id,
            from = ?step.from,
            to = %step.to,
            reason,
            "session.transition"
        );
        self.ctl.events.append(&TraceEvent::Transition {
            session_id: self.session.id.clone(),
            trace_id: self.session.trace_id.clone(),
            from: step.from.map(|s| s.to_string()),
            to: step.to.to_string(),
            reason: step.reason,
            ts_ms: step.ts.timestamp_millis(),
        })?;
        Ok(())
    }

    fn stage(&self, step: u8, label: String) {
        self.ctl.progress.emit(&ProgressEvent::Stage { step, label });
    }
}

fn hitl_instructions(feedback: &str) -> Vec<String> {
    std::iter::once(format!("User feedback: {feedback}"))
        .chain(HITL_DIRECTIVES.iter().map(|d| (*d).to_string()))
        .collect()
}

fn stage_verb(name: &str) -> &'static str {
    match name {
        "rewrite" => "rewritten",
        "reviser" => "revised",
        "hitl_reviser" => "updated",
        _ => "done",
    }
}
