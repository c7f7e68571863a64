#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use story_studio::controller::{SessionController, SessionSettings};
use story_studio::llm::{CompletionFuture, ModelClient};
use story_studio::memory::PreferenceStore;
use story_studio::observability::MemoryEventSink;
use story_studio::session::{SessionState, SessionStore};
use tempfile::TempDir;

pub const PASS_VERDICT: &str = r#"{"hard_flags": [], "pass": true, "rewrite_required": false, "scores": {"coziness": 9, "age_fit": 8}, "issues": [], "revision_instructions": [], "one_sentence_verdict": "Calm and cozy."}"#;
pub const REVISE_VERDICT: &str = r#"{"hard_flags": [], "pass": false, "rewrite_required": false, "scores": {"coziness": 5}, "issues": ["ending is abrupt"], "revision_instructions": ["Add a gentle wind-down ending."], "one_sentence_verdict": "Needs a softer ending."}"#;
pub const REWRITE_VERDICT: &str = r#"{"hard_flags": ["frightening imagery"], "pass": false, "rewrite_required": true, "scores": {"low_arousal": 2}, "issues": ["monster chase"], "revision_instructions": ["Remove the chase."], "one_sentence_verdict": "Too scary."}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Interpreter,
    Planner,
    Storyteller,
    Judge,
    Reviser,
}

impl Stage {
    fn of(prompt: &str) -> Self {
        if prompt.starts_with("You are an intent interpreter") {
            Self::Interpreter
        } else if prompt.starts_with("You are a story planner") {
            Self::Planner
        } else if prompt.starts_with("You are a bedtime storyteller") {
            Self::Storyteller
        } else if prompt.starts_with("You are a conservative evaluator") {
            Self::Judge
        } else if prompt.starts_with("You are a reviser") {
            Self::Reviser
        } else {
            panic!("unrecognized prompt: {}", &prompt[..prompt.len().min(60)])
        }
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub stage: Stage,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Deterministic stand-in for the model: answers by prompt kind, pops judge
/// verdicts from a queue (defaulting to a revise verdict when empty) and
/// records every call.
pub struct ScriptedModel {
    verdicts: Mutex<VecDeque<String>>,
    fail_on: Option<Stage>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedModel {
    pub fn new(verdicts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            verdicts: Mutex::new(verdicts.iter().map(|v| (*v).to_string()).collect()),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_on(stage: Stage, verdicts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            verdicts: Mutex::new(verdicts.iter().map(|v| (*v).to_string()).collect()),
            fail_on: Some(stage),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, stage: Stage) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.stage == stage)
            .collect()
    }

    fn respond(&self, prompt: &str, max_tokens: u32, temperature: f64) -> anyhow::Result<String> {
        let stage = Stage::of(prompt);
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call {
            stage,
            prompt: prompt.to_string(),
            max_tokens,
            temperature,
        });
        if self.fail_on == Some(stage) {
            anyhow::bail!("scripted failure at {stage:?}");
        }

        let seen = calls.iter().filter(|call| call.stage == stage).count();
        Ok(match stage {
            Stage::Interpreter => "Story Request Spec:\n- Theme: a cat finds a home".to_string(),
            Stage::Planner => "1) Hook\n2) Character + want\n3) Wind-down".to_string(),
            Stage::Storyteller => format!("Story draft #{seen}"),
            Stage::Reviser => format!("Revised story #{seen}"),
            Stage::Judge => self
                .verdicts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| REVISE_VERDICT.to_string()),
        })
    }
}

impl ModelClient for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn invoke<'a>(
        &'a self,
        prompt: &'a str,
        max_output_tokens: u32,
        temperature: f64,
    ) -> CompletionFuture<'a> {
        Box::pin(async move { self.respond(prompt, max_output_tokens, temperature) })
    }
}

/// Temp data dir with session and preference stores plus an in-memory
/// event sink.
pub struct Fixture {
    pub tmp: TempDir,
    pub events: Arc<MemoryEventSink>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
            events: Arc::new(MemoryEventSink::new()),
        }
    }

    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(self.tmp.path().join("sessions"))
    }

    pub fn preferences(&self) -> PreferenceStore {
        PreferenceStore::new(self.tmp.path().join("memory").join("user_prefs.json"))
    }

    pub fn controller(&self, model: &Arc<ScriptedModel>, settings: SessionSettings) -> SessionController {
        let model: Arc<dyn ModelClient> = model.clone();
        SessionController::new(model, self.sessions(), self.preferences(), settings)
            .unwrap()
            .with_event_sink(self.events.clone())
    }

    pub fn saved_artifacts(&self) -> usize {
        self.sessions().list().unwrap().len()
    }
}

pub fn settings(max_iterations: u32, hitl_enabled: bool) -> SessionSettings {
    SessionSettings {
        max_iterations,
        hitl_enabled,
        ..SessionSettings::default()
    }
}

/// Each transition must start where the previous one ended and follow the
/// declared table.
pub fn assert_valid_path(session: &SessionState) {
    assert_eq!(session.transitions[0].from, None);
    for pair in session.transitions.windows(2) {
        let from = pair[1].from.expect("only the first transition has no origin");
        assert_eq!(from, pair[0].to, "broken chain at {:?}", pair[1]);
        assert!(from.can_transition_to(pair[1].to), "illegal {:?}", pair[1]);
    }
    assert_eq!(session.transitions.last().unwrap().to, session.state);
}
