use super::state::StoryState;
use crate::error::SessionError;
use crate::judge::JudgeReport;
use crate::observability::MetricsSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub ts: DateTime<Utc>,
    pub from: Option<StoryState>,
    pub to: StoryState,
    pub reason: String,
}

/// Everything one run produced. Serialized once, at the end of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub trace_id: String,
    pub created_at: DateTime<Utc>,
    pub user_request_raw: String,

    pub state: StoryState,
    pub transitions: Vec<Transition>,

    #[serde(default)]
    pub request_spec: String,
    #[serde(default)]
    pub plan: String,
    /// Every draft, rewrite, revision and HITL update, in order.
    #[serde(default)]
    pub drafts: Vec<String>,
    /// One per judge call; entry `i` judged the draft that was latest then.
    #[serde(default)]
    pub judge_reports: Vec<JudgeReport>,
    #[serde(default)]
    pub final_story: String,

    #[serde(default)]
    pub user_feedback: Option<String>,
    #[serde(default)]
    pub metrics: Option<MetricsSnapshot>,
}

impl SessionState {
    pub fn new(user_request_raw: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut short_id = Uuid::new_v4().simple().to_string();
        short_id.truncate(12);

        Self {
            id: format!("session_{short_id}"),
            trace_id: Uuid::new_v4().to_string(),
            created_at: now,
            user_request_raw: user_request_raw.into(),
            state: StoryState::Init,
            transitions: vec![Transition {
                ts: now,
                from: None,
                to: StoryState::Init,
                reason: "created".into(),
            }],
            request_spec: String::new(),
            plan: String::new(),
            drafts: Vec::new(),
            judge_reports: Vec::new(),
            final_story: String::new(),
            user_feedback: None,
            metrics: None,
        }
    }

    /// Move to `to` if the transition table allows it, logging the step.
    pub fn transition(&mut self, to: StoryState, reason: &str) -> Result<Transition, SessionError> {
        if !self.state.can_transition_to(to) {
            return Err(SessionError::IllegalTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        let step = Transition {
            ts: Utc::now(),
            from: Some(self.state),
            to,
            reason: reason.to_string(),
        };
        self.transitions.push(step.clone());
        self.state = to;
        Ok(step)
    }

    pub fn latest_draft(&self) -> Option<&str> {
        self.drafts.last().map(String::as_str)
    }

    pub fn push_draft(&mut self, draft: String) {
        self.drafts.push(draft);
    }

    /// Reports pair with drafts; judging before any draft exists is a bug.
    pub fn push_judge_report(&mut self, report: JudgeReport) -> Result<(), SessionError> {
        if self.judge_reports.len() >= self.drafts.len() {
            return Err(SessionError::OrphanReport {
                index: self.judge_reports.len(),
            });
        }
        self.judge_reports.push(report);
        Ok(())
    }

    pub fn latest_report(&self) -> Option<&JudgeReport> {
        self.judge_reports.last()
    }

    pub fn state_path(&self) -> Vec<StoryState> {
        self.transitions.iter().map(|t| t.to).collect()
    }
}
