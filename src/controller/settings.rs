use crate::config::{Config, StageBudget, StageBudgets};

/// Knobs for one session. Built from config, then overridden per run by CLI
/// flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub hitl_enabled: bool,
    /// Revision rounds allowed after the first draft; the loop judges at most
    /// `max_iterations + 1` drafts.
    pub max_iterations: u32,
    pub base_temperature: f64,
    pub stages: StageBudgets,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            hitl_enabled: config.session.hitl_enabled,
            max_iterations: config.session.max_iterations,
            base_temperature: config.session.base_temperature,
            stages: config.stages.clone(),
        }
    }

    pub fn draft_budget(&self) -> StageBudget {
        StageBudget::new(self.stages.draft_max_tokens, self.base_temperature)
    }
}
