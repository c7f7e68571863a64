use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = ".story-studio";
const MAX_ITERATIONS_CAP: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub stages: StageBudgets,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

// ── Session loop ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Revision rounds allowed after the first draft
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Sampling temperature for the Draft stage
    #[serde(default = "default_base_temperature")]
    pub base_temperature: f64,
    /// Offer a feedback pass after the story is shown
    #[serde(default = "default_true")]
    pub hitl_enabled: bool,
}

fn default_max_iterations() -> u32 {
    2
}

fn default_base_temperature() -> f64 {
    0.4
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            base_temperature: default_base_temperature(),
            hitl_enabled: true,
        }
    }
}

// ── Stage budgets ───────────────────────────────────────────────

/// Output-token and temperature budget for one model call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageBudget {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl StageBudget {
    pub const fn new(max_tokens: u32, temperature: f64) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Per-stage budgets. The Draft stage takes its temperature from
/// `session.base_temperature`; only its token budget lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageBudgets {
    pub interpret: StageBudget,
    pub plan: StageBudget,
    pub draft_max_tokens: u32,
    pub judge: StageBudget,
    pub rewrite: StageBudget,
    pub revise: StageBudget,
    pub hitl: StageBudget,
}

impl Default for StageBudgets {
    fn default() -> Self {
        Self {
            interpret: StageBudget::new(800, 0.2),
            plan: StageBudget::new(700, 0.2),
            draft_max_tokens: 2200,
            judge: StageBudget::new(800, 0.0),
            rewrite: StageBudget::new(2200, 0.2),
            revise: StageBudget::new(2200, 0.25),
            hitl: StageBudget::new(2200, 0.35),
        }
    }
}

impl StageBudgets {
    fn named(&self) -> [(&'static str, StageBudget); 6] {
        [
            ("interpret", self.interpret),
            ("plan", self.plan),
            ("judge", self.judge),
            ("rewrite", self.rewrite),
            ("revise", self.revise),
            ("hitl", self.hitl),
        ]
    }
}

// ── Observability ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Append span events to `<data_dir>/logs/events.jsonl`
    #[serde(default = "default_true")]
    pub event_log: bool,
    /// "error" | "warn" | "info" | "debug" | "trace"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            event_log: true,
            log_level: default_log_level(),
        }
    }
}

// ── Config impl ─────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let data_dir = home.join(DATA_DIR_NAME);

        Self {
            config_path: data_dir.join("config.toml"),
            data_dir,
            api_key: None,
            api_base_url: default_api_base_url(),
            model: default_model(),
            session: SessionConfig::default(),
            stages: StageBudgets::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let data_dir = home.join(DATA_DIR_NAME);

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).context("Failed to create .story-studio directory")?;
        }

        let config_path = data_dir.join("config.toml");
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self {
                config_path,
                data_dir,
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit config file; its parent directory becomes the data dir.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        // Set computed paths that are skipped during serialization
        config.config_path = path.to_path_buf();
        config.data_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: STORY_STUDIO_API_KEY or OPENAI_API_KEY
        if let Ok(key) =
            std::env::var("STORY_STUDIO_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY"))
        {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        if let Ok(model) = std::env::var("STORY_STUDIO_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }

        if let Ok(url) = std::env::var("STORY_STUDIO_BASE_URL") {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.session.max_iterations > MAX_ITERATIONS_CAP {
            return Err(ConfigError::Validation(format!(
                "session.max_iterations must be <= {MAX_ITERATIONS_CAP}, got {}",
                self.session.max_iterations
            )));
        }
        validate_temperature("session.base_temperature", self.session.base_temperature)?;
        if self.stages.draft_max_tokens == 0 {
            return Err(ConfigError::Validation(
                "stages.draft_max_tokens must be > 0".into(),
            ));
        }
        for (name, budget) in self.stages.named() {
            if budget.max_tokens == 0 {
                return Err(ConfigError::Validation(format!(
                    "stages.{name}.max_tokens must be > 0"
                )));
            }
            validate_temperature(&format!("stages.{name}.temperature"), budget.temperature)?;
        }
        Ok(())
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.data_dir.join("logs").join("events.jsonl")
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("memory").join("user_prefs.json")
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

fn validate_temperature(field: &str, value: f64) -> std::result::Result<(), ConfigError> {
    if (0.0..=2.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be within 0.0..=2.0, got {value}"
        )))
    }
}
