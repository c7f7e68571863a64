use crate::Config;
use crate::app::report::{render_preferences, render_session_detail, render_session_row};
use crate::cli::interactive::{TerminalFeedback, prompt_request};
use crate::cli::{Cli, Commands, PrefCommands, SessionCommands};
use crate::controller::{SessionController, SessionSettings};
use crate::llm::create_model_client;
use crate::memory::PreferenceStore;
use crate::observability::create_event_sink;
use crate::session::SessionStore;
use crate::ui::{ConsoleProgress, style as ui};
use anyhow::{Result, bail};
use tracing::{info, warn};

/// Used when the user submits an empty request.
pub const DEFAULT_REQUEST: &str =
    "A cozy bedtime story about a friendly cat who finds a safe home.";

struct TellOptions {
    request: Option<String>,
    no_hitl: bool,
    max_iterations: Option<u32>,
    temperature: Option<f64>,
    quiet: bool,
    debug: bool,
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Tell {
            request,
            no_hitl,
            max_iterations,
            temperature,
            quiet,
            debug,
        } => {
            let options = TellOptions {
                request,
                no_hitl,
                max_iterations,
                temperature,
                quiet,
                debug,
            };
            tell(&config, options).await
        }
        Commands::Sessions { command } => match command {
            SessionCommands::List => list_sessions(&config),
            SessionCommands::Show { id } => show_session(&config, &id),
        },
        Commands::Prefs { command } => match command {
            PrefCommands::Show => show_preferences(&config),
            PrefCommands::Clear => clear_preferences(&config),
        },
    }
}

/// Config settings with per-run flag overrides applied and checked.
fn resolve_settings(config: &Config, options: &TellOptions) -> Result<SessionSettings> {
    let mut settings = SessionSettings::from_config(config);
    if options.no_hitl {
        settings.hitl_enabled = false;
    }
    if let Some(max_iterations) = options.max_iterations {
        if max_iterations > 10 {
            bail!("--max-iterations must be at most 10 (got {max_iterations})");
        }
        settings.max_iterations = max_iterations;
    }
    if let Some(temperature) = options.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            bail!("--temperature must be between 0.0 and 2.0 (got {temperature})");
        }
        settings.base_temperature = temperature;
    }
    Ok(settings)
}

fn resolve_request(request: Option<String>) -> Result<String> {
    let request = match request {
        Some(request) => request,
        None => prompt_request()?,
    };
    if request.trim().is_empty() {
        Ok(DEFAULT_REQUEST.to_string())
    } else {
        Ok(request.trim().to_string())
    }
}

async fn tell(config: &Config, options: TellOptions) -> Result<()> {
    let settings = resolve_settings(config, &options)?;
    let hitl_enabled = settings.hitl_enabled;
    let request = resolve_request(options.request)?;

    let model = create_model_client(config);
    info!(model = %config.model, client = model.name(), "tell.start");

    let mut controller = SessionController::new(
        model,
        SessionStore::new(config.sessions_dir()),
        PreferenceStore::new(config.preferences_path()),
        settings,
    )?
    .with_event_sink(create_event_sink(config)?)
    .with_progress(ConsoleProgress::new(!options.quiet, options.debug));
    if hitl_enabled {
        controller = controller.with_feedback(TerminalFeedback);
    }

    controller.run_session(&request).await?;
    Ok(())
}

fn list_sessions(config: &Config) -> Result<()> {
    let store = SessionStore::new(config.sessions_dir());
    let ids = store.list()?;
    if ids.is_empty() {
        println!("{}", ui::dim("No saved sessions yet."));
        return Ok(());
    }

    for id in ids {
        match store.load(&id) {
            Ok(session) => println!("{}", render_session_row(&session)),
            Err(error) => {
                warn!(session_id = %id, error = %error, "sessions.unreadable");
                println!("{}  {}", ui::value(&id), ui::yellow("(unreadable)"));
            }
        }
    }
    Ok(())
}

fn show_session(config: &Config, id: &str) -> Result<()> {
    let session = SessionStore::new(config.sessions_dir()).load(id)?;
    println!("{}", render_session_detail(&session));
    Ok(())
}

fn show_preferences(config: &Config) -> Result<()> {
    let store = PreferenceStore::new(config.preferences_path());
    let memory = store.load()?;
    println!("{}", render_preferences(&memory, store.path()));
    Ok(())
}

fn clear_preferences(config: &Config) -> Result<()> {
    let store = PreferenceStore::new(config.preferences_path());
    if store.clear()? {
        println!("{} Preferences cleared.", ui::success("✓"));
    } else {
        println!("{}", ui::dim("No stored preferences."));
    }
    Ok(())
}
