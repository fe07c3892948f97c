use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::app::{AppState, JsonFileStore, KeyValueStore, Locale, MemoryStore, Theme};
use crate::config::AppConfig;
use crate::notification::{NewNotification, NotificationEvent, NotificationKind, NotificationManager, TokioScheduler};
use crate::validation::{FormDefinition, FormValidation, MessageCatalog, Validator};
use crate::validators;

/// formstate - exercise the form validation and notification core from the shell
#[derive(Parser)]
#[command(name = "formstate")]
#[command(about = "Form validation and notification lifecycle tools")]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/formstate/formstate.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a form definition file (JSON, YAML or TOML)
    Validate { file: PathBuf },
    /// Run a single built-in input check
    Check { kind: CheckKind, value: String },
    /// Format a card or phone number
    Format { kind: FormatKind, value: String },
    /// Truncate text to a maximum number of characters
    Truncate { text: String, max: usize },
    /// Show a notification and wait for it to expire
    Notify {
        #[arg(long, default_value = "info")]
        kind: NotificationKind,
        #[arg(long)]
        message: String,
        #[arg(long)]
        title: Option<String>,
        /// Zero keeps the notification until it is dismissed
        #[arg(long)]
        duration_ms: Option<u64>,
    },
    /// Show or change persisted theme and locale
    Prefs {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        locale: Option<Locale>,
        #[arg(long)]
        toggle_theme: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CheckKind {
    Email,
    Phone,
    Url,
    Password,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatKind {
    Card,
    Phone,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config);

    match cli.command {
        Commands::Validate { file } => validate_form(&file, &config),
        Commands::Check { kind, value } => check_value(kind, &value),
        Commands::Format { kind, value } => format_value(kind, &value),
        Commands::Truncate { text, max } => {
            println!("{}", validators::truncate_text(&text, max));
            Ok(())
        }
        Commands::Notify {
            kind,
            message,
            title,
            duration_ms,
        } => notify(&config, kind, message, title, duration_ms).await,
        Commands::Prefs {
            theme,
            locale,
            toggle_theme,
        } => prefs(&config, theme, locale, toggle_theme),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit.map(Path::to_path_buf).or_else(AppConfig::default_path) {
        Some(path) => AppConfig::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn validate_form(file: &Path, config: &AppConfig) -> Result<()> {
    println!("🔍 Validating {}...", file.display());

    let form = FormDefinition::load(file)?.into_form()?;
    let mut state = FormValidation::with_validator(Validator::new(MessageCatalog::new(config.locale)));

    if state.validate_form(&form) {
        println!("✅ All {} field(s) are valid", form.len());
        return Ok(());
    }

    for (name, _) in form.iter() {
        let errors = state.field_errors(name);
        if errors.is_empty() {
            println!("  ✅ {}", name);
        } else {
            println!("  ❌ {}", name);
            for error in errors {
                println!("     - {}", error);
            }
        }
    }

    Err(anyhow!("{} field(s) failed validation", state.errors().len()))
}

fn check_value(kind: CheckKind, value: &str) -> Result<()> {
    let valid = match kind {
        CheckKind::Email => validators::is_valid_email(value),
        CheckKind::Phone => validators::is_valid_phone(value),
        CheckKind::Url => validators::is_valid_url(value),
        CheckKind::Password => {
            println!("🔐 Password strength: {}", validators::password_strength(value));
            return Ok(());
        }
    };

    if valid {
        println!("✅ '{}' is a valid {:?}", value, kind);
        Ok(())
    } else {
        Err(anyhow!("'{}' is not a valid {:?}", value, kind))
    }
}

fn format_value(kind: FormatKind, value: &str) -> Result<()> {
    let formatted = match kind {
        FormatKind::Card => validators::format_card_number(value),
        FormatKind::Phone => validators::format_phone_number(value),
    };
    println!("{}", formatted);
    Ok(())
}

async fn notify(
    config: &AppConfig,
    kind: NotificationKind,
    message: String,
    title: Option<String>,
    duration_ms: Option<u64>,
) -> Result<()> {
    let scheduler = Arc::new(TokioScheduler::new()?);
    let manager = NotificationManager::with_default_duration(scheduler, config.notifications.default_duration());
    let events = manager.subscribe();

    let mut request = NewNotification::new(kind, message);
    if let Some(title) = title {
        request = request.title(title);
    }
    if let Some(ms) = duration_ms {
        request = request.duration(Duration::from_millis(ms));
    }

    let id = manager.add(request);
    let notification = manager.get(id).context("Notification vanished right after being added")?;
    if notification.is_persistent() {
        println!("📌 {} [{}] stays until dismissed", id, notification.kind);
        return Ok(());
    }

    println!("⏳ {} [{}] expires in {:?}", id, notification.kind, notification.duration);
    while manager.contains(id) {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    for event in events.try_iter() {
        match event {
            NotificationEvent::Added(n) => println!("  ➕ added {}: {}", n.id, n.message),
            NotificationEvent::Removed(removed) => println!("  ➖ removed {}", removed),
            NotificationEvent::Cleared => println!("  🧹 cleared"),
        }
    }
    Ok(())
}

fn prefs(config: &AppConfig, theme: Option<Theme>, locale: Option<Locale>, toggle_theme: bool) -> Result<()> {
    let store: Box<dyn KeyValueStore> = match config.preferences_path() {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => {
            println!("⚠️  No config directory found, preferences will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let mut state = AppState::with_defaults(store, config.theme, config.locale);
    state.initialize();

    if let Some(theme) = theme {
        state.set_theme(theme)?;
    }
    if toggle_theme {
        state.toggle_theme()?;
    }
    if let Some(locale) = locale {
        state.set_locale(locale)?;
    }

    println!("🎨 Theme:  {}", state.theme().as_str());
    println!("🌐 Locale: {}", state.locale().as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notify_command() {
        let cli = Cli::try_parse_from([
            "formstate",
            "notify",
            "--kind",
            "warning",
            "--message",
            "disk almost full",
            "--duration-ms",
            "0",
        ])
        .unwrap();

        match cli.command {
            Commands::Notify { kind, message, duration_ms, .. } => {
                assert_eq!(kind, NotificationKind::Warning);
                assert_eq!(message, "disk almost full");
                assert_eq!(duration_ms, Some(0));
            }
            _ => panic!("expected notify command"),
        }
    }

    #[test]
    fn test_parse_prefs_command() {
        let cli = Cli::try_parse_from(["formstate", "prefs", "--theme", "dark", "--locale", "en"]).unwrap();
        match cli.command {
            Commands::Prefs { theme, locale, toggle_theme } => {
                assert_eq!(theme, Some(Theme::Dark));
                assert_eq!(locale, Some(Locale::En));
                assert!(!toggle_theme);
            }
            _ => panic!("expected prefs command"),
        }
    }

    #[test]
    fn test_check_and_format() {
        assert!(check_value(CheckKind::Email, "a@b.co").is_ok());
        assert!(check_value(CheckKind::Phone, "123").is_err());
        assert!(format_value(FormatKind::Card, "1234567812345678").is_ok());
    }
}
