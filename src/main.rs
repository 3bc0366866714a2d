//! Command-line entry point: inspect the localizations of an application bundle.

use std::io::Write as _;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use bundle_l10n::config::{
    ConfigError,
    ConfigManager,
    RegistrySettings,
};
use bundle_l10n::types::display_keys;
use bundle_l10n::{
    ApplicationRegistry,
    ContentMatch,
    Language,
    RegistryError,
};
use clap::{
    Parser,
    Subcommand,
};
use serde_json::{
    Map,
    Value,
    json,
};
use tracing_subscriber::EnvFilter;

/// Query the localized strings of an application bundle.
#[derive(Parser, Debug)]
#[command(name = "bundle-l10n", version, about)]
struct Cli {
    /// Settings file [default: `.bundle-l10n.json` in the current directory].
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reference language identifier, overriding the settings.
    #[arg(short, long, value_name = "ID")]
    language: Option<String>,

    /// Application bundle directory.
    #[arg(value_name = "BUNDLE")]
    bundle: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List the languages the bundle localizes.
    Languages,

    /// Match UI text in the reference language and translate the matches.
    Report {
        /// Text as displayed in the reference language.
        query: String,
    },

    /// Translate one key.
    Translate {
        key: String,

        /// Target language [default: every supported language].
        #[arg(long, value_name = "ID")]
        to: Option<String>,
    },
}

/// Failures surfaced to the user.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "bundle-l10n failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(cli.config.as_deref())?;
    let reference_language =
        Language::new(cli.language.unwrap_or_else(|| settings.reference_language.clone()));
    let mut registry =
        ApplicationRegistry::with_settings(reference_language, &cli.bundle, &settings)?;

    let output = match cli.command {
        Command::Languages => {
            let languages = registry.supported_languages()?;
            Value::Array(
                languages
                    .iter()
                    .map(|language| {
                        json!({
                            "identifier": language.identifier(),
                            "displayName": language.display_name(),
                        })
                    })
                    .collect(),
            )
        }
        Command::Report { query } => {
            registry.load_all_content()?;
            serde_json::to_value(registry.get_translations_report(query.as_str()))?
        }
        Command::Translate { key, to } => {
            registry.load_all_content()?;
            translate_key(&registry, key, to)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}

/// Settings from `--config`, or from the current directory when present.
fn load_settings(config_path: Option<&Path>) -> Result<RegistrySettings, CliError> {
    let mut manager = ConfigManager::new();
    match config_path {
        Some(path) => manager.load_settings_file(path)?,
        None => manager.load_settings(std::env::current_dir().ok())?,
    }
    Ok(manager.get_settings().clone())
}

/// Translations of `key` keyed by language display name.
///
/// With an explicit target a missing translation is an error; otherwise
/// languages lacking the key are skipped.
fn translate_key(
    registry: &ApplicationRegistry,
    key: String,
    target: Option<String>,
) -> Result<Value, CliError> {
    let content_match = ContentMatch::for_key(key, registry.reference_language().clone());
    let explicit = target.is_some();
    let languages = match target {
        Some(identifier) => vec![Language::new(identifier)],
        None => registry.supported_languages()?,
    };

    let mut found: Vec<(&Language, &str)> = Vec::new();
    for language in &languages {
        match registry.translate(&content_match, language) {
            Ok(value) => found.push((language, value)),
            Err(error) if !explicit => {
                tracing::warn!(language = %language, %error, "Skipping language");
            }
            Err(error) => return Err(error.into()),
        }
    }

    let found_languages: Vec<&Language> = found.iter().map(|(language, _)| *language).collect();
    let translations: Map<String, Value> = display_keys(&found_languages)
        .into_iter()
        .zip(found.iter().map(|(_, value)| json!(value)))
        .collect();
    Ok(Value::Object(translations))
}
