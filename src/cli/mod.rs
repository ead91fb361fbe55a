//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::connectivity::{ConnectivityProbe, DnsProbe, StaticConnectivity};
use crate::api::GeminiConnector;
use crate::auth::{
    resolve_credential, CredentialChain, CredentialSource, KeyringCredentials, PromptCredentials,
};
use crate::cli::ask::run_ask;
use crate::core::app::App;
use crate::core::config::data::{Config, CONFIG_KEYS};
use crate::core::tutor::Tutor;
use crate::logging::init_tracing;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "tutor")]
#[command(version)]
#[command(about = "A terminal math and science tutor backed by Gemini")]
#[command(
    long_about = "Tutor is a full-screen terminal chat that walks you through math and science \
problems step by step. Type a question or attach a picture of the problem.\n\n\
Authentication:\n\
  Use 'tutor auth' to store a Gemini API key in your system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Gemini API key (takes precedence over the keyring)\n\
  TUTOR_LOG         Tracing filter for --debug-log (default: info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  PgUp/PgDn         Scroll the conversation\n\
  Esc               Clear the input\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /image <path>     Attach an image to the next message\n\
  /detach           Remove the attached image\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini model to use
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Enable transcript logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostic tracing output to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,

    /// Treat the network as unreachable; every turn fails without a request
    #[arg(long, global = true)]
    pub offline: bool,

    /// Attach an image to the first message of the chat
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive tutor (default)
    Chat,
    /// Ask one question and print the answer
    Ask {
        /// Image of the problem
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Question to ask
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored Gemini API key
    Deauth,
    /// Set configuration values, or show them when called without arguments
    Set {
        /// Configuration key (model, base-url, theme)
        key: Option<String>,
        /// Value to set
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

/// Config as stored, with command-line overrides applied.
fn effective_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::load()?;
    if let Some(model) = &args.model {
        config.model = Some(model.clone());
    }
    Ok(config)
}

pub(crate) fn build_tutor(config: &Config, offline: bool) -> Tutor {
    let base_url = config.base_url_or_default();
    let connectivity: Arc<dyn ConnectivityProbe> = if offline {
        Arc::new(StaticConnectivity(false))
    } else {
        Arc::new(DnsProbe::for_base_url(&base_url))
    };
    Tutor::new(
        Arc::new(GeminiConnector::new(base_url)),
        connectivity,
        config.model_or_default(),
    )
}

fn unknown_key(key: &str) -> ! {
    eprintln!("❌ Unknown config key: {key}");
    eprintln!("Known keys: {}", CONFIG_KEYS.join(", "));
    std::process::exit(1);
}

fn set_config_value(key: Option<String>, value: Vec<String>) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let Some(key) = key else {
        config.print_all();
        return Ok(());
    };
    if value.is_empty() {
        eprintln!("⚠️  Missing value. Example: tutor set {key} <value>");
        std::process::exit(1);
    }

    let value = value.join(" ");
    if !config.set_value(&key, value.clone()) {
        unknown_key(&key);
    }
    config.save()?;
    println!("✅ Set {key} to: {value}");
    Ok(())
}

fn unset_config_value(key: String) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    if !config.unset_value(&key) {
        unknown_key(&key);
    }
    config.save()?;
    println!("✅ Unset {key}");
    Ok(())
}

async fn run_auth() -> Result<(), Box<dyn Error>> {
    let prompt = PromptCredentials::new(KeyringCredentials::new());
    match prompt.select_credential().await {
        Ok(_) => {
            println!("✅ API key saved to the system keyring");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Authentication failed: {err}");
            std::process::exit(1);
        }
    }
}

fn run_deauth() -> Result<(), Box<dyn Error>> {
    match KeyringCredentials::new().remove() {
        Ok(true) => println!("✅ API key removed from the system keyring"),
        Ok(false) => println!("No stored API key found"),
        Err(err) => {
            eprintln!("❌ Deauthentication failed: {err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_interactive(args: &Args, config: &Config) -> Result<(), Box<dyn Error>> {
    let credential = resolve_credential(&CredentialChain::standard()).await;
    if credential.is_none() {
        info!("no stored API key; starting on the key screen");
    }

    let theme = Theme::from_name(config.theme.as_deref().unwrap_or("dark"));
    let mut app = App::new(config, credential, theme);
    app.logging = LoggingState::new(args.log.clone())?;
    if let Some(path) = &args.image {
        app.attach_image(path);
    }

    run_chat(app, build_tutor(config, args.offline)).await
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.debug_log.as_deref())?;

    match &args.command {
        Some(Commands::Auth) => run_auth().await,
        Some(Commands::Deauth) => run_deauth(),
        Some(Commands::Set { key, value }) => set_config_value(key.clone(), value.clone()),
        Some(Commands::Unset { key }) => unset_config_value(key.clone()),
        Some(Commands::Ask { image, prompt }) => {
            let config = effective_config(&args)?;
            run_ask(prompt.clone(), image.as_deref(), &config, args.offline).await
        }
        Some(Commands::Chat) | None => {
            let config = effective_config(&args)?;
            run_interactive(&args, &config).await
        }
    }
}
