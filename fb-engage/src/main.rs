//! fb-engage - Interactive engagement console for Facebook accounts you own
//!
//! Prompts for a credential (Graph API token or browser session cookies),
//! then runs a menu loop over the engagement actions. Run statistics and
//! per-post comment times persist across sessions.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use dialoguer::{Input, Password, Select};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::debug;

use libfbengage::backends::create_backend;
use libfbengage::config::Config;
use libfbengage::cooldown::CooldownGate;
use libfbengage::dispatcher::{Dispatcher, Outcome};
use libfbengage::error::{EngageError, Result, StoreError};
use libfbengage::store::StateStore;
use libfbengage::types::{Credential, Reaction};

#[derive(Parser, Debug)]
#[command(name = "fb-engage")]
#[command(version)]
#[command(about = "Interactive engagement console for Facebook accounts you own", long_about = None)]
struct Cli {
    /// Path to the config file (default: <config dir>/fbengage/config.toml)
    #[arg(short, long, env = "FBENGAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the engagement state file (overrides the config)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Every flow below prompts, so a terminal is required up front
    if !atty::is(atty::Stream::Stdin) {
        return Err(EngageError::InvalidInput(
            "fb-engage is interactive and requires a terminal (stdin is not a TTY)".to_string(),
        ));
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let data_file = match cli.data_file {
        Some(path) => path,
        None => config.resolve_data_file()?,
    };
    debug!("Using state file {}", data_file.display());

    let store = Arc::new(Mutex::new(StateStore::open(data_file)?));
    install_interrupt_flush(store.clone())?;

    print_banner();

    let credential = prompt_credential()?;
    let backend = create_backend(credential, &config)?;
    let gate = CooldownGate::new(config.limits.cooldown_secs);
    let dispatcher = Dispatcher::new(backend, store.clone(), gate);

    println!("ℹ Using the {} backend", dispatcher.backend_name());

    menu_loop(&dispatcher, &store)
}

/// Flush the state file and leave with the conventional interrupt code
/// when the process is signalled mid-session
fn install_interrupt_flush(store: Arc<Mutex<StateStore>>) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            if let Ok(store) = store.lock() {
                if let Err(e) = store.flush() {
                    eprintln!("Error: failed to flush state: {}", e);
                }
            }
            println!();
            std::process::exit(130);
        }
    });

    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(40));
    println!("  fb-engage - engagement console");
    println!("{}", "=".repeat(40));
    println!();
    println!("⚠ Only use credentials for accounts YOU OWN.");
    println!("⚠ Automated engagement can violate the platform's terms of service.");
    println!();
}

fn prompt_credential() -> Result<Credential> {
    println!("How do you want to authenticate?");
    let modes = ["Access token (Graph API)", "Browser cookies (mobile site)"];
    let selection = Select::new().items(&modes).default(0).interact()?;

    if selection == 0 {
        let token: String = Password::new().with_prompt("Access token").interact()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(EngageError::InvalidInput(
                "access token must not be empty".to_string(),
            ));
        }
        Ok(Credential::Token(token))
    } else {
        let cookies: String = Password::new()
            .with_prompt("Cookie header or appstate JSON")
            .interact()?;
        let cookies = cookies.trim().to_string();
        if cookies.is_empty() {
            return Err(EngageError::InvalidInput(
                "cookie input must not be empty".to_string(),
            ));
        }
        Ok(Credential::Cookies(cookies))
    }
}

fn menu_loop(dispatcher: &Dispatcher, store: &Arc<Mutex<StateStore>>) -> Result<()> {
    loop {
        println!();
        let items = [
            "Comment on a post",
            "React to a post",
            "Follow a profile",
            "Validate credential",
            "Show statistics",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;

        match selection {
            0 => {
                let input: String = Input::new().with_prompt("Post URL or ID").interact_text()?;
                let message: String = Input::new().with_prompt("Comment text").interact_text()?;
                if message.trim().is_empty() {
                    println!("✗ Comment text must not be empty");
                    continue;
                }
                report(dispatcher.comment(&input, &message)?);
            }
            1 => {
                let input: String = Input::new().with_prompt("Post URL or ID").interact_text()?;
                let reaction = prompt_reaction()?;
                report(dispatcher.react(&input, reaction)?);
            }
            2 => {
                let input: String = Input::new()
                    .with_prompt("Profile URL or ID")
                    .interact_text()?;
                report(dispatcher.follow(&input)?);
            }
            3 => report(dispatcher.validate()?),
            4 => show_stats(store)?,
            5 => break,
            _ => {}
        }
    }

    Ok(())
}

fn prompt_reaction() -> Result<Reaction> {
    let labels: Vec<&str> = Reaction::ALL.iter().map(|r| r.as_str()).collect();
    let selection = Select::new().items(&labels).default(0).interact()?;
    Ok(Reaction::ALL[selection])
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Success {
            account: Some(account),
        } => match account.name {
            Some(name) => println!("✓ Credential valid for {} ({})", name, account.id),
            None => println!("✓ Credential valid for account {}", account.id),
        },
        Outcome::Success { account: None } => println!("✓ Done"),
        Outcome::Failure { error } => println!("✗ {}", error),
        Outcome::CooldownActive { remaining_minutes } => println!(
            "⚠ This post was commented on recently. Try again in {} minute(s).",
            remaining_minutes
        ),
        Outcome::Rejected { reason } => println!("✗ {}", reason),
        Outcome::Unsupported { backend, action } => println!(
            "⚠ The {} backend does not support the {} action.",
            backend, action
        ),
    }
}

fn show_stats(store: &Arc<Mutex<StateStore>>) -> Result<()> {
    let store = store.lock().unwrap();

    let stats = serde_json::to_string_pretty(store.stats()).map_err(StoreError::Json)?;
    println!();
    println!("{}", stats);

    let cooldowns = store.cooldowns();
    if !cooldowns.is_empty() {
        println!();
        println!("Posts with a recorded comment time ({}):", cooldowns.len());
        for (id, ts) in cooldowns.iter().take(20) {
            println!("  {} (last commented {})", id, format_timestamp(*ts));
        }
        if cooldowns.len() > 20 {
            println!("  ... and {} more", cooldowns.len() - 20);
        }
    }

    Ok(())
}

fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => ts.to_string(),
    }
}
