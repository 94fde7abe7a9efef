//! protrack - Personal workout log

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use protrack::app::AppState;
use protrack::blocks::{BlockId, all_blocks, find_block, resolve_block};
use protrack::db::Database;
use protrack::i18n::{Language, Theme};
use protrack::store::{Preferences, SessionStore};
use protrack::tips::{DEFAULT_TIP_MODEL, TipClient, TipFetcher, TipRequest, request_tip};
use protrack::tui::App;

#[derive(Parser)]
#[command(name = "protrack")]
#[command(author, version, about = "Personal workout log")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PROTRACK_DB", default_value = "protrack.db", global = true)]
    db: String,

    /// Gemini API key; built-in tips are used without one
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Model used for tips
    #[arg(long, env = "PROTRACK_TIP_MODEL", default_value = DEFAULT_TIP_MODEL, global = true)]
    model: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI calendar
    Tui,

    /// List recorded sessions, newest first
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show training statistics
    Stats,

    /// Ask for a training tip
    Tip {
        /// Block id (B1, B2, B3)
        #[arg(short, long, default_value = "B1")]
        block: String,
    },

    /// Show or change preferences
    Settings {
        /// dark | light
        #[arg(short, long)]
        theme: Option<String>,

        /// en | es | fr | ru | pl
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&cli.db, matches!(command, Commands::Tui))?;

    let db = Database::open(&cli.db)?;

    match command {
        Commands::Tui => {
            let store = SessionStore::load(db);
            let tips = TipFetcher::new(TipClient::from_config(cli.api_key, &cli.model), Handle::current());
            let state = AppState::new(store, tips, Local::now().date_naive());
            let mut app = App::new(state);
            app.run()?;
        }

        Commands::List { limit } => {
            let store = SessionStore::load(db);
            println!("Recent sessions:");
            println!("{:-<60}", "");
            for s in store.sessions().iter().take(limit) {
                let volume: f64 = s.exercises.iter().map(|e| e.volume()).sum();
                let duration = s
                    .duration_seconds
                    .map(|d| format!("{}:{:02}", d / 60, d % 60))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} | {} {:22} | {:>8.1} kg | {}",
                    s.date_key(),
                    s.block_id,
                    Language::En.translate(resolve_block(s.block_id).name),
                    volume,
                    duration
                );
            }
        }

        Commands::Stats => {
            let store = SessionStore::load(db);
            let today = Local::now().date_naive();

            println!("Training Statistics");
            println!("{:-<40}", "");
            println!("Total sessions: {}", store.len());
            println!("Rest today: {}", store.rest_count(today));
            for block in all_blocks() {
                let count = store.sessions().iter().filter(|s| s.block_id == block.id).count();
                let last = store
                    .latest_for_block(block.id)
                    .map(|s| s.date_key())
                    .unwrap_or_else(|| "-".to_string());
                println!("{} {:22} {:>4} sessions, last {}", block.id, Language::En.translate(block.name), count, last);
            }
        }

        Commands::Tip { block } => {
            let Some(id) = BlockId::parse(&block) else {
                bail!("Unknown block '{}', expected B1, B2 or B3", block);
            };
            let block = find_block(id).context("Block is not defined")?;
            let language = Preferences::load(&db).language;
            let service = TipClient::from_config(cli.api_key, &cli.model);
            let tip = request_tip(&service, &TipRequest::for_block(block, language)).await;
            println!("{}", tip);
        }

        Commands::Settings { theme, language } => {
            let mut prefs = Preferences::load(&db);
            if let Some(theme) = theme {
                prefs.theme = Theme::from_str_opt(&theme)
                    .with_context(|| format!("Unknown theme '{}'", theme))?;
            }
            if let Some(language) = language {
                prefs.language = Language::from_code(&language)
                    .with_context(|| format!("Unknown language '{}'", language))?;
            }
            prefs.save(&db)?;
            info!("Preferences saved");
            println!("Theme: {}", prefs.theme.as_str());
            println!("Language: {} ({})", prefs.language.label(), prefs.language.code());
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so its log goes to a file next to the database
fn init_logging(db_path: &str, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if to_file {
        let log_path = Path::new(db_path).with_file_name("protrack.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}
