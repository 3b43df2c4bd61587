//! # NOTEZ CLI (`notez`)
//!
//! Messy notes in, organized markdown or diagrams out.
//!
//! ## Usage
//!
//! ```bash
//! notez --config ./notez.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `notez process [FILE]` | Organize or visualize a note (stdin when no file) |
//! | `notez classify [FILE]` | Show the strategies and mood picked for a note |
//! | `notez export [FILE] --out DIR` | Process and write `notes.md` / `notes.mmd` |
//! | `notez watch FILE` | Re-process a file as it is edited, autosaving the draft |
//! | `notez key set <KEY>` / `clear` / `status` | Manage the stored remote credential |
//! | `notez draft show` / `save [FILE]` / `clear` | Manage the persisted draft |
//! | `notez smart on` / `off` / `status` | Toggle smart mode |
//!
//! ## Examples
//!
//! ```bash
//! # Diagram from a process description, rules only
//! printf 'first user signs up\nthen verifies email' | notez process --mode visualize --offline
//!
//! # Live mode with the remote organizer
//! GEMINI_API_KEY=... notez watch notes.txt
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use notez_app::export::export_note;
use notez_app::organizer::{resolve_credential, CREDENTIAL_ENV};
use notez_app::watch::{watch_file, WatchOptions};
use notez_app::{logging, Organizer};
use notez_core::{classify, detect_mood, should_visualize, Credential, Mode, NoteStore, NotezConfig};

const DEFAULT_CONFIG: &str = "notez.toml";

/// NOTEZ: turn freeform notes into structured markdown or mermaid diagrams.
///
/// Settings are read from `notez.toml` in the working directory when
/// present, or from `--config`.
#[derive(Parser)]
#[command(name = "notez", version, about = "Messy notes in, organized markdown or diagrams out")]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `storage.path`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organize or visualize a note and print the result.
    Process {
        /// Note file; stdin when omitted.
        file: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,

        /// Print HTML instead of markdown for organized notes.
        #[arg(long)]
        html: bool,

        /// Print the processed note as JSON.
        #[arg(long, conflicts_with = "html")]
        json: bool,
    },

    /// Show which strategies the rules pick for a note.
    Classify {
        /// Note file; stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Process a note and write it to `DIR/notes.md` or `DIR/notes.mmd`.
    Export {
        /// Note file; stdin when omitted.
        file: Option<PathBuf>,

        /// Output directory.
        #[arg(long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Follow a note file, re-processing it after each pause in editing.
    Watch {
        /// Note file. Created from the stored draft when missing or empty.
        file: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Print HTML instead of markdown for organized notes.
        #[arg(long)]
        html: bool,
    },

    /// Manage the stored remote credential.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Manage the persisted draft.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Toggle automatic mode selection.
    Smart {
        #[command(subcommand)]
        action: SmartAction,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Output mode. `smart` picks per note.
    #[arg(long, value_enum, default_value_t = ModeArg::Organize)]
    mode: ModeArg,

    /// Never call the remote organizer.
    #[arg(long)]
    offline: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Organize,
    Visualize,
    Smart,
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store a credential.
    Set {
        /// The API key.
        key: String,
    },
    /// Remove the stored credential.
    Clear,
    /// Show whether a credential is available.
    Status,
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the stored draft.
    Show,
    /// Store a draft from a file (stdin when omitted).
    Save {
        /// Draft file.
        file: Option<PathBuf>,
    },
    /// Remove the stored draft.
    Clear,
}

#[derive(Subcommand)]
enum SmartAction {
    /// Enable smart mode.
    On,
    /// Disable smart mode.
    Off,
    /// Show the effective setting.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    logging::init(&config.general, cli.verbose);

    let db_path = cli.db.unwrap_or_else(|| PathBuf::from(&config.storage.path));
    let store = NoteStore::open(&db_path).with_context(|| format!("opening store {}", db_path.display()))?;
    if let Some(enabled) = store.smart_mode()? {
        config.processing.smart_mode = enabled;
    }

    match cli.command {
        Commands::Process { file, run, html, json } => {
            let text = read_input(file.as_deref())?;
            let organizer = build_organizer(config, &store, &run)?;
            let Some(outcome) = organizer.process(&text, requested_mode(run.mode)).await else {
                eprintln!("Note is too short to process.");
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.note)?);
            } else if html {
                println!("{}", outcome.note.content());
            } else {
                println!("{}", outcome.note.source());
            }
        }
        Commands::Classify { file } => {
            let text = read_input(file.as_deref())?;
            let classification = classify(&text);
            let mood = detect_mood(&text);
            println!("note:      {}", classification.note);
            println!("diagram:   {}", classification.diagram);
            println!("visualize: {}", should_visualize(&text));
            println!("mood:      {} ({:.2})", mood.mood, mood.intensity);
        }
        Commands::Export { file, out, run } => {
            let text = read_input(file.as_deref())?;
            let organizer = build_organizer(config, &store, &run)?;
            let Some(outcome) = organizer.process(&text, requested_mode(run.mode)).await else {
                bail!("note is too short to export");
            };
            let path = export_note(&outcome.note, &out)?;
            println!("{}", path.display());
        }
        Commands::Watch { file, run, html } => {
            let mode = requested_mode(run.mode);
            let organizer = Arc::new(build_organizer(config, &store, &run)?);
            watch_file(&file, organizer, &store, WatchOptions { mode, html }).await?;
        }
        Commands::Key { action } => match action {
            KeyAction::Set { key } => {
                let Some(credential) = Credential::new(&key) else {
                    bail!("credential is empty");
                };
                if !credential.looks_valid() {
                    eprintln!("Warning: the key looks too short to be valid.");
                }
                store.set_credential(&credential)?;
                println!("Credential saved.");
            }
            KeyAction::Clear => {
                if store.clear_credential()? {
                    println!("Credential removed.");
                } else {
                    println!("No credential stored.");
                }
            }
            KeyAction::Status => {
                let stored = store.credential()?;
                let env_set = std::env::var(CREDENTIAL_ENV).is_ok_and(|v| !v.trim().is_empty());
                match (&stored, env_set) {
                    (Some(c), _) => println!("Stored credential present ({} chars).", c.expose().chars().count()),
                    (None, true) => println!("Using {CREDENTIAL_ENV} from the environment."),
                    (None, false) => println!("No credential; notes are processed locally."),
                }
            }
        },
        Commands::Draft { action } => match action {
            DraftAction::Show => {
                if let Some(draft) = store.draft()? {
                    println!("{draft}");
                }
            }
            DraftAction::Save { file } => {
                let text = read_input(file.as_deref())?;
                store.save_draft(&text)?;
            }
            DraftAction::Clear => {
                store.clear_draft()?;
            }
        },
        Commands::Smart { action } => match action {
            SmartAction::On => store.set_smart_mode(true)?,
            SmartAction::Off => store.set_smart_mode(false)?,
            SmartAction::Status => {
                let state = if config.processing.smart_mode { "on" } else { "off" };
                println!("Smart mode is {state}.");
            }
        },
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NotezConfig> {
    match path {
        Some(path) => NotezConfig::from_file(path).with_context(|| format!("loading config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            NotezConfig::from_file(Path::new(DEFAULT_CONFIG)).context("loading notez.toml")
        }
        None => Ok(NotezConfig::default()),
    }
}

fn build_organizer(mut config: NotezConfig, store: &NoteStore, run: &RunArgs) -> anyhow::Result<Organizer> {
    if matches!(run.mode, ModeArg::Smart) {
        config.processing.smart_mode = true;
    }
    if run.offline {
        return Ok(Organizer::offline(config));
    }
    let credential = resolve_credential(store.credential()?);
    Organizer::new(config, credential.as_ref()).context("configuring remote organizer")
}

fn requested_mode(mode: ModeArg) -> Mode {
    match mode {
        ModeArg::Visualize => Mode::Visualize,
        ModeArg::Organize | ModeArg::Smart => Mode::Organize,
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}
